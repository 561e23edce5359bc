//! Desktop harness for the kinelog acquisition core.
//!
//! Drives the full device loop against in-memory drivers: a synthetic IMU,
//! an in-RAM volume, and a scripted joystick/button operator. The tour
//! mounts the card, records a short capture session, picks the recorded
//! file, streams it back through the diagnostic sink, and finally enters
//! maintenance mode.
//!
//! Run with `RUST_LOG=debug` to watch every state-machine transition.

use std::sync::atomic::{AtomicU16, Ordering};

use log::info;

use kinelog_core::{
    app::{LoggerApp, TickResult},
    capture::{RawSample, SampleSource},
    config::LoggerConfig,
    input::{AXIS_CENTER, ButtonId, InputController, mock::AtomicAxis},
    render::Screen,
    storage::{DiagnosticSink, memory::MemoryVolume},
};

// ---------------------------------------------------------------------------
// Tour script
// ---------------------------------------------------------------------------

/// Virtual loop period; the tour runs in simulated time, not wall time.
const STEP_MS: u64 = 50;

/// How long a scripted stick push is held.
const STICK_HOLD_MS: u64 = 150;

/// Stick deflections: left-of-deadzone and right-of-deadzone.
const STICK_LEFT: u16 = 100;
const STICK_RIGHT: u16 = 3_600;

/// `(at_ms, raw axis value)` — the operator's stick pushes.
const STICK_SCRIPT: &[(u64, u16)] = &[
    (6_300, STICK_RIGHT),  // MountToggle -> RecordToggle
    (11_300, STICK_RIGHT), // RecordToggle -> ReadFile
    (11_600, STICK_RIGHT), // ReadFile -> ChangeFile
    (14_400, STICK_LEFT),  // ChangeFile -> ReadFile
    (18_900, STICK_RIGHT), // ReadFile -> ChangeFile
    (19_200, STICK_RIGHT), // ChangeFile -> Maintenance
];

/// `(at_ms, button)` — the operator's presses.
const BUTTON_SCRIPT: &[(u64, ButtonId)] = &[
    (2_100, ButtonId::Confirm),  // mount
    (6_600, ButtonId::Confirm),  // start recording
    (9_100, ButtonId::Confirm),  // stop recording
    (11_900, ButtonId::Confirm), // open picker
    (12_200, ButtonId::Confirm), // select log1.csv
    (14_700, ButtonId::Confirm), // read it back
    (19_400, ButtonId::Confirm), // maintenance hand-off
];

const TOUR_END_MS: u64 = 30_000;

// ---------------------------------------------------------------------------
// Host-side drivers
// ---------------------------------------------------------------------------

/// Synthetic IMU: a gentle wobble in raw sensor counts.
struct WobbleSensor {
    t: f64,
}

impl WobbleSensor {
    fn new() -> Self {
        Self { t: 0.0 }
    }
}

impl SampleSource for WobbleSensor {
    type Error = std::convert::Infallible;

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        self.t += 0.25;
        let t = self.t;

        // Tilt wobble on X/Y, gravity on Z, slow rotation, ~26 °C die.
        let accel = [
            (0.25 * (t / 3.0).sin() * 16_384.0) as i16,
            (0.15 * (t / 5.0).cos() * 16_384.0) as i16,
            (0.98 * 16_384.0) as i16,
        ];
        let gyro = [
            (12.0 * (t / 7.0).sin() * 131.0) as i16,
            (4.0 * (t / 11.0).cos() * 131.0) as i16,
            (1.5 * 131.0) as i16,
        ];
        let temp = ((26.0 - 36.53) * 340.0) as i16;

        Ok(RawSample { accel, gyro, temp })
    }
}

/// Diagnostic console: the device routes this to UART, the harness to
/// stdout.
struct StdoutDiagnostics;

impl DiagnosticSink for StdoutDiagnostics {
    fn write(&mut self, bytes: &[u8]) {
        print!("{}", String::from_utf8_lossy(bytes));
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(now_ms: u64, screen: Screen<'_>) {
    match screen {
        Screen::Menu {
            mode,
            mounted,
            active_file,
        } => println!(
            "[{now_ms:>6}] MENU    <> {:<16} sd={} file={active_file}",
            mode.label(),
            if mounted { "mounted" } else { "unmounted" },
        ),
        Screen::Picker { name, index, total } => {
            println!("[{now_ms:>6}] PICKER  <> {name} ({}/{total})", index + 1)
        }
        Screen::Capturing { filename, samples } => {
            println!("[{now_ms:>6}] CAPTURE {filename} samples={samples}")
        }
        Screen::Notice { line1, detail } => {
            println!("[{now_ms:>6}] NOTICE  {line1} {detail}")
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting kinelog harness tour");

    let input = InputController::new(LoggerConfig::default().debounce_ms);
    let stick = AtomicU16::new(AXIS_CENTER);

    let mut app = LoggerApp::new(
        MemoryVolume::new(),
        WobbleSensor::new(),
        AtomicAxis::new(&stick),
        StdoutDiagnostics,
        &input,
        LoggerConfig::default(),
        0,
    );

    let mut buttons = BUTTON_SCRIPT.iter().copied().peekable();

    let mut now_ms = 0;
    while now_ms <= TOUR_END_MS {
        // Scripted stick position: deflected for a short hold around each
        // push, centered otherwise.
        let deflection = STICK_SCRIPT
            .iter()
            .find(|(at, _)| now_ms >= *at && now_ms < at + STICK_HOLD_MS)
            .map(|(_, value)| *value)
            .unwrap_or(AXIS_CENTER);
        stick.store(deflection, Ordering::Relaxed);

        // Scripted presses arrive as edges, exactly like the ISR would
        // deliver them.
        while let Some((at, button)) = buttons.peek().copied() {
            if at > now_ms {
                break;
            }
            input.on_edge(button, at as u32);
            buttons.next();
        }

        match app.tick(now_ms) {
            TickResult::NoRender => {}
            TickResult::RenderRequested => app.with_screen(|screen| render(now_ms, screen)),
            TickResult::EnterMaintenance => {
                app.with_screen(|screen| render(now_ms, screen));
                println!("[{now_ms:>6}] -- bootloader hand-off, tour over --");
                break;
            }
        }

        if let Some(cue) = app.take_cue() {
            println!(
                "[{now_ms:>6}] CUE     led={:?} beeps={}x{}Hz",
                cue.led(),
                cue.beeps(),
                cue.tone_hz(),
            );
        }

        now_ms += STEP_MS;
    }

    info!("Tour finished");
}
