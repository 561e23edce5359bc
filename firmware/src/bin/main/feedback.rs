//! Feedback surface: RGB status LED, buzzer cues, and the text renderer
//! over the diagnostic console.

use embassy_time::Timer;
use esp_hal::gpio::Output;
use kinelog_core::render::{Cue, LedColor, Screen};
use kinelog_core::storage::DiagnosticSink;

/// One tone burst, matching the shipped device's beep length.
const BEEP_MS: u64 = 100;

pub struct StatusLed {
    red: Output<'static>,
    green: Output<'static>,
    blue: Output<'static>,
}

impl StatusLed {
    pub fn new(red: Output<'static>, green: Output<'static>, blue: Output<'static>) -> Self {
        Self { red, green, blue }
    }

    pub fn set(&mut self, color: LedColor) {
        let (r, g, b) = match color {
            LedColor::Off => (false, false, false),
            LedColor::Red => (true, false, false),
            LedColor::Green => (false, true, false),
            LedColor::Blue => (false, false, true),
            LedColor::Cyan => (false, true, true),
            LedColor::Magenta => (true, false, true),
            LedColor::Yellow => (true, true, false),
        };
        self.red.set_level(r.into());
        self.green.set_level(g.into());
        self.blue.set_level(b.into());
    }
}

pub struct Buzzer {
    pin: Output<'static>,
}

impl Buzzer {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }

    /// Bit-banged square wave; blocks the caller for the burst duration.
    pub async fn beep(&mut self, tone_hz: u16, duration_ms: u64) {
        let half_period_us = 500_000u64 / tone_hz.max(1) as u64;
        let cycles = (duration_ms * 1_000) / (half_period_us * 2).max(1);
        for _ in 0..cycles {
            self.pin.set_high();
            Timer::after_micros(half_period_us).await;
            self.pin.set_low();
            Timer::after_micros(half_period_us).await;
        }
    }
}

/// Drive one cue: latch the LED color, play the beep pattern.
pub async fn play_cue(led: &mut StatusLed, buzzer: &mut Buzzer, cue: Cue) {
    led.set(cue.led());
    for _ in 0..cue.beeps() {
        buzzer.beep(cue.tone_hz(), BEEP_MS).await;
        Timer::after_millis(BEEP_MS).await;
    }
}

/// Positioned-text renderer over the console; the OLED driver slots in
/// here once the panel is fitted.
pub fn render(screen: Screen<'_>) {
    match screen {
        Screen::Menu {
            mode,
            mounted,
            active_file,
        } => esp_println::println!(
            "ui: <> {} | sd={} file={}",
            mode.label(),
            if mounted { "mounted" } else { "unmounted" },
            active_file,
        ),
        Screen::Picker { name, index, total } => {
            esp_println::println!("ui: select csv: {} ({}/{})", name, index + 1, total)
        }
        Screen::Capturing { filename, samples } => {
            esp_println::println!("ui: recording {} samples={}", filename, samples)
        }
        Screen::Notice { line1, detail } => esp_println::println!("ui: {} {}", line1, detail),
    }
}

/// File dumps go to the same console, unframed, so a host-side capture
/// gets the CSV verbatim.
pub struct ConsoleDiagnostics;

impl DiagnosticSink for ConsoleDiagnostics {
    fn write(&mut self, bytes: &[u8]) {
        if let Ok(text) = core::str::from_utf8(bytes) {
            esp_println::print!("{}", text);
        }
    }
}
