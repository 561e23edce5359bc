use core::sync::atomic::{AtomicU16, Ordering};

use super::{LoggerApp, MenuMode, TickResult};
use crate::{
    capture::{CSV_HEADER, RawSample, mock::ConstantSensor},
    config::LoggerConfig,
    input::{AXIS_CENTER, ButtonId, InputController, mock::AtomicAxis},
    render::{Cue, Screen},
    storage::memory::{BufferedDiagnostics, MemoryVolume},
};

type TestApp<'i, 'a> =
    LoggerApp<'i, MemoryVolume, ConstantSensor, AtomicAxis<'a>, BufferedDiagnostics>;

const LEFT: u16 = 100;
const RIGHT: u16 = 3_000;

fn make<'i, 'a>(
    volume: MemoryVolume,
    input: &'i InputController,
    raw: &'a AtomicU16,
) -> TestApp<'i, 'a> {
    LoggerApp::new(
        volume,
        ConstantSensor::new(RawSample::default()),
        AtomicAxis::new(raw),
        BufferedDiagnostics::new(),
        input,
        LoggerConfig::default(),
        0,
    )
}

/// Tick past the boot notice; the menu is idle at t = 2000.
fn settle_boot(app: &mut TestApp) -> u64 {
    app.tick(2_000);
    2_000
}

/// Hold the stick for one tick, then recenter.
fn nav_step(app: &mut TestApp, raw: &AtomicU16, t: u64, value: u16) {
    raw.store(value, Ordering::Relaxed);
    app.tick(t);
    raw.store(AXIS_CENTER, Ordering::Relaxed);
}

/// Drive the full mount flow from the MountToggle mode starting at `t`.
/// Returns the time at which the menu is idle again.
fn mount_via_ui(app: &mut TestApp, input: &InputController, t: u64) -> u64 {
    input.on_edge(ButtonId::Confirm, t as u32);
    app.tick(t); // busy notice
    app.tick(t + 2_000); // mount runs, result notice
    app.tick(t + 4_000); // back to menu
    assert!(app.is_mounted());
    let _ = app.take_cue();
    t + 4_000
}

fn screen_menu_mode(app: &TestApp) -> Option<MenuMode> {
    let mut out = None;
    app.with_screen(|screen| {
        if let Screen::Menu { mode, .. } = screen {
            out = Some(mode);
        }
    });
    out
}

fn screen_notice_line(app: &TestApp) -> Option<&'static str> {
    let mut out = None;
    app.with_screen(|screen| {
        if let Screen::Notice { line1, .. } = screen {
            out = Some(line1);
        }
    });
    out
}

#[test]
fn boots_into_a_paced_startup_notice() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);

    assert_eq!(app.take_cue(), Some(Cue::Startup));
    assert_eq!(screen_notice_line(&app), Some("STARTING"));

    app.tick(500);
    assert_eq!(screen_notice_line(&app), Some("STARTING"));

    app.tick(2_000);
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::MountToggle));
}

#[test]
fn navigation_wraps_at_both_ends() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    nav_step(&mut app, &raw, t + 100, LEFT);
    assert_eq!(app.menu_mode(), MenuMode::Maintenance);

    nav_step(&mut app, &raw, t + 400, RIGHT);
    assert_eq!(app.menu_mode(), MenuMode::MountToggle);
}

#[test]
fn deadzone_readings_do_not_navigate() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    for step in 1..6 {
        app.tick(t + step * 300);
    }
    assert_eq!(app.menu_mode(), MenuMode::MountToggle);
}

#[test]
fn navigation_steps_are_rate_limited() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    raw.store(RIGHT, Ordering::Relaxed);
    app.tick(t + 100);
    assert_eq!(app.menu_mode(), MenuMode::RecordToggle);

    // Held stick, but inside the repeat window: no movement.
    app.tick(t + 200);
    assert_eq!(app.menu_mode(), MenuMode::RecordToggle);

    app.tick(t + 400);
    assert_eq!(app.menu_mode(), MenuMode::ReadFile);
    raw.store(AXIS_CENTER, Ordering::Relaxed);
}

#[test]
fn mount_then_unmount_via_the_menu() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    input.on_edge(ButtonId::Confirm, (t + 100) as u32);
    app.tick(t + 100);
    assert_eq!(app.take_cue(), Some(Cue::Busy));
    assert_eq!(screen_notice_line(&app), Some("MOUNTING"));
    assert!(!app.is_mounted());

    app.tick(t + 2_100);
    assert!(app.is_mounted());
    assert_eq!(app.take_cue(), Some(Cue::Success));
    assert_eq!(screen_notice_line(&app), Some("SD MOUNTED"));

    app.tick(t + 4_100);
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::MountToggle));

    // Second confirm toggles back to unmounted.
    input.on_edge(ButtonId::Confirm, (t + 4_200) as u32);
    app.tick(t + 4_200);
    assert_eq!(screen_notice_line(&app), Some("UNMOUNTING"));
    app.tick(t + 6_200);
    assert!(!app.is_mounted());
    assert_eq!(screen_notice_line(&app), Some("SD UNMOUNTED"));
    app.tick(t + 8_200);
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::MountToggle));
}

#[test]
fn record_session_writes_header_and_paced_records() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);

    nav_step(&mut app, &raw, t + 100, RIGHT);
    assert_eq!(app.menu_mode(), MenuMode::RecordToggle);

    input.on_edge(ButtonId::Confirm, (t + 400) as u32);
    app.tick(t + 400);
    assert_eq!(app.take_cue(), Some(Cue::RecordingStarted));
    assert!(app.is_recording());

    app.with_screen(|screen| {
        assert!(matches!(
            screen,
            Screen::Capturing {
                filename: "log1.csv",
                samples: 0,
            }
        ));
    });

    // One persisted sample per elapsed 250 ms deadline.
    app.tick(t + 650);
    app.tick(t + 900);
    app.tick(t + 1_150);
    app.with_screen(|screen| {
        assert!(matches!(screen, Screen::Capturing { samples: 3, .. }));
    });

    input.on_edge(ButtonId::Confirm, (t + 1_300) as u32);
    app.tick(t + 1_300);
    assert!(!app.is_recording());
    assert_eq!(app.take_cue(), Some(Cue::Success));
    app.with_screen(|screen| {
        assert!(matches!(
            screen,
            Screen::Notice {
                line1: "DATA SAVED",
                detail: "SAMPLES: 3",
            }
        ));
    });

    let volume = app.session().volume();
    let text = core::str::from_utf8(volume.file_named("log1.csv").unwrap()).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.starts_with(CSV_HEADER));

    // After the notice the sequence number has moved on.
    app.tick(t + 3_300);
    assert_eq!(app.session().active_name(), "log2.csv");
}

#[test]
fn record_while_unmounted_is_refused_and_creates_nothing() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    nav_step(&mut app, &raw, t + 100, RIGHT);
    input.on_edge(ButtonId::Confirm, (t + 400) as u32);
    app.tick(t + 400);

    assert!(!app.is_recording());
    assert_eq!(app.take_cue(), Some(Cue::Failure));
    assert_eq!(screen_notice_line(&app), Some("SD NOT MOUNTED"));
    assert_eq!(app.session().volume().file_count(), 0);
}

#[test]
fn sequence_numbers_never_repeat_across_sessions() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::with_files(&["log1.csv"]), &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);
    assert_eq!(app.session().active_name(), "log2.csv");

    nav_step(&mut app, &raw, t + 100, RIGHT);

    // First session.
    input.on_edge(ButtonId::Confirm, (t + 400) as u32);
    app.tick(t + 400);
    app.tick(t + 650);
    input.on_edge(ButtonId::Confirm, (t + 700) as u32);
    app.tick(t + 700);
    app.tick(t + 2_700); // notice elapses

    // Second session starts on a fresh name.
    assert_eq!(app.session().active_name(), "log3.csv");
    input.on_edge(ButtonId::Confirm, (t + 2_800) as u32);
    app.tick(t + 2_800);
    assert!(app.is_recording());
    input.on_edge(ButtonId::Confirm, (t + 3_100) as u32);
    app.tick(t + 3_100);

    let volume = app.session().volume();
    assert!(volume.file_named("log2.csv").is_some());
    assert!(volume.file_named("log3.csv").is_some());
}

#[test]
fn picker_cycles_and_selects_a_file() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let volume = MemoryVolume::with_files(&["log1.csv", "log3.csv"]);
    let mut app = make(volume, &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);
    assert_eq!(app.session().active_name(), "log4.csv");

    // MountToggle -> ChangeFile is three steps right.
    nav_step(&mut app, &raw, t + 100, RIGHT);
    nav_step(&mut app, &raw, t + 400, RIGHT);
    nav_step(&mut app, &raw, t + 700, RIGHT);
    assert_eq!(app.menu_mode(), MenuMode::ChangeFile);

    input.on_edge(ButtonId::Confirm, (t + 900) as u32);
    app.tick(t + 900);
    app.with_screen(|screen| {
        assert!(matches!(
            screen,
            Screen::Picker {
                name: "log1.csv",
                index: 0,
                total: 2,
            }
        ));
    });

    // Wraps over the two entries in both directions.
    nav_step(&mut app, &raw, t + 1_200, RIGHT);
    app.with_screen(|screen| {
        assert!(matches!(screen, Screen::Picker { name: "log3.csv", .. }));
    });
    nav_step(&mut app, &raw, t + 1_500, RIGHT);
    app.with_screen(|screen| {
        assert!(matches!(screen, Screen::Picker { name: "log1.csv", .. }));
    });
    nav_step(&mut app, &raw, t + 1_800, LEFT);
    app.with_screen(|screen| {
        assert!(matches!(screen, Screen::Picker { name: "log3.csv", .. }));
    });

    input.on_edge(ButtonId::Confirm, (t + 2_000) as u32);
    app.tick(t + 2_000);
    assert_eq!(app.take_cue(), Some(Cue::Success));
    assert_eq!(screen_notice_line(&app), Some("FILE SELECTED"));
    assert_eq!(app.session().active_name(), "log3.csv");
}

#[test]
fn picker_back_cancels_without_changing_the_selection() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let volume = MemoryVolume::with_files(&["log1.csv"]);
    let mut app = make(volume, &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);

    nav_step(&mut app, &raw, t + 100, RIGHT);
    nav_step(&mut app, &raw, t + 400, RIGHT);
    nav_step(&mut app, &raw, t + 700, RIGHT);
    input.on_edge(ButtonId::Confirm, (t + 900) as u32);
    app.tick(t + 900);

    input.on_edge(ButtonId::Back, (t + 1_200) as u32);
    app.tick(t + 1_200);
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::ChangeFile));
    assert_eq!(app.session().active_name(), "log2.csv");
}

#[test]
fn change_file_on_an_empty_card_reports_and_returns() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);

    nav_step(&mut app, &raw, t + 100, RIGHT);
    nav_step(&mut app, &raw, t + 400, RIGHT);
    nav_step(&mut app, &raw, t + 700, RIGHT);
    input.on_edge(ButtonId::Confirm, (t + 900) as u32);
    app.tick(t + 900);

    assert_eq!(app.take_cue(), Some(Cue::Failure));
    assert_eq!(screen_notice_line(&app), Some("NO CSV FOUND"));
    app.tick(t + 2_900);
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::ChangeFile));
}

#[test]
fn read_file_streams_the_active_file_to_diagnostics() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut volume = MemoryVolume::new();
    volume.seed_file("log1.csv", b"sample,temp\n1,36.53\n");
    let mut app = make(volume, &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);

    // Pick log1.csv so the read hits real content.
    nav_step(&mut app, &raw, t + 100, RIGHT);
    nav_step(&mut app, &raw, t + 400, RIGHT);
    nav_step(&mut app, &raw, t + 700, RIGHT);
    input.on_edge(ButtonId::Confirm, (t + 900) as u32);
    app.tick(t + 900);
    input.on_edge(ButtonId::Confirm, (t + 1_200) as u32);
    app.tick(t + 1_200);
    app.tick(t + 3_200); // selection notice elapses

    nav_step(&mut app, &raw, t + 3_300, LEFT);
    assert_eq!(app.menu_mode(), MenuMode::ReadFile);

    input.on_edge(ButtonId::Confirm, (t + 3_500) as u32);
    app.tick(t + 3_500);
    assert_eq!(screen_notice_line(&app), Some("READING FILE"));

    app.tick(t + 5_500);
    assert_eq!(app.take_cue(), Some(Cue::Success));
    assert_eq!(screen_notice_line(&app), Some("FILE READ"));
    assert_eq!(app.diag.as_bytes(), b"sample,temp\n1,36.53\n");
}

#[test]
fn read_file_is_gated_on_mounted_storage() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    nav_step(&mut app, &raw, t + 100, RIGHT);
    nav_step(&mut app, &raw, t + 400, RIGHT);
    assert_eq!(app.menu_mode(), MenuMode::ReadFile);

    input.on_edge(ButtonId::Confirm, (t + 600) as u32);
    app.tick(t + 600);
    assert_eq!(app.take_cue(), Some(Cue::Failure));
    assert_eq!(screen_notice_line(&app), Some("SD NOT MOUNTED"));
    assert!(app.diag.as_bytes().is_empty());
}

#[test]
fn maintenance_unmounts_then_hands_control_over() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);

    nav_step(&mut app, &raw, t + 100, LEFT);
    assert_eq!(app.menu_mode(), MenuMode::Maintenance);

    input.on_edge(ButtonId::Confirm, (t + 300) as u32);
    app.tick(t + 300);
    assert!(!app.is_mounted());
    assert_eq!(screen_notice_line(&app), Some("MAINTENANCE MODE"));

    assert_eq!(app.tick(t + 2_300), TickResult::EnterMaintenance);
    // The hand-off request is sticky until the platform acts on it.
    assert_eq!(app.tick(t + 2_400), TickResult::EnterMaintenance);
}

#[test]
fn confirm_during_a_notice_is_latched_and_fires_once() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    input.on_edge(ButtonId::Confirm, (t + 100) as u32);
    app.tick(t + 100); // mounting notice

    // Pressed again mid-notice: latched, not dropped, not double-fired.
    input.on_edge(ButtonId::Confirm, (t + 600) as u32);
    app.tick(t + 1_000);
    assert_eq!(screen_notice_line(&app), Some("MOUNTING"));

    app.tick(t + 2_100); // mount runs
    assert!(app.is_mounted());
    app.tick(t + 4_100); // result notice elapses, menu is back

    // The latched press now dispatches exactly one unmount flow.
    app.tick(t + 4_200);
    assert_eq!(screen_notice_line(&app), Some("UNMOUNTING"));
    app.tick(t + 6_200);
    app.tick(t + 8_200);
    assert!(!app.is_mounted());
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::MountToggle));
    assert!(!input.poll_and_clear(ButtonId::Confirm));
}

#[test]
fn two_presses_inside_the_debounce_window_act_once() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);

    input.on_edge(ButtonId::Confirm, (t + 100) as u32);
    input.on_edge(ButtonId::Confirm, (t + 250) as u32); // dropped
    app.tick(t + 300);
    app.tick(t + 2_300);
    app.tick(t + 4_300);
    app.tick(t + 4_400);

    // A single toggle ran: mounted, and nothing left latched.
    assert!(app.is_mounted());
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::MountToggle));
}

#[test]
fn write_failure_aborts_the_session_and_recovers() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);

    nav_step(&mut app, &raw, t + 100, RIGHT);
    input.on_edge(ButtonId::Confirm, (t + 400) as u32);
    app.tick(t + 400);
    app.tick(t + 650); // one good sample

    app.session().volume().fail_appends(true);
    app.tick(t + 900);
    assert!(!app.is_recording());
    assert_eq!(app.take_cue(), Some(Cue::Failure));
    app.with_screen(|screen| {
        assert!(matches!(
            screen,
            Screen::Notice {
                line1: "CAPTURE FAILED",
                detail: "SAMPLES: 1",
            }
        ));
    });

    // Mount state survived the abort; the menu keeps working.
    app.tick(t + 2_900);
    assert!(app.is_mounted());
    assert_eq!(screen_menu_mode(&app), Some(MenuMode::RecordToggle));
}

#[test]
fn capture_ignores_navigation_until_stopped() {
    let input = InputController::new(200);
    let raw = AtomicU16::new(AXIS_CENTER);
    let mut app = make(MemoryVolume::new(), &input, &raw);
    let t = settle_boot(&mut app);
    let t = mount_via_ui(&mut app, &input, t + 100);

    nav_step(&mut app, &raw, t + 100, RIGHT);
    input.on_edge(ButtonId::Confirm, (t + 400) as u32);
    app.tick(t + 400);
    assert!(app.is_recording());

    raw.store(RIGHT, Ordering::Relaxed);
    app.tick(t + 700);
    app.tick(t + 1_000);
    raw.store(AXIS_CENTER, Ordering::Relaxed);
    assert_eq!(app.menu_mode(), MenuMode::RecordToggle);
    assert!(app.is_recording());
}
