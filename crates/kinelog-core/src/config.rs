//! Run-time tunables for the acquisition loop.

/// Timing and threshold configuration shared by every component.
///
/// The defaults reproduce the shipped device: a 200 ms button debounce
/// window, joystick thresholds at 500/2500 on a 12-bit axis, and 250 ms
/// pacing for both menu navigation and the capture cadence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoggerConfig {
    /// Minimum spacing between accepted edges of the same button.
    pub debounce_ms: u32,
    /// Axis readings below this navigate to the previous mode.
    pub axis_low: u16,
    /// Axis readings above this navigate to the next mode.
    pub axis_high: u16,
    /// Minimum spacing between applied navigation steps.
    pub nav_repeat_ms: u64,
    /// Spacing between persisted samples while recording.
    pub sample_interval_ms: u64,
    /// How long status notices stay on screen.
    pub notice_ms: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            axis_low: 500,
            axis_high: 2500,
            nav_repeat_ms: 250,
            sample_interval_ms: 250,
            notice_ms: 2_000,
        }
    }
}
