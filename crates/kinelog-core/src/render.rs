//! View models and operator cues consumed by the platform feedback layer.

use crate::app::MenuMode;

/// Status-LED colors available on the device front panel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LedColor {
    Off,
    Green,
    Red,
    Blue,
    Cyan,
    Magenta,
    Yellow,
}

/// Audio/visual cue emitted alongside a state transition.
///
/// The platform layer drains these with [`crate::app::LoggerApp::take_cue`]
/// and drives the status LED and buzzer; the mapping reproduces the shipped
/// device (green + triple beep for success, magenta + double low beep for
/// failure, and so on).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cue {
    Startup,
    Busy,
    RecordingStarted,
    Success,
    Failure,
}

impl Cue {
    pub const fn led(self) -> LedColor {
        match self {
            Self::Startup => LedColor::Yellow,
            Self::Busy => LedColor::Blue,
            Self::RecordingStarted => LedColor::Red,
            Self::Success => LedColor::Green,
            Self::Failure => LedColor::Magenta,
        }
    }

    pub const fn beeps(self) -> u8 {
        match self {
            Self::Startup | Self::Busy | Self::RecordingStarted => 1,
            Self::Success => 3,
            Self::Failure => 2,
        }
    }

    pub const fn tone_hz(self) -> u16 {
        match self {
            Self::Failure => 2_000,
            _ => 3_000,
        }
    }
}

/// App-level view model consumed by the board/HAL renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen<'a> {
    /// Idle menu: the current mode plus the context it acts on.
    Menu {
        mode: MenuMode,
        mounted: bool,
        active_file: &'a str,
    },
    /// ChangeFile modal: one discovered filename at a time.
    Picker {
        name: &'a str,
        index: usize,
        total: usize,
    },
    /// Live capture status.
    Capturing { filename: &'a str, samples: u32 },
    /// Paced status text (mount/unmount/read results, errors).
    Notice {
        line1: &'static str,
        detail: &'a str,
    },
}
