//! Operating-mode state machine for the acquisition device.
//!
//! [`LoggerApp`] is the one context value the main loop owns: it ties the
//! debounced input controller, the storage session, and the capture loop
//! together and exposes the hardware-free surface the platform layer drives
//! every iteration — `tick(now_ms)`, `with_screen`, `take_cue`.

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::{
    capture::CaptureLoop,
    capture::SampleSource,
    config::LoggerConfig,
    input::{AxisDirection, AxisSource, ButtonId, InputController, classify_axis},
    render::{Cue, Screen},
    storage::{DiagnosticSink, FileName, StorageError, StorageSession, VolumeDriver},
};

/// Outcome of one cooperative loop iteration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
    /// Storage is released; hand control to the bootloader-entry
    /// collaborator. The device does not return from this.
    EnterMaintenance,
}

/// Operating modes, in navigation order. Navigation wraps at both ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuMode {
    MountToggle,
    RecordToggle,
    ReadFile,
    ChangeFile,
    Maintenance,
}

impl MenuMode {
    pub const fn next(self) -> Self {
        match self {
            Self::MountToggle => Self::RecordToggle,
            Self::RecordToggle => Self::ReadFile,
            Self::ReadFile => Self::ChangeFile,
            Self::ChangeFile => Self::Maintenance,
            Self::Maintenance => Self::MountToggle,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::MountToggle => Self::Maintenance,
            Self::RecordToggle => Self::MountToggle,
            Self::ReadFile => Self::RecordToggle,
            Self::ChangeFile => Self::ReadFile,
            Self::Maintenance => Self::ChangeFile,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MountToggle => "MOUNT / UNMOUNT",
            Self::RecordToggle => "RECORD DATA",
            Self::ReadFile => "READ FILE",
            Self::ChangeFile => "CHANGE FILE",
            Self::Maintenance => "MAINTENANCE MODE",
        }
    }
}

/// What happens when a notice's deadline elapses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NoticeExit {
    /// Back to menu idling.
    Menu,
    /// Busy pacing done: perform the mount and show its result.
    RunMount,
    /// Busy pacing done: perform the unmount and show its result.
    RunUnmount,
    /// Busy pacing done: stream the active file and show the result.
    RunRead,
    /// Hand control to the bootloader.
    Maintenance,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum UiState {
    /// Idle menu. Navigation steps are rate-limited by `next_nav_ms` so the
    /// cyclic walk behaves the same at any tick frequency.
    Menu { next_nav_ms: u64 },
    /// ChangeFile modal over the directory index.
    Picker { cursor: usize, next_nav_ms: u64 },
    /// Capture session running; one sample per elapsed deadline.
    Capturing { next_sample_ms: u64 },
    /// Feedback pacing as an explicit timed sub-state. Button edges arriving
    /// now stay latched in the input controller and are consumed after the
    /// deadline, not lost.
    Notice {
        line1: &'static str,
        until_ms: u64,
        exit: NoticeExit,
    },
}

/// Device context owned by the main loop; everything the original kept in
/// globals lives here and is reachable from tests.
pub struct LoggerApp<'i, V, S, A, D>
where
    V: VolumeDriver,
    S: SampleSource,
    A: AxisSource,
    D: DiagnosticSink,
{
    session: StorageSession<V>,
    capture: CaptureLoop,
    sensor: S,
    axis: A,
    diag: D,
    input: &'i InputController,
    config: LoggerConfig,
    mode: MenuMode,
    ui: UiState,
    pending_redraw: bool,
    pending_cue: Option<Cue>,
    notice_detail: FileName,
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");
include!("actions.rs");

#[cfg(test)]
mod tests;
