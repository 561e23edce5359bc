//! No-hardware axis sources used by tests and the desktop harness.

use core::convert::Infallible;
use core::sync::atomic::{AtomicU16, Ordering};

use super::{AXIS_CENTER, AxisSource};

/// Axis that always rests in the deadzone.
#[derive(Default, Debug, Clone, Copy)]
pub struct CenteredAxis;

impl AxisSource for CenteredAxis {
    type Error = Infallible;

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(AXIS_CENTER)
    }
}

/// Axis that plays a fixed script of readings, then parks in the deadzone.
#[derive(Debug, Clone)]
pub struct ScriptedAxis<'a> {
    readings: &'a [u16],
    cursor: usize,
}

impl<'a> ScriptedAxis<'a> {
    pub const fn new(readings: &'a [u16]) -> Self {
        Self {
            readings,
            cursor: 0,
        }
    }
}

impl AxisSource for ScriptedAxis<'_> {
    type Error = Infallible;

    fn read(&mut self) -> Result<u16, Self::Error> {
        let Some(raw) = self.readings.get(self.cursor).copied() else {
            return Ok(AXIS_CENTER);
        };
        self.cursor += 1;
        Ok(raw)
    }
}

/// Axis backed by a shared atomic, so a test or harness can steer the stick
/// while the app owns the source.
#[derive(Debug, Clone, Copy)]
pub struct AtomicAxis<'a> {
    raw: &'a AtomicU16,
}

impl<'a> AtomicAxis<'a> {
    pub const fn new(raw: &'a AtomicU16) -> Self {
        Self { raw }
    }
}

impl AxisSource for AtomicAxis<'_> {
    type Error = Infallible;

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(self.raw.load(Ordering::Relaxed))
    }
}
