//! Deterministic sensor sources for tests and the desktop harness.

use core::convert::Infallible;

use super::{RawSample, SampleSource};

/// Repeats one fixed frame forever.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSensor {
    frame: RawSample,
}

impl ConstantSensor {
    pub const fn new(frame: RawSample) -> Self {
        Self { frame }
    }
}

impl SampleSource for ConstantSensor {
    type Error = Infallible;

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        Ok(self.frame)
    }
}

/// Plays a script of frames, then repeats the final one.
#[derive(Debug, Clone)]
pub struct ScriptedSensor<'a> {
    frames: &'a [RawSample],
    cursor: usize,
}

impl<'a> ScriptedSensor<'a> {
    pub const fn new(frames: &'a [RawSample]) -> Self {
        Self { frames, cursor: 0 }
    }
}

impl SampleSource for ScriptedSensor<'_> {
    type Error = Infallible;

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        let frame = self
            .frames
            .get(self.cursor)
            .or_else(|| self.frames.last())
            .copied()
            .unwrap_or_default();
        if self.cursor < self.frames.len() {
            self.cursor += 1;
        }
        Ok(frame)
    }
}

/// Always fails; exercises the sensor error path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaultySensor;

impl SampleSource for FaultySensor {
    type Error = ();

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        Err(())
    }
}
