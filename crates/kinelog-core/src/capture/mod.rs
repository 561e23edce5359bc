//! Sample acquisition: raw sensor frames, unit conversion, and the capture
//! session state machine.

use core::fmt::Write as _;

use heapless::String;
use log::info;

use crate::storage::{StorageError, StorageSession, VolumeDriver};

pub mod mock;

/// Raw MPU6050 frame in register order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RawSample {
    pub accel: [i16; 3],
    pub gyro: [i16; 3],
    pub temp: i16,
}

/// Polled sensor front end.
pub trait SampleSource {
    type Error;

    fn read_raw(&mut self) -> Result<RawSample, Self::Error>;
}

/// LSB per g at the ±2 g full-scale setting.
pub const ACCEL_LSB_PER_G: f32 = 16384.0;
/// LSB per °/s at the ±250 °/s full-scale setting.
pub const GYRO_LSB_PER_DPS: f32 = 131.0;
/// Die-temperature slope and offset from the datasheet.
pub const TEMP_LSB_PER_C: f32 = 340.0;
pub const TEMP_OFFSET_C: f32 = 36.53;

/// One converted sample in physical units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhysicalSample {
    pub accel_g: [f32; 3],
    pub gyro_dps: [f32; 3],
    pub temp_c: f32,
}

impl PhysicalSample {
    pub fn from_raw(raw: &RawSample) -> Self {
        Self {
            accel_g: raw.accel.map(|v| v as f32 / ACCEL_LSB_PER_G),
            gyro_dps: raw.gyro.map(|v| v as f32 / GYRO_LSB_PER_DPS),
            temp_c: raw.temp as f32 / TEMP_LSB_PER_C + TEMP_OFFSET_C,
        }
    }
}

/// Fixed first line of every capture file.
pub const CSV_HEADER: &str = "sample,accel_x,accel_y,accel_z,gyro_x,gyro_y,gyro_z,temp\n";

/// Worst-case record length: a ten-digit index plus seven signed two-decimal
/// fields and separators.
pub const RECORD_BYTES: usize = 96;

pub type RecordBuf = String<RECORD_BYTES>;

/// `<1-based index>,<7 × two-decimal values>` with a trailing newline — the
/// on-card wire format.
pub fn format_record(index: u32, sample: &PhysicalSample) -> RecordBuf {
    let mut record = RecordBuf::new();
    let _ = writeln!(
        record,
        "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
        index,
        sample.accel_g[0],
        sample.accel_g[1],
        sample.accel_g[2],
        sample.gyro_dps[0],
        sample.gyro_dps[1],
        sample.gyro_dps[2],
        sample.temp_c,
    );
    record
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaptureState {
    Idle,
    Recording { samples: u32 },
}

/// What went wrong during a capture tick.
#[derive(Debug)]
pub enum CaptureError<VE, SE> {
    Storage(StorageError<VE>),
    Sensor(SE),
}

/// Capture session state machine: `Idle -> start -> Recording -> stop ->
/// Idle`. The file handle itself lives in the storage session; this type
/// owns the sample counter and the transition rules.
#[derive(Debug, Default)]
pub struct CaptureLoop {
    state: CaptureState,
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::Idle
    }
}

impl CaptureLoop {
    pub const fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, CaptureState::Recording { .. })
    }

    /// Samples persisted so far; zero while idle.
    pub fn sample_count(&self) -> u32 {
        match self.state {
            CaptureState::Idle => 0,
            CaptureState::Recording { samples } => samples,
        }
    }

    /// Open the active file, write the header, and reset the counter.
    /// Requires a mounted volume; refused without side effects otherwise.
    pub fn start<V: VolumeDriver>(
        &mut self,
        session: &mut StorageSession<V>,
    ) -> Result<(), StorageError<V::Error>> {
        if self.is_recording() {
            return Err(StorageError::AlreadyRecording);
        }
        session.begin_capture(CSV_HEADER)?;
        self.state = CaptureState::Recording { samples: 0 };
        info!("capture: started file={}", session.active_name());
        Ok(())
    }

    /// One cooperative iteration: read a raw frame, convert, persist.
    /// Returns the running sample count.
    pub fn tick<V: VolumeDriver, S: SampleSource>(
        &mut self,
        session: &mut StorageSession<V>,
        sensor: &mut S,
    ) -> Result<u32, CaptureError<V::Error, S::Error>> {
        let CaptureState::Recording { samples } = self.state else {
            return Err(CaptureError::Storage(StorageError::NotRecording));
        };
        let raw = sensor.read_raw().map_err(CaptureError::Sensor)?;
        let record = format_record(samples + 1, &PhysicalSample::from_raw(&raw));
        session
            .append_record(record.as_str())
            .map_err(CaptureError::Storage)?;
        let samples = samples + 1;
        self.state = CaptureState::Recording { samples };
        Ok(samples)
    }

    /// Close the file and trigger the index rebuild. Returns the final
    /// sample count.
    pub fn stop<V: VolumeDriver>(
        &mut self,
        session: &mut StorageSession<V>,
    ) -> Result<u32, StorageError<V::Error>> {
        let CaptureState::Recording { samples } = self.state else {
            return Err(StorageError::NotRecording);
        };
        self.state = CaptureState::Idle;
        session.end_capture()?;
        info!("capture: stopped samples={samples}");
        Ok(samples)
    }

    /// Abort path for persistence failures: drop the handle and go idle.
    /// Returns how many samples made it out before the fault.
    pub fn abort<V: VolumeDriver>(&mut self, session: &mut StorageSession<V>) -> u32 {
        let samples = self.sample_count();
        self.state = CaptureState::Idle;
        session.abort_capture();
        samples
    }
}
