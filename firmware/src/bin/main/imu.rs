//! Minimal MPU6050 front end: wake the part, burst-read one frame.

use embedded_hal::i2c::I2c;
use kinelog_core::capture::{RawSample, SampleSource};

const MPU6050_ADDR: u8 = 0x68;
const REG_PWR_MGMT_1: u8 = 0x6B;
/// Start of the 14-byte ACCEL/TEMP/GYRO register window.
const REG_ACCEL_XOUT_H: u8 = 0x3B;

pub struct Mpu6050<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Mpu6050<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Clear the sleep bit; the part powers up asleep.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        self.i2c.write(MPU6050_ADDR, &[REG_PWR_MGMT_1, 0x00])
    }
}

impl<I2C: I2c> SampleSource for Mpu6050<I2C> {
    type Error = I2C::Error;

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        let mut frame = [0u8; 14];
        self.i2c
            .write_read(MPU6050_ADDR, &[REG_ACCEL_XOUT_H], &mut frame)?;

        let word = |index: usize| i16::from_be_bytes([frame[index], frame[index + 1]]);
        Ok(RawSample {
            accel: [word(0), word(2), word(4)],
            temp: word(6),
            gyro: [word(8), word(10), word(12)],
        })
    }
}
