//! Joystick axis over the on-chip ADC.

use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcConfig, AdcPin, Attenuation};
use esp_hal::peripherals::{ADC1, GPIO1};
use kinelog_core::input::AxisSource;

/// X axis of the navigation stick, read one-shot per poll.
pub struct JoystickAxis {
    adc: Adc<'static, ADC1<'static>, Blocking>,
    pin: AdcPin<GPIO1<'static>, ADC1<'static>>,
}

impl JoystickAxis {
    pub fn new(adc: ADC1<'static>, gpio: GPIO1<'static>) -> Self {
        let mut config = AdcConfig::new();
        // 11 dB attenuation covers the full 3.3 V stick swing.
        let pin = config.enable_pin(gpio, Attenuation::_11dB);
        let adc = Adc::new(adc, config);
        Self { adc, pin }
    }
}

impl AxisSource for JoystickAxis {
    type Error = ();

    fn read(&mut self) -> Result<u16, Self::Error> {
        nb::block!(self.adc.read_oneshot(&mut self.pin)).map_err(|_| ())
    }
}
