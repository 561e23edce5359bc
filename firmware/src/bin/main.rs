#![no_std]
#![no_main]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Io, Level, Output, OutputConfig, Pull},
    spi::master::Spi,
    time::Rate,
    timer::timg::TimerGroup,
};
use kinelog_core::{
    app::{LoggerApp, TickResult},
    config::LoggerConfig,
    render::LedColor,
};
use log::{LevelFilter, info};

#[path = "main/axis.rs"]
mod axis;
#[path = "main/buttons.rs"]
mod buttons;
#[path = "main/feedback.rs"]
mod feedback;
#[path = "main/imu.rs"]
mod imu;
#[path = "main/sd.rs"]
mod sd;

/// Cooperative loop period. Sampling and navigation pace themselves off
/// deadlines inside the core, so this only bounds input latency.
const LOOP_PERIOD_MS: u64 = 50;

/// Conservative SPI clock for SD initialisation and logging.
const SD_SPI_HZ: u32 = 400_000;

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: kinelog starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Buttons on falling-edge interrupts:
    // CONFIRM=GPIO5, BACK=GPIO6, AUX=GPIO7 (active-low, internal pull-up).
    let mut io = Io::new(peripherals.IO_MUX);
    io.set_interrupt_handler(buttons::on_gpio_interrupt);
    let button_cfg = InputConfig::default().with_pull(Pull::Up);
    buttons::install(
        Input::new(peripherals.GPIO5, button_cfg),
        Input::new(peripherals.GPIO6, button_cfg),
        Input::new(peripherals.GPIO7, button_cfg),
    );

    // Joystick X axis on GPIO1 / ADC1.
    let axis = axis::JoystickAxis::new(peripherals.ADC1, peripherals.GPIO1);

    // MPU6050 wiring: SDA=GPIO8, SCL=GPIO9.
    let i2c = esp_hal::i2c::master::I2c::new(
        peripherals.I2C0,
        esp_hal::i2c::master::Config::default(),
    )
    .unwrap()
    .with_sda(peripherals.GPIO8)
    .with_scl(peripherals.GPIO9);
    let mut sensor = imu::Mpu6050::new(i2c);
    if sensor.init().is_err() {
        info!("imu: init failed, capture will report sensor faults");
    }

    // SD SPI wiring: CS=GPIO10, MOSI=GPIO11, SCK=GPIO12, MISO=GPIO13.
    let sd_cs = Output::new(peripherals.GPIO10, Level::High, OutputConfig::default());
    let sd_spi_cfg = esp_hal::spi::master::Config::default()
        .with_frequency(Rate::from_hz(SD_SPI_HZ))
        // SD cards in SPI mode use CPOL=0, CPHA=0.
        .with_mode(esp_hal::spi::Mode::_0);
    let sd_spi = Spi::new(peripherals.SPI2, sd_spi_cfg)
        .unwrap()
        .with_sck(peripherals.GPIO12)
        .with_mosi(peripherals.GPIO11)
        .with_miso(peripherals.GPIO13);
    let sd_device = ExclusiveDevice::new_no_delay(sd_spi, sd_cs).unwrap();
    let volume = sd::SdVolume::new(SdCard::new(sd_device, Delay::new()));

    // Feedback surface: RGB status LED on GPIO38/39/40, buzzer on GPIO41.
    let mut led = feedback::StatusLed::new(
        Output::new(peripherals.GPIO38, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO39, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO40, Level::Low, OutputConfig::default()),
    );
    let mut buzzer =
        feedback::Buzzer::new(Output::new(peripherals.GPIO41, Level::Low, OutputConfig::default()));

    let mut app = LoggerApp::new(
        volume,
        sensor,
        axis,
        feedback::ConsoleDiagnostics,
        &buttons::INPUT,
        LoggerConfig::default(),
        Instant::now().as_millis(),
    );

    info!("pins: confirm=GPIO5 back=GPIO6 aux=GPIO7 axis=GPIO1");
    info!("pins: imu sda=GPIO8 scl=GPIO9");
    info!("pins: sd cs=GPIO10 mosi=GPIO11 sck=GPIO12 miso=GPIO13 spi_hz={SD_SPI_HZ}");
    info!("pins: led r=GPIO38 g=GPIO39 b=GPIO40 buzzer=GPIO41");

    loop {
        let now_ms = Instant::now().as_millis();
        match app.tick(now_ms) {
            TickResult::NoRender => {}
            TickResult::RenderRequested => app.with_screen(feedback::render),
            TickResult::EnterMaintenance => {
                app.with_screen(feedback::render);
                led.set(LedColor::Off);
                info!("maintenance: resetting into the bootloader");
                esp_hal::system::software_reset();
            }
        }

        // Cue playback blocks the loop for its own pacing, like the rest of
        // the feedback surface; latched button edges survive the wait.
        if let Some(cue) = app.take_cue() {
            feedback::play_cue(&mut led, &mut buzzer, cue).await;
        }

        Timer::after_millis(LOOP_PERIOD_MS).await;
    }
}
