//! CoopDoor Firmware: Main Entry Point
//!
//! Hexagonal architecture with a cooperative foreground loop and a 1 ms
//! tick timer.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Ds3231        NvsByteStore      Hd44780       LiftDriver      │
//! │  (ClockPort)   (Storage+Config)  (DisplayPort) (LiftPort)      │
//! │  LogEventSink  AdcKeypadInput    GpioRelayBank                 │
//! │  (EventSink)   (AnalogPort)      (RelayBank)                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            CoopController (pure logic)                 │    │
//! │  │  Alarm check · Lift sequencer · Keypad menu            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  TICKS (timer task, 1 kHz) · ALARM_LINE (GPIO ISR)             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Result, anyhow};
use log::{info, warn};

use esp_idf_hal::delay::{Ets, FreeRtos, NON_BLOCK};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Output, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;

use coopdoor::adapters::ds3231::Ds3231;
use coopdoor::adapters::hardware::HardwareAdapter;
use coopdoor::adapters::lcd::{Hd44780, LcdPins};
use coopdoor::adapters::log_sink::LogEventSink;
use coopdoor::adapters::nvs::NvsByteStore;
use coopdoor::adapters::relays::GpioRelayBank;
use coopdoor::alarm::signal::ALARM_LINE;
use coopdoor::app::ports::{ConfigPort, EventSink, LiftPort};
use coopdoor::app::service::CoopController;
use coopdoor::buttons::Keypad;
use coopdoor::config::ControllerConfig;
use coopdoor::console::{ConsoleAction, ConsoleMode, DebugConsole};
use coopdoor::drivers::hw_init::{self, AdcKeypadInput};
use coopdoor::drivers::hw_timer;
use coopdoor::lift::LiftDriver;
use coopdoor::pins;
use coopdoor::tick::TICKS;

type OutPin = PinDriver<'static, AnyOutputPin, Output>;

/// Console poll period while the debug window or menu is open.
const CONSOLE_POLL_MS: u32 = 100;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  CoopDoor v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Raw peripherals: keypad ADC + RTC alarm line ───────
    hw_init::init_peripherals().map_err(|e| anyhow!("HAL init failed: {}", e))?;

    // ── 3. Load config (or save defaults on first boot) ───────
    let mut nvs = NvsByteStore::new().map_err(|e| anyhow!("NVS init failed: {}", e))?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), saving defaults", e);
            let cfg = ControllerConfig::default();
            if let Err(e) = nvs.save(&cfg) {
                warn!("Config save failed ({}), continuing with defaults", e);
            }
            cfg
        }
    };
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 4. Construct adapters ─────────────────────────────────
    let p = Peripherals::take()?;

    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio14,
        p.pins.gpio15,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;
    let rtc = Ds3231::new(i2c);

    let lcd = Hd44780::new(
        LcdPins {
            rs: output(p.pins.gpio8)?,
            en: output(p.pins.gpio9)?,
            d4: output(p.pins.gpio10)?,
            d5: output(p.pins.gpio11)?,
            d6: output(p.pins.gpio12)?,
            d7: output(p.pins.gpio13)?,
        },
        Ets,
    )
    .map_err(|e| anyhow!("LCD init failed: {}", e))?;

    let relays = GpioRelayBank::new(
        [
            output(p.pins.gpio4)?,
            output(p.pins.gpio5)?,
            output(p.pins.gpio6)?,
            output(p.pins.gpio7)?,
        ],
        pins::RELAYS_ACTIVE_LOW,
    );
    let lift = LiftDriver::new(relays, FreeRtos, config.relay_settle_ms);

    let uart = UartDriver::new(
        p.uart0,
        p.pins.gpio43,
        p.pins.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(pins::UART_BAUD)),
    )?;

    let mut hw = HardwareAdapter::new(rtc, nvs, lcd, lift);
    let mut log_sink = LogEventSink::new();

    // ── 5. Tick timer (keypad sampling, UI gate, hold window) ─
    let keypad = Keypad::new(AdcKeypadInput, pins::KEYPAD_ADC_CHANNEL, pins::KEYPAD_ADC_BITS);
    hw_timer::start_tick_timer(keypad, config.tick_period_ms)
        .map_err(|e| anyhow!("Tick timer failed: {}", e))?;

    // ── 6. Controller ─────────────────────────────────────────
    let mut app = CoopController::new(config.clone());
    app.start(&TICKS, &mut hw, &mut log_sink);

    // ── 7. Debug console window ───────────────────────────────
    let mut console = DebugConsole::new(config.debug_window_secs);
    run_debug_console(&mut console, &uart, &mut app, &mut hw, &mut log_sink);

    info!("System ready. Entering foreground loop.");

    // ── 8. Foreground loop ────────────────────────────────────
    loop {
        app.cycle(&TICKS, &ALARM_LINE, &mut hw, &mut log_sink);
        FreeRtos::delay_ms(config.loop_interval_ms);
    }
}

fn output(pin: impl esp_idf_hal::gpio::OutputPin + 'static) -> Result<OutPin> {
    Ok(PinDriver::output(pin.downgrade_output())?)
}

/// Block until the countdown lapses or the operator leaves the menu.
/// The hold window is still enforced while the menu is open.
fn run_debug_console(
    console: &mut DebugConsole,
    uart: &UartDriver<'_>,
    app: &mut CoopController,
    lift: &mut impl LiftPort,
    sink: &mut impl EventSink,
) {
    let polls_per_sec = (1000 / CONSOLE_POLL_MS).max(1);
    let mut polls: u32 = 0;

    while !console.is_done() {
        if console.mode() == ConsoleMode::Waiting && polls % polls_per_sec == 0 {
            console.countdown();
        }
        polls = polls.wrapping_add(1);

        let mut byte = [0u8; 1];
        if let Ok(1) = uart.read(&mut byte, NON_BLOCK) {
            match console.feed(byte[0]) {
                ConsoleAction::Command(cmd) | ConsoleAction::Exit(cmd) => {
                    app.handle_command(cmd, &TICKS, lift, sink);
                }
                ConsoleAction::Ignore | ConsoleAction::Unrecognized(_) => {}
            }
        }

        app.service_hold(&TICKS, lift, sink);
        FreeRtos::delay_ms(CONSOLE_POLL_MS);
    }
}
