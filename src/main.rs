//! MotorGate Firmware: Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter        LogEventSink       Esp32TimeAdapter  │
//! │  (Motor+Indicator)      (EventSink)        (TimePort)        │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          ControlService (pure logic)               │      │
//! │  │  VelocityGovernor · ModeMachine                    │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  PeriodicScheduler (20 ms) · button ISR → ModeFlags          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use motorgate::adapters::hardware::HardwareAdapter;
use motorgate::adapters::log_sink::LogEventSink;
use motorgate::adapters::time::Esp32TimeAdapter;
use motorgate::app::ports::TimePort;
use motorgate::app::service::ControlService;
use motorgate::config::SystemConfig;
use motorgate::control::mode::{MODE_FLAGS, toggle_run_state};
use motorgate::drivers::button::USER_BUTTON;
use motorgate::drivers::dc_motor::{DcMotor, MotorParams};
use motorgate::drivers::hw_init;
use motorgate::drivers::power_stage::PowerStage;
use motorgate::error::Error;
use motorgate::scheduler::PeriodicScheduler;

/// Optional JSON override baked in at build time.
const CONFIG_OVERRIDE: Option<&str> = option_env!("MOTORGATE_CONFIG_JSON");

fn load_config() -> SystemConfig {
    let Some(json) = CONFIG_OVERRIDE else {
        return SystemConfig::default();
    };
    match SystemConfig::from_json(json) {
        Ok(cfg) => {
            info!("Config override applied");
            cfg
        }
        Err(e) => {
            warn!("Config override rejected ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("MotorGate v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    config.validate().map_err(Error::from)?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    USER_BUTTON.set_debounce_ms(config.debounce_ms);
    if !USER_BUTTON.fall(toggle_run_state) {
        warn!("Button callback already registered");
    }
    hw_init::init_isr_service().map_err(Error::from)?;

    let motor = DcMotor::new(MotorParams::from_config(&config), config.supply_voltage_v);
    let mut hw = HardwareAdapter::new(motor, PowerStage::new());
    hw.set_target_velocity(config.target_velocity_rps)
        .map_err(Error::from)?;
    if hw.mech_button_pressed() {
        warn!("Mechanical button held at boot");
    }

    // ── 4. Control service ────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = ControlService::new(&config);
    service.start(&mut hw, &mut sink);

    // ── 5. Control loop ───────────────────────────────────────
    let mut time = Esp32TimeAdapter::new();
    let clock = Esp32TimeAdapter::new();
    let mut scheduler = PeriodicScheduler::new(config.tick_period_ms, config.stats_interval_ticks);

    info!("System ready. Press the button to start the motor task.");
    scheduler.run(&mut time, &mut sink, |sink| {
        hw.update(clock.now_us());
        service.tick(&MODE_FLAGS, &mut hw, sink);
    })
}
