//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                   |
//! |-------------|----------------|-------------------------------|
//! | `hardware`  | MotorPort      | DC motor PWM, power stage GPIO |
//! |             | IndicatorPort  | Heartbeat and task LEDs        |
//! | `log_sink`  | EventSink      | Serial log output              |
//! | `time`      | TimePort       | ESP32 system timer, FreeRTOS   |

pub mod hardware;
pub mod log_sink;
pub mod time;
