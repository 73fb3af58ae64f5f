//! GPIO / peripheral pin assignments for the MotorGate controller board.
//!
//! Single source of truth; every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// DC motor M1 (H-bridge PWM input + quadrature encoder)
// ---------------------------------------------------------------------------

/// LEDC PWM channel output for the motor bridge.  50 % duty = standstill,
/// 0 % / 100 % = full reverse / full forward.
pub const MOTOR_PWM_GPIO: i32 = 1;
/// Encoder channel A: rising edge interrupt.
pub const MOTOR_ENC_A_GPIO: i32 = 5;
/// Encoder channel B: sampled inside the channel A ISR for direction.
pub const MOTOR_ENC_B_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Power electronics
// ---------------------------------------------------------------------------

/// Digital output: enables the DC motor power stage (active HIGH).
pub const MOTOR_ENABLE_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// On-board user LED, toggled every control tick as a heartbeat.
pub const HEARTBEAT_LED_GPIO: i32 = 11;
/// Additional LED (external 220–500 Ω resistor) lit while the task runs.
pub const TASK_LED_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Inputs (active-low)
// ---------------------------------------------------------------------------

/// User push-button.  Falling edge toggles the control task.
pub const BUTTON_GPIO: i32 = 16;
/// Mechanical button, internal pull-up.  Polled, diagnostics only.
pub const MECH_BUTTON_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the motor bridge (20 kHz, inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 20_000;
