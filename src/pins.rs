//! GPIO / peripheral pin assignments for the KnobDimmer board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// LED channels (driven in lockstep by MCPWM)
// ---------------------------------------------------------------------------

pub const LED1_GPIO: i32 = 4;
pub const LED2_GPIO: i32 = 5;
pub const LED3_GPIO: i32 = 6;

/// All LED outputs, in MCPWM channel order.
pub const LED_GPIOS: [i32; LED_CHANNELS] = [LED1_GPIO, LED2_GPIO, LED3_GPIO];

/// Number of LED channels on the board.
pub const LED_CHANNELS: usize = 3;

// ---------------------------------------------------------------------------
// Rotary encoder (quadrature A/B + shaft push-button)
// ---------------------------------------------------------------------------

/// Encoder line A: rising edge raises the encoder interrupt.
pub const ROT_A_GPIO: i32 = 10;
/// Encoder line B, sampled inside the A-edge ISR to decide direction.
pub const ROT_B_GPIO: i32 = 11;
/// Shaft push-button, internal pull-up enabled.  LOW = pressed.
pub const ROT_SW_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// PWM configuration (fixed at boot)
// ---------------------------------------------------------------------------

/// PWM counter clock after the group prescaler.
pub const PWM_COUNTER_CLOCK_HZ: u32 = 1_000_000;
/// Counter top value; one period is `PWM_TOP + 1` ticks.
pub const PWM_TOP: u16 = 999;
/// Number of addressable duty levels.
pub const PWM_RESOLUTION: u32 = PWM_TOP as u32 + 1;
/// Resulting PWM frequency (1 kHz).
pub const PWM_FREQ_HZ: u32 = PWM_COUNTER_CLOCK_HZ / PWM_RESOLUTION;
