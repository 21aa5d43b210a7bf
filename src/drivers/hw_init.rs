//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, the MCPWM timer/operators/comparators for
//! the LED bank, and the encoder line-A interrupt using raw ESP-IDF sys
//! calls.  Called once from `main()` before the control loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use embedded_hal::digital::{ErrorType, InputPin};

use crate::error::PwmError;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    McpwmInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::McpwmInitFailed(rc) => write!(f, "MCPWM timer/comparator config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_mcpwm()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK as esp_err_t { Ok(()) } else { Err(err(ret)) }
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Encoder lines: the module carries its own pull-ups.
    let encoder_cfg = gpio_config_t {
        pin_bit_mask: (1u64 << pins::ROT_A_GPIO) | (1u64 << pins::ROT_B_GPIO),
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    check(unsafe { gpio_config(&encoder_cfg) }, HwInitError::GpioConfigFailed)?;

    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ROT_SW_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    check(unsafe { gpio_config(&btn_cfg) }, HwInitError::GpioConfigFailed)?;

    info!("hw_init: GPIO inputs configured (A={}, B={}, SW={})",
        pins::ROT_A_GPIO, pins::ROT_B_GPIO, pins::ROT_SW_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe from main and ISR context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

/// Configured input pin exposed through `embedded-hal`.
#[derive(Debug, Clone, Copy)]
pub struct GpioInput {
    pin: i32,
}

impl GpioInput {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioInput {
    type Error = core::convert::Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.pin))
    }
}

// ── MCPWM ─────────────────────────────────────────────────────
//
// One timer at 1 MHz with a 1000-tick period (1 kHz).  Operator 0 carries
// LED1/LED2, operator 1 carries LED3.  Each generator goes HIGH when the
// counter wraps to zero and LOW on its comparator match, so the compare
// value is the on-time in ticks.  0 % and 100 % force the generator
// instead (see `output_drive`).

#[cfg(target_os = "espidf")]
static mut COMPARATORS: [mcpwm_cmpr_handle_t; pins::LED_CHANNELS] =
    [core::ptr::null_mut(); pins::LED_CHANNELS];
#[cfg(target_os = "espidf")]
static mut GENERATORS: [mcpwm_gen_handle_t; pins::LED_CHANNELS] =
    [core::ptr::null_mut(); pins::LED_CHANNELS];

#[cfg(target_os = "espidf")]
unsafe fn init_mcpwm() -> Result<(), HwInitError> {
    use HwInitError::McpwmInitFailed as Fail;

    let timer_cfg = mcpwm_timer_config_t {
        group_id: 0,
        clk_src: soc_periph_mcpwm_timer_clk_src_t_MCPWM_TIMER_CLK_SRC_DEFAULT,
        resolution_hz: pins::PWM_COUNTER_CLOCK_HZ,
        count_mode: mcpwm_timer_count_mode_t_MCPWM_TIMER_COUNT_MODE_UP,
        period_ticks: pins::PWM_RESOLUTION,
        ..Default::default()
    };
    let mut timer: mcpwm_timer_handle_t = core::ptr::null_mut();
    check(unsafe { mcpwm_new_timer(&timer_cfg, &mut timer) }, Fail)?;

    let oper_cfg = mcpwm_operator_config_t {
        group_id: 0,
        ..Default::default()
    };
    let mut operators: [mcpwm_oper_handle_t; 2] = [core::ptr::null_mut(); 2];
    for oper in &mut operators {
        check(unsafe { mcpwm_new_operator(&oper_cfg, oper) }, Fail)?;
        check(unsafe { mcpwm_operator_connect_timer(*oper, timer) }, Fail)?;
    }

    for (i, &gpio) in pins::LED_GPIOS.iter().enumerate() {
        let oper = operators[i / 2];

        let mut cmpr_cfg = mcpwm_comparator_config_t::default();
        cmpr_cfg.flags.set_update_cmp_on_tez(1);
        let mut cmpr: mcpwm_cmpr_handle_t = core::ptr::null_mut();
        check(unsafe { mcpwm_new_comparator(oper, &cmpr_cfg, &mut cmpr) }, Fail)?;
        check(unsafe { mcpwm_comparator_set_compare_value(cmpr, 0) }, Fail)?;

        let gen_cfg = mcpwm_generator_config_t {
            gen_gpio_num: gpio,
            ..Default::default()
        };
        let mut generator: mcpwm_gen_handle_t = core::ptr::null_mut();
        check(unsafe { mcpwm_new_generator(oper, &gen_cfg, &mut generator) }, Fail)?;

        let on_empty = mcpwm_gen_timer_event_action_t {
            direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
            event: mcpwm_timer_event_t_MCPWM_TIMER_EVENT_EMPTY,
            action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_HIGH,
        };
        check(unsafe { mcpwm_generator_set_action_on_timer_event(generator, on_empty) }, Fail)?;

        let on_compare = mcpwm_gen_compare_event_action_t {
            direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
            comparator: cmpr,
            action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_LOW,
        };
        check(unsafe { mcpwm_generator_set_action_on_compare_event(generator, on_compare) }, Fail)?;

        // SAFETY: the handle tables are only written here, once at boot.
        unsafe {
            COMPARATORS[i] = cmpr;
            GENERATORS[i] = generator;
        }
    }

    check(unsafe { mcpwm_timer_enable(timer) }, Fail)?;
    check(
        unsafe { mcpwm_timer_start_stop(timer, mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_START_NO_STOP) },
        Fail,
    )?;

    info!(
        "hw_init: MCPWM configured ({} Hz counter, top={}, {} Hz, LEDs={:?})",
        pins::PWM_COUNTER_CLOCK_HZ, pins::PWM_TOP, pins::PWM_FREQ_HZ, pins::LED_GPIOS
    );
    Ok(())
}

/// How a generator output is driven for a given compare level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDrive {
    /// Held LOW for the whole period (0 %).
    ForcedLow,
    /// Held HIGH for the whole period (100 %).
    ForcedHigh,
    /// Timer/compare actions with this compare value.
    Compare(u16),
}

/// Both ends of the range are forced: at 0 the timer-empty HIGH and the
/// compare LOW land on the same tick, and 1000 is past the counter peak.
pub fn output_drive(level: u16) -> OutputDrive {
    match level {
        0 => OutputDrive::ForcedLow,
        l if l > pins::PWM_TOP => OutputDrive::ForcedHigh,
        l => OutputDrive::Compare(l),
    }
}

/// Write the compare level for one LED channel.
#[cfg(target_os = "espidf")]
pub fn pwm_set_compare(channel: usize, level: u16) -> Result<(), PwmError> {
    if channel >= pins::LED_CHANNELS {
        return Err(PwmError::NoSuchChannel(channel));
    }
    // SAFETY: the handle tables are written once in init_mcpwm() before
    // the control loop starts; afterwards only the main loop reads them.
    let (cmpr, generator) = unsafe { (COMPARATORS[channel], GENERATORS[channel]) };
    let ret = match output_drive(level) {
        OutputDrive::ForcedLow => unsafe { mcpwm_generator_set_force_level(generator, 0, true) },
        OutputDrive::ForcedHigh => unsafe { mcpwm_generator_set_force_level(generator, 1, true) },
        OutputDrive::Compare(cmp) => {
            // Compare first, then -1 hands the output back to the actions.
            match unsafe { mcpwm_comparator_set_compare_value(cmpr, u32::from(cmp)) } {
                r if r == ESP_OK as esp_err_t => unsafe {
                    mcpwm_generator_set_force_level(generator, -1, true)
                },
                r => r,
            }
        }
    };
    if ret == ESP_OK as esp_err_t { Ok(()) } else { Err(PwmError::WriteFailed(ret)) }
}

#[cfg(not(target_os = "espidf"))]
pub fn pwm_set_compare(channel: usize, level: u16) -> Result<(), PwmError> {
    if channel >= pins::LED_CHANNELS {
        return Err(PwmError::NoSuchChannel(channel));
    }
    log::trace!("hw_init(sim): channel {} -> {:?}", channel, output_drive(level));
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::encoder::EncoderSource;
#[cfg(target_os = "espidf")]
use crate::events::ENCODER_LINK;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn encoder_a_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: gpio_get_level is a register read; safe in ISR context.
    let b_high = unsafe { gpio_get_level(pins::ROT_B_GPIO) } != 0;
    // Outcome ignored: a bound or full-queue drop is silent by contract.
    let _ = EncoderSource::new(ENCODER_LINK.tx()).on_a_rising(b_high);
}

/// Install the GPIO ISR service and register the encoder line-A handler.
/// Call after init_peripherals() and before the control loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler registered
    // below only touches the encoder link atomics and channel.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as esp_err_t && ret != ESP_ERR_INVALID_STATE as esp_err_t {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        check(
            gpio_set_intr_type(pins::ROT_A_GPIO, gpio_int_type_t_GPIO_INTR_POSEDGE),
            HwInitError::IsrInstallFailed,
        )?;
        check(
            gpio_isr_handler_add(pins::ROT_A_GPIO, Some(encoder_a_isr), core::ptr::null_mut()),
            HwInitError::IsrInstallFailed,
        )?;
        check(gpio_intr_enable(pins::ROT_A_GPIO), HwInitError::IsrInstallFailed)?;

        info!("hw_init: ISR service installed (encoder A rising edge)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
