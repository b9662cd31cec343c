//! Boot-time setup of the peripherals esp-idf-hal does not cover.
//!
//! Configures the keypad ADC channel and the RTC alarm-line interrupt
//! through raw ESP-IDF sys calls, once from `main()` before the tick
//! timer starts. Relays, LCD and I²C go through `esp-idf-hal`
//! drivers in `main.rs`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::app::ports::AnalogPort;

// ── Error type ────────────────────────────────────────────────

/// Which boot-time peripheral setup step failed, with its ESP-IDF code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    TimerStartFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "alarm line GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "alarm line ISR install failed (rc={})", rc),
            Self::TimerStartFailed(rc) => write!(f, "tick timer start failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the tick timer; single-threaded.
    unsafe {
        init_adc()?;
        init_alarm_line()?;
    }
    info!("hw_init: keypad ADC and alarm line ready");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): no keypad ADC or alarm line on host");
    Ok(())
}

// ── Keypad ADC ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: ADC1_HANDLE is written once in `init_adc()` before the tick
/// timer starts; afterwards only the timer task reads through it.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: the only write to ADC1_HANDLE, before any reader exists.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), pins::KEYPAD_ADC_CHANNEL as adc_channel_t, &chan_cfg)
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 configured (CH{}=keypad)", pins::KEYPAD_ADC_CHANNEL);
    Ok(())
}

/// Open ladder: no key pressed. Also returned when a read fails.
pub const ADC_FULL_SCALE: u16 = 4095;

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u8) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, timer-task access only after init.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel as adc_channel_t, &mut raw) };
    if ret != ESP_OK as i32 {
        return ADC_FULL_SCALE;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u8) -> u16 {
    ADC_FULL_SCALE
}

/// [`AnalogPort`] over the ADC1 oneshot unit.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdcKeypadInput;

impl AnalogPort for AdcKeypadInput {
    fn read_channel(&mut self, channel: u8) -> u16 {
        adc1_read(channel)
    }
}

// ── RTC alarm line ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::alarm::signal::alarm_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn alarm_gpio_isr(_arg: *mut core::ffi::c_void) {
    alarm_isr_handler();
}

/// Input with pull-up, falling-edge interrupt into [`ALARM_LINE`](crate::alarm::signal::ALARM_LINE).
#[cfg(target_os = "espidf")]
unsafe fn init_alarm_line() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::RTC_INT_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    // SAFETY: ESP_ERR_INVALID_STATE means the service is already installed.
    // The handler only stores to an atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_isr_handler_add(pins::RTC_INT_GPIO, Some(alarm_gpio_isr), core::ptr::null_mut());
        gpio_intr_enable(pins::RTC_INT_GPIO);
    }

    info!("hw_init: RTC alarm line on GPIO{} (falling edge)", pins::RTC_INT_GPIO);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::{ButtonId, Keypad};

    #[test]
    fn sim_adc_reads_as_idle_keypad() {
        let mut keypad = Keypad::new(AdcKeypadInput, 0, 12);
        assert_eq!(keypad.sample(), ButtonId::None);
    }
}
