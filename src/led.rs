use std::time::Duration;

use rppal::gpio::{self, OutputPin};

use crate::FlashConfig;

/// What the pin should physically be doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Waveform {
    SteadyOff,
    Blink { on: Duration, off: Duration },
}

impl Waveform {
    /// Maps a configuration snapshot to its waveform. Disabled or a
    /// non-positive rate both mean a dark LED; otherwise the period is
    /// split evenly between on and off.
    pub fn for_config(config: &FlashConfig) -> Waveform {
        if !config.enabled() || config.flash_rate_hz() <= 0.0 {
            return Waveform::SteadyOff;
        }
        let period = Duration::from_secs_f64(1.0 / config.flash_rate_hz());
        let half = period / 2;
        Waveform::Blink { on: half, off: half }
    }
}

pub struct Led {
    pin: OutputPin,
    current: Option<Waveform>,
}

impl Led {
    pub fn new(pin: OutputPin) -> Led {
        Led { pin, current: None }
    }

    pub fn apply(&mut self, config: &FlashConfig) -> gpio::Result<()> {
        let waveform = Waveform::for_config(config);
        // Re-commanding an identical waveform would restart the cycle
        // mid-blink and show as a glitch.
        if self.current == Some(waveform) {
            return Ok(());
        }
        match waveform {
            Waveform::SteadyOff => {
                self.pin.clear_pwm()?;
                self.pin.set_low();
            }
            // Software PWM runs on rppal's own timing thread; setting a
            // new period/pulse width supersedes the running cycle.
            Waveform::Blink { on, off } => self.pin.set_pwm(on + off, on)?,
        }
        self.current = Some(waveform);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, rate: &str) -> FlashConfig {
        let mut config = FlashConfig::default();
        config.set_enabled(enabled);
        config.set_flash_rate(Some(rate));
        config
    }

    #[test]
    fn disabled_led_is_steady_off_regardless_of_rate() {
        assert_eq!(
            Waveform::for_config(&config(false, "10")),
            Waveform::SteadyOff
        );
    }

    #[test]
    fn zero_rate_is_steady_off_even_when_enabled() {
        assert_eq!(
            Waveform::for_config(&config(true, "0")),
            Waveform::SteadyOff
        );
    }

    #[test]
    fn unparseable_rate_turns_the_led_off() {
        assert_eq!(
            Waveform::for_config(&config(true, "abc")),
            Waveform::SteadyOff
        );
    }

    #[test]
    fn default_config_rests_dark() {
        assert_eq!(
            Waveform::for_config(&FlashConfig::default()),
            Waveform::SteadyOff
        );
    }

    #[test]
    fn enabled_led_blinks_with_symmetric_half_periods() {
        // 2 Hz is a 500 ms period, split evenly
        assert_eq!(
            Waveform::for_config(&config(true, "2.0")),
            Waveform::Blink {
                on: Duration::from_millis(250),
                off: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn top_rate_blinks_at_ten_millisecond_halves() {
        assert_eq!(
            Waveform::for_config(&config(true, "50")),
            Waveform::Blink {
                on: Duration::from_millis(10),
                off: Duration::from_millis(10),
            }
        );
    }

    #[test]
    fn same_snapshot_yields_the_same_waveform() {
        let config = config(true, "4");
        assert_eq!(Waveform::for_config(&config), Waveform::for_config(&config));
    }
}
