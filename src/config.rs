pub const MAX_FLASH_RATE_HZ: f64 = 50.0;

/// Logical LED configuration as requested by the operator.
///
/// The fields are private so a rate outside `[0, MAX_FLASH_RATE_HZ]` can
/// never be stored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlashConfig {
    enabled: bool,
    flash_rate_hz: f64,
}

impl Default for FlashConfig {
    fn default() -> Self {
        FlashConfig {
            enabled: false,
            flash_rate_hz: 1.0,
        }
    }
}

impl FlashConfig {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn flash_rate_hz(&self) -> f64 {
        self.flash_rate_hz
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Accepts the rate exactly as the transport layer delivers it: a form
    /// field that may be absent or hold arbitrary text.
    pub fn set_flash_rate(&mut self, raw: Option<&str>) {
        self.flash_rate_hz = parse_flash_rate(raw);
    }
}

// Bad input is not an error, it just means "don't flash": missing fields,
// garbage text, and NaN all come out as 0, everything else is clamped.
pub fn parse_flash_rate(raw: Option<&str>) -> f64 {
    raw.and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|rate| !rate.is_nan())
        .map_or(0.0, |rate| rate.clamp(0.0, MAX_FLASH_RATE_HZ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_disabled_at_one_hertz() {
        let config = FlashConfig::default();
        assert!(!config.enabled());
        assert_eq!(config.flash_rate_hz(), 1.0);
    }

    #[test]
    fn enabled_is_stored_verbatim() {
        let mut config = FlashConfig::default();
        config.set_enabled(true);
        assert!(config.enabled());
        config.set_enabled(false);
        assert!(!config.enabled());
    }

    #[test]
    fn rate_within_bounds_is_stored_as_given() {
        let mut config = FlashConfig::default();
        config.set_flash_rate(Some("2.5"));
        assert_eq!(config.flash_rate_hz(), 2.5);
    }

    #[test]
    fn rate_above_the_limit_is_clamped_down() {
        assert_eq!(parse_flash_rate(Some("75")), MAX_FLASH_RATE_HZ);
    }

    #[test]
    fn negative_rate_is_clamped_to_zero() {
        assert_eq!(parse_flash_rate(Some("-5")), 0.0);
    }

    #[test]
    fn garbage_rate_falls_back_to_zero() {
        assert_eq!(parse_flash_rate(Some("abc")), 0.0);
    }

    #[test]
    fn missing_rate_falls_back_to_zero() {
        assert_eq!(parse_flash_rate(None), 0.0);
    }

    #[test]
    fn nan_rate_falls_back_to_zero() {
        assert_eq!(parse_flash_rate(Some("NaN")), 0.0);
    }

    #[test]
    fn whitespace_around_the_rate_is_tolerated() {
        assert_eq!(parse_flash_rate(Some(" 3.5 ")), 3.5);
    }
}
