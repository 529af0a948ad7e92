mod config;
pub mod http;
pub mod led;

pub use config::{parse_flash_rate, FlashConfig, MAX_FLASH_RATE_HZ};
pub use led::{Led, Waveform};
