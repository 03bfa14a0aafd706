use std::error::Error;
use std::{env, fs};

use coversync_core::configs::{Bridge, Logger};
use coversync_core::models::cover::CoverDevice;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mock {
    pub latency_ms: u64,
    pub failure_rate: f64,
    pub status_interval_secs: u64,
    #[serde(default)]
    pub devices: Vec<CoverDevice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    #[serde(default)]
    pub bridge: Bridge,
    pub mock: Mock,
}

impl Settings {
    /// Loads `COVERSYNC_CONFIG` when set, the bundled default config otherwise.
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let settings: Settings = match env::var("COVERSYNC_CONFIG") {
            Ok(path) => toml::from_str(&fs::read_to_string(path)?)?,
            Err(_) => toml::from_str(include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../",
                "configs/default.toml"
            )))?,
        };

        if !(0.0..=1.0).contains(&settings.mock.failure_rate) {
            return Err(format!(
                "failure_rate must be within 0..=1, got {}",
                settings.mock.failure_rate
            )
            .into());
        }

        Ok(settings)
    }
}
