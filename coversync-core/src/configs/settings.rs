use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

pub const DEFAULT_MOVEMENT_DURATION: u32 = 30;

fn default_movement_duration() -> u32 {
    DEFAULT_MOVEMENT_DURATION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bridge {
    #[serde(default = "default_movement_duration")]
    pub default_movement_duration: u32,
    /// Full travel time in seconds, keyed by device label.
    #[serde(default)]
    pub movement_duration: HashMap<String, u32>,
    #[serde(default)]
    pub white_list: Vec<String>,
    #[serde(default)]
    pub black_list: Vec<String>,
}

impl Default for Bridge {
    fn default() -> Self {
        Self {
            default_movement_duration: DEFAULT_MOVEMENT_DURATION,
            movement_duration: HashMap::new(),
            white_list: Vec::new(),
            black_list: Vec::new(),
        }
    }
}

impl Bridge {
    pub fn movement_duration_for(&self, label: &str) -> Duration {
        let fallback = match self.default_movement_duration {
            0 => {
                warn!(
                    "Invalid default movement duration 0, using {}",
                    DEFAULT_MOVEMENT_DURATION
                );
                DEFAULT_MOVEMENT_DURATION
            }
            seconds => seconds,
        };

        let seconds = match self.movement_duration.get(label) {
            Some(0) => {
                warn!("Invalid movement duration 0 for {}, using {}", label, fallback);
                fallback
            }
            Some(&seconds) => seconds,
            None => fallback,
        };

        Duration::from_secs(u64::from(seconds))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub bridge: Bridge,
}

impl Settings {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }
}
