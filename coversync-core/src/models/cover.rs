use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Lift position in hundredths of a percent, 0 is fully open.
pub const FULLY_OPEN: u16 = 0;
/// Lift position in hundredths of a percent, 10000 is fully closed.
pub const FULLY_CLOSED: u16 = 10000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStatus {
    #[default]
    Stopped,
    Opening,
    Closing,
}

/// Snapshot published to the attribute store in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverStatus {
    pub current: u16,
    pub target: u16,
    pub movement_status: MovementStatus,
}

impl CoverStatus {
    pub fn stopped_at(position: u16) -> Self {
        Self {
            current: position,
            target: position,
            movement_status: MovementStatus::Stopped,
        }
    }
}

/// Device descriptor handed over by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverDevice {
    pub label: String,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub ui_class: Option<String>,
    #[serde(default)]
    pub commands: BTreeSet<String>,
}

impl CoverDevice {
    pub fn new<I, S>(label: impl Into<String>, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            unique_name: None,
            ui_class: None,
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.label
    }

    pub fn supports(&self, command: &str) -> bool {
        self.commands.contains(command)
    }
}
