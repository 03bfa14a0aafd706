use tracing::{debug, warn};

use crate::configs::Bridge;
use crate::models::cover::CoverDevice;

const COVER_UNIQUE_NAMES: &[&str] = &["Blind", "Screen", "Shutter", "RollerShutter"];

const COVER_UI_CLASSES: &[&str] = &[
    "Awning",
    "Curtain",
    "ExteriorScreen",
    "ExteriorVenetianBlind",
    "Pergola",
    "RollerShutter",
    "Screen",
    "Shutter",
    "VenetianBlind",
];

const COVER_VOCABULARIES: &[[&str; 3]] = &[
    ["open", "close", "stop"],
    ["rollOut", "rollUp", "stop"],
    ["down", "up", "stop"],
];

/// Why a discovered device was taken as a cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    UniqueName,
    UiClass,
    Commands(&'static [&'static str; 3]),
}

pub fn classify(device: &CoverDevice) -> Option<Admission> {
    if device
        .unique_name
        .as_deref()
        .is_some_and(|name| COVER_UNIQUE_NAMES.contains(&name))
    {
        return Some(Admission::UniqueName);
    }

    if device
        .ui_class
        .as_deref()
        .is_some_and(|class| COVER_UI_CLASSES.contains(&class))
    {
        return Some(Admission::UiClass);
    }

    COVER_VOCABULARIES
        .iter()
        .find(|vocabulary| vocabulary.iter().all(|command| device.supports(command)))
        .map(Admission::Commands)
}

/// White and black list check on device labels.
#[derive(Debug, Default, Clone)]
pub struct DeviceFilter {
    white_list: Vec<String>,
    black_list: Vec<String>,
}

impl DeviceFilter {
    pub fn new(white_list: Vec<String>, black_list: Vec<String>) -> Self {
        Self {
            white_list,
            black_list,
        }
    }

    pub fn from_settings(bridge: &Bridge) -> Self {
        Self::new(bridge.white_list.clone(), bridge.black_list.clone())
    }

    pub fn is_allowed(&self, label: &str) -> bool {
        if !self.white_list.is_empty() && !self.white_list.iter().any(|entry| entry == label) {
            warn!("Skipping {} because not in whitelist", label);
            return false;
        }

        if self.black_list.iter().any(|entry| entry == label) {
            warn!("Skipping {} because in blacklist", label);
            return false;
        }

        true
    }
}

/// Keeps the devices that are covers and pass the filter.
pub fn select_covers(devices: Vec<CoverDevice>, filter: &DeviceFilter) -> Vec<CoverDevice> {
    devices
        .into_iter()
        .filter(|device| match classify(device) {
            Some(Admission::UniqueName) => {
                debug!("- added with uniqueName");
                true
            }
            Some(Admission::UiClass) => {
                debug!("- added with uiClass");
                true
            }
            Some(Admission::Commands([open, close, stop])) => {
                debug!("- added with commands \"{open}\", \"{close}\" and \"{stop}\"");
                true
            }
            None => false,
        })
        .filter(|device| filter.is_allowed(&device.label))
        .collect()
}
