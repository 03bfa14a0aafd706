use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::models::cover::{CoverStatus, MovementStatus};

pub const CURRENT_POSITION: &str = "currentPositionLiftPercent100ths";
pub const TARGET_POSITION: &str = "targetPositionLiftPercent100ths";

/// Protocol-side attribute storage of the window covering cluster.
///
/// Values are nullable in the protocol, hence `Option`.
pub trait AttributeStore: Send + Sync {
    fn get_attribute(&self, cover_id: &str, attribute: &str) -> Option<i64>;

    fn set_attribute(&self, cover_id: &str, attribute: &str, value: i64);

    fn set_status(&self, cover_id: &str, status: CoverStatus);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoverAttributes {
    pub current: Option<i64>,
    pub target: Option<i64>,
    pub movement_status: MovementStatus,
}

/// In-process attribute store keyed by cover id.
#[derive(Debug, Default)]
pub struct MemoryAttributeStore {
    covers: Mutex<HashMap<String, CoverAttributes>>,
}

impl MemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cover_id: &str) -> Option<CoverAttributes> {
        self.covers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cover_id)
            .cloned()
    }

    pub fn remove(&self, cover_id: &str) {
        self.covers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(cover_id);
    }

    fn update(&self, cover_id: &str, f: impl FnOnce(&mut CoverAttributes)) {
        let mut covers = self.covers.lock().unwrap_or_else(PoisonError::into_inner);
        f(covers.entry(cover_id.to_string()).or_default());
    }
}

impl AttributeStore for MemoryAttributeStore {
    fn get_attribute(&self, cover_id: &str, attribute: &str) -> Option<i64> {
        let attributes = self.get(cover_id)?;
        match attribute {
            CURRENT_POSITION => attributes.current,
            TARGET_POSITION => attributes.target,
            _ => None,
        }
    }

    fn set_attribute(&self, cover_id: &str, attribute: &str, value: i64) {
        self.update(cover_id, |attributes| match attribute {
            CURRENT_POSITION => attributes.current = Some(value),
            TARGET_POSITION => attributes.target = Some(value),
            other => tracing::warn!("Ignoring unknown attribute {}", other),
        });
    }

    fn set_status(&self, cover_id: &str, status: CoverStatus) {
        self.update(cover_id, |attributes| {
            attributes.current = Some(i64::from(status.current));
            attributes.target = Some(i64::from(status.target));
            attributes.movement_status = status.movement_status;
        });
    }
}
