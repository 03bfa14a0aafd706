use std::sync::Arc;

use tracing::info;

use crate::error::{BridgeError, Result};
use crate::models::cover::{FULLY_CLOSED, FULLY_OPEN};
use crate::services::{CoverRegistry, MoveOutcome};

/// Window covering cluster commands, routed to the cover they address.
#[derive(Clone)]
pub struct WindowCoveringHandler {
    registry: Arc<CoverRegistry>,
}

impl WindowCoveringHandler {
    pub fn new(registry: Arc<CoverRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<CoverRegistry> {
        &self.registry
    }

    pub fn on_identify(&self, cover_id: &str, identify_time: u16) -> Result<()> {
        let cover = self.registry.cover(cover_id)?;
        info!(
            "Command identify called identifyTime:{} for {}",
            identify_time, cover_id
        );

        cover.controller().identify();
        Ok(())
    }

    pub fn on_up_or_open(&self, cover_id: &str) -> Result<MoveOutcome> {
        let cover = self.registry.cover(cover_id)?;
        info!("Command upOrOpen called for {}", cover_id);

        Ok(cover.controller().move_to(FULLY_OPEN))
    }

    pub fn on_down_or_close(&self, cover_id: &str) -> Result<MoveOutcome> {
        let cover = self.registry.cover(cover_id)?;
        info!("Command downOrClose called for {}", cover_id);

        Ok(cover.controller().move_to(FULLY_CLOSED))
    }

    /// Stops the running move and drops any debounced request still waiting.
    pub fn on_stop_motion(&self, cover_id: &str) -> Result<bool> {
        let cover = self.registry.cover(cover_id)?;
        info!("Command stopMotion called for {}", cover_id);

        cover.cancel_pending_move();
        Ok(cover.controller().stop_motion())
    }

    pub fn on_go_to_lift_percentage(&self, cover_id: &str, value: u32) -> Result<()> {
        let cover = self.registry.cover(cover_id)?;
        info!(
            "Command goToLiftPercentage {} called for {}",
            value, cover_id
        );

        let target = u16::try_from(value)
            .ok()
            .filter(|target| *target <= FULLY_CLOSED)
            .ok_or(BridgeError::InvalidTarget(value))?;

        cover.request_move(target);
        Ok(())
    }
}
