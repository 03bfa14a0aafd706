use std::time::Duration;

use crate::models::cover::{FULLY_CLOSED, FULLY_OPEN, MovementStatus};

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Distance to the target, in hundredths of a percent, at which a move counts as arrived.
pub const ARRIVAL_TOLERANCE: f64 = 100.0;

const FULL_TRAVEL: f64 = FULLY_CLOSED as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Opening,
    Closing,
}

impl From<Direction> for MovementStatus {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Opening => MovementStatus::Opening,
            Direction::Closing => MovementStatus::Closing,
        }
    }
}

/// Constant-rate plan for one move. The delta is fixed when the move starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlan {
    pub target: u16,
    pub direction: Direction,
    pub movement_seconds: f64,
    pub per_tick_delta: f64,
    pub tick_interval: Duration,
}

impl MovePlan {
    pub fn advance(&self, position: f64) -> f64 {
        position + self.per_tick_delta
    }

    pub fn is_complete(&self, position: f64) -> bool {
        let target = f64::from(self.target);

        if (target - position).abs() <= ARRIVAL_TOLERANCE {
            return true;
        }

        match self.direction {
            Direction::Closing => position >= target,
            Direction::Opening => position <= target,
        }
    }

    /// Endpoints stop on their own, anything in between needs an explicit stop.
    pub fn needs_stop_command(&self) -> bool {
        self.target != FULLY_OPEN && self.target != FULLY_CLOSED
    }
}

/// Plans a move from `current` to `target` for a cover taking `full_travel` end to end.
///
/// Returns `None` when there is nothing to do.
pub fn plan(current: u16, target: u16, full_travel: Duration) -> Option<MovePlan> {
    if current == target {
        return None;
    }

    let distance = f64::from(target) - f64::from(current);
    let movement_seconds = distance.abs() * full_travel.as_secs_f64() / FULL_TRAVEL;
    let tick_seconds = TICK_INTERVAL.as_secs_f64();

    // A zero-length travel time arrives on the first tick.
    let per_tick_delta = if movement_seconds > 0.0 {
        distance / movement_seconds * tick_seconds
    } else {
        distance
    };

    Some(MovePlan {
        target,
        direction: if target > current {
            Direction::Closing
        } else {
            Direction::Opening
        },
        movement_seconds,
        per_tick_delta,
        tick_interval: TICK_INTERVAL,
    })
}

/// Rounds an integrated position for reporting.
pub fn report_position(position: f64) -> u16 {
    position
        .round()
        .clamp(f64::from(FULLY_OPEN), FULL_TRAVEL) as u16
}
