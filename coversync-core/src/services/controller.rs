use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::driver::DeviceDriver;
use crate::models::cover::{CoverDevice, CoverStatus, FULLY_CLOSED, MovementStatus};
use crate::services::dispatcher::CommandDispatcher;
use crate::services::estimator::{self, Direction, MovePlan, report_position};
use crate::services::timer::TimerHandle;
use crate::services::translator::{Intent, translate};
use crate::store::{AttributeStore, CURRENT_POSITION, TARGET_POSITION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A move was started and the tick timer is running.
    Started(Direction),
    /// The cover already sits at the requested position.
    AlreadyThere,
    /// A move was in flight. It was frozen at `at` and the request was dropped.
    Interrupted { at: u16 },
    /// The attribute store holds no usable current position.
    Aborted,
}

#[derive(Debug, Default)]
struct Motion {
    status: MovementStatus,
    position: f64,
    plan: Option<MovePlan>,
    ticker: Option<TimerHandle>,
    // Bumped on every start and halt so a stale ticker can tell it lost its move.
    epoch: u64,
}

struct Inner {
    device: CoverDevice,
    full_travel: Duration,
    store: Arc<dyn AttributeStore>,
    dispatcher: CommandDispatcher,
    motion: Mutex<Motion>,
}

/// Per-cover movement state machine.
///
/// Simulates the position of an actuator that only understands open, close
/// and stop by integrating a constant rate once per tick. The simulated
/// position keeps advancing even when a vendor command fails, since the
/// device reports nothing back.
///
/// Must be created and driven from within a tokio runtime.
#[derive(Clone)]
pub struct MovementController {
    inner: Arc<Inner>,
}

impl MovementController {
    pub fn new(
        device: CoverDevice,
        full_travel: Duration,
        store: Arc<dyn AttributeStore>,
        driver: Arc<dyn DeviceDriver>,
    ) -> Self {
        let dispatcher = CommandDispatcher::spawn(device.clone(), driver);

        Self {
            inner: Arc::new(Inner {
                device,
                full_travel,
                store,
                dispatcher,
                motion: Mutex::new(Motion::default()),
            }),
        }
    }

    pub fn id(&self) -> &str {
        self.inner.device.id()
    }

    pub fn device(&self) -> &CoverDevice {
        &self.inner.device
    }

    pub fn full_travel(&self) -> Duration {
        self.inner.full_travel
    }

    pub fn status(&self) -> MovementStatus {
        self.inner.motion().status
    }

    /// Last simulated position, rounded for reporting.
    pub fn position(&self) -> u16 {
        report_position(self.inner.motion().position)
    }

    pub fn has_active_timer(&self) -> bool {
        self.inner.motion().ticker.is_some()
    }

    pub fn move_to(&self, target: u16) -> MoveOutcome {
        let inner = &self.inner;
        let target = target.min(FULLY_CLOSED);
        let mut motion = inner.motion();

        // The link cannot redirect a running move, so any request while moving freezes it.
        if motion.status != MovementStatus::Stopped {
            info!("Stopping current movement.");
            let at = inner.halt(&mut motion);
            inner.send(Intent::Stop);
            return MoveOutcome::Interrupted { at };
        }

        let Some(current) = inner.read_current() else {
            return MoveOutcome::Aborted;
        };

        info!("Moving from {} to {}...", current, target);
        motion.position = f64::from(current);

        let Some(plan) = estimator::plan(current, target, inner.full_travel) else {
            info!("Moving from {} to {}. No movement needed.", current, target);
            inner
                .store
                .set_status(inner.device.id(), CoverStatus::stopped_at(current));
            return MoveOutcome::AlreadyThere;
        };

        inner.send(match plan.direction {
            Direction::Opening => Intent::Open,
            Direction::Closing => Intent::Close,
        });

        motion.status = plan.direction.into();
        motion.plan = Some(plan);
        motion.epoch += 1;
        inner.store.set_status(
            inner.device.id(),
            CoverStatus {
                current,
                target,
                movement_status: motion.status,
            },
        );

        let ticker = Inner::spawn_ticker(Arc::clone(inner), motion.epoch, plan.tick_interval);
        if let Some(previous) = motion.ticker.replace(ticker) {
            previous.cancel();
        }

        MoveOutcome::Started(plan.direction)
    }

    /// Advances the running move by one step. Returns whether the move continues.
    ///
    /// Normally driven by the 1 Hz timer started in [`move_to`](Self::move_to).
    pub fn tick(&self) -> bool {
        let mut motion = self.inner.motion();
        if motion.status == MovementStatus::Stopped {
            return false;
        }

        self.inner.advance(&mut motion)
    }

    /// Stops a running move in place. Returns whether a move was running.
    pub fn stop_motion(&self) -> bool {
        let inner = &self.inner;
        let mut motion = inner.motion();

        if motion.status != MovementStatus::Stopped {
            info!("Stopping current movement.");
            inner.halt(&mut motion);
            inner.send(Intent::Stop);
            return true;
        }

        if let Some(current) = inner.read_current() {
            inner
                .store
                .set_attribute(inner.device.id(), TARGET_POSITION, i64::from(current));
        }

        false
    }

    pub fn identify(&self) {
        self.inner.send(Intent::Identify);
    }

    /// Cancels the tick timer without talking to the device.
    pub fn shutdown(&self) {
        let mut motion = self.inner.motion();
        if motion.status != MovementStatus::Stopped {
            self.inner.halt(&mut motion);
        }
    }
}

impl Inner {
    fn motion(&self) -> MutexGuard<'_, Motion> {
        self.motion.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, intent: Intent) {
        let command = translate(intent, &self.device.commands);
        self.dispatcher.send(command, intent == Intent::Stop);
    }

    fn read_current(&self) -> Option<u16> {
        let value = self.store.get_attribute(self.device.id(), CURRENT_POSITION);

        match value.and_then(|v| u16::try_from(v).ok()) {
            Some(current) if current <= FULLY_CLOSED => Some(current),
            _ => {
                error!(
                    device = %self.device.label,
                    "Invalid current position {:?}, ignoring request", value
                );
                None
            }
        }
    }

    /// Freezes the cover where the simulation has got to.
    fn halt(&self, motion: &mut Motion) -> u16 {
        if let Some(ticker) = motion.ticker.take() {
            ticker.cancel();
        }

        let at = report_position(motion.position);
        motion.position = f64::from(at);
        motion.plan = None;
        motion.status = MovementStatus::Stopped;
        motion.epoch += 1;

        self.store
            .set_status(self.device.id(), CoverStatus::stopped_at(at));

        at
    }

    fn advance(&self, motion: &mut Motion) -> bool {
        let Some(plan) = motion.plan else {
            return false;
        };

        motion.position = plan.advance(motion.position);

        if plan.is_complete(motion.position) {
            // May be running inside the ticker task itself, so detach instead of aborting.
            if let Some(ticker) = motion.ticker.take() {
                ticker.release();
            }

            motion.position = f64::from(plan.target);
            motion.plan = None;
            motion.status = MovementStatus::Stopped;
            self.store
                .set_status(self.device.id(), CoverStatus::stopped_at(plan.target));

            if plan.needs_stop_command() {
                self.send(Intent::Stop);
            }

            debug!("Moving stopped at {}", plan.target);
            return false;
        }

        let reported = report_position(motion.position);
        debug!("Moving to {}", reported);
        self.store
            .set_attribute(self.device.id(), CURRENT_POSITION, i64::from(reported));

        true
    }

    fn tick_for(&self, epoch: u64) -> bool {
        let mut motion = self.motion();
        if motion.epoch != epoch || motion.status == MovementStatus::Stopped {
            return false;
        }

        self.advance(&mut motion)
    }

    fn spawn_ticker(inner: Arc<Inner>, epoch: u64, period: Duration) -> TimerHandle {
        TimerHandle::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;
                if !inner.tick_for(epoch) {
                    break;
                }
            }
        })
    }
}
