#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use coversync_core::configs::Bridge;
use coversync_core::driver::DeviceDriver;
use coversync_core::handles::WindowCoveringHandler;
use coversync_core::models::cover::{CoverDevice, CoverStatus, MovementStatus};
use coversync_core::services::{CoverRegistry, MovementController};
use coversync_core::store::{AttributeStore, CURRENT_POSITION, MemoryAttributeStore, TARGET_POSITION};
use coversync_core::DriverError;
use tokio::time;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub command: String,
    pub device: String,
    pub high_priority: bool,
}

/// Driver double that records every command and can be told to fail.
#[derive(Default)]
pub struct RecordingDriver {
    sent: Mutex<Vec<Sent>>,
    failing: AtomicBool,
}

impl RecordingDriver {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn commands_for(&self, device: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|sent| sent.device == device)
            .map(|sent| sent.command)
            .collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl DeviceDriver for RecordingDriver {
    async fn send_command(
        &self,
        command: &str,
        device: &CoverDevice,
        high_priority: bool,
    ) -> Result<(), DriverError> {
        self.sent.lock().unwrap().push(Sent {
            command: command.to_string(),
            device: device.label.clone(),
            high_priority,
        });

        if self.failing.load(Ordering::SeqCst) {
            Err(DriverError::Transport("cloud unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct TestBridge {
    pub driver: Arc<RecordingDriver>,
    pub store: Arc<MemoryAttributeStore>,
    pub registry: Arc<CoverRegistry>,
    pub handler: WindowCoveringHandler,
}

impl TestBridge {
    /// Must be called from inside a tokio runtime.
    pub fn new(durations: &[(&str, u32)]) -> Self {
        let bridge = Bridge {
            movement_duration: durations
                .iter()
                .map(|(label, seconds)| (label.to_string(), *seconds))
                .collect(),
            ..Bridge::default()
        };

        Self::with_bridge(bridge)
    }

    pub fn with_bridge(bridge: Bridge) -> Self {
        let driver = Arc::new(RecordingDriver::default());
        let store = Arc::new(MemoryAttributeStore::new());
        let registry = Arc::new(CoverRegistry::new(
            bridge,
            Arc::clone(&driver) as Arc<dyn DeviceDriver>,
            Arc::clone(&store) as Arc<dyn AttributeStore>,
        ));
        let handler = WindowCoveringHandler::new(Arc::clone(&registry));

        Self {
            driver,
            store,
            registry,
            handler,
        }
    }

    pub fn add_cover(&self, label: &str, commands: &[&str]) -> MovementController {
        let cover = self
            .registry
            .register(CoverDevice::new(label, commands.iter().copied()))
            .unwrap();
        cover.controller().clone()
    }

    pub fn add_cover_at(&self, label: &str, position: u16) -> MovementController {
        self.store.set_status(label, CoverStatus::stopped_at(position));
        self.add_cover(label, &["open", "close", "stop"])
    }

    pub fn current(&self, id: &str) -> Option<i64> {
        self.store.get_attribute(id, CURRENT_POSITION)
    }

    pub fn target(&self, id: &str) -> Option<i64> {
        self.store.get_attribute(id, TARGET_POSITION)
    }

    pub fn movement_status(&self, id: &str) -> MovementStatus {
        self.store.get(id).unwrap().movement_status
    }

    pub fn commands(&self, id: &str) -> Vec<String> {
        self.driver.commands_for(id)
    }
}

/// Lets queued commands reach the driver without crossing a tick boundary.
pub async fn settle() {
    time::sleep(Duration::from_millis(10)).await;
}

pub async fn seconds(n: u64) {
    time::sleep(Duration::from_secs(n)).await;
}
