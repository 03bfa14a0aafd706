use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::configs::Bridge;
use crate::driver::DeviceDriver;
use crate::error::{BridgeError, Result};
use crate::models::cover::{CoverDevice, CoverStatus, FULLY_OPEN};
use crate::services::controller::MovementController;
use crate::services::debouncer::Debouncer;
use crate::services::discovery::{DeviceFilter, select_covers};
use crate::store::{AttributeStore, CURRENT_POSITION};

/// One registered cover: its movement controller and its request debouncer.
pub struct Cover {
    controller: MovementController,
    debouncer: Debouncer,
}

impl Cover {
    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    pub fn is_move_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Debounced absolute move. Only the last target within the window is executed.
    pub fn request_move(&self, target: u16) {
        let controller = self.controller.clone();
        self.debouncer.schedule(async move {
            controller.move_to(target);
        });
    }

    pub fn cancel_pending_move(&self) -> bool {
        self.debouncer.cancel()
    }

    fn teardown(&self) {
        self.debouncer.cancel();
        self.controller.shutdown();
    }
}

pub struct CoverRegistry {
    bridge: Bridge,
    filter: DeviceFilter,
    driver: Arc<dyn DeviceDriver>,
    store: Arc<dyn AttributeStore>,
    covers: RwLock<HashMap<String, Arc<Cover>>>,
}

impl CoverRegistry {
    pub fn new(bridge: Bridge, driver: Arc<dyn DeviceDriver>, store: Arc<dyn AttributeStore>) -> Self {
        Self {
            filter: DeviceFilter::from_settings(&bridge),
            bridge,
            driver,
            store,
            covers: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn AttributeStore> {
        &self.store
    }

    /// Creates a stopped cover for `device`. Must be called within a tokio runtime.
    pub fn register(&self, device: CoverDevice) -> Result<Arc<Cover>> {
        let mut covers = self.write();
        if covers.contains_key(device.id()) {
            return Err(BridgeError::CoverExists(device.id().to_string()));
        }

        debug!("Adding device: {}", device.label);

        if self.store.get_attribute(device.id(), CURRENT_POSITION).is_none() {
            self.store
                .set_status(device.id(), CoverStatus::stopped_at(FULLY_OPEN));
        }

        let id = device.id().to_string();
        let full_travel = self.bridge.movement_duration_for(&device.label);
        let cover = Arc::new(Cover {
            controller: MovementController::new(
                device,
                full_travel,
                Arc::clone(&self.store),
                Arc::clone(&self.driver),
            ),
            debouncer: Debouncer::default(),
        });

        covers.insert(id, Arc::clone(&cover));
        Ok(cover)
    }

    /// Filters and registers a batch of discovered devices. Returns how many covers were added.
    pub fn discover(&self, devices: Vec<CoverDevice>) -> usize {
        info!("Discovered {} devices", devices.len());

        let covers = select_covers(devices, &self.filter);
        info!("Discovered {} covers", covers.len());

        covers
            .into_iter()
            .filter_map(|device| match self.register(device) {
                Ok(cover) => Some(cover),
                Err(e) => {
                    debug!("{}", e);
                    None
                }
            })
            .count()
    }

    pub fn unregister(&self, id: &str) -> bool {
        match self.write().remove(id) {
            Some(cover) => {
                cover.teardown();
                true
            }
            None => false,
        }
    }

    /// Cancels every tick and debounce timer, then empties the registry.
    pub fn unregister_all(&self) -> usize {
        let mut covers = self.write();
        for cover in covers.values() {
            cover.teardown();
        }

        let count = covers.len();
        covers.clear();
        count
    }

    pub fn get(&self, id: &str) -> Option<Arc<Cover>> {
        self.read().get(id).cloned()
    }

    pub fn cover(&self, id: &str) -> Result<Arc<Cover>> {
        self.get(id)
            .ok_or_else(|| BridgeError::CoverNotFound(id.to_string()))
    }

    pub fn request_move(&self, id: &str, target: u16) -> Result<()> {
        self.cover(id)?.request_move(target);
        Ok(())
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Cover>>> {
        self.covers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Cover>>> {
        self.covers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CoverRegistry {
    fn drop(&mut self) {
        self.unregister_all();
    }
}
