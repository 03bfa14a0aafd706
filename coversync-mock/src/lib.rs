use std::sync::Arc;
use std::time::Duration;

use coversync_core::BridgeError;
use coversync_core::driver::DeviceDriver;
use coversync_core::handles::WindowCoveringHandler;
use coversync_core::services::CoverRegistry;
use coversync_core::store::{AttributeStore, MemoryAttributeStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::{signal, time};

use crate::command::ConsoleCommand;
use crate::driver::SimulatedDriver;
use crate::settings::Settings;

mod command;
mod driver;
pub mod settings;

const HELP: &str = "commands: open|close|stop|identify <id>, goto <id> <0..10000>, status";

pub async fn run(settings: &Arc<Settings>) -> Result<(), BridgeError> {
    let driver: Arc<dyn DeviceDriver> = Arc::new(SimulatedDriver::new(
        Duration::from_millis(settings.mock.latency_ms),
        settings.mock.failure_rate,
    ));
    let store = Arc::new(MemoryAttributeStore::new());
    let registry = Arc::new(CoverRegistry::new(
        settings.bridge.clone(),
        driver,
        Arc::clone(&store) as Arc<dyn AttributeStore>,
    ));

    let count = registry.discover(settings.mock.devices.clone());
    tracing::info!("Bridging {} covers: {:?}", count, registry.ids());
    tracing::info!("{}", HELP);

    let handler = WindowCoveringHandler::new(Arc::clone(&registry));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = time::interval(Duration::from_secs(settings.mock.status_interval_secs.max(1)));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<ConsoleCommand>() {
                    Ok(ConsoleCommand::Status) => report_status(&registry, &store),
                    Ok(ConsoleCommand::Help) => tracing::info!("{}", HELP),
                    Ok(command) => {
                        if let Err(e) = command::execute(&handler, command) {
                            tracing::warn!("{}", e);
                        }
                    }
                    Err(e) => tracing::warn!("{}. {}", e, HELP),
                }
            },
            _ = interval.tick() => report_status(&registry, &store),
            _ = signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C");
                break;
            }
        }
    }

    let removed = registry.unregister_all();
    tracing::info!("Unregistered {} covers", removed);

    Ok(())
}

fn report_status(registry: &CoverRegistry, store: &MemoryAttributeStore) {
    for id in registry.ids() {
        let Some(attributes) = store.get(&id) else {
            continue;
        };

        tracing::info!(
            cover = %id,
            current = ?attributes.current,
            target = ?attributes.target,
            status = ?attributes.movement_status,
            "Status"
        );
    }
}
