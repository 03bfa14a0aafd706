use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::driver::DeviceDriver;
use crate::models::cover::CoverDevice;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Outbound {
    command: &'static str,
    high_priority: bool,
}

/// Ordered outbound command queue for one cover.
///
/// Commands are queued without waiting and delivered in order by a background
/// task. The task drains what is left and exits once every dispatcher clone is
/// dropped. Delivery failures are logged and dropped.
#[derive(Clone)]
pub struct CommandDispatcher {
    sender: mpsc::UnboundedSender<Outbound>,
}

impl CommandDispatcher {
    pub fn spawn(device: CoverDevice, driver: Arc<dyn DeviceDriver>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Outbound>();

        tokio::spawn(async move {
            while let Some(outbound) = receiver.recv().await {
                info!(
                    "Sending command {} highPriority {}",
                    outbound.command, outbound.high_priority
                );

                if let Err(e) = driver
                    .send_command(outbound.command, &device, outbound.high_priority)
                    .await
                {
                    error!(
                        device = %device.label,
                        "Error sending command {}: {}", outbound.command, e
                    );
                }
            }
        });

        Self { sender }
    }

    pub fn send(&self, command: &'static str, high_priority: bool) {
        let outbound = Outbound {
            command,
            high_priority,
        };

        if self.sender.send(outbound).is_err() {
            error!("Error sending command {}: dispatcher closed", command);
        }
    }
}
