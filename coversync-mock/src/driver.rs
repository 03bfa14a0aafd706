use std::time::Duration;

use async_trait::async_trait;
use coversync_core::driver::DeviceDriver;
use coversync_core::models::cover::CoverDevice;
use coversync_core::DriverError;
use rand::Rng;
use tokio::time;

/// Stand-in for the vendor cloud: answers after a fixed latency and fails at random.
pub struct SimulatedDriver {
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedDriver {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl DeviceDriver for SimulatedDriver {
    async fn send_command(
        &self,
        command: &str,
        device: &CoverDevice,
        high_priority: bool,
    ) -> Result<(), DriverError> {
        // High priority commands skip the cloud queue.
        if !high_priority {
            time::sleep(self.latency).await;
        }

        let unlucky = rand::rng().random_bool(self.failure_rate);
        if unlucky {
            return Err(DriverError::Transport("execution timed out".to_string()));
        }

        if !device.supports(command) {
            return Err(DriverError::Rejected {
                command: command.to_string(),
            });
        }

        tracing::debug!("Cloud executed {} on {}", command, device.label);
        Ok(())
    }
}
