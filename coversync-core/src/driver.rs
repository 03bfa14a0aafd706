use async_trait::async_trait;

use crate::error::DriverError;
use crate::models::cover::CoverDevice;

/// Outbound side of the cloud device driver.
///
/// Implementations talk to the vendor API. The bridge never retries a failed
/// command and never waits on one from inside the tick loop.
#[async_trait]
pub trait DeviceDriver: Send + Sync {
    async fn send_command(
        &self,
        command: &str,
        device: &CoverDevice,
        high_priority: bool,
    ) -> Result<(), DriverError>;
}
