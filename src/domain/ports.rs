use crate::domain::model::UninstallReceipt;
use crate::utils::error::Result;
use async_trait::async_trait;

/// The vendor capability the dispatcher depends on.
#[async_trait]
pub trait SensorApi: Send + Sync {
    /// Submits one sensor uninstall for `host_id`. With `queue_offline` the request is
    /// held by the cloud until the host next connects.
    async fn queue_uninstall(&self, host_id: &str, queue_offline: bool)
        -> Result<UninstallReceipt>;
}
