use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;
use crate::api::service::RemoteService;

/// Entry point into the BLE library: hands out peripherals the application
/// has already connected to.
#[async_trait]
pub trait CentralManager: Send + Sync {
    async fn peripheral(&self, id: &PeripheralId) -> Result<Arc<dyn PeripheralRemote>>;
}

#[async_trait]
pub trait PeripheralRemote: Send + Sync {
    fn id(&self) -> PeripheralId;

    async fn is_connected(&self) -> Result<bool>;

    async fn service(&self, uuid: Uuid) -> Result<Arc<dyn RemoteService>>;
}

/// Platform identifier of a peripheral. CoreBluetooth hands out UUIDs while
/// BlueZ uses addresses, so the id is kept as its string form.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PeripheralId(String);

impl PeripheralId {
    pub fn new(id: impl Into<String>) -> Self {
        PeripheralId(id.into())
    }
}

impl fmt::Display for PeripheralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Navigation parameters handed to the detail screen by the service list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavigationParams {
    pub peripheral: PeripheralId,
    pub service: Uuid,
}
