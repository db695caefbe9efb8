use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;
use crate::api::characteristic::RemoteCharacteristic;

#[async_trait]
pub trait RemoteService: Send + Sync {
    fn uuid(&self) -> Uuid;

    /// Fails with `CharacteristicNotFound` when the service has no child with
    /// this UUID, or with a transport error when the device went away.
    async fn characteristic(&self, uuid: Uuid) -> Result<Arc<dyn RemoteCharacteristic>>;
}
