use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::Result;
use crate::api::descriptor::Descriptor;

/// Values pushed by the peripheral while notifications are enabled.
pub type ValueStream = BoxStream<'static, Vec<u8>>;

#[async_trait]
pub trait RemoteCharacteristic: Send + Sync {
    fn uuid(&self) -> Uuid;

    fn properties(&self) -> Vec<CharacteristicProperty>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::from_properties(&self.properties())
    }

    async fn read(&self) -> Result<Vec<u8>>;

    async fn write(&self, data: &[u8], write_type: CharacteristicWriteType) -> Result<()>;

    async fn descriptors(&self) -> Result<Vec<Descriptor>>;

    // enable notifications/indications on the peripheral
    async fn subscribe(&self) -> Result<()>;

    // disable notifications/indications on the peripheral
    async fn unsubscribe(&self) -> Result<()>;

    /// A fresh stream of value updates for this characteristic. Dropping the
    /// stream stops delivery to it; it does not touch the peripheral.
    async fn notifications(&self) -> Result<ValueStream>;
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, Eq, PartialEq, Hash)]
pub enum CharacteristicProperty {
    Broadcast,
    Read,
    WriteWithoutResponse,
    Write,
    AuthenticatedSignedWrites,
    Notify,
    NotifyEncryptionRequired,
    Indicate,
    IndicateEncryptionRequired,
    ExtendedProperties,
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, Eq, PartialEq)]
pub enum CharacteristicWriteType {
    WriteWithoutResponse,
    WriteWithResponse,
}

/// What the screen may do with a characteristic.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Capabilities {
    pub can_read: bool,
    pub can_write: bool,
    pub can_update: bool,
}

impl Capabilities {
    pub fn from_properties(properties: &[CharacteristicProperty]) -> Self {
        use CharacteristicProperty::*;

        let has = |wanted: &[CharacteristicProperty]| properties.iter().any(|p| wanted.contains(p));
        Capabilities {
            can_read: has(&[Read]),
            can_write: has(&[Write, WriteWithoutResponse, AuthenticatedSignedWrites]),
            can_update: has(&[
                Notify,
                NotifyEncryptionRequired,
                Indicate,
                IndicateEncryptionRequired,
            ]),
        }
    }

    /// Label shown next to the characteristic, e.g. `"Read Write Update"`.
    pub fn describe(&self) -> String {
        let mut label = String::new();
        if self.can_read {
            label.push_str("Read ");
        }
        if self.can_write {
            label.push_str("Write ");
        }
        if self.can_update {
            label.push_str("Update");
        }
        label
    }
}
