use std::sync::Arc;

use async_trait::async_trait;
use btleplug::api::{Central as _, CharPropFlags, Manager as _, Peripheral as _, WriteType};
use btleplug::platform::{Adapter, Manager};
use futures::{StreamExt, future};
use log::{debug, trace};
use uuid::Uuid;

use crate::api::central::{CentralManager, PeripheralId, PeripheralRemote};
use crate::api::characteristic::{
    CharacteristicProperty, CharacteristicWriteType, RemoteCharacteristic, ValueStream,
};
use crate::api::descriptor::Descriptor;
use crate::api::service::RemoteService;
use crate::{Error, Result};

/// Peripherals are looked up among those the adapter already knows about,
/// keyed by their Bluetooth address.
pub struct Central {
    adapter: Adapter,
}

impl Central {
    pub fn new(adapter: Adapter) -> Self {
        Self { adapter }
    }

    /// Uses the first adapter the platform reports.
    pub async fn first_adapter() -> Result<Self> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Ble("No Bluetooth adapter available".to_string()))?;
        debug!("using adapter {}", adapter.adapter_info().await?);
        Ok(Self::new(adapter))
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }
}

#[async_trait]
impl CentralManager for Central {
    async fn peripheral(&self, id: &PeripheralId) -> Result<Arc<dyn PeripheralRemote>> {
        for peripheral in self.adapter.peripherals().await? {
            if peripheral_id(&peripheral) == *id {
                return Ok(Arc::new(Peripheral { peripheral }) as Arc<dyn PeripheralRemote>);
            }
        }
        Err(Error::PeripheralNotFound(id.clone()))
    }
}

fn peripheral_id(peripheral: &btleplug::platform::Peripheral) -> PeripheralId {
    PeripheralId::new(peripheral.address().to_string())
}

pub struct Peripheral {
    peripheral: btleplug::platform::Peripheral,
}

#[async_trait]
impl PeripheralRemote for Peripheral {
    fn id(&self) -> PeripheralId {
        peripheral_id(&self.peripheral)
    }

    async fn is_connected(&self) -> Result<bool> {
        Ok(self.peripheral.is_connected().await?)
    }

    async fn service(&self, uuid: Uuid) -> Result<Arc<dyn RemoteService>> {
        if self.peripheral.services().is_empty() {
            trace!("discovering services on {}", self.id());
            self.peripheral.discover_services().await?;
        }
        let service = self
            .peripheral
            .services()
            .into_iter()
            .find(|service| service.uuid == uuid)
            .ok_or(Error::ServiceNotFound(uuid))?;
        Ok(Arc::new(Service {
            peripheral: self.peripheral.clone(),
            service,
        }))
    }
}

pub struct Service {
    peripheral: btleplug::platform::Peripheral,
    service: btleplug::api::Service,
}

#[async_trait]
impl RemoteService for Service {
    fn uuid(&self) -> Uuid {
        self.service.uuid
    }

    async fn characteristic(&self, uuid: Uuid) -> Result<Arc<dyn RemoteCharacteristic>> {
        let characteristic = self
            .service
            .characteristics
            .iter()
            .find(|characteristic| characteristic.uuid == uuid)
            .cloned()
            .ok_or(Error::CharacteristicNotFound(uuid))?;
        Ok(Arc::new(Characteristic {
            peripheral: self.peripheral.clone(),
            characteristic,
        }))
    }
}

pub struct Characteristic {
    peripheral: btleplug::platform::Peripheral,
    characteristic: btleplug::api::Characteristic,
}

#[async_trait]
impl RemoteCharacteristic for Characteristic {
    fn uuid(&self) -> Uuid {
        self.characteristic.uuid
    }

    fn properties(&self) -> Vec<CharacteristicProperty> {
        parse_properties(self.characteristic.properties)
    }

    async fn read(&self) -> Result<Vec<u8>> {
        Ok(self.peripheral.read(&self.characteristic).await?)
    }

    async fn write(&self, data: &[u8], write_type: CharacteristicWriteType) -> Result<()> {
        let write_type = match write_type {
            CharacteristicWriteType::WriteWithResponse => WriteType::WithResponse,
            CharacteristicWriteType::WriteWithoutResponse => WriteType::WithoutResponse,
        };
        Ok(self
            .peripheral
            .write(&self.characteristic, data, write_type)
            .await?)
    }

    async fn descriptors(&self) -> Result<Vec<Descriptor>> {
        Ok(self
            .characteristic
            .descriptors
            .iter()
            .map(|descriptor| Descriptor {
                uuid: descriptor.uuid,
                service_uuid: descriptor.service_uuid,
                characteristic_uuid: descriptor.characteristic_uuid,
            })
            .collect())
    }

    async fn subscribe(&self) -> Result<()> {
        Ok(self.peripheral.subscribe(&self.characteristic).await?)
    }

    async fn unsubscribe(&self) -> Result<()> {
        Ok(self.peripheral.unsubscribe(&self.characteristic).await?)
    }

    async fn notifications(&self) -> Result<ValueStream> {
        // the peripheral multiplexes every characteristic onto one stream
        let uuid = self.characteristic.uuid;
        let notifications = self.peripheral.notifications().await?;
        Ok(notifications
            .filter_map(move |notification| {
                future::ready((notification.uuid == uuid).then_some(notification.value))
            })
            .boxed())
    }
}

fn parse_properties(flags: CharPropFlags) -> Vec<CharacteristicProperty> {
    [
        (CharPropFlags::BROADCAST, CharacteristicProperty::Broadcast),
        (CharPropFlags::READ, CharacteristicProperty::Read),
        (
            CharPropFlags::WRITE_WITHOUT_RESPONSE,
            CharacteristicProperty::WriteWithoutResponse,
        ),
        (CharPropFlags::WRITE, CharacteristicProperty::Write),
        (CharPropFlags::NOTIFY, CharacteristicProperty::Notify),
        (CharPropFlags::INDICATE, CharacteristicProperty::Indicate),
        (
            CharPropFlags::AUTHENTICATED_SIGNED_WRITES,
            CharacteristicProperty::AuthenticatedSignedWrites,
        ),
        (
            CharPropFlags::EXTENDED_PROPERTIES,
            CharacteristicProperty::ExtendedProperties,
        ),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, property)| property)
    .collect()
}
