//! In-memory central, peripheral and service for use in test

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::central::{CentralManager, PeripheralId, PeripheralRemote};
use crate::api::characteristic::RemoteCharacteristic;
use crate::api::service::RemoteService;
use crate::mocks::mock_characteristic::MockCharacteristic;
use crate::{Error, Result};

#[derive(Default)]
pub struct MockCentral {
    peripherals: HashMap<PeripheralId, Arc<MockPeripheral>>,
}

impl MockCentral {
    pub fn with_peripheral(mut self, peripheral: Arc<MockPeripheral>) -> Self {
        self.peripherals.insert(peripheral.id(), peripheral);
        self
    }
}

#[async_trait]
impl CentralManager for MockCentral {
    async fn peripheral(&self, id: &PeripheralId) -> Result<Arc<dyn PeripheralRemote>> {
        self.peripherals
            .get(id)
            .map(|peripheral| peripheral.clone() as Arc<dyn PeripheralRemote>)
            .ok_or_else(|| Error::PeripheralNotFound(id.clone()))
    }
}

pub struct MockPeripheral {
    id: PeripheralId,
    connected: AtomicBool,
    services: HashMap<Uuid, Arc<MockService>>,
}

impl MockPeripheral {
    pub fn new(id: PeripheralId) -> Self {
        Self {
            id,
            connected: AtomicBool::new(true),
            services: HashMap::new(),
        }
    }

    pub fn with_service(mut self, service: MockService) -> Self {
        self.services.insert(service.uuid, Arc::new(service));
        self
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl PeripheralRemote for MockPeripheral {
    fn id(&self) -> PeripheralId {
        self.id.clone()
    }

    async fn is_connected(&self) -> Result<bool> {
        Ok(self.connected.load(Ordering::SeqCst))
    }

    async fn service(&self, uuid: Uuid) -> Result<Arc<dyn RemoteService>> {
        self.services
            .get(&uuid)
            .map(|service| service.clone() as Arc<dyn RemoteService>)
            .ok_or(Error::ServiceNotFound(uuid))
    }
}

pub struct MockService {
    uuid: Uuid,
    characteristics: HashMap<Uuid, Arc<MockCharacteristic>>,
}

impl MockService {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            characteristics: HashMap::new(),
        }
    }

    pub fn with_characteristic(mut self, characteristic: Arc<MockCharacteristic>) -> Self {
        self.characteristics
            .insert(characteristic.uuid(), characteristic);
        self
    }
}

#[async_trait]
impl RemoteService for MockService {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    async fn characteristic(&self, uuid: Uuid) -> Result<Arc<dyn RemoteCharacteristic>> {
        self.characteristics
            .get(&uuid)
            .map(|characteristic| characteristic.clone() as Arc<dyn RemoteCharacteristic>)
            .ok_or(Error::CharacteristicNotFound(uuid))
    }
}
