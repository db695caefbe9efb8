//! Scriptable RemoteCharacteristic for use in test

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc::{UnboundedSender, unbounded};
use uuid::Uuid;

use crate::api::characteristic::{
    CharacteristicProperty, CharacteristicWriteType, RemoteCharacteristic, ValueStream,
};
use crate::api::descriptor::Descriptor;
use crate::{Error, Result};

#[derive(Default)]
struct Inner {
    read_value: Vec<u8>,
    read_delay: Option<Duration>,
    read_error: Option<Error>,
    write_error: Option<Error>,
    subscribe_error: Option<Error>,
    unsubscribe_error: Option<Error>,
    notifications_error: Option<Error>,
    written: Vec<(Vec<u8>, CharacteristicWriteType)>,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
    descriptor_calls: usize,
    descriptors: Vec<Descriptor>,
    listeners: Vec<UnboundedSender<Vec<u8>>>,
}

pub struct MockCharacteristic {
    uuid: Uuid,
    properties: Vec<CharacteristicProperty>,
    inner: Mutex<Inner>,
}

impl MockCharacteristic {
    pub fn new(uuid: Uuid, properties: &[CharacteristicProperty]) -> Self {
        Self {
            uuid,
            properties: properties.to_vec(),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn set_read_value(&self, value: &[u8]) {
        self.inner().read_value = value.to_vec();
    }

    pub fn set_read_delay(&self, delay: Duration) {
        self.inner().read_delay = Some(delay);
    }

    pub fn fail_reads(&self, error: Error) {
        self.inner().read_error = Some(error);
    }

    pub fn fail_writes(&self, error: Error) {
        self.inner().write_error = Some(error);
    }

    pub fn fail_subscribe(&self, error: Error) {
        self.inner().subscribe_error = Some(error);
    }

    pub fn fail_unsubscribe(&self, error: Error) {
        self.inner().unsubscribe_error = Some(error);
    }

    pub fn fail_notifications(&self, error: Error) {
        self.inner().notifications_error = Some(error);
    }

    pub fn set_descriptors(&self, descriptors: &[Uuid]) {
        self.inner().descriptors = descriptors
            .iter()
            .map(|&uuid| Descriptor {
                uuid,
                service_uuid: Uuid::nil(),
                characteristic_uuid: self.uuid,
            })
            .collect();
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.inner().written.iter().map(|(data, _)| data.clone()).collect()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.inner().subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.inner().unsubscribe_calls
    }

    pub fn descriptor_calls(&self) -> usize {
        self.inner().descriptor_calls
    }

    /// Pushes a notification to every open stream. Returns how many streams
    /// were still open.
    pub fn notify(&self, value: &[u8]) -> usize {
        let mut inner = self.inner();
        inner
            .listeners
            .retain(|listener| listener.unbounded_send(value.to_vec()).is_ok());
        inner.listeners.len()
    }
}

#[async_trait]
impl RemoteCharacteristic for MockCharacteristic {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn properties(&self) -> Vec<CharacteristicProperty> {
        self.properties.clone()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        let delay = self.inner().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let inner = self.inner();
        match &inner.read_error {
            Some(error) => Err(error.clone()),
            None => Ok(inner.read_value.clone()),
        }
    }

    async fn write(&self, data: &[u8], write_type: CharacteristicWriteType) -> Result<()> {
        let mut inner = self.inner();
        if let Some(error) = &inner.write_error {
            return Err(error.clone());
        }
        inner.written.push((data.to_vec(), write_type));
        Ok(())
    }

    async fn descriptors(&self) -> Result<Vec<Descriptor>> {
        let mut inner = self.inner();
        inner.descriptor_calls += 1;
        Ok(inner.descriptors.clone())
    }

    async fn subscribe(&self) -> Result<()> {
        let mut inner = self.inner();
        inner.subscribe_calls += 1;
        match &inner.subscribe_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn unsubscribe(&self) -> Result<()> {
        let mut inner = self.inner();
        inner.unsubscribe_calls += 1;
        match &inner.unsubscribe_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn notifications(&self) -> Result<ValueStream> {
        let mut inner = self.inner();
        if let Some(error) = &inner.notifications_error {
            return Err(error.clone());
        }
        let (tx, rx) = unbounded();
        inner.listeners.push(tx);
        Ok(rx.boxed())
    }
}
