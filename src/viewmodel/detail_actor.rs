use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{debug, trace, warn};
use tokio::sync::mpsc::{Receiver, WeakSender};
use tokio::sync::oneshot;

use crate::api::central::{CentralManager, NavigationParams};
use crate::api::characteristic::RemoteCharacteristic;
use crate::api::descriptor::Descriptor;
use crate::api::dialogs::UserDialogs;
use crate::api::service::RemoteService;
use crate::config::{DetailConfig, WriteSource};
use crate::hex::{parse_hex_bytes, to_hex_string};
use crate::viewmodel::state::{ObservableState, StateChange};
use crate::viewmodel::subscription::UpdateSubscription;
use crate::{Error, Result};

const READING_TITLE: &str = "Reading characteristic value...";
const WRITING_TITLE: &str = "Write characteristic value";
const WRITE_PROMPT_MESSAGE: &str = "Input a value (as hex whitespace separated)";
const WRITE_PROMPT_TITLE: &str = "Write value";

pub(crate) type Responder = oneshot::Sender<Result<()>>;

#[derive(Debug)]
pub(crate) enum DetailCommand {
    Prepare {
        params: NavigationParams,
        responder: Responder,
    },
    Read {
        responder: Responder,
    },
    Write {
        responder: Responder,
    },
    ToggleUpdates {
        responder: Responder,
    },
    StartUpdates {
        responder: Responder,
    },
    StopUpdates {
        responder: Responder,
    },
    ViewAppeared {
        responder: Responder,
    },
    ViewDisappeared {
        responder: Responder,
    },
    ValueUpdated {
        generation: u64,
        value: Vec<u8>,
    },
}

struct Resolved {
    service: Arc<dyn RemoteService>,
    write: Arc<dyn RemoteCharacteristic>,
    notify: Arc<dyn RemoteCharacteristic>,
    descriptors: Vec<Descriptor>,
}

/// Owns every piece of screen state. Commands are handled one at a time, so
/// this task is the only place the state is ever mutated.
pub(crate) struct DetailActor {
    config: DetailConfig,
    central: Arc<dyn CentralManager>,
    dialogs: Arc<dyn UserDialogs>,
    command_rx: Receiver<DetailCommand>,
    command_tx: WeakSender<DetailCommand>,
    state: ObservableState,
    characteristic: Option<Arc<dyn RemoteCharacteristic>>,
    write_characteristic: Option<Arc<dyn RemoteCharacteristic>>,
    subscription: Option<UpdateSubscription>,
    next_generation: u64,
}

impl DetailActor {
    pub(crate) fn new(
        config: DetailConfig,
        central: Arc<dyn CentralManager>,
        dialogs: Arc<dyn UserDialogs>,
        command_rx: Receiver<DetailCommand>,
        command_tx: WeakSender<DetailCommand>,
        state: ObservableState,
    ) -> Self {
        Self {
            config,
            central,
            dialogs,
            command_rx,
            command_tx,
            state,
            characteristic: None,
            write_characteristic: None,
            subscription: None,
            next_generation: 0,
        }
    }

    pub(crate) async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
        }
        debug!("detail view model closed");
    }

    async fn handle_command(&mut self, command: DetailCommand) {
        trace!("handle_command {command:?}");
        match command {
            DetailCommand::Prepare { params, responder } => {
                let _ = responder.send(self.prepare(params).await);
            }
            DetailCommand::Read { responder } => {
                self.read().await;
                let _ = responder.send(Ok(()));
            }
            DetailCommand::Write { responder } => {
                self.write().await;
                let _ = responder.send(Ok(()));
            }
            DetailCommand::ToggleUpdates { responder } => {
                if self.subscription.is_some() {
                    self.stop_updates().await;
                } else {
                    self.start_updates().await;
                }
                let _ = responder.send(Ok(()));
            }
            DetailCommand::StartUpdates { responder } => {
                self.start_updates().await;
                let _ = responder.send(Ok(()));
            }
            DetailCommand::StopUpdates { responder } => {
                self.stop_updates().await;
                let _ = responder.send(Ok(()));
            }
            DetailCommand::ViewAppeared { responder } => {
                let _ = responder.send(Ok(()));
            }
            DetailCommand::ViewDisappeared { responder } => {
                if self.characteristic.is_some() && self.subscription.is_some() {
                    self.stop_updates().await;
                }
                let _ = responder.send(Ok(()));
            }
            DetailCommand::ValueUpdated { generation, value } => {
                self.value_updated(generation, value);
            }
        }
    }

    async fn prepare(&mut self, params: NavigationParams) -> Result<()> {
        // a re-prepare starts from a blank screen
        if self.subscription.is_some() {
            self.stop_updates().await;
        }
        self.characteristic = None;
        self.write_characteristic = None;
        self.state.set_updates_started(false);

        match self.resolve(&params).await {
            Ok(resolved) => {
                let permissions = resolved.notify.capabilities().describe();
                let write_permissions = resolved.write.capabilities().describe();
                debug!(
                    "prepared service {} on {}: permissions '{permissions}', write permissions '{write_permissions}'",
                    resolved.service.uuid(),
                    params.peripheral
                );

                self.characteristic = Some(resolved.notify);
                self.write_characteristic = Some(resolved.write);
                self.state.update(StateChange::Prepared, |state| {
                    state.characteristic_value.clear();
                    state.write_characteristic_value.clear();
                    state.permissions = permissions;
                    state.write_permissions = write_permissions;
                    state.descriptors = resolved.descriptors;
                });
                Ok(())
            }
            Err(error) => {
                warn!("prepare failed for {params:?}: {error}");
                self.state.update(StateChange::PrepareFailed(error.clone()), |state| {
                    state.characteristic_value.clear();
                    state.write_characteristic_value.clear();
                    state.permissions.clear();
                    state.write_permissions.clear();
                    state.descriptors.clear();
                });
                self.state.add_message(format!("Error {error}"));
                Err(error)
            }
        }
    }

    async fn resolve(&self, params: &NavigationParams) -> Result<Resolved> {
        let limit = self.config.operation_timeout;

        let peripheral = bounded(limit, self.central.peripheral(&params.peripheral)).await?;
        if !bounded(limit, peripheral.is_connected()).await? {
            return Err(Error::NotConnected);
        }
        let service = bounded(limit, peripheral.service(params.service)).await?;
        let write =
            bounded(limit, service.characteristic(self.config.write_characteristic_uuid)).await?;
        let notify =
            bounded(limit, service.characteristic(self.config.notify_characteristic_uuid)).await?;
        let descriptors = bounded(limit, notify.descriptors()).await?;

        Ok(Resolved {
            service,
            write,
            notify,
            descriptors,
        })
    }

    async fn read(&mut self) {
        let Some(handle) = self.characteristic.clone() else {
            debug!("read ignored, no characteristic");
            return;
        };

        self.dialogs.show_loading(READING_TITLE);
        match bounded(self.config.operation_timeout, handle.read()).await {
            Ok(value) => {
                let hex = self.set_characteristic_value(&value);
                self.state.add_message(format!("Read value {hex}"));
            }
            Err(error) => {
                warn!("read of {} failed: {error}", handle.uuid());
                self.dialogs.hide_loading();
                self.dialogs.alert(&error.to_string()).await;
                self.state.add_message(format!("Error {error}"));
            }
        }
        self.dialogs.hide_loading();
    }

    async fn write(&mut self) {
        let prompt = self
            .dialogs
            .prompt(
                WRITE_PROMPT_MESSAGE,
                WRITE_PROMPT_TITLE,
                &self.config.sample_payload,
            )
            .await;
        if !prompt.ok {
            return;
        }

        if let Err(error) = self.write_payload(&prompt.text).await {
            warn!("write failed: {error}");
            self.dialogs.hide_loading();
            self.dialogs.alert(&error.to_string()).await;
        }
    }

    async fn write_payload(&mut self, input: &str) -> Result<()> {
        let text = match self.config.write_source {
            WriteSource::SamplePayload => self.config.sample_payload.as_str(),
            WriteSource::UserInput => input,
        };
        let data = parse_hex_bytes(text)?;
        let handle = self
            .write_characteristic
            .clone()
            .ok_or(Error::NotPrepared)?;

        self.dialogs.show_loading(WRITING_TITLE);
        bounded(
            self.config.operation_timeout,
            handle.write(&data, self.config.write_type),
        )
        .await?;
        self.dialogs.hide_loading();

        let hex = to_hex_string(&data);
        self.state.update(
            StateChange::WriteCharacteristicValue(hex.clone()),
            |state| state.write_characteristic_value = hex.clone(),
        );
        self.state.add_message(format!("Wrote value {hex}"));
        Ok(())
    }

    async fn start_updates(&mut self) {
        let Some(handle) = self.characteristic.clone() else {
            self.dialogs.alert(&Error::NotPrepared.to_string()).await;
            return;
        };

        if let Err(error) = self.subscribe(handle).await {
            warn!("start updates failed: {error}");
            self.dialogs.alert(&error.to_string()).await;
        }
    }

    async fn subscribe(&mut self, handle: Arc<dyn RemoteCharacteristic>) -> Result<()> {
        let limit = self.config.operation_timeout;

        // the previous token stays attached until a new stream is open, so a
        // failure here leaves the flag and the token as they were
        let values = bounded(limit, handle.notifications()).await?;
        self.subscription = None;
        let generation = self.next_generation;
        self.next_generation += 1;
        self.subscription = Some(UpdateSubscription::attach(
            generation,
            values,
            self.command_tx.clone(),
        ));
        self.state.set_updates_started(true);

        bounded(limit, handle.subscribe()).await?;
        self.state.add_message("Start updates".to_string());

        let descriptors = bounded(limit, handle.descriptors()).await?;
        self.state
            .update(StateChange::Descriptors, |state| state.descriptors = descriptors);
        Ok(())
    }

    async fn stop_updates(&mut self) {
        let Some(handle) = self.characteristic.clone() else {
            self.dialogs.alert(&Error::NotPrepared.to_string()).await;
            return;
        };

        self.subscription = None;
        self.state.set_updates_started(false);

        match bounded(self.config.operation_timeout, handle.unsubscribe()).await {
            Ok(()) => self.state.add_message("Stop updates".to_string()),
            Err(error) => {
                warn!("stop updates failed: {error}");
                self.dialogs.alert(&error.to_string()).await;
            }
        }
    }

    fn value_updated(&self, generation: u64, value: Vec<u8>) {
        let current = self.subscription.as_ref().map(UpdateSubscription::generation);
        if current != Some(generation) {
            trace!("dropping value from detached subscription {generation}");
            return;
        }

        let hex = self.set_characteristic_value(&value);
        let time_of_day = Local::now().format("%H:%M:%S%.6f");
        self.state.add_message(format!("{time_of_day} - Updated: {hex}"));
    }

    fn set_characteristic_value(&self, value: &[u8]) -> String {
        let hex = to_hex_string(value);
        self.state.update(StateChange::CharacteristicValue(hex.clone()), |state| {
            state.characteristic_value = hex.clone()
        });
        hex
    }
}

/// Awaits a BLE call, giving up after `limit` when one is configured.
async fn bounded<T>(limit: Option<Duration>, call: impl Future<Output = Result<T>>) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| Error::Timeout)?,
        None => call.await,
    }
}
