use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc::{self, Sender};
use tokio::sync::{broadcast, oneshot, watch};

use crate::api::central::{CentralManager, NavigationParams};
use crate::api::dialogs::UserDialogs;
use crate::config::DetailConfig;
use crate::viewmodel::detail_actor::{DetailActor, DetailCommand, Responder};
use crate::viewmodel::state::{DetailState, ObservableState, StateChange};
use crate::{Error, Result};

/// Handle on the detail screen of one characteristic pair.
///
/// Every call is queued to the actor spawned by [`CharacteristicDetail::spawn`]
/// and resolves once the actor has finished with it. BLE failures inside
/// `read`, `write` and the update toggles are shown to the user as alerts and
/// do not fail the call; only `prepare` reports its failure, and any call
/// fails with [`Error::ViewModelClosed`] once the actor is gone.
#[derive(Clone)]
pub struct CharacteristicDetail {
    command_tx: Sender<DetailCommand>,
    state_rx: watch::Receiver<DetailState>,
    changes_tx: broadcast::Sender<StateChange>,
}

impl CharacteristicDetail {
    /// Starts the actor on the current tokio runtime.
    pub fn spawn(
        config: DetailConfig,
        central: Arc<dyn CentralManager>,
        dialogs: Arc<dyn UserDialogs>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_queue_depth.max(1));
        let (state, state_rx, changes_tx) = ObservableState::new();
        let actor = DetailActor::new(
            config,
            central,
            dialogs,
            command_rx,
            command_tx.downgrade(),
            state,
        );
        tokio::spawn(actor.run());
        debug!("detail view model started");

        Self {
            command_tx,
            state_rx,
            changes_tx,
        }
    }

    /// Resolves the service named by `params` and both characteristics.
    pub async fn prepare(&self, params: NavigationParams) -> Result<()> {
        self.request(|responder| DetailCommand::Prepare { params, responder }).await
    }

    pub async fn read(&self) -> Result<()> {
        self.request(|responder| DetailCommand::Read { responder }).await
    }

    pub async fn write(&self) -> Result<()> {
        self.request(|responder| DetailCommand::Write { responder }).await
    }

    pub async fn toggle_updates(&self) -> Result<()> {
        self.request(|responder| DetailCommand::ToggleUpdates { responder }).await
    }

    pub async fn start_updates(&self) -> Result<()> {
        self.request(|responder| DetailCommand::StartUpdates { responder }).await
    }

    pub async fn stop_updates(&self) -> Result<()> {
        self.request(|responder| DetailCommand::StopUpdates { responder }).await
    }

    pub async fn view_appeared(&self) -> Result<()> {
        self.request(|responder| DetailCommand::ViewAppeared { responder }).await
    }

    pub async fn view_disappeared(&self) -> Result<()> {
        self.request(|responder| DetailCommand::ViewDisappeared { responder }).await
    }

    pub fn state(&self) -> DetailState {
        self.state_rx.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<DetailState> {
        self.state_rx.clone()
    }

    pub fn changes(&self) -> broadcast::Receiver<StateChange> {
        self.changes_tx.subscribe()
    }

    async fn request(&self, command: impl FnOnce(Responder) -> DetailCommand) -> Result<()> {
        let (responder, response) = oneshot::channel();
        self.command_tx
            .send(command(responder))
            .await
            .map_err(|_| Error::ViewModelClosed)?;
        response.await.map_err(|_| Error::ViewModelClosed)?
    }
}
