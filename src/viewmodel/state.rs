use tokio::sync::{broadcast, watch};

use crate::Error;
use crate::api::descriptor::Descriptor;
use crate::viewmodel::message_log::MessageLog;

pub const START_UPDATES_LABEL: &str = "Start updates";
pub const STOP_UPDATES_LABEL: &str = "Stop updates";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Everything the detail screen renders.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DetailState {
    /// Last known value of the notify characteristic, as hex.
    pub characteristic_value: String,
    /// Last known value of the write characteristic, as hex.
    pub write_characteristic_value: String,
    pub permissions: String,
    pub write_permissions: String,
    pub update_button_text: &'static str,
    pub updates_started: bool,
    pub descriptors: Vec<Descriptor>,
    pub messages: MessageLog,
}

impl Default for DetailState {
    fn default() -> Self {
        DetailState {
            characteristic_value: String::new(),
            write_characteristic_value: String::new(),
            permissions: String::new(),
            write_permissions: String::new(),
            update_button_text: START_UPDATES_LABEL,
            updates_started: false,
            descriptors: Vec::new(),
            messages: MessageLog::new(),
        }
    }
}

/// Named change notifications, published after the snapshot is updated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StateChange {
    Prepared,
    PrepareFailed(Error),
    CharacteristicValue(String),
    WriteCharacteristicValue(String),
    UpdateButtonText(&'static str),
    Descriptors,
    MessageAdded(String),
}

/// Write side of the screen state. Only the detail actor holds one.
pub(crate) struct ObservableState {
    snapshot: watch::Sender<DetailState>,
    changes: broadcast::Sender<StateChange>,
}

impl ObservableState {
    pub(crate) fn new() -> (Self, watch::Receiver<DetailState>, broadcast::Sender<StateChange>) {
        let (snapshot, snapshot_rx) = watch::channel(DetailState::default());
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        (
            Self {
                snapshot,
                changes: changes.clone(),
            },
            snapshot_rx,
            changes,
        )
    }

    /// Applies `modify` and then announces `change`.
    pub(crate) fn update(&self, change: StateChange, modify: impl FnOnce(&mut DetailState)) {
        self.snapshot.send_modify(modify);
        self.publish(change);
    }

    pub(crate) fn publish(&self, change: StateChange) {
        // no receivers is fine, the snapshot is the source of truth
        let _ = self.changes.send(change);
    }

    pub(crate) fn add_message(&self, message: String) {
        log::debug!("message: {message}");
        self.update(StateChange::MessageAdded(message.clone()), |state| {
            state.messages.prepend(message)
        });
    }

    pub(crate) fn set_updates_started(&self, started: bool) {
        let label = if started {
            STOP_UPDATES_LABEL
        } else {
            START_UPDATES_LABEL
        };
        self.update(StateChange::UpdateButtonText(label), |state| {
            state.updates_started = started;
            state.update_button_text = label;
        });
    }
}
