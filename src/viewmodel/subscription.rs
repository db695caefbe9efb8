use futures::StreamExt;
use log::trace;
use tokio::sync::mpsc::WeakSender;
use tokio::task::JoinHandle;

use crate::api::characteristic::ValueStream;
use crate::viewmodel::detail_actor::DetailCommand;

/// Owned handle on a running notification forwarder.
///
/// Values from the characteristic are handed to the detail actor tagged with
/// this token's generation. Dropping the token stops the forwarder; it is the
/// only way to detach, so at most one handler per token ever exists.
#[derive(Debug)]
pub struct UpdateSubscription {
    generation: u64,
    forwarder: JoinHandle<()>,
}

impl UpdateSubscription {
    pub(crate) fn attach(
        generation: u64,
        mut values: ValueStream,
        actor: WeakSender<DetailCommand>,
    ) -> Self {
        let forwarder = tokio::spawn(async move {
            while let Some(value) = values.next().await {
                // the actor is gone once the last handle is dropped
                let Some(actor) = actor.upgrade() else {
                    break;
                };
                if actor
                    .send(DetailCommand::ValueUpdated { generation, value })
                    .await
                    .is_err()
                {
                    break;
                }
            }
            trace!("notification forwarder {generation} finished");
        });
        Self {
            generation,
            forwarder,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for UpdateSubscription {
    fn drop(&mut self) {
        trace!("detaching notification forwarder {}", self.generation);
        self.forwarder.abort();
    }
}
