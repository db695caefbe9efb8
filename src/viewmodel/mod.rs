mod characteristic_detail;
pub(crate) mod detail_actor;
pub mod message_log;
pub mod state;
pub mod subscription;

pub use characteristic_detail::CharacteristicDetail;
pub use message_log::MessageLog;
pub use state::{DetailState, START_UPDATES_LABEL, STOP_UPDATES_LABEL, StateChange};
pub use subscription::UpdateSubscription;
