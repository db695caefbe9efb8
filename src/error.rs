use std::fmt;

use uuid::Uuid;

use crate::api::central::PeripheralId;

/// Errors surfaced by the view-model and the BLE adapters behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No connected peripheral matches the navigation parameters.
    PeripheralNotFound(PeripheralId),
    /// The peripheral does not expose the requested service.
    ServiceNotFound(Uuid),
    /// The service does not expose the requested characteristic.
    CharacteristicNotFound(Uuid),
    /// An operation needed a characteristic that `prepare` never resolved.
    NotPrepared,
    /// The peripheral disconnected underneath the operation.
    NotConnected,
    /// A token in a hex payload was not a two digit hex number.
    InvalidHexToken(String),
    /// A BLE call exceeded the configured operation timeout.
    Timeout,
    /// Failure reported by the BLE library.
    Ble(String),
    /// The actor task is gone, so the view-model can no longer be driven.
    ViewModelClosed,
    /// An environment override could not be parsed.
    Config(String),
    Other(String),
}

impl Error {
    pub fn from_string(message: String) -> Self {
        Error::Other(message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PeripheralNotFound(id) => write!(f, "Peripheral {id} not found"),
            Error::ServiceNotFound(uuid) => write!(f, "Service {uuid} not found"),
            Error::CharacteristicNotFound(uuid) => {
                write!(f, "Characteristic {uuid} not found")
            }
            Error::NotPrepared => write!(f, "Characteristic not resolved"),
            Error::NotConnected => write!(f, "Device disconnected"),
            Error::InvalidHexToken(token) => write!(f, "Invalid hex byte '{token}'"),
            Error::Timeout => write!(f, "Operation timed out"),
            Error::Ble(message) => write!(f, "{message}"),
            Error::ViewModelClosed => write!(f, "View model is closed"),
            Error::Config(message) => write!(f, "Invalid configuration: {message}"),
            Error::Other(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(feature = "btleplug")]
impl From<::btleplug::Error> for Error {
    fn from(error: ::btleplug::Error) -> Self {
        match error {
            ::btleplug::Error::NotConnected => Error::NotConnected,
            ::btleplug::Error::TimedOut(_) => Error::Timeout,
            other => Error::Ble(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
