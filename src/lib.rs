//! View-model binding one screen to a pair of BLE characteristics.
//!
//! The BLE transport is supplied by the caller through the traits in [`api`];
//! [`viewmodel::CharacteristicDetail`] owns the observable screen state and
//! serializes every mutation through a single actor task.

pub mod api;
pub mod config;
pub mod error;
pub mod hex;
pub mod logging;
pub mod viewmodel;

#[cfg(feature = "btleplug")]
pub mod platform;


pub use error::{Error, Result};
