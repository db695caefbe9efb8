//! `btleplug` implementation of the BLE traits.

mod central_manager;

pub use central_manager::{Central, Characteristic, Peripheral, Service};
