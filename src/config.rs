//! Well-known identifiers and tunables for the detail screen.
//!
//! Everything has a compiled-in default; `DetailConfig::from_env` lets a
//! bench setup point the screen at a different device profile.

use std::env;
use std::time::Duration;

use uuid::{Uuid, uuid};

use crate::api::central::{NavigationParams, PeripheralId};
use crate::api::characteristic::CharacteristicWriteType;
use crate::{Error, Result};

/// Hub service the screen is opened on.
pub const HUB_SERVICE_UUID: Uuid = uuid!("3e520001-1368-b682-4440-d7dd234c45bc");
/// Characteristic commands are written to.
pub const HUB_WRITE_CHARACTERISTIC_UUID: Uuid = uuid!("3e520002-1368-b682-4440-d7dd234c45bc");
/// Characteristic the hub notifies on.
pub const HUB_NOTIFY_CHARACTERISTIC_UUID: Uuid = uuid!("3e520003-1368-b682-4440-d7dd234c45bc");

/// Calibration frame offered as the prompt placeholder.
pub const SAMPLE_PAYLOAD: &str =
    "00 23 00 02 10 00 00 01 10 00 00 00 00 00 00 00 00 00 00 00 00 00 00 01 00 00 00 78 2D";

/// Depth of the actor's command queue.
pub const COMMAND_QUEUE_DEPTH: usize = 256;

const ENV_SERVICE_UUID: &str = "CHARDETAIL_SERVICE_UUID";
const ENV_WRITE_UUID: &str = "CHARDETAIL_WRITE_UUID";
const ENV_NOTIFY_UUID: &str = "CHARDETAIL_NOTIFY_UUID";
const ENV_SAMPLE_PAYLOAD: &str = "CHARDETAIL_SAMPLE_PAYLOAD";
const ENV_WRITE_SOURCE: &str = "CHARDETAIL_WRITE_SOURCE";
const ENV_TIMEOUT_MS: &str = "CHARDETAIL_TIMEOUT_MS";

/// Where the bytes of a write come from.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum WriteSource {
    /// The prompt is shown but the sample payload is sent.
    #[default]
    SamplePayload,
    /// The text typed into the prompt is parsed and sent.
    UserInput,
}

#[derive(Debug, Clone)]
pub struct DetailConfig {
    /// Service opened by [`DetailConfig::navigation_params`]. `prepare` always
    /// uses the service named in its params.
    pub service_uuid: Uuid,
    pub write_characteristic_uuid: Uuid,
    pub notify_characteristic_uuid: Uuid,
    pub sample_payload: String,
    pub write_source: WriteSource,
    pub write_type: CharacteristicWriteType,
    /// Upper bound for each BLE call. `None` waits forever.
    pub operation_timeout: Option<Duration>,
    pub command_queue_depth: usize,
}

impl Default for DetailConfig {
    fn default() -> Self {
        DetailConfig {
            service_uuid: HUB_SERVICE_UUID,
            write_characteristic_uuid: HUB_WRITE_CHARACTERISTIC_UUID,
            notify_characteristic_uuid: HUB_NOTIFY_CHARACTERISTIC_UUID,
            sample_payload: SAMPLE_PAYLOAD.to_string(),
            write_source: WriteSource::SamplePayload,
            write_type: CharacteristicWriteType::WriteWithResponse,
            operation_timeout: None,
            command_queue_depth: COMMAND_QUEUE_DEPTH,
        }
    }
}

impl DetailConfig {
    /// Defaults overridden by any `CHARDETAIL_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Params for opening the configured service on `peripheral`.
    pub fn navigation_params(&self, peripheral: PeripheralId) -> NavigationParams {
        NavigationParams {
            peripheral,
            service: self.service_uuid,
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = DetailConfig::default();

        if let Some(value) = lookup(ENV_SERVICE_UUID) {
            config.service_uuid = parse_uuid(ENV_SERVICE_UUID, &value)?;
        }
        if let Some(value) = lookup(ENV_WRITE_UUID) {
            config.write_characteristic_uuid = parse_uuid(ENV_WRITE_UUID, &value)?;
        }
        if let Some(value) = lookup(ENV_NOTIFY_UUID) {
            config.notify_characteristic_uuid = parse_uuid(ENV_NOTIFY_UUID, &value)?;
        }
        if let Some(value) = lookup(ENV_SAMPLE_PAYLOAD) {
            crate::hex::parse_hex_bytes(&value)
                .map_err(|e| Error::Config(format!("{ENV_SAMPLE_PAYLOAD}: {e}")))?;
            config.sample_payload = value;
        }
        if let Some(value) = lookup(ENV_WRITE_SOURCE) {
            config.write_source = match value.trim() {
                "sample" => WriteSource::SamplePayload,
                "input" => WriteSource::UserInput,
                other => {
                    return Err(Error::Config(format!(
                        "{ENV_WRITE_SOURCE}: expected 'sample' or 'input', got '{other}'"
                    )));
                }
            };
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = value.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_TIMEOUT_MS}: '{value}' is not a number"))
            })?;
            config.operation_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }
}

fn parse_uuid(key: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|e| Error::Config(format!("{key}: {e}")))
}
