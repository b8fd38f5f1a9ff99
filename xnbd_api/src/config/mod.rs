use std::{collections::BTreeMap, path::PathBuf};

use serde::{de::DeserializeOwned, de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

use crate::constants::{
    DEFAULT_WRAPPER_ADDRESS, DEFAULT_WRAPPER_LOGPATH, DEFAULT_WRAPPER_PORT,
    DEFAULT_WRAPPER_SOCKET, WRAPPER_KEY,
};

mod error;
pub mod migration;
pub mod validation;
mod volumes;

pub use error::ConfigurationValidationError;
pub use volumes::{VolumeExport, VolumeExports};

/// A validated xnbd configuration: the client mounts and the optional wrapper daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Client mounts keyed by device name, e.g. `nbd0`.
    pub clients: BTreeMap<String, ClientSpec>,

    /// The multiplexing wrapper daemon, if one is configured.
    pub wrapper: Option<WrapperSpec>,
}

impl Configuration {
    /// True when the configuration file declared no object at all.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.wrapper.is_none()
    }
}

impl TryFrom<Value> for Configuration {
    type Error = ConfigurationValidationError;

    /// Validates a migrated configuration tree and converts it into the typed model.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        validation::validate(&value)?;

        let mut configuration = Configuration::default();
        if let Value::Object(objects) = value {
            for (key, object) in objects {
                if key == WRAPPER_KEY {
                    configuration.wrapper = Some(typed(&key, object)?);
                } else {
                    let client = typed(&key, object)?;
                    configuration.clients.insert(key, client);
                }
            }
        }

        Ok(configuration)
    }
}

fn typed<T: DeserializeOwned>(
    object: &str,
    value: Value,
) -> Result<T, ConfigurationValidationError> {
    serde_json::from_value(value).map_err(|e| ConfigurationValidationError::SchemaType {
        object: object.into(),
        details: e.to_string(),
    })
}

/// One NBD client connection, bound to the block device named by its key.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientSpec {
    /// Host of the NBD server.
    pub host: String,

    /// Port of the NBD server.
    #[serde(deserialize_with = "port_number")]
    pub port: u16,

    /// Export to attach to. When absent, the server's default export is used.
    #[serde(default)]
    pub name: Option<String>,
}

/// The xnbd-wrapper daemon and the volumes it serves.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WrapperSpec {
    /// Address to listen on.
    #[serde(default = "default_address")]
    pub address: String,

    /// Port to listen on.
    #[serde(default = "default_port", deserialize_with = "port_number")]
    pub port: u16,

    /// Log file of the daemon.
    #[serde(default = "default_logpath")]
    pub logpath: PathBuf,

    /// Control socket used to administer the running daemon.
    #[serde(default = "default_socket")]
    pub socket: PathBuf,

    /// Maximum buffer size. Zero or negative values leave the daemon's default in place.
    #[serde(default, deserialize_with = "positive_size")]
    pub max_buf_size: Option<u64>,

    /// Maximum queue size. Zero or negative values leave the daemon's default in place.
    #[serde(default, deserialize_with = "positive_size")]
    pub max_queue_size: Option<u64>,

    /// Volumes to register once the daemon is running.
    #[serde(default)]
    pub volumes: VolumeExports,
}

impl Default for WrapperSpec {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            logpath: default_logpath(),
            socket: default_socket(),
            max_buf_size: None,
            max_queue_size: None,
            volumes: VolumeExports::default(),
        }
    }
}

fn default_address() -> String {
    DEFAULT_WRAPPER_ADDRESS.into()
}

fn default_port() -> u16 {
    DEFAULT_WRAPPER_PORT
}

fn default_logpath() -> PathBuf {
    DEFAULT_WRAPPER_LOGPATH.into()
}

fn default_socket() -> PathBuf {
    DEFAULT_WRAPPER_SOCKET.into()
}

/// Integers may be written as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Number(i64),
    Text(String),
}

impl Integer {
    fn value<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Integer::Number(n) => Ok(n),
            Integer::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("'{s}' is not an integer"))),
        }
    }
}

fn port_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let port = Integer::deserialize(deserializer)?.value::<D::Error>()?;
    u16::try_from(port).map_err(|_| D::Error::custom(format!("port {port} is out of range")))
}

fn positive_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let size = Integer::deserialize(deserializer)?.value::<D::Error>()?;
    Ok(u64::try_from(size).ok().filter(|&size| size > 0))
}
