//! Validation errors for the xnbd configuration.

use serde::{Deserialize, Serialize};

/// Identifies errors detected during static validation of the configuration, i.e. errors that
/// can be detected without starting or stopping anything.
#[derive(thiserror::Error, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigurationValidationError {
    #[error("Incomplete NBD configuration, was expecting 'host' and 'port' for NBD device '{device}'")]
    IncompleteClientSpec { device: String },

    #[error("Invalid NBD device: '{name}'")]
    InvalidDeviceName { name: String },

    #[error("Invalid object '{object}': {details}")]
    SchemaType { object: String, details: String },

    #[error("Unknown configuration object: '{key}'")]
    UnknownConfigObject { key: String },

    #[error("Unknown wrapper option(s): {}", .options.join(", "))]
    UnknownOption { options: Vec<String> },
}
