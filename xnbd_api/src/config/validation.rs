use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::constants::{
    CLIENT_HOST_KEY, CLIENT_PORT_KEY, DEVICE_NAME_PATTERN, DEVICE_PREFIX, WRAPPER_KEY,
    WRAPPER_OPTIONS,
};

use super::ConfigurationValidationError;

lazy_static! {
    static ref DEVICE_NAME: Regex = Regex::new(DEVICE_NAME_PATTERN).unwrap();
}

/// Checks the shape of a migrated configuration tree.
///
/// The root must map `wrapper` and `nbdX` keys to objects. Keys are checked in order and the
/// first offending key is reported.
pub fn validate(configuration: &Value) -> Result<(), ConfigurationValidationError> {
    let objects = configuration
        .as_object()
        .ok_or_else(|| ConfigurationValidationError::SchemaType {
            object: "<root>".into(),
            details: "expected a mapping of nbdX and/or wrapper objects".into(),
        })?;

    for (key, value) in objects {
        if key == WRAPPER_KEY {
            validate_wrapper(value)?;
        } else if key.starts_with(DEVICE_PREFIX) {
            validate_client(key, value)?;
        } else {
            return Err(ConfigurationValidationError::UnknownConfigObject { key: key.clone() });
        }
    }

    Ok(())
}

fn as_mapping<'a>(
    object: &str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, ConfigurationValidationError> {
    value
        .as_object()
        .ok_or_else(|| ConfigurationValidationError::SchemaType {
            object: object.into(),
            details: format!("expected a mapping, found {value}"),
        })
}

fn validate_wrapper(value: &Value) -> Result<(), ConfigurationValidationError> {
    let options = as_mapping(WRAPPER_KEY, value)?;

    let unknown: Vec<String> = options
        .keys()
        .filter(|option| !WRAPPER_OPTIONS.contains(&option.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ConfigurationValidationError::UnknownOption { options: unknown });
    }

    Ok(())
}

fn validate_client(device: &str, value: &Value) -> Result<(), ConfigurationValidationError> {
    if !DEVICE_NAME.is_match(device) {
        return Err(ConfigurationValidationError::InvalidDeviceName {
            name: device.into(),
        });
    }

    let options = as_mapping(device, value)?;
    if !options.contains_key(CLIENT_HOST_KEY) || !options.contains_key(CLIENT_PORT_KEY) {
        return Err(ConfigurationValidationError::IncompleteClientSpec {
            device: device.into(),
        });
    }

    Ok(())
}
