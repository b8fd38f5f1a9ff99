use std::path::Path;

use log::{debug, warn};
use serde_json::Value;

use crate::{
    constants::{LEGACY_WRAPPER_KEY, WRAPPER_KEY},
    error::{InvalidInputError, XnbdError},
};

/// Rewrites deprecated top-level keys of a freshly parsed configuration to their current names.
///
/// The legacy `server` object is renamed to `wrapper`. A configuration carrying both is
/// ambiguous and rejected, nothing is merged. `source` only serves diagnostics.
///
/// A root that is not a mapping is left untouched, validation rejects it later.
pub fn migrate(configuration: &mut Value, source: impl AsRef<Path>) -> Result<(), XnbdError> {
    let Value::Object(objects) = configuration else {
        return Ok(());
    };

    match (
        objects.contains_key(LEGACY_WRAPPER_KEY),
        objects.contains_key(WRAPPER_KEY),
    ) {
        (true, true) => {
            return Err(XnbdError::new(InvalidInputError::ConflictingWrapperKeys {
                path: source.as_ref().display().to_string(),
                legacy: LEGACY_WRAPPER_KEY.into(),
                current: WRAPPER_KEY.into(),
            }));
        }
        (true, false) => {
            warn!(
                "Warning for config file '{}': use of key '{LEGACY_WRAPPER_KEY}' is deprecated, \
                please rename to '{WRAPPER_KEY}'",
                source.as_ref().display()
            );
            if let Some(wrapper) = objects.remove(LEGACY_WRAPPER_KEY) {
                objects.insert(WRAPPER_KEY.into(), wrapper);
            }
        }
        (false, _) => debug!("No deprecated keys found"),
    }

    Ok(())
}
