use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use serde_json::Value;

use xnbd_api::{
    config::{migration, Configuration},
    constants::COMMENT_CHARACTER,
    error::{InvalidInputError, ReportError, XnbdError, XnbdResultExt},
};

/// Removes comments from configuration text: on every line, everything from the first `#` on.
///
/// There is no quoting awareness, a `#` inside a JSON string also starts a comment. Existing
/// configuration files rely on this, so it is kept as is. Line breaks are preserved, parser
/// diagnostics keep pointing at the right line.
pub fn strip_comments(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            line.split_once(COMMENT_CHARACTER)
                .map_or(line, |(content, _comment)| content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads a configuration file and parses it, comments excluded, into a raw JSON tree.
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Value, XnbdError> {
    let path = path.as_ref();
    debug!("Reading configuration file '{}'", path.display());

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
        .structured(InvalidInputError::LoadConfiguration {
            path: path.display().to_string(),
        })?;

    serde_json::from_str(&strip_comments(&contents)).structured(
        InvalidInputError::ParseConfiguration {
            path: path.display().to_string(),
        },
    )
}

/// Loads, migrates and validates a configuration file.
///
/// Fails before anything is executed if the file is unusable in any way.
pub fn load_validated_configuration(path: impl AsRef<Path>) -> Result<Configuration, XnbdError> {
    let path = path.as_ref();
    let mut raw = load_configuration(path)?;

    migration::migrate(&mut raw, path)?;

    let configuration = Configuration::try_from(raw)
        .map_err(|e| XnbdError::new(InvalidInputError::InvalidConfiguration(e)))
        .message(format!(
            "Invalid syntax in configuration file '{}'",
            path.display()
        ))?;

    info!(
        "Loaded configuration '{}': {} client device(s), wrapper {}",
        path.display(),
        configuration.clients.len(),
        if configuration.wrapper.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    Ok(configuration)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use indoc::indoc;
    use tempfile::NamedTempFile;

    use xnbd_api::{
        config::ConfigurationValidationError,
        error::{ErrorKind, InvalidInputError},
    };

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments(""), "");
        assert_eq!(strip_comments("{}"), "{}");
        assert_eq!(strip_comments("# comment only\n{}\n"), "\n{}\n");
        assert_eq!(
            strip_comments("{\"a\": 1} # trailing\r\n# whole line\n"),
            "{\"a\": 1} \n\n"
        );
        assert_eq!(strip_comments("a ## b # c\nd"), "a \nd");
    }

    #[test]
    fn test_strip_comments_inside_strings() {
        // Not quote aware: the value is cut short and the document becomes invalid
        let stripped = strip_comments("{\"name\": \"disk#1\"}");
        assert_eq!(stripped, "{\"name\": \"disk");
        serde_json::from_str::<Value>(&stripped).unwrap_err();
    }

    #[test]
    fn test_load_configuration() {
        let file = config_file(indoc! {r#"
            # xnbd-register configuration
            {
                "nbd0": {"host": "10.0.0.5", "port": 9000}, # first client
                # "nbd1": {"host": "10.0.0.6", "port": 9000},
                "wrapper": {"socket": "/tmp/s", "volumes": ["/data/a"]}
            }
        "#});

        let value = load_configuration(file.path()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "nbd0": {"host": "10.0.0.5", "port": 9000},
                "wrapper": {"socket": "/tmp/s", "volumes": ["/data/a"]},
            })
        );
    }

    #[test]
    fn test_load_configuration_unreadable() {
        let error = load_configuration("/nonexistent/xnbd.conf").unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidInput(InvalidInputError::LoadConfiguration {
                path: "/nonexistent/xnbd.conf".into()
            })
        );
    }

    #[test]
    fn test_load_configuration_malformed() {
        for contents in ["", "{", "{\"nbd0\": {\"host\": \"h\", \"port\": 1},}", "nbd0"] {
            let file = config_file(contents);
            let error = load_configuration(file.path()).unwrap_err();
            assert_eq!(
                error.kind(),
                &ErrorKind::InvalidInput(InvalidInputError::ParseConfiguration {
                    path: file.path().display().to_string()
                }),
                "Unexpected error for {contents:?}"
            );
        }
    }

    #[test]
    fn test_load_validated_configuration() {
        let file = config_file(indoc! {r#"
            {
                "server": {"socket": "/tmp/s", "volumes": {"a": "/data/a"}},
                "nbd0": {"host": "10.0.0.5", "port": 9000}
            }
        "#});

        let configuration = load_validated_configuration(file.path()).unwrap();
        assert_eq!(configuration.clients.len(), 1);
        assert_eq!(
            configuration.wrapper.unwrap().socket,
            std::path::PathBuf::from("/tmp/s")
        );
    }

    #[test]
    fn test_load_validated_configuration_errors() {
        let file = config_file(r#"{"server": {}, "wrapper": {}}"#);
        let error = load_validated_configuration(file.path()).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::InvalidInput(InvalidInputError::ConflictingWrapperKeys { .. })
        ));

        let file = config_file(r#"{"nbd0": {"host": "h"}}"#);
        let error = load_validated_configuration(file.path()).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidInput(InvalidInputError::InvalidConfiguration(
                ConfigurationValidationError::IncompleteClientSpec {
                    device: "nbd0".into()
                }
            ))
        );
        assert!(format!("{error:?}").contains("Invalid syntax in configuration file"));

        let file = config_file(r#"{"disk0": {}}"#);
        let error = load_validated_configuration(file.path()).unwrap_err();
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidInput(InvalidInputError::InvalidConfiguration(
                ConfigurationValidationError::UnknownConfigObject {
                    key: "disk0".into()
                }
            ))
        );
    }
}
