use std::{io::Write, path::Path};

use log::info;

use osutils::exe::CommandRunner;
use xnbd_api::{config::Configuration, error::XnbdError};

pub mod cli;
pub mod config;
pub mod engine;

use engine::{Action, Orchestrator, ProcessInvoker};

/// xnbd-register version as provided by environment variables at build time
pub const XNBD_REGISTER_VERSION: &str = match option_env!("XNBD_REGISTER_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Requested action completed successfully.
    Done,
    /// There was nothing to act on.
    NothingToDo,
    /// The wrapper status query ended with this non-zero exit status.
    Status(i32),
}

pub struct XnbdRegister {
    configuration: Configuration,
}

impl XnbdRegister {
    /// Loads and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, XnbdError> {
        Ok(Self::new(config::load_validated_configuration(path)?))
    }

    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }

    /// Runs `action` against the configuration, launching commands through `invoker`.
    pub fn execute<R: CommandRunner, W: Write>(
        &self,
        action: Option<Action>,
        invoker: &mut ProcessInvoker<R, W>,
    ) -> Result<ExitKind, XnbdError> {
        let result = Orchestrator::new(&self.configuration, invoker).execute(action);
        if let Ok(kind) = &result {
            info!("Finished with {kind:?}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use osutils::testutils::runner::RecordingRunner;

    use engine::Reporter;

    #[test]
    fn test_execute() {
        let register = XnbdRegister::new(
            Configuration::try_from(json!({"nbd3": {"host": "h", "port": 1}})).unwrap(),
        );

        let mut invoker = ProcessInvoker::new(RecordingRunner::new(), Reporter::new(vec![], true));
        assert_eq!(
            register.execute(Some(Action::Stop), &mut invoker).unwrap(),
            ExitKind::Done
        );
        assert_eq!(
            invoker.runner().rendered_calls(),
            vec!["xnbd-client --disconnect /dev/nbd3"]
        );
    }

    #[test]
    fn test_load_missing_file() {
        XnbdRegister::load("/nonexistent/xnbd.conf").err().unwrap();
    }
}
