use std::io::{Stdout, Write};

use anyhow::anyhow;
use log::debug;

use osutils::exe::{CommandRunner, Completion, ExternalCommand};
use xnbd_api::error::{ExecutionError, ReportError, XnbdError};

use super::reporter::Reporter;

/// Runs external commands one at a time, reporting progress around each of them.
pub struct ProcessInvoker<R, W: Write = Stdout> {
    runner: R,
    reporter: Reporter<W>,
}

impl<R: CommandRunner, W: Write> ProcessInvoker<R, W> {
    pub fn new(runner: R, reporter: Reporter<W>) -> Self {
        Self { runner, reporter }
    }

    /// Runs `command` to completion, announced as `description`.
    ///
    /// Any outcome other than a zero exit status is an error: the caller is expected to abort
    /// the run.
    pub fn call(&mut self, command: &ExternalCommand, description: &str) -> Result<(), XnbdError> {
        self.reporter.begin(description);
        let completion = self.runner.run(command);
        self.reporter.finish(completion.is_success());

        match completion {
            Completion::Exited(0) => Ok(()),
            Completion::LaunchFailed(reason) => {
                debug!("Failed to launch '{command}': {reason}");
                Err(anyhow!(reason)).structured(ExecutionError::CommandNotFound {
                    command: command.render(),
                })
            }
            failed => {
                debug!("'{command}' failed: {}", failed.explain());
                Err(XnbdError::new(ExecutionError::CommandFailed {
                    command: command.render(),
                    code: failed.code(),
                }))
            }
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn reporter(&self) -> &Reporter<W> {
        &self.reporter
    }
}
