use std::io::Write;

use log::{debug, info, warn};
use strum_macros::{Display, IntoStaticStr};

use osutils::{
    exe::CommandRunner,
    xnbd_client::{self, device_path},
    xnbd_wrapper, xnbd_wrapper_ctl,
};
use xnbd_api::{
    config::{Configuration, WrapperSpec},
    constants::XNBD_WRAPPER,
    error::{ErrorKind, ExecutionError, InvalidInputError, XnbdError, XnbdResultExt},
};

use crate::ExitKind;

mod invoker;
mod reporter;

pub use invoker::ProcessInvoker;
pub use reporter::Reporter;

/// What to do with the configured devices and wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    /// Start the wrapper and its volumes, then connect the clients.
    Start,
    /// Disconnect the clients, then shut the wrapper down.
    Stop,
    /// Stop, then start.
    Restart,
    /// Show the wrapper status.
    Status,
}

/// Sequences the external commands implementing an [`Action`] for a validated configuration.
///
/// Clients always release their devices before the wrapper goes away, and the wrapper is
/// running with its volumes registered before any client connects: a client may be reading
/// from our own wrapper.
pub struct Orchestrator<'a, R, W: Write> {
    configuration: &'a Configuration,
    invoker: &'a mut ProcessInvoker<R, W>,
}

impl<'a, R: CommandRunner, W: Write> Orchestrator<'a, R, W> {
    pub fn new(configuration: &'a Configuration, invoker: &'a mut ProcessInvoker<R, W>) -> Self {
        Self {
            configuration,
            invoker,
        }
    }

    /// Carries out `action`. The first failing command aborts the run.
    pub fn execute(&mut self, action: Option<Action>) -> Result<ExitKind, XnbdError> {
        if self.configuration.is_empty() {
            warn!("Not starting anything");
            return Ok(ExitKind::NothingToDo);
        }

        let Some(action) = action else {
            return Err(XnbdError::new(InvalidInputError::NoActionSpecified));
        };

        info!("Executing action '{action}'");
        match action {
            Action::Status => return self.status(),
            Action::Stop => self.stop(),
            Action::Start => self.start(),
            Action::Restart => self.stop().and_then(|()| self.start()),
        }
        .message(format!("Failed to execute action '{action}'"))?;

        Ok(ExitKind::Done)
    }

    fn status(&mut self) -> Result<ExitKind, XnbdError> {
        let Some(wrapper) = &self.configuration.wrapper else {
            warn!("Wrapper socket unknown (since no wrapper is configured)");
            return Ok(ExitKind::NothingToDo);
        };

        // The exit status of the query is passed on as is
        match self.invoker.call(&xnbd_wrapper_ctl::list(&wrapper.socket), "") {
            Ok(()) => Ok(ExitKind::Done),
            Err(e) => match e.kind() {
                ErrorKind::Execution(ExecutionError::CommandFailed { code, .. }) => {
                    warn!("Wrapper status query failed: {}", e.kind());
                    Ok(ExitKind::Status(*code))
                }
                _ => Err(e).message("Failed to query wrapper status"),
            },
        }
    }

    fn stop(&mut self) -> Result<(), XnbdError> {
        let configuration = self.configuration;

        // Stop clients first, they may be using our own wrapper
        for device in configuration.clients.keys() {
            self.invoker.call(
                &xnbd_client::disconnect(device),
                &format!("Stopping {} ... ", device_path(device).display()),
            )?;
        }

        if let Some(wrapper) = &configuration.wrapper {
            self.invoker.call(
                &xnbd_wrapper_ctl::shutdown(&wrapper.socket),
                "Shutting down all xnbd shares ... ",
            )?;
        }

        Ok(())
    }

    fn start(&mut self) -> Result<(), XnbdError> {
        let configuration = self.configuration;

        // Start the wrapper first, our own clients may be using it
        if let Some(wrapper) = &configuration.wrapper {
            self.start_wrapper(wrapper)?;
        }

        for (device, client) in &configuration.clients {
            self.invoker.call(
                &xnbd_client::connect(device, client),
                &format!("Starting {} ... ", device_path(device).display()),
            )?;
        }

        Ok(())
    }

    fn start_wrapper(&mut self, wrapper: &WrapperSpec) -> Result<(), XnbdError> {
        self.invoker.call(
            &xnbd_wrapper::start(wrapper),
            &format!("Starting '{XNBD_WRAPPER}' ... "),
        )?;

        for export in &wrapper.volumes {
            if !export.path.exists() {
                warn!("{}: Can't access volume", export.path.display());
                continue;
            }

            debug!(
                "Registering '{}' as export '{}'",
                export.path.display(),
                export.name
            );
            self.invoker.call(
                &xnbd_wrapper_ctl::add_target(&wrapper.socket, export),
                &format!("Adding '{}' ... ", export.path.display()),
            )?;
        }

        Ok(())
    }
}
