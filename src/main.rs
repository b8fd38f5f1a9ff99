use std::{path::Path, process::ExitCode};

use anyhow::{Context, Error};
use clap::Parser;
use log::{error, info};

use osutils::exe::SystemRunner;
use xnbd_api::error::{InternalError, ReportError, XnbdError};
use xnbd_register::{
    cli::{Cli, XnbdExitCodes},
    engine::{ProcessInvoker, Reporter},
    ExitKind, XnbdRegister,
};

fn run_xnbd_register(args: &Cli) -> Result<ExitKind, XnbdError> {
    // Log version ASAP
    info!("xnbd-register version: {}", xnbd_register::XNBD_REGISTER_VERSION);

    // The whole configuration is checked before anything gets executed
    let register = XnbdRegister::load(&args.config)?;

    let mut invoker = ProcessInvoker::new(SystemRunner, Reporter::stdout(args.quiet));
    register.execute(args.action(), &mut invoker)
}

fn setup_logging(args: &Cli) -> Result<(), Error> {
    env_logger::builder()
        .format_timestamp(None)
        .filter_level(args.log_level())
        .try_init()
        .context("Logger already registered")
}

/// Persists `e` as YAML at `path`.
fn write_error(path: &Path, e: &XnbdError) -> Result<(), XnbdError> {
    serde_yaml::to_string(e)
        .context("Failed to serialize error")
        .and_then(|report| std::fs::write(path, report).context("Failed to write error to file"))
        .structured(InternalError::WriteErrorReport {
            path: path.display().to_string(),
        })
}

fn main() -> ExitCode {
    // Parse args. Usage errors must not collide with the "nothing to do" exit code.
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                XnbdExitCodes::Failed.into()
            } else {
                XnbdExitCodes::Success.into()
            };
        }
    };

    // Initialize the logger
    if let Err(e) = setup_logging(&args) {
        eprintln!("Failed to initialize logging: {e:?}");
        return XnbdExitCodes::Failed.into();
    }

    match run_xnbd_register(&args) {
        Ok(kind) => ExitCode::from(XnbdExitCodes::exit_status(kind)),
        Err(e) => {
            error!("xnbd-register failed: {e:?}");
            if let Some(path) = &args.error {
                if let Err(e2) = write_error(path, &e) {
                    error!("{e2:?}");
                }
            }
            XnbdExitCodes::Failed.into()
        }
    }
}
