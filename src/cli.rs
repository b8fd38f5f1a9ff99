use std::{path::PathBuf, process::ExitCode};

use clap::{ArgGroup, Parser};
use log::LevelFilter;

use xnbd_api::constants::DEFAULT_CONFIG_PATH;

use crate::{engine::Action, ExitKind, XNBD_REGISTER_VERSION};

/// Standard exit codes used by xnbd-register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XnbdExitCodes {
    /// The requested action completed successfully.
    Success = 0,

    /// The configuration, the command line or one of the external tools failed.
    Failed = 1,

    /// Nothing was done: the configuration is empty, or the status of an unconfigured wrapper
    /// was requested.
    NothingToDo = 2,
}

impl XnbdExitCodes {
    /// Exit status of a run that completed. A failed status query keeps the status of
    /// `xnbd-wrapper-ctl`, as long as it fits an exit status.
    pub fn exit_status(kind: ExitKind) -> u8 {
        match kind {
            ExitKind::Done => Self::Success as u8,
            ExitKind::NothingToDo => Self::NothingToDo as u8,
            ExitKind::Status(code) => u8::try_from(code)
                .ok()
                .filter(|&code| code != 0)
                .unwrap_or(Self::Failed as u8),
        }
    }
}

impl From<XnbdExitCodes> for ExitCode {
    fn from(code: XnbdExitCodes) -> Self {
        Self::from(code as u8)
    }
}

/// xNBD helper to (un)register xNBD devices
#[derive(Parser, Debug)]
#[clap(version = XNBD_REGISTER_VERSION)]
#[clap(group(
    ArgGroup::new("action")
        .args(["start", "restart", "stop", "status"])
        .multiple(false)
))]
pub struct Cli {
    /// Mount configured xNBD client connections and start configured xNBD wrapper
    #[arg(short, long)]
    pub start: bool,

    /// (Re-)mount configured xNBD client connections and (re-)start configured xNBD wrapper
    #[arg(short, long)]
    pub restart: bool,

    /// Unmount configured xNBD client connections and stop configured xNBD wrapper
    #[arg(short = 't', long)]
    pub stop: bool,

    /// Show xNBD wrapper status
    #[arg(short = 'a', long)]
    pub status: bool,

    /// Config file to use
    #[arg(long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Do not give verbose output; only fatal errors are reported
    #[arg(long)]
    pub quiet: bool,

    /// Logging verbosity [OFF, ERROR, WARN, INFO, DEBUG, TRACE]
    #[arg(short, long, default_value_t = LevelFilter::Warn)]
    pub verbosity: LevelFilter,

    /// Path to save an eventual fatal error
    #[arg(short, long)]
    pub error: Option<PathBuf>,
}

impl Cli {
    /// The action selected on the command line, if any.
    pub fn action(&self) -> Option<Action> {
        [
            (self.start, Action::Start),
            (self.restart, Action::Restart),
            (self.stop, Action::Stop),
            (self.status, Action::Status),
        ]
        .into_iter()
        .find_map(|(selected, action)| selected.then_some(action))
    }

    /// Effective log level. Quiet mode keeps errors only.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            self.verbosity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::{error::ErrorKind, CommandFactory};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_actions() {
        let cli = Cli::try_parse_from(["xnbd-register", "--start"]).unwrap();
        assert_eq!(cli.action(), Some(Action::Start));
        assert_eq!(cli.config, PathBuf::from("/etc/xnbd.conf"));

        let cli = Cli::try_parse_from(["xnbd-register", "-r"]).unwrap();
        assert_eq!(cli.action(), Some(Action::Restart));

        let cli = Cli::try_parse_from(["xnbd-register", "-t", "--config", "/tmp/x.conf"]).unwrap();
        assert_eq!(cli.action(), Some(Action::Stop));
        assert_eq!(cli.config, PathBuf::from("/tmp/x.conf"));

        let cli = Cli::try_parse_from(["xnbd-register", "--status"]).unwrap();
        assert_eq!(cli.action(), Some(Action::Status));

        let cli = Cli::try_parse_from(["xnbd-register"]).unwrap();
        assert_eq!(cli.action(), None);
    }

    #[test]
    fn test_parse_conflicting_actions() {
        let error = Cli::try_parse_from(["xnbd-register", "--start", "--stop"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["xnbd-register", "-s"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Warn);

        let cli = Cli::try_parse_from(["xnbd-register", "-s", "-v", "debug"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Debug);

        let cli = Cli::try_parse_from(["xnbd-register", "-s", "-v", "debug", "--quiet"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Error);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(XnbdExitCodes::Success as u8, 0);
        assert_eq!(XnbdExitCodes::Failed as u8, 1);
        assert_eq!(XnbdExitCodes::NothingToDo as u8, 2);
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(XnbdExitCodes::exit_status(ExitKind::Done), 0);
        assert_eq!(XnbdExitCodes::exit_status(ExitKind::NothingToDo), 2);
        assert_eq!(XnbdExitCodes::exit_status(ExitKind::Status(3)), 3);
        assert_eq!(XnbdExitCodes::exit_status(ExitKind::Status(143)), 143);
        assert_eq!(XnbdExitCodes::exit_status(ExitKind::Status(-1)), 1);
        assert_eq!(XnbdExitCodes::exit_status(ExitKind::Status(300)), 1);
    }
}
