use std::{
    ffi::{OsStr, OsString},
    fmt::{Display, Formatter, Result as FmtResult},
    os::unix::process::ExitStatusExt,
    process::ExitStatus,
};

use log::trace;

use xnbd_api::constants::COMMAND_NOT_FOUND_CODE;

/// Exit code offset used by shells to report a process terminated by a signal.
const SIGNAL_EXIT_OFFSET: i32 = 128;

/// A command line for one of the external tools, built but not yet executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    pub fn get_program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Renders the command line the way a user would type it, quoting arguments with spaces.
    pub fn render(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!(
                "{} {}",
                self.program,
                self.args
                    .iter()
                    .map(|arg| arg.to_string_lossy())
                    .map(|arg| if arg.contains(' ') {
                        format!("'{}'", arg)
                    } else {
                        arg.into()
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        }
    }
}

impl Display for ExternalCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.render())
    }
}

/// How an external command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The process ran and exited with the given status.
    Exited(i32),

    /// The process was terminated by the given signal.
    Signaled(i32),

    /// The process could not be started at all.
    LaunchFailed(String),
}

impl Completion {
    pub fn from_status(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => Completion::Exited(code),
            (None, Some(signal)) => Completion::Signaled(signal),
            // Neither a code nor a signal can only come from a stopped process, which a
            // plain wait never reports
            (None, None) => Completion::Exited(-1),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Exited(0))
    }

    /// Numeric status in the shell's convention: the exit code, 128 + signal, or 127 when the
    /// command was not found.
    pub fn code(&self) -> i32 {
        match self {
            Completion::Exited(code) => *code,
            Completion::Signaled(signal) => SIGNAL_EXIT_OFFSET + signal,
            Completion::LaunchFailed(_) => COMMAND_NOT_FOUND_CODE,
        }
    }

    /// Produce a string explaining how the process ended.
    pub fn explain(&self) -> String {
        match self {
            Completion::Exited(code) => format!("process exited with status: {code}"),
            Completion::Signaled(signal) => {
                format!("process was terminated by signal: {signal}")
            }
            Completion::LaunchFailed(reason) => format!("failed to execute process: {reason}"),
        }
    }
}

/// Executes external commands. Implemented by [`SystemRunner`] for real processes, and by fakes
/// in tests.
pub trait CommandRunner {
    fn run(&mut self, command: &ExternalCommand) -> Completion;
}

/// Runs commands as child processes and waits for them.
///
/// Stdout is inherited and stderr is redirected into it, so the tools talk straight to the user.
/// Nothing is captured or parsed, only the exit status is kept.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ExternalCommand) -> Completion {
        let rendered_command = command.render();
        trace!("Executing '{rendered_command}'");
        let completion = match duct::cmd(command.get_program(), command.get_args())
            .stderr_to_stdout()
            .unchecked()
            .run()
        {
            Ok(output) => Completion::from_status(output.status),
            Err(e) => Completion::LaunchFailed(e.to_string()),
        };
        trace!("Executed '{rendered_command}': {}", completion.explain());
        completion
    }
}
