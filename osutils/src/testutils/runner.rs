use std::collections::HashMap;

use crate::exe::{CommandRunner, Completion, ExternalCommand};

/// A runner that records every command instead of executing it.
///
/// Commands succeed unless an outcome was scripted for their rendered command line.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Vec<ExternalCommand>,
    outcomes: HashMap<String, Completion>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the command rendering as `command` end with `completion`.
    pub fn with_outcome(mut self, command: impl Into<String>, completion: Completion) -> Self {
        self.outcomes.insert(command.into(), completion);
        self
    }

    pub fn calls(&self) -> &[ExternalCommand] {
        &self.calls
    }

    /// Recorded command lines, in execution order.
    pub fn rendered_calls(&self) -> Vec<String> {
        self.calls.iter().map(ExternalCommand::render).collect()
    }

    /// Position of the first recorded command line equal to `command`.
    pub fn position(&self, command: &str) -> Option<usize> {
        self.calls.iter().position(|call| call.render() == command)
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &ExternalCommand) -> Completion {
        self.calls.push(command.clone());
        self.outcomes
            .get(&command.render())
            .cloned()
            .unwrap_or(Completion::Exited(0))
    }
}
