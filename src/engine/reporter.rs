use std::io::{Stdout, Write};

use log::debug;

/// Progress output shown to the user around every external command, e.g.
/// `Starting /dev/nbd0 ... ok`.
///
/// In quiet mode nothing is written.
pub struct Reporter<W: Write = Stdout> {
    out: W,
    quiet: bool,
}

impl Reporter<Stdout> {
    pub fn stdout(quiet: bool) -> Self {
        Self::new(std::io::stdout(), quiet)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self { out, quiet }
    }

    /// Announces a step. The line is left open for the outcome, and flushed so it shows up
    /// before anything the command itself prints.
    pub fn begin(&mut self, description: &str) {
        if self.quiet {
            return;
        }

        if let Err(e) = write!(self.out, "{description}").and_then(|()| self.out.flush()) {
            debug!("Failed to write progress: {e}");
        }
    }

    /// Completes the line opened by [`Reporter::begin`].
    pub fn finish(&mut self, success: bool) {
        if self.quiet {
            return;
        }

        if let Err(e) = writeln!(self.out, "{}", if success { "ok" } else { "failed" }) {
            debug!("Failed to write progress: {e}");
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.begin("Starting /dev/nbd0 ... ");
        reporter.finish(true);
        reporter.begin("Stopping /dev/nbd1 ... ");
        reporter.finish(false);

        assert_eq!(
            String::from_utf8(reporter.get_ref().clone()).unwrap(),
            "Starting /dev/nbd0 ... ok\nStopping /dev/nbd1 ... failed\n"
        );
    }

    #[test]
    fn test_reporter_quiet() {
        let mut reporter = Reporter::new(Vec::new(), true);
        reporter.begin("Starting /dev/nbd0 ... ");
        reporter.finish(false);

        assert!(reporter.get_ref().is_empty());
    }
}
