//! Handles all user-facing output for the CLI.
//!
//! Results in primary mode go to stdout as-is. Results in diagnostic mode,
//! help text and warnings go to stderr in bold red so they stand apart from
//! piped data.

// ============================================================================
// OUTPUT SINKS: OutputBuffer and ConsoleSink implementations
// ============================================================================

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::engine::{OutputSink, Severity};

/// OutputBuffer: collects output lines for testing or programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub lines: Vec<(Severity, String)>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.lines
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn output(&self) -> Vec<String> {
        self.with_severity(Severity::Output)
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.with_severity(Severity::Diagnostic)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.with_severity(Severity::Warning)
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, severity: Severity, text: &str) {
        self.lines.push((severity, text.to_string()));
    }
}

/// ConsoleSink: writes to the process's stdout and stderr.
pub struct ConsoleSink {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl ConsoleSink {
    pub fn new() -> Self {
        let stderr_choice = if atty::is(atty::Stream::Stderr) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(ColorChoice::Never),
            stderr: StandardStream::stderr(stderr_choice),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ConsoleSink {
    fn emit(&mut self, severity: Severity, text: &str) {
        match severity {
            Severity::Output => {
                let _ = writeln!(self.stdout, "{text}");
                let _ = self.stdout.flush();
            }
            Severity::Diagnostic | Severity::Warning => {
                let _ = self
                    .stderr
                    .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
                let _ = write!(self.stderr, "{text}");
                let _ = self.stderr.reset();
                let _ = writeln!(self.stderr);
            }
        }
    }
}
