//! Defines the command-line arguments for stdinext.
//!
//! Only an exact `--help` or `-h` as the first argument is an option. Every
//! other argument, `--` and hyphenated ones included, is a line for the
//! engine, so the raw argument vector is read directly. clap describes the
//! interface and renders the help text.

use std::ffi::OsStr;

use clap::{CommandFactory, Parser};

use crate::macros::builtins;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "stdinext",
    about = "Allow you to pipe in from stdin \"and then\" read from keyboard. A simple script engine is also included"
)]
pub struct StdinextArgs {
    /// Lines evaluated before stdin is read, one per argument.
    #[arg(value_name = "LINE", trailing_var_arg = true, allow_hyphen_values = true)]
    pub lines: Vec<String>,
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Invocation {
    Help,
    Run(StdinextArgs),
}

impl StdinextArgs {
    /// Reads a raw argument vector, program name first.
    pub fn from_raw<I, S>(raw: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let lines: Vec<String> = raw
            .into_iter()
            .skip(1)
            .map(|arg| arg.as_ref().to_string_lossy().into_owned())
            .collect();
        match lines.first().map(String::as_str) {
            Some("--help" | "-h") => Invocation::Help,
            _ => Invocation::Run(Self { lines }),
        }
    }

    /// Process help followed by the builtin reference.
    pub fn help_text() -> String {
        Self::command()
            .after_help(builtins::reference_text())
            .render_help()
            .to_string()
    }
}
