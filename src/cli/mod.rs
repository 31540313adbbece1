//! The stdinext Command-Line Interface.
//!
//! This module parses the arguments and drives the engine through its three
//! line sources: arguments, then stdin, then the terminal.

use std::io;

use crate::cli::args::{Invocation, StdinextArgs};
use crate::cli::output::ConsoleSink;
use crate::engine::{Engine, StreamEnd};
use crate::errors::EngineResult;
use crate::source::{ArgvSource, InteractiveSource, StreamSource};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    let args = match StdinextArgs::from_raw(std::env::args_os()) {
        Invocation::Help => {
            eprintln!("{}", StdinextArgs::help_text());
            return Ok(());
        }
        Invocation::Run(args) => args,
    };

    let mut engine = Engine::new(Box::new(ConsoleSink::new()));
    drive(&mut engine, args.lines)?;
    Ok(())
}

/// Runs every phase in order. Returns once `#EXIT` is evaluated or no
/// terminal is available for the interactive phase.
pub fn drive(engine: &mut Engine, lines: Vec<String>) -> EngineResult<()> {
    let mut argv = ArgvSource::new(lines);
    if engine.run_source(&mut argv)? == StreamEnd::Exit {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut piped = StreamSource::new(stdin.lock());
    if engine.run_source(&mut piped)? == StreamEnd::Exit {
        return Ok(());
    }
    drop(piped);

    // A terminal keeps producing input after Ctrl-D, so each round reopens it.
    loop {
        let Ok(mut tty) = InteractiveSource::open() else {
            return Ok(());
        };
        if engine.run_source(&mut tty)? == StreamEnd::Exit {
            return Ok(());
        }
    }
}
