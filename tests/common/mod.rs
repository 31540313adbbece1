//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use stdinext::cli::output::OutputBuffer;
use stdinext::engine::StreamEnd;
use stdinext::source::ArgvSource;
use stdinext::{Engine, EngineConfig, Expansion};

/// An engine writing into a buffer the test can inspect.
pub struct TestEngine {
    pub engine: Engine,
    pub buffer: Rc<RefCell<OutputBuffer>>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let buffer = Rc::new(RefCell::new(OutputBuffer::new()));
        let engine = Engine::with_config(config, Box::new(buffer.clone()));
        Self { engine, buffer }
    }

    /// Evaluates `line` and returns its text, panicking on a signal.
    pub fn eval(&mut self, line: &str) -> String {
        match self.engine.evaluate(line) {
            Ok(Expansion::Text(text)) => text,
            other => panic!("expected text from {line:?}, got {other:?}"),
        }
    }

    /// Runs `lines` through the driver loop.
    pub fn run(&mut self, lines: &[&str]) -> StreamEnd {
        let mut source = ArgvSource::new(lines.iter().copied());
        self.engine
            .run_source(&mut source)
            .expect("driver loop failed")
    }

    pub fn output(&self) -> Vec<String> {
        self.buffer.borrow().output()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.buffer.borrow().diagnostics()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.buffer.borrow().warnings()
    }
}
