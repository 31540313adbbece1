//! stdinext: pipe lines in from stdin "and then" keep reading from the
//! keyboard, rewriting every line through a small macro engine.

pub use crate::engine::{Engine, EngineConfig, Expansion, OutputSink, Severity};
pub use crate::errors::{EngineError, FormatError, MacroWarning};

pub mod cli;
pub mod engine;
pub mod errors;
pub mod format;
pub mod macros;
pub mod source;
