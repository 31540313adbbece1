//! Error handling for the stdinext engine.
//!
//! Two families of conditions exist:
//! - [`MacroWarning`]: recoverable. Reported on the diagnostic channel and the
//!   current line evaluates to a fallback value.
//! - [`EngineError`]: fatal. Propagated out of the driver loop and rendered by
//!   `miette` in the binary.

use std::io;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// RECOVERABLE CONDITIONS
// ============================================================================

/// A condition that is reported and then ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroWarning {
    #[error("Builtin macro cannot be overwritten: {0}")]
    BuiltinOverwrite(String),
    #[error("Builtin macro cannot be removed: {0}")]
    BuiltinRemoval(String),
    #[error("The macro {0} is not defined")]
    Undefined(String),
    #[error("Stack overflow")]
    StackOverflow,
}

// ============================================================================
// FORMAT ERRORS
// ============================================================================

/// A template that cannot be parsed by the argument formatter.
///
/// Arity mismatches are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format template ends with a lone '%' at offset {offset}")]
    TrailingPercent { offset: usize },
    #[error("unsupported directive '%{directive}' at offset {offset}")]
    UnsupportedDirective { directive: char, offset: usize },
    #[error("directive at offset {offset} is not terminated")]
    UnterminatedDirective { offset: usize },
    #[error("positional directive at offset {offset} must be 1 or greater")]
    ZeroIndex { offset: usize },
    #[error("numbered and sequential directives cannot be mixed")]
    MixedDirectives,
}

// ============================================================================
// FATAL ERRORS
// ============================================================================

/// Errors that stop the process.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("failed to spawn `{command}`")]
    #[diagnostic(
        code(stdinext::eval::spawn),
        help("EVAL runs its body through the configured shell; check that the shell exists")
    )]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed template for macro {name}: {source}")]
    #[diagnostic(
        code(stdinext::format::malformed),
        help("use %% for a literal percent and %1%, %2%, ... for arguments")
    )]
    Format {
        name: String,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    #[diagnostic(code(stdinext::io))]
    Io(#[from] io::Error),
}

/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;
