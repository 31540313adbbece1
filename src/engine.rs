use std::{cell::RefCell, rc::Rc};

use crate::{
    errors::{EngineError, EngineResult, MacroWarning},
    format::apply_arguments,
    macros::{classify, registry, LineKind, Macro, MacroRegistry, SIGIL},
    source::LineSource,
};

/// Default bound on chained re-evaluations of a single line.
pub const DEFAULT_MAX_DEPTH: usize = 99;

// ============================================================================
// OUTPUT - Sinks and severities
// ============================================================================

/// What kind of line is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Evaluation result in primary output mode.
    Output,
    /// Evaluation result in diagnostic mode, and help text.
    Diagnostic,
    /// Recoverable engine condition.
    Warning,
}

/// Destination for every line the engine produces.
pub trait OutputSink {
    fn emit(&mut self, severity: Severity, text: &str);
}

impl<T: OutputSink> OutputSink for Rc<RefCell<T>> {
    fn emit(&mut self, severity: Severity, text: &str) {
        self.borrow_mut().emit(severity, text);
    }
}

/// Which stream evaluation results go to. Toggled by `#CERR` and `#COUT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Primary,
    Diagnostic,
}

// ============================================================================
// EVALUATION RESULTS
// ============================================================================

/// Result of evaluating one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Text to print. Empty text prints nothing.
    Text(String),
    /// Stop consuming the current line source.
    EndOfStream,
    /// Stop the whole process with success status.
    Exit,
}

impl Expansion {
    pub fn empty() -> Self {
        Expansion::Text(String::new())
    }

    /// The text, or `None` for either termination signal.
    pub fn into_text(self) -> Option<String> {
        match self {
            Expansion::Text(text) => Some(text),
            Expansion::EndOfStream | Expansion::Exit => None,
        }
    }
}

/// Why [`Engine::run_source`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The source has no more lines.
    Exhausted,
    /// `#EOF` was evaluated.
    EndOfStream,
    /// `#EXIT` was evaluated.
    Exit,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Re-evaluation rounds allowed before a result is returned unexpanded.
    pub max_depth: usize,
    /// Shell that runs `#EVAL` bodies as `<shell> -c <body>`.
    pub shell: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            shell: "sh".to_string(),
        }
    }
}

/// The macro engine: user macros, output mode and the sink they write to.
pub struct Engine {
    registry: MacroRegistry,
    mode: OutputMode,
    config: EngineConfig,
    sink: Box<dyn OutputSink>,
}

impl Engine {
    pub fn new(sink: Box<dyn OutputSink>) -> Self {
        Self::with_config(EngineConfig::default(), sink)
    }

    pub fn with_config(config: EngineConfig, sink: Box<dyn OutputSink>) -> Self {
        Self {
            registry: MacroRegistry::new(),
            mode: OutputMode::default(),
            config,
            sink,
        }
    }

    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MacroRegistry {
        &mut self.registry
    }

    pub fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Writes the concatenation of `parts` as one line.
    pub fn log(&mut self, severity: Severity, parts: &[&str]) {
        self.sink.emit(severity, &parts.concat());
    }

    pub fn warn(&mut self, warning: &MacroWarning) {
        let message = warning.to_string();
        self.log(Severity::Warning, &[message.as_str()]);
    }

    /// Prints a non-empty result according to the current output mode.
    pub fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let severity = match self.mode {
            OutputMode::Primary => Severity::Output,
            OutputMode::Diagnostic => Severity::Diagnostic,
        };
        self.log(severity, &[text]);
    }

    /// Evaluates one line, re-evaluating results that are themselves macro
    /// constructs until a plain result is produced or the depth bound is hit.
    pub fn evaluate(&mut self, line: &str) -> EngineResult<Expansion> {
        let mut current = line.to_string();
        let mut depth = 0;
        loop {
            if depth >= self.config.max_depth {
                self.warn(&MacroWarning::StackOverflow);
                return Ok(Expansion::Text(current));
            }
            match self.expand_once(&current)? {
                Expansion::Text(text) if text.starts_with(SIGIL) => {
                    current = text;
                    depth += 1;
                }
                other => return Ok(other),
            }
        }
    }

    /// A single classification and dispatch step.
    fn expand_once(&mut self, line: &str) -> EngineResult<Expansion> {
        match classify(line) {
            LineKind::NotAMacro => Ok(Expansion::Text(line.to_string())),
            LineKind::NoOp => Ok(Expansion::empty()),
            LineKind::Definition { keyword, body } => {
                if let Err(warning) = self.registry.define_user(keyword, body) {
                    self.warn(&warning);
                }
                Ok(Expansion::empty())
            }
            LineKind::Invocation { keyword, body } => self.invoke(&Macro {
                keyword,
                body,
                is_assignment: false,
            }),
        }
    }

    /// Resolves an invocation: builtins first, then user macros.
    fn invoke(&mut self, m: &Macro<'_>) -> EngineResult<Expansion> {
        if let Some(entry) = registry::lookup_builtin(m.keyword) {
            return (entry.handler)(self, m);
        }

        let expanded = self
            .registry
            .lookup_user(m.keyword)
            .map(|template| apply_arguments(template, m.body));
        match expanded {
            Some(Ok(text)) => Ok(Expansion::Text(text)),
            Some(Err(source)) => Err(EngineError::Format {
                name: m.keyword.to_string(),
                source,
            }),
            None => {
                self.warn(&MacroWarning::Undefined(m.keyword.to_string()));
                Ok(Expansion::empty())
            }
        }
    }

    /// Evaluates every line of `source` and emits the results, until the
    /// source is exhausted or a termination signal is produced.
    pub fn run_source(&mut self, source: &mut dyn LineSource) -> EngineResult<StreamEnd> {
        while let Some(line) = source.next_line()? {
            match self.evaluate(&line)? {
                Expansion::Text(text) => self.emit(&text),
                Expansion::EndOfStream => return Ok(StreamEnd::EndOfStream),
                Expansion::Exit => return Ok(StreamEnd::Exit),
            }
        }
        Ok(StreamEnd::Exhausted)
    }
}
