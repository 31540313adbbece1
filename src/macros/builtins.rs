//! Native builtin commands.
//!
//! Each handler receives the engine and the invoking [`Macro`] and returns an
//! [`Expansion`]. Handlers that only have side effects return empty text.

use std::io::BufReader;
use std::process::{Command, Stdio};

use crate::engine::{Engine, Expansion, OutputMode, Severity, StreamEnd};
use crate::errors::{EngineError, EngineResult};
use crate::macros::registry::{self, BuiltinFn, MacroRegistry};
use crate::macros::Macro;
use crate::source::StreamSource;

/// Name, handler and description of every builtin.
pub const BUILTINS: &[(&str, BuiltinFn, &str)] = &[
    ("EXIT", on_exit as BuiltinFn, "Exit the process"),
    (
        "EOF",
        on_eof as BuiltinFn,
        "Raise EOF signal. Stop the current stream and start another",
    ),
    ("DEL", on_del as BuiltinFn, "Remove one user-defined macro"),
    ("HELP", on_help as BuiltinFn, "Print help"),
    (
        "EVAL",
        on_eval as BuiltinFn,
        "Run the body as a shell command and evaluate its output",
    ),
    ("CERR", on_cerr as BuiltinFn, "Output to cerr"),
    ("COUT", on_cout as BuiltinFn, "Output to cout"),
];

const USAGE: &str = "
Add a user-defined macro:
#{CMD}={text text2...}
 - Supports the format directives %% %1% %2%, etc
 - If the output starts with #, another round of evaluation will be done. (Max 99 times).

Calling a macro:
#{CMD} {arg1 arg2...}";

fn on_exit(_engine: &mut Engine, _m: &Macro<'_>) -> EngineResult<Expansion> {
    Ok(Expansion::Exit)
}

fn on_eof(_engine: &mut Engine, _m: &Macro<'_>) -> EngineResult<Expansion> {
    Ok(Expansion::EndOfStream)
}

fn on_del(engine: &mut Engine, m: &Macro<'_>) -> EngineResult<Expansion> {
    if let Err(warning) = engine.registry_mut().delete_user(m.body) {
        engine.warn(&warning);
    }
    Ok(Expansion::empty())
}

fn on_help(engine: &mut Engine, _m: &Macro<'_>) -> EngineResult<Expansion> {
    for line in help_lines(engine.registry()) {
        engine.log(Severity::Diagnostic, &[line.as_str()]);
    }
    Ok(Expansion::empty())
}

/// Runs the body through the shell and feeds its stdout back into the engine.
fn on_eval(engine: &mut Engine, m: &Macro<'_>) -> EngineResult<Expansion> {
    let mut child = Command::new(&engine.config().shell)
        .arg("-c")
        .arg(m.body)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| EngineError::Spawn {
            command: m.body.to_string(),
            source,
        })?;

    let ended = match child.stdout.take() {
        Some(stdout) => {
            let mut source = StreamSource::new(BufReader::new(stdout));
            engine.run_source(&mut source)
        }
        None => Ok(StreamEnd::Exhausted),
    };
    // stdout is closed by now, so a child still writing gets EPIPE and ends.
    child.wait()?;

    match ended? {
        StreamEnd::Exit => Ok(Expansion::Exit),
        StreamEnd::Exhausted | StreamEnd::EndOfStream => Ok(Expansion::empty()),
    }
}

fn on_cerr(engine: &mut Engine, _m: &Macro<'_>) -> EngineResult<Expansion> {
    engine.set_mode(OutputMode::Diagnostic);
    Ok(Expansion::empty())
}

fn on_cout(engine: &mut Engine, _m: &Macro<'_>) -> EngineResult<Expansion> {
    engine.set_mode(OutputMode::Primary);
    Ok(Expansion::empty())
}

// ============================================================================
// HELP RENDERING
// ============================================================================

/// Lines printed by `#HELP`: builtins, user macros, then usage.
pub fn help_lines(user: &MacroRegistry) -> Vec<String> {
    let mut lines = vec!["Builtin macro: (Not overwritable, nor removable)".to_string()];
    for (name, entry) in registry::builtins() {
        lines.push(format!(" #{name}\t\t{}", entry.description));
    }

    lines.push(String::new());
    lines.push("User-defined macro:".to_string());
    for (name, body) in user.user_macros() {
        lines.push(format!(" #{name}={body}"));
    }

    lines.extend(USAGE.lines().map(str::to_string));
    lines
}

/// Reference text for `--help`, where no user macros exist yet.
pub fn reference_text() -> String {
    help_lines(&MacroRegistry::new()).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_builtins_then_user_macros() {
        let mut reg = MacroRegistry::new();
        reg.define_user("GREET", "Hello %1%!").unwrap();
        let lines = help_lines(&reg);

        assert_eq!(lines[0], "Builtin macro: (Not overwritable, nor removable)");
        assert_eq!(lines[1], " #CERR\t\tOutput to cerr");
        assert!(lines.iter().any(|l| l == " #EXIT\t\tExit the process"));

        let user_header = lines.iter().position(|l| l == "User-defined macro:").unwrap();
        assert_eq!(lines[user_header + 1], " #GREET=Hello %1%!");
        assert!(lines.last().unwrap().contains("#{CMD} {arg1 arg2...}"));
    }

    #[test]
    fn test_reference_text_has_no_user_entries() {
        let text = reference_text();
        assert!(text.contains("User-defined macro:\n\nAdd a user-defined macro:"));
    }
}
