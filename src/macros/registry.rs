//! Macro registry for builtin commands and user-defined templates.
//!
//! # Namespaces
//! - **Builtins**: a fixed, process-wide table of native handlers. Never
//!   mutated after start-up and always consulted first.
//! - **User macros**: format templates owned by a [`MacroRegistry`] instance,
//!   created empty and changed by definitions and `#DEL`.
//!
//! No user macro ever shares a name with a builtin; attempts to define or
//! remove a builtin name are rejected with a [`MacroWarning`].
//!
//! | Method        | Builtin name          | Otherwise                 |
//! |---------------|-----------------------|---------------------------|
//! | define_user   | `BuiltinOverwrite`    | insert or overwrite       |
//! | delete_user   | `BuiltinRemoval`      | remove, absent is a no-op |
//! | lookup_user   | never present         | template body             |

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::engine::{Engine, Expansion};
use crate::errors::{EngineResult, MacroWarning};
use crate::macros::{builtins, Macro};

/// A native builtin handler.
pub type BuiltinFn = fn(&mut Engine, &Macro<'_>) -> EngineResult<Expansion>;

/// An immutable builtin entry: handler plus a one-line description.
#[derive(Clone, Copy)]
pub struct BuiltinEntry {
    pub handler: BuiltinFn,
    pub description: &'static str,
}

impl std::fmt::Debug for BuiltinEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinEntry")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

static BUILTINS: Lazy<BTreeMap<&'static str, BuiltinEntry>> = Lazy::new(|| {
    builtins::BUILTINS
        .iter()
        .map(|&(name, handler, description)| (name, BuiltinEntry { handler, description }))
        .collect()
});

/// Looks up a builtin command by name.
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinEntry> {
    BUILTINS.get(name)
}

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

/// All builtins, sorted by name.
pub fn builtins() -> impl Iterator<Item = (&'static str, &'static BuiltinEntry)> {
    BUILTINS.iter().map(|(name, entry)| (*name, entry))
}

// ============================================================================
// USER MACRO TABLE
// ============================================================================

/// User-defined macros, keyed by name. Names are case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    user: BTreeMap<String, String>,
}

impl MacroRegistry {
    /// Creates a registry with no user macros.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines or overwrites a user macro.
    ///
    /// Returns the previous template if one was replaced.
    ///
    /// # Errors
    /// [`MacroWarning::BuiltinOverwrite`] if `name` is a builtin; the table is
    /// left unchanged.
    pub fn define_user(&mut self, name: &str, body: &str) -> Result<Option<String>, MacroWarning> {
        if is_builtin(name) {
            return Err(MacroWarning::BuiltinOverwrite(name.to_string()));
        }
        Ok(self.user.insert(name.to_string(), body.to_string()))
    }

    /// Removes a user macro. Removing an absent name is a no-op.
    ///
    /// # Errors
    /// [`MacroWarning::BuiltinRemoval`] if `name` is a builtin.
    pub fn delete_user(&mut self, name: &str) -> Result<Option<String>, MacroWarning> {
        if is_builtin(name) {
            return Err(MacroWarning::BuiltinRemoval(name.to_string()));
        }
        Ok(self.user.remove(name))
    }

    pub fn lookup_user(&self, name: &str) -> Option<&str> {
        self.user.get(name).map(String::as_str)
    }

    /// User macros sorted by name.
    pub fn user_macros(&self) -> impl Iterator<Item = (&str, &str)> {
        self.user
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_str()))
    }

    pub fn len(&self) -> usize {
        self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_complete() {
        let names: Vec<_> = builtins().map(|(name, _)| name).collect();
        assert_eq!(names, ["CERR", "COUT", "DEL", "EOF", "EVAL", "EXIT", "HELP"]);
        assert!(lookup_builtin("EXIT").is_some());
        assert!(lookup_builtin("exit").is_none());
    }

    #[test]
    fn test_define_and_overwrite() {
        let mut reg = MacroRegistry::new();
        assert_eq!(reg.define_user("GREET", "Hi %1%"), Ok(None));
        assert_eq!(
            reg.define_user("GREET", "Hello %1%"),
            Ok(Some("Hi %1%".to_string()))
        );
        assert_eq!(reg.lookup_user("GREET"), Some("Hello %1%"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_builtin_names_are_protected() {
        let mut reg = MacroRegistry::new();
        assert_eq!(
            reg.define_user("EXIT", "noop"),
            Err(MacroWarning::BuiltinOverwrite("EXIT".to_string()))
        );
        assert_eq!(
            reg.delete_user("HELP"),
            Err(MacroWarning::BuiltinRemoval("HELP".to_string()))
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut reg = MacroRegistry::new();
        reg.define_user("A", "x").unwrap();
        assert_eq!(reg.delete_user("A"), Ok(Some("x".to_string())));
        assert_eq!(reg.delete_user("A"), Ok(None));
        assert_eq!(reg.lookup_user("A"), None);
    }

    #[test]
    fn test_user_macros_sorted() {
        let mut reg = MacroRegistry::new();
        reg.define_user("B", "2").unwrap();
        reg.define_user("A", "1").unwrap();
        let all: Vec<_> = reg.user_macros().collect();
        assert_eq!(all, [("A", "1"), ("B", "2")]);
    }
}
