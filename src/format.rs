//! Pluggable semantic string format validators.
//!
//! A format is a named predicate over strings, checked by the `format`
//! keyword. The built-in set covers `date-time`; callers register additional
//! formats before validation begins. Registration takes `&mut self`, so the
//! active set is necessarily immutable while a validation call holds the
//! registry by shared reference.

use std::collections::HashMap;
use std::sync::Arc;

/// A format predicate: returns true when the string is a valid instance.
pub type FormatCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A mapping from format name to predicate.
///
/// # Example
///
/// ```rust
/// use reqschema::FormatRegistry;
///
/// let mut formats = FormatRegistry::new();
/// formats.register("lowercase", |s| s.chars().all(|c| !c.is_uppercase()));
///
/// assert_eq!(formats.check("lowercase", "hello"), Some(true));
/// assert_eq!(formats.check("lowercase", "Hello"), Some(false));
/// assert_eq!(formats.check("unknown", "anything"), None);
/// ```
#[derive(Clone)]
pub struct FormatRegistry {
    checks: HashMap<String, FormatCheck>,
}

impl FormatRegistry {
    /// Creates a registry with the built-in formats (`date-time`).
    pub fn new() -> Self {
        let mut registry = Self {
            checks: HashMap::new(),
        };
        registry.register("date-time", is_date_time);
        registry
    }

    /// Registers (or replaces) a named format predicate.
    pub fn register<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.checks.insert(name.into(), Arc::new(check));
    }

    /// Checks a string against a named format.
    ///
    /// Returns `None` for unknown format names; the evaluator ignores those
    /// rather than failing, since the format set is caller-extensible.
    pub fn check(&self, name: &str, value: &str) -> Option<bool> {
        self.checks.get(name).map(|check| check(value))
    }

    /// Returns true if a format with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Strict ISO-8601 calendar timestamp check: date, time, and offset are all
/// required, and the date must exist on the calendar (`2024-02-30` fails,
/// leap-day `2024-02-29` passes).
fn is_date_time(value: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(value).is_ok()
}
