//! External error formatting.
//!
//! Raw evaluator errors carry the violated keyword and a structured path;
//! this module turns them into the stable external shape `{ code, path,
//! message }`. The code is the snake-cased keyword (`minLength` →
//! `min_length`); the path renders as a slash-delimited pointer in body mode
//! and with a leading `?` in query mode, where parameters are a flat
//! top-level namespace rather than a nested document. Formatting never
//! reorders errors.

use std::fmt::{self, Display};

use crate::error::{SchemaError, SchemaErrors};
use crate::path::DataPath;

/// How error paths are rendered externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// JSON-pointer-like, starting at the root: `/user/email`, `""` at root.
    Body,
    /// Leading `?` marker in place of the root slash: `?id`, `""` at root.
    Query,
}

/// A single formatted validation error, the shape callers receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalError {
    /// Snake-case code derived from the violated keyword.
    pub code: String,
    /// Rendered location of the offending value.
    pub path: String,
    /// Human-readable description.
    pub message: String,
}

impl Display for ExternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

/// Formats raw errors into the external shape, preserving order exactly.
pub fn format_errors(errors: &SchemaErrors, style: PathStyle) -> Vec<ExternalError> {
    errors.iter().map(|e| format_error(e, style)).collect()
}

fn format_error(error: &SchemaError, style: PathStyle) -> ExternalError {
    ExternalError {
        code: snake_case(&error.keyword),
        path: render_path(&error.path, style),
        message: error.message.clone(),
    }
}

fn render_path(path: &DataPath, style: PathStyle) -> String {
    let pointer = path.to_pointer();
    match style {
        PathStyle::Body => pointer,
        PathStyle::Query => {
            if pointer.is_empty() {
                pointer
            } else {
                format!("?{}", &pointer[1..])
            }
        }
    }
}

/// Converts a keyword name to its snake-case external code. A leading `$`
/// is dropped, so `$ref` becomes `ref`.
fn snake_case(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len() + 2);
    for c in keyword.chars() {
        if c == '$' {
            continue;
        }
        if c.is_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
