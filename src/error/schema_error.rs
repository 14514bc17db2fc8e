//! Validation error types.
//!
//! This module provides [`SchemaError`] for single keyword violations and
//! [`SchemaErrors`] for the accumulated, ordered collection of violations.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::DataPath;

/// A single keyword violation with full context.
///
/// `SchemaError` captures everything relevant about one violation:
/// - **path**: where in the data tree the violation occurred
/// - **keyword**: the violated constraint name, exactly as written in the
///   schema (`minLength`, `required`, `anyOf`, ...)
/// - **message**: human-readable description of the failure
/// - **got**: the actual value that failed validation (optional)
/// - **expected**: what was expected instead (optional)
///
/// The keyword is kept raw here; the snake-case external code is derived by
/// the error formatter, not during evaluation.
///
/// # Example
///
/// ```rust
/// use reqschema::{DataPath, SchemaError};
///
/// let error = SchemaError::new(
///     DataPath::root().push_field("name"),
///     "minLength",
///     "length must be at least 3, got 1",
/// )
/// .with_got("1 characters")
/// .with_expected("at least 3 characters");
///
/// assert_eq!(error.keyword, "minLength");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// The path to the value that violated the constraint. For a missing
    /// required property, the path descends to the absent property slot.
    pub path: DataPath,
    /// The violated keyword name, as written in the schema.
    pub keyword: String,
    /// Human-readable error message.
    pub message: String,
    /// The actual value that was received (formatted as string).
    pub got: Option<String>,
    /// Description of what was expected.
    pub expected: Option<String>,
}

impl SchemaError {
    /// Creates a new error for the given path, keyword, and message.
    pub fn new(
        path: DataPath,
        keyword: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            keyword: keyword.into(),
            message: message.into(),
            got: None,
            expected: None,
        }
    }

    /// Sets the "got" (actual value) field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
};

/// A non-empty, ordered collection of validation errors.
///
/// `SchemaErrors` wraps a `NonEmptyVec<SchemaError>` to guarantee that at
/// least one error is present, which is what `Validation<T, SchemaErrors>`
/// requires of its failure side. Iteration order is the order the evaluator
/// produced the errors in (depth-first, fixed keyword order), and it is
/// stable across repeated validation of the same schema/data pair.
///
/// # Combining Errors
///
/// `SchemaErrors` implements `Semigroup`, so error sets from independent
/// validations can be merged:
///
/// ```rust
/// use reqschema::{DataPath, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let errors1 = SchemaErrors::single(
///     SchemaError::new(DataPath::root().push_field("name"), "required", "missing")
/// );
/// let errors2 = SchemaErrors::single(
///     SchemaError::new(DataPath::root().push_field("email"), "format", "bad format")
/// );
///
/// let combined = errors1.combine(errors2);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Creates a `SchemaErrors` containing a single error.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns false since this collection is guaranteed non-empty.
    ///
    /// This method exists for API consistency but always returns false.
    pub fn is_empty(&self) -> bool {
        false // NonEmptyVec is never empty
    }

    /// Returns an iterator over the contained errors, in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns all errors at the specified path.
    pub fn at_path(&self, path: &DataPath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors for the specified keyword.
    pub fn with_keyword(&self, keyword: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.keyword == keyword).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<SchemaError>`.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }

    /// Creates a `SchemaErrors` from a `Vec<SchemaError>`.
    ///
    /// Use this when you're certain the vec contains at least one error.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(errors: Vec<SchemaError>) -> Self {
        Self(NonEmptyVec::from_vec(errors).expect("SchemaErrors requires at least one error"))
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaErrors {
    type Item = &'a SchemaError;
    type IntoIter = Box<dyn Iterator<Item = &'a SchemaError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaErrors>();
    assert_sync::<SchemaErrors>();
};
