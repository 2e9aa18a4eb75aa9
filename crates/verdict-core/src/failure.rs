//! User-facing failure values.
//!
//! A [`Failure`] is a single message, optionally tied to the input field (the
//! "UI handle") it concerns. A failed [`Outcome`](crate::Outcome) always
//! carries at least one of them, grouped in a [`Failures`] list.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Failure
// ============================================================================

/// A single user-facing failure.
///
/// Two failures are equal iff both the message and the UI handle are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ui_handle: Option<String>,
}

impl Failure {
    /// Creates a failure that is not tied to any input field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ui_handle: None,
        }
    }

    /// Creates a failure tied to the given field / UI handle.
    pub fn with_handle(message: impl Into<String>, ui_handle: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ui_handle: Some(ui_handle.into()),
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The field this failure relates to, if any.
    pub fn ui_handle(&self) -> Option<&str> {
        self.ui_handle.as_deref()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ui_handle {
            Some(handle) => write!(f, "{} ({handle})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Failure {}

// ============================================================================
// Failures
// ============================================================================

/// An ordered, non-empty list of [`Failure`]s.
///
/// Building one from an empty collection is a programming error and panics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Failure>", into = "Vec<Failure>")]
pub struct Failures(Vec<Failure>);

/// Returned when deserializing an empty failure list.
#[derive(Debug, Clone, Error)]
#[error("a failure list must contain at least one failure")]
pub struct EmptyFailures;

impl Failures {
    /// Creates a failure list.
    ///
    /// # Panics
    ///
    /// Panics if `failures` is empty.
    pub fn new(failures: Vec<Failure>) -> Self {
        assert!(
            !failures.is_empty(),
            "a failed outcome requires at least one failure"
        );
        Self(failures)
    }

    /// Creates a list holding exactly one failure.
    pub fn single(failure: Failure) -> Self {
        Self(vec![failure])
    }

    /// Appends every failure of `other`, keeping order.
    pub fn extend(&mut self, other: Failures) {
        self.0.extend(other.0);
    }

    /// Consumes the list and returns the inner vector (never empty).
    pub fn into_vec(self) -> Vec<Failure> {
        self.0
    }

    /// Returns the first failure.
    pub fn first(&self) -> &Failure {
        &self.0[0]
    }
}

impl Deref for Failures {
    type Target = [Failure];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Failure> for Failures {
    fn from(failure: Failure) -> Self {
        Self::single(failure)
    }
}

impl TryFrom<Vec<Failure>> for Failures {
    type Error = EmptyFailures;

    fn try_from(failures: Vec<Failure>) -> Result<Self, Self::Error> {
        if failures.is_empty() {
            Err(EmptyFailures)
        } else {
            Ok(Self(failures))
        }
    }
}

impl From<Failures> for Vec<Failure> {
    fn from(failures: Failures) -> Self {
        failures.0
    }
}

impl IntoIterator for Failures {
    type Item = Failure;
    type IntoIter = std::vec::IntoIter<Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Failures {}
