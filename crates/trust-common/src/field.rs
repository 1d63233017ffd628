//! Field paths and field-level validation errors
//!
//! Paths are built from segments rather than strings so that faults produced
//! relative to a nested object (e.g. a label selector) can be re-rooted under
//! the location where that object lives in the Bundle.
//!
//! Rendering follows the apimachinery convention so messages read the same as
//! those returned by the API server:
//!
//! ```text
//! spec.sources[0]: Invalid value: "object": must define exactly one source
//! spec.sources[1].configMap: Forbidden: cannot define the same source as target
//! ```

use std::fmt;

use serde_json::Value;

use crate::Error;

/// A single step in a field path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum PathSegment {
    /// Named child field (`target`, `configMap`)
    Name(String),
    /// Index into a list (`[0]`)
    Index(usize),
}

/// Immutable path to a field, e.g. `spec.sources[0].configMap.selector`
///
/// `child` and `index` return new paths; the receiver is never modified, so a
/// parent path can be shared across sibling checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Path with a single named root segment
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Name(root.into())],
        }
    }

    /// Empty path, used for faults relative to a nested object
    pub fn relative() -> Self {
        Self::default()
    }

    /// Append a named segment
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Name(name.into()));
        Self { segments }
    }

    /// Append an index segment
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Re-root `suffix` under this path
    pub fn join(&self, suffix: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Name(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Name(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Kind of field-level fault
#[derive(Clone, Debug, PartialEq)]
pub enum FieldErrorKind {
    /// The value is present but not acceptable
    Invalid {
        /// Offending value, rendered as JSON
        value: Value,
        /// Human-readable reason
        detail: String,
    },
    /// A required value is missing
    Required {
        /// Human-readable reason
        detail: String,
    },
    /// The value is present but not permitted here
    Forbidden {
        /// Human-readable reason
        detail: String,
    },
}

/// A fault attached to a field path
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    /// Location of the fault
    pub path: FieldPath,
    /// What is wrong
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Invalid value fault
    pub fn invalid(path: FieldPath, value: impl Into<Value>, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind: FieldErrorKind::Invalid {
                value: value.into(),
                detail: detail.into(),
            },
        }
    }

    /// Required value fault
    pub fn required(path: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind: FieldErrorKind::Required {
                detail: detail.into(),
            },
        }
    }

    /// Forbidden fault
    pub fn forbidden(path: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind: FieldErrorKind::Forbidden {
                detail: detail.into(),
            },
        }
    }

    /// Same fault with its path re-rooted under `prefix`
    pub fn prefixed(mut self, prefix: &FieldPath) -> Self {
        self.path = prefix.join(&self.path);
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Invalid { value, detail } => {
                write!(f, "{}: Invalid value: {}: {}", self.path, value, detail)
            }
            FieldErrorKind::Required { detail } if detail.is_empty() => {
                write!(f, "{}: Required value", self.path)
            }
            FieldErrorKind::Required { detail } => {
                write!(f, "{}: Required value: {}", self.path, detail)
            }
            FieldErrorKind::Forbidden { detail } => {
                write!(f, "{}: Forbidden: {}", self.path, detail)
            }
        }
    }
}

/// Ordered collection of field errors
///
/// Validators thread one of these through every check instead of returning on
/// the first fault, so a caller always sees every problem at once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrorList(Vec<FieldError>);

impl FieldErrorList {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fault
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Append every fault from `other`, preserving order
    pub fn extend(&mut self, other: FieldErrorList) {
        self.0.extend(other.0);
    }

    /// Re-root every fault under `prefix`
    pub fn prefixed(self, prefix: &FieldPath) -> Self {
        Self(self.0.into_iter().map(|e| e.prefixed(prefix)).collect())
    }

    /// True if there are no faults
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of faults
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate faults in order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Rendered faults, one string each
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }

    /// `Ok(())` if empty, otherwise an aggregated [`Error::Invalid`]
    pub fn into_result(self) -> crate::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Invalid(self))
        }
    }
}

impl fmt::Display for FieldErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => Ok(()),
            [single] => write!(f, "{single}"),
            many => write!(
                f,
                "[{}]",
                many.iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl From<Vec<FieldError>> for FieldErrorList {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl FromIterator<FieldError> for FieldErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
