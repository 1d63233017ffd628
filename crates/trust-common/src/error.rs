//! Error types shared by the trust crates
//!
//! Validation faults are plain values ([`FieldErrorList`]) while a check is
//! running. They only become an [`Error`] once a caller asks for a verdict.

use thiserror::Error;

use crate::field::FieldErrorList;

/// Main error type for Bundle handling
#[derive(Debug, Error)]
pub enum Error {
    /// The Bundle failed validation; carries every fault found
    #[error("{0}")]
    Invalid(FieldErrorList),

    /// The request itself was malformed (e.g. an update without the old object)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A manifest could not be decoded or encoded
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being handled (if known)
        kind: Option<String>,
    },
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a serialization error for a specific resource kind
    pub fn serialization_for(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Field errors carried by an [`Error::Invalid`]
    pub fn field_errors(&self) -> Option<&FieldErrorList> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
