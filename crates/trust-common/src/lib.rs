//! Common types for trust bundle distribution: the Bundle CRD, field paths,
//! and errors

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod field;

pub use error::Error;
pub use field::{FieldError, FieldErrorKind, FieldErrorList, FieldPath};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Kind name of the Bundle resource
pub const BUNDLE_KIND: &str = "Bundle";

/// Label placed on every target object written for a Bundle
pub const BUNDLE_LABEL_KEY: &str = "trust.cert-manager.io/bundle";

/// Annotation holding the hash of the data synced into a target object
pub const BUNDLE_HASH_ANNOTATION_KEY: &str = "trust.cert-manager.io/hash";

/// Condition type reported once a Bundle has been synced to every target
pub const CONDITION_SYNCED: &str = "Synced";

/// Password Java tooling expects for JKS truststores.
///
/// The truststore only holds public certificates, so this is a convention
/// rather than a protection.
pub const DEFAULT_JKS_PASSWORD: &str = "changeit";

/// Empty password: PKCS#12 truststores are written password-less by default
pub const DEFAULT_PKCS12_PASSWORD: &str = "";
