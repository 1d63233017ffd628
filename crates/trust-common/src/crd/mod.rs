//! Custom Resource Definitions for trust bundle distribution
//!
//! This module contains the Bundle CRD and the types it is composed from.

mod bundle;
mod source;
mod target;

pub use bundle::{Bundle, BundleCondition, BundleSpec, BundleStatus, ConditionStatus};
pub use source::{BundleSource, KeyRef, ObjectRef, SourceKind, SourceObjectKeySelector};
pub use target::{
    AdditionalFormat, AdditionalFormats, BundleTarget, JksFormat, KeySelector, Pkcs12Format,
    TargetFormat,
};

/// Kubernetes object kind a source reads from or a target writes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A ConfigMap
    ConfigMap,
    /// A Secret
    Secret,
}

impl ObjectKind {
    /// Both kinds, ConfigMap first
    pub const ALL: [ObjectKind; 2] = [ObjectKind::ConfigMap, ObjectKind::Secret];

    /// Field name used in the Bundle spec (`configMap` / `secret`)
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::ConfigMap => "configMap",
            Self::Secret => "secret",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}
