//! Bundle CRD
//!
//! A Bundle composes trust material from one or more sources and writes the
//! result into a ConfigMap and/or Secret replicated across namespaces.

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::source::BundleSource;
use super::target::BundleTarget;
use crate::CONDITION_SYNCED;

/// Desired state of a Bundle
///
/// Example:
/// ```yaml
/// apiVersion: trust.cert-manager.io/v1alpha1
/// kind: Bundle
/// metadata:
///   name: example-bundle
/// spec:
///   sources:
///     - useDefaultCAs: true
///     - configMap:
///         name: my-root-ca
///         key: root.pem
///   target:
///     configMap:
///       key: ca-bundle.crt
///     additionalFormats:
///       jks:
///         key: bundle.jks
///     namespaceSelector:
///       matchLabels:
///         trust: enabled
/// ```
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "trust.cert-manager.io",
    version = "v1alpha1",
    kind = "Bundle",
    status = "BundleStatus",
    printcolumn = r#"{"name":"ConfigMap Target","type":"string","jsonPath":".spec.target.configMap.key","description":"Bundle ConfigMap Target Key"}"#,
    printcolumn = r#"{"name":"Secret Target","type":"string","jsonPath":".spec.target.secret.key","description":"Bundle Secret Target Key"}"#,
    printcolumn = r#"{"name":"Synced","type":"string","jsonPath":".status.conditions[?(@.type == \"Synced\")].status","description":"Bundle has been synced"}"#,
    printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.conditions[?(@.type == \"Synced\")].reason","description":"Reason Bundle has Synced status"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp","description":"Timestamp Bundle was created"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BundleSpec {
    /// Sources whose data is concatenated and synced to the target
    #[schemars(length(min = 1, max = 100))]
    pub sources: Vec<BundleSource>,

    /// Where the composed bundle is written in every selected namespace
    pub target: BundleTarget,
}

impl Bundle {
    /// Name of the Bundle, empty if unset (e.g. only `generateName` given)
    pub fn bundle_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// The `Synced` condition, if the controller has reported one
    pub fn synced_condition(&self) -> Option<&BundleCondition> {
        self.status
            .as_ref()
            .and_then(|s| s.condition(CONDITION_SYNCED))
    }
}

/// Observed state of a Bundle
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleStatus {
    /// Status conditions; known type is `Synced`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<BundleCondition>,

    /// Version of the default CA package used, set only when a source
    /// requested the default CAs
    #[serde(
        rename = "defaultCAVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_ca_package_version: Option<String>,
}

impl BundleStatus {
    /// Look up a condition by type
    pub fn condition(&self, type_: &str) -> Option<&BundleCondition> {
        self.conditions.iter().find(|c| c.type_ == type_)
    }

    /// Insert or replace a condition.
    ///
    /// The existing transition time is kept when the status did not change.
    pub fn set_condition(&mut self, mut condition: BundleCondition) {
        match self.conditions.iter_mut().find(|c| c.type_ == condition.type_) {
            Some(existing) => {
                if existing.status == condition.status {
                    condition.last_transition_time = existing.last_transition_time;
                }
                *existing = condition;
            }
            None => self.conditions.push(condition),
        }
    }
}

/// Condition status following Kubernetes conventions
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition is true
    True,
    /// Condition is false
    False,
    /// Condition status is unknown
    #[default]
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Condition information for a Bundle
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleCondition {
    /// Type of the condition, e.g. `Synced`
    #[serde(rename = "type")]
    #[schemars(length(max = 316))]
    pub type_: String,

    /// Status of the condition
    pub status: ConditionStatus,

    /// Last time the status changed
    pub last_transition_time: DateTime<Utc>,

    /// CamelCase machine-readable reason
    #[schemars(length(min = 1, max = 1024))]
    pub reason: String,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schemars(length(max = 32768))]
    pub message: String,

    /// Generation the condition was computed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl BundleCondition {
    /// Create a new condition with the current timestamp
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            type_: type_.into(),
            status,
            last_transition_time: Utc::now(),
            reason: reason.into(),
            message: message.into(),
            observed_generation: None,
        }
    }

    /// Record the generation this condition was computed from
    pub fn with_observed_generation(mut self, generation: i64) -> Self {
        self.observed_generation = Some(generation);
        self
    }
}
