//! Bundle sources
//!
//! Each source contributes trust material to the Bundle. Exactly one kind of
//! source must be populated per entry; the views here expose what is set as
//! tagged enums so validators never have to re-derive it from raw options.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ObjectKind;

/// One contributor of trust material
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleSource {
    /// ConfigMap(s) in the trust namespace, by name or label selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<SourceObjectKeySelector>,

    /// Secret(s) in the trust namespace, by name or label selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SourceObjectKeySelector>,

    /// Literal PEM data appended as-is (may be empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_line: Option<String>,

    /// When true, the default CA package is used as a source
    #[serde(
        rename = "useDefaultCAs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub use_default_cas: Option<bool>,
}

/// A populated source kind
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceKind<'a> {
    /// `configMap` is set
    ConfigMap(&'a SourceObjectKeySelector),
    /// `secret` is set
    Secret(&'a SourceObjectKeySelector),
    /// `inLine` is set
    InLine(&'a str),
    /// `useDefaultCAs` is true
    DefaultCAs,
}

impl BundleSource {
    /// Every populated source kind, in field order.
    ///
    /// `useDefaultCAs: false` does not count as populated.
    pub fn populated(&self) -> Vec<SourceKind<'_>> {
        let mut kinds = Vec::with_capacity(1);
        if let Some(cm) = &self.config_map {
            kinds.push(SourceKind::ConfigMap(cm));
        }
        if let Some(secret) = &self.secret {
            kinds.push(SourceKind::Secret(secret));
        }
        if let Some(data) = &self.in_line {
            kinds.push(SourceKind::InLine(data));
        }
        if self.uses_default_cas() {
            kinds.push(SourceKind::DefaultCAs);
        }
        kinds
    }

    /// True if this source requests the default CA package
    pub fn uses_default_cas(&self) -> bool {
        self.use_default_cas == Some(true)
    }

    /// The object selector for a ConfigMap or Secret source
    pub fn object(&self, kind: ObjectKind) -> Option<&SourceObjectKeySelector> {
        match kind {
            ObjectKind::ConfigMap => self.config_map.as_ref(),
            ObjectKind::Secret => self.secret.as_ref(),
        }
    }
}

/// Reference to source object(s) and their data key(s) in the trust namespace
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceObjectKeySelector {
    /// Name of a single source object; must be empty when `selector` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1))]
    pub name: Option<String>,

    /// Label selector matching a set of source objects; must not be set
    /// when `name` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,

    /// Key of the entry in the object's data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1))]
    pub key: Option<String>,

    /// Use every entry in the object's data; must not be true when `key` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_all_keys: Option<bool>,
}

/// How source objects are identified
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectRef<'a> {
    /// A single object by exact name
    Name(&'a str),
    /// All objects matching a label selector
    Selector(&'a LabelSelector),
}

/// Which data entries of a source object are used
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRef<'a> {
    /// A single entry
    Key(&'a str),
    /// Every entry
    AllKeys,
}

impl SourceObjectKeySelector {
    /// Non-empty `name`, if set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Non-empty `key`, if set
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    /// True if `includeAllKeys` is true
    pub fn includes_all_keys(&self) -> bool {
        self.include_all_keys == Some(true)
    }

    /// Every populated object specifier
    pub fn object_refs(&self) -> Vec<ObjectRef<'_>> {
        let mut refs = Vec::with_capacity(1);
        if let Some(name) = self.name() {
            refs.push(ObjectRef::Name(name));
        }
        if let Some(selector) = &self.selector {
            refs.push(ObjectRef::Selector(selector));
        }
        refs
    }

    /// The object specifier, only when exactly one is populated
    pub fn object_ref(&self) -> Option<ObjectRef<'_>> {
        match self.object_refs().as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Every populated key specifier
    pub fn key_refs(&self) -> Vec<KeyRef<'_>> {
        let mut refs = Vec::with_capacity(1);
        if let Some(key) = self.key() {
            refs.push(KeyRef::Key(key));
        }
        if self.includes_all_keys() {
            refs.push(KeyRef::AllKeys);
        }
        refs
    }

    /// The key specifier, only when exactly one is populated
    pub fn key_ref(&self) -> Option<KeyRef<'_>> {
        match self.key_refs().as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }
}
