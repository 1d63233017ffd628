//! Bundle target
//!
//! The target names the key(s) written into a ConfigMap and/or Secret in each
//! selected namespace, optionally with extra truststore encodings.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ObjectKind;
use crate::{DEFAULT_JKS_PASSWORD, DEFAULT_PKCS12_PASSWORD};

/// Where composed trust material is written
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleTarget {
    /// Target ConfigMap in each selected namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<KeySelector>,

    /// Target Secret in each selected namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<KeySelector>,

    /// Extra truststore encodings written next to the PEM bundle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_formats: Option<AdditionalFormats>,

    /// Only namespaces matching this selector receive the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
}

impl BundleTarget {
    /// The key selector for the given target object kind
    pub fn object(&self, kind: ObjectKind) -> Option<&KeySelector> {
        match kind {
            ObjectKind::ConfigMap => self.config_map.as_ref(),
            ObjectKind::Secret => self.secret.as_ref(),
        }
    }

    /// Primary keys in use, ConfigMap first
    pub fn primary_keys(&self) -> Vec<(ObjectKind, &str)> {
        ObjectKind::ALL
            .iter()
            .filter_map(|kind| self.object(*kind).map(|t| (*kind, t.key.as_str())))
            .collect()
    }

    /// Additional-format keys in use, JKS first
    pub fn additional_format_keys(&self) -> Vec<(AdditionalFormat, &str)> {
        self.additional_formats
            .as_ref()
            .map(AdditionalFormats::keys)
            .unwrap_or_default()
    }
}

/// Key written into a target object, with its encoding
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeySelector {
    /// Key of the entry written into the target object's data
    #[schemars(length(min = 1))]
    pub key: String,

    /// Encoding of the entry; PEM when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TargetFormat>,

    /// Truststore password, only meaningful for JKS and PKCS12
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(min = 1, max = 128))]
    pub password: Option<String>,
}

impl KeySelector {
    /// Selector for `key` with default format and no password
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Format with the PEM default applied
    pub fn effective_format(&self) -> TargetFormat {
        self.format.unwrap_or_default()
    }

    /// Password used to encode the truststore.
    ///
    /// `None` for PEM; otherwise the explicit password or the format default.
    pub fn effective_password(&self) -> Option<&str> {
        let default = match self.effective_format() {
            TargetFormat::Pem => return None,
            TargetFormat::Jks => DEFAULT_JKS_PASSWORD,
            TargetFormat::Pkcs12 => DEFAULT_PKCS12_PASSWORD,
        };
        Some(self.password.as_deref().unwrap_or(default))
    }
}

/// Encoding of a target entry
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetFormat {
    /// Concatenated PEM certificates
    #[default]
    Pem,
    /// Java KeyStore
    Jks,
    /// PKCS#12 archive
    Pkcs12,
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pem => write!(f, "PEM"),
            Self::Jks => write!(f, "JKS"),
            Self::Pkcs12 => write!(f, "PKCS12"),
        }
    }
}

/// Additional truststore encodings, at most one of each
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFormats {
    /// JKS truststore request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jks: Option<JksFormat>,

    /// PKCS#12 truststore request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkcs12: Option<Pkcs12Format>,
}

/// Which additional format a key belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdditionalFormat {
    /// `additionalFormats.jks`
    Jks,
    /// `additionalFormats.pkcs12`
    Pkcs12,
}

impl AdditionalFormat {
    /// Field name under `additionalFormats`
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Jks => "jks",
            Self::Pkcs12 => "pkcs12",
        }
    }
}

impl AdditionalFormats {
    /// Key selectors of the requested formats, JKS first
    pub fn selectors(&self) -> Vec<(AdditionalFormat, &KeySelector)> {
        let mut selectors = Vec::with_capacity(2);
        if let Some(jks) = &self.jks {
            selectors.push((AdditionalFormat::Jks, &jks.key_selector));
        }
        if let Some(pkcs12) = &self.pkcs12 {
            selectors.push((AdditionalFormat::Pkcs12, &pkcs12.key_selector));
        }
        selectors
    }

    /// Keys of the requested formats, JKS first
    pub fn keys(&self) -> Vec<(AdditionalFormat, &str)> {
        self.selectors()
            .into_iter()
            .map(|(format, selector)| (format, selector.key.as_str()))
            .collect()
    }
}

/// JKS truststore request
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct JksFormat {
    /// Key and optional password of the JKS entry
    #[serde(flatten)]
    pub key_selector: KeySelector,
}

impl JksFormat {
    /// Explicit password or [`DEFAULT_JKS_PASSWORD`]
    pub fn password(&self) -> &str {
        self.key_selector
            .password
            .as_deref()
            .unwrap_or(DEFAULT_JKS_PASSWORD)
    }
}

/// PKCS#12 truststore request
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct Pkcs12Format {
    /// Key and optional password of the PKCS#12 entry
    #[serde(flatten)]
    pub key_selector: KeySelector,
}

impl Pkcs12Format {
    /// Explicit password or [`DEFAULT_PKCS12_PASSWORD`]
    pub fn password(&self) -> &str {
        self.key_selector
            .password
            .as_deref()
            .unwrap_or(DEFAULT_PKCS12_PASSWORD)
    }
}
