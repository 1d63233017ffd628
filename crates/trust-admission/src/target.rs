//! Target validation

use trust_common::crd::{BundleTarget, KeySelector, ObjectKind};
use trust_common::{FieldError, FieldErrorList, FieldPath};

use crate::predicates::{additional_keys_disjoint, additional_keys_unique, defines_a_target};
use crate::selector::SelectorValidator;

/// Fault for a target with neither configMap nor secret
pub const MSG_AT_LEAST_ONE_TARGET: &str = "must define at least one target configMap/secret";
/// Fault for an additional-format key reusing a primary key
pub const MSG_ADDITIONAL_KEYS_DIFFERENT: &str =
    "additional format keys must be different from configMap/secret keys";
/// Fault for identical JKS and PKCS12 keys
pub const MSG_ADDITIONAL_KEYS_UNIQUE: &str = "additional format keys must be unique";
/// Fault for an empty target key
pub const MSG_KEY_TOO_SHORT: &str = "must be at least 1 char long";

/// Validate `target` located at `path` (normally `spec.target`)
pub fn validate_target<S: SelectorValidator + ?Sized>(
    target: &BundleTarget,
    selectors: &S,
    path: &FieldPath,
) -> FieldErrorList {
    let mut errors = FieldErrorList::new();

    if !defines_a_target(target) {
        errors.push(FieldError::invalid(
            path.clone(),
            "object",
            MSG_AT_LEAST_ONE_TARGET,
        ));
    }

    for (key_path, selector) in key_selectors(target, path) {
        if selector.key.is_empty() {
            errors.push(FieldError::invalid(key_path, "", MSG_KEY_TOO_SHORT));
        }
    }

    if let Some(selector) = &target.namespace_selector {
        errors.extend(selectors.validate(selector).prefixed(&path.child("namespaceSelector")));
    }

    if !additional_keys_disjoint(target) {
        errors.push(FieldError::invalid(
            path.clone(),
            "object",
            MSG_ADDITIONAL_KEYS_DIFFERENT,
        ));
    }

    if let Some(formats) = &target.additional_formats {
        if !additional_keys_unique(formats) {
            errors.push(FieldError::invalid(
                path.clone(),
                "object",
                MSG_ADDITIONAL_KEYS_UNIQUE,
            ));
        }
    }

    errors
}

/// Every key selector in the target with the path of its `key` field
fn key_selectors<'a>(
    target: &'a BundleTarget,
    path: &FieldPath,
) -> Vec<(FieldPath, &'a KeySelector)> {
    let mut selectors = Vec::new();
    for kind in ObjectKind::ALL {
        if let Some(selector) = target.object(kind) {
            selectors.push((path.child(kind.field_name()).child("key"), selector));
        }
    }
    if let Some(formats) = &target.additional_formats {
        let formats_path = path.child("additionalFormats");
        for (format, selector) in formats.selectors() {
            selectors.push((formats_path.child(format.field_name()).child("key"), selector));
        }
    }
    selectors
}
