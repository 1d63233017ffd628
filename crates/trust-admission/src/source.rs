//! Source validation
//!
//! Checks every source entry and the source list as a whole. Faults are
//! accumulated in source order; nothing here stops early.

use trust_common::crd::{BundleSpec, ObjectKind, SourceObjectKeySelector};
use trust_common::{FieldError, FieldErrorList, FieldPath};

use crate::predicates::{
    defines_exactly_one_source, has_one_key_specifier, has_one_object_specifier,
    is_self_reference, requests_default_cas_at_most_once,
};
use crate::selector::SelectorValidator;

/// Fault for a source entry with zero or several kinds populated
pub const MSG_EXACTLY_ONE_SOURCE: &str = "must define exactly one source";
/// Fault for a source object with zero or both of name/selector
pub const MSG_ONE_OBJECT_SPECIFIER: &str = "must specify one and only one of {name, selector}";
/// Fault for a source object with zero or both of key/includeAllKeys
pub const MSG_ONE_KEY_SPECIFIER: &str = "must specify key or includeAllKeys";
/// Fault for more than one default CA request
pub const MSG_DEFAULT_CAS_ONCE: &str = "must request default CAs at most once";
/// Fault for a source that reads the Bundle's own target entry
pub const MSG_SAME_SOURCE_AS_TARGET: &str = "cannot define the same source as target";

/// Validate the sources of `spec` for a Bundle named `bundle_name`.
///
/// `path` is the location of the spec (normally `spec`).
pub fn validate_sources<S: SelectorValidator + ?Sized>(
    bundle_name: &str,
    spec: &BundleSpec,
    selectors: &S,
    path: &FieldPath,
) -> FieldErrorList {
    let mut errors = FieldErrorList::new();
    let sources_path = path.child("sources");

    for (i, source) in spec.sources.iter().enumerate() {
        let source_path = sources_path.index(i);

        if !defines_exactly_one_source(source) {
            errors.push(FieldError::invalid(
                source_path.clone(),
                "object",
                MSG_EXACTLY_ONE_SOURCE,
            ));
        }

        for kind in ObjectKind::ALL {
            let Some(object) = source.object(kind) else {
                continue;
            };
            let object_path = source_path.child(kind.field_name());

            errors.extend(validate_object_selector(object, selectors, &object_path));

            if let Some(target) = spec.target.object(kind) {
                if is_self_reference(bundle_name, object, &target.key) {
                    errors.push(FieldError::forbidden(object_path, MSG_SAME_SOURCE_AS_TARGET));
                }
            }
        }
    }

    if !requests_default_cas_at_most_once(&spec.sources) {
        errors.push(FieldError::invalid(
            sources_path,
            "array",
            MSG_DEFAULT_CAS_ONCE,
        ));
    }

    errors
}

/// Validate one ConfigMap/Secret source reference located at `path`
pub fn validate_object_selector<S: SelectorValidator + ?Sized>(
    object: &SourceObjectKeySelector,
    selectors: &S,
    path: &FieldPath,
) -> FieldErrorList {
    let mut errors = FieldErrorList::new();

    if !has_one_object_specifier(object) {
        errors.push(FieldError::invalid(
            path.clone(),
            "object",
            MSG_ONE_OBJECT_SPECIFIER,
        ));
    }

    if !has_one_key_specifier(object) {
        errors.push(FieldError::invalid(
            path.clone(),
            "object",
            MSG_ONE_KEY_SPECIFIER,
        ));
    }

    if let Some(selector) = &object.selector {
        errors.extend(selectors.validate(selector).prefixed(&path.child("selector")));
    }

    errors
}
