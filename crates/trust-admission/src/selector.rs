//! Label selector syntax validation
//!
//! Selectors are checked with the same rules the API server applies to
//! `metav1.LabelSelector`. Faults are reported relative to the selector root;
//! callers re-root them with [`FieldErrorList::prefixed`].

#[cfg(test)]
use mockall::automock;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use trust_common::{FieldError, FieldErrorList, FieldPath};

/// Maximum length of a label value and of the name part of a qualified name
pub const LABEL_VALUE_MAX_LENGTH: usize = 63;

/// Maximum length of a DNS-1123 subdomain (qualified name prefix)
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

const QUALIFIED_NAME_FMT: &str = "must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character (e.g. 'MyName',  or 'my.name',  or '123-abc')";
const LABEL_VALUE_FMT: &str = "a valid label must be an empty string or consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character (e.g. 'MyValue',  or 'my_value',  or '12345')";
const DNS1123_SUBDOMAIN_FMT: &str = "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character (e.g. 'example.com')";

/// Checks label selector syntax
///
/// This is the seam to the selector rules owned by the API machinery. The
/// check is synchronous and its faults are definitional, so callers never
/// retry it.
#[cfg_attr(test, automock)]
pub trait SelectorValidator: Send + Sync {
    /// Validate `selector`, returning faults relative to the selector root
    fn validate(&self, selector: &LabelSelector) -> FieldErrorList;
}

/// Default [`SelectorValidator`] implementing the apimachinery rules
#[derive(Clone, Copy, Debug, Default)]
pub struct LabelSelectorValidator;

impl SelectorValidator for LabelSelectorValidator {
    fn validate(&self, selector: &LabelSelector) -> FieldErrorList {
        let root = FieldPath::relative();
        let mut errors = FieldErrorList::new();

        if let Some(labels) = &selector.match_labels {
            let path = root.child("matchLabels");
            for (key, value) in labels {
                for msg in qualified_name_errors(key) {
                    errors.push(FieldError::invalid(path.clone(), key.as_str(), msg));
                }
                for msg in label_value_errors(value) {
                    errors.push(FieldError::invalid(path.clone(), value.as_str(), msg));
                }
            }
        }

        for (i, requirement) in selector.match_expressions.iter().flatten().enumerate() {
            let path = root.child("matchExpressions").index(i);
            errors.extend(validate_requirement(requirement, &path));
        }

        errors
    }
}

fn validate_requirement(
    requirement: &LabelSelectorRequirement,
    path: &FieldPath,
) -> FieldErrorList {
    let mut errors = FieldErrorList::new();
    let values = requirement.values.as_deref().unwrap_or_default();

    match requirement.operator.as_str() {
        "In" | "NotIn" => {
            if values.is_empty() {
                errors.push(FieldError::required(
                    path.child("values"),
                    "must be specified when `operator` is 'In' or 'NotIn'",
                ));
            }
        }
        "Exists" | "DoesNotExist" => {
            if !values.is_empty() {
                errors.push(FieldError::forbidden(
                    path.child("values"),
                    "may not be specified when `operator` is 'Exists' or 'DoesNotExist'",
                ));
            }
        }
        other => errors.push(FieldError::invalid(
            path.child("operator"),
            other,
            "not a valid selector operator",
        )),
    }

    for msg in qualified_name_errors(&requirement.key) {
        errors.push(FieldError::invalid(
            path.child("key"),
            requirement.key.as_str(),
            msg,
        ));
    }

    for (j, value) in values.iter().enumerate() {
        for msg in label_value_errors(value) {
            errors.push(FieldError::invalid(
                path.child("values").index(j),
                value.as_str(),
                msg,
            ));
        }
    }

    errors
}

/// Problems with `value` as a qualified name (`[prefix/]name`)
pub fn qualified_name_errors(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let parts: Vec<&str> = value.split('/').collect();

    let name = match parts.as_slice() {
        [name] => *name,
        [prefix, name] => {
            if prefix.is_empty() {
                errors.push("prefix part must be non-empty".to_string());
            } else {
                errors.extend(
                    dns1123_subdomain_errors(prefix)
                        .into_iter()
                        .map(|msg| format!("prefix part {msg}")),
                );
            }
            *name
        }
        _ => {
            errors.push(format!(
                "a qualified name {QUALIFIED_NAME_FMT} with an optional DNS subdomain prefix and '/' (e.g. 'example.com/MyName')"
            ));
            return errors;
        }
    };

    if name.is_empty() {
        errors.push("name part must be non-empty".to_string());
    } else if name.len() > LABEL_VALUE_MAX_LENGTH {
        errors.push(format!(
            "name part must be no more than {LABEL_VALUE_MAX_LENGTH} characters"
        ));
    }
    if !is_label_token(name) {
        errors.push(format!("name part {QUALIFIED_NAME_FMT}"));
    }

    errors
}

/// Problems with `value` as a label value; empty is valid
pub fn label_value_errors(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.len() > LABEL_VALUE_MAX_LENGTH {
        errors.push(format!(
            "must be no more than {LABEL_VALUE_MAX_LENGTH} characters"
        ));
    }
    if !value.is_empty() && !is_label_token(value) {
        errors.push(LABEL_VALUE_FMT.to_string());
    }
    errors
}

/// Problems with `value` as a lowercase RFC 1123 subdomain
pub fn dns1123_subdomain_errors(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errors.push(format!(
            "must be no more than {DNS1123_SUBDOMAIN_MAX_LENGTH} characters"
        ));
    }
    if !value.split('.').all(is_dns1123_label_token) {
        errors.push(DNS1123_SUBDOMAIN_FMT.to_string());
    }
    errors
}

/// Alphanumeric at both ends, alphanumeric or `-_.` inside
fn is_label_token(s: &str) -> bool {
    let bytes = s.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        }
        _ => false,
    }
}

/// Lowercase alphanumeric at both ends, lowercase alphanumeric or `-` inside
fn is_dns1123_label_token(s: &str) -> bool {
    let lower_alnum = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let bytes = s.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            lower_alnum(first)
                && lower_alnum(last)
                && bytes.iter().all(|b| lower_alnum(b) || *b == b'-')
        }
        _ => false,
    }
}
