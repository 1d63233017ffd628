//! Structural schema checks
//!
//! The API server enforces the OpenAPI constraints of the Bundle CRD before
//! admission runs. Offline callers use [`validate_structure`] to apply the
//! same constraints, with the same messages, ahead of the admission checks.

use trust_common::crd::{BundleSpec, KeySelector, ObjectKind, SourceObjectKeySelector};
use trust_common::{FieldError, FieldErrorList, FieldPath};

/// Minimum number of sources
pub const MIN_SOURCES: usize = 1;
/// Maximum number of sources
pub const MAX_SOURCES: usize = 100;
/// Maximum truststore password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Apply the CRD schema constraints to `spec`
pub fn validate_structure(spec: &BundleSpec) -> FieldErrorList {
    let root = FieldPath::new("spec");
    let mut errors = FieldErrorList::new();

    let sources_path = root.child("sources");
    let count = spec.sources.len();
    if count < MIN_SOURCES {
        errors.push(FieldError::invalid(
            sources_path.clone(),
            count,
            format!("{sources_path} in body should have at least {MIN_SOURCES} items"),
        ));
    } else if count > MAX_SOURCES {
        errors.push(FieldError::invalid(
            sources_path.clone(),
            count,
            format!("{sources_path} in body should have at most {MAX_SOURCES} items"),
        ));
    }

    for (i, source) in spec.sources.iter().enumerate() {
        for kind in ObjectKind::ALL {
            if let Some(object) = source.object(kind) {
                let path = sources_path.index(i).child(kind.field_name());
                source_object(object, &path, &mut errors);
            }
        }
    }

    let target_path = root.child("target");
    for kind in ObjectKind::ALL {
        if let Some(selector) = spec.target.object(kind) {
            key_selector(selector, &target_path.child(kind.field_name()), &mut errors);
        }
    }
    if let Some(formats) = &spec.target.additional_formats {
        let path = target_path.child("additionalFormats");
        for (format, selector) in formats.selectors() {
            key_selector(selector, &path.child(format.field_name()), &mut errors);
        }
    }

    errors
}

fn source_object(object: &SourceObjectKeySelector, path: &FieldPath, errors: &mut FieldErrorList) {
    if let Some(name) = &object.name {
        min_length(name, 1, &path.child("name"), errors);
    }
    if let Some(key) = &object.key {
        min_length(key, 1, &path.child("key"), errors);
    }
}

fn key_selector(selector: &KeySelector, path: &FieldPath, errors: &mut FieldErrorList) {
    min_length(&selector.key, 1, &path.child("key"), errors);
    if let Some(password) = &selector.password {
        let path = path.child("password");
        min_length(password, 1, &path, errors);
        let chars = password.chars().count();
        if chars > MAX_PASSWORD_LENGTH {
            errors.push(FieldError::invalid(
                path.clone(),
                password.as_str(),
                format!("{path} in body should be at most {MAX_PASSWORD_LENGTH} chars long"),
            ));
        }
    }
}

fn min_length(value: &str, min: usize, path: &FieldPath, errors: &mut FieldErrorList) {
    if value.chars().count() < min {
        errors.push(FieldError::invalid(
            path.clone(),
            value,
            format!("{path} in body should be at least {min} chars long"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trust_common::crd::{AdditionalFormats, BundleSource, BundleTarget, Pkcs12Format};

    fn default_cas() -> BundleSource {
        BundleSource {
            use_default_cas: Some(true),
            ..Default::default()
        }
    }

    fn spec(sources: Vec<BundleSource>) -> BundleSpec {
        BundleSpec {
            sources,
            target: BundleTarget {
                config_map: Some(KeySelector::new("ca-bundle.crt")),
                ..Default::default()
            },
        }
    }

    #[test]
    fn source_count_bounds() {
        assert_eq!(
            validate_structure(&spec(vec![])).messages(),
            vec!["spec.sources: Invalid value: 0: spec.sources in body should have at least 1 items"]
        );
        assert!(validate_structure(&spec(vec![default_cas()])).is_empty());
        assert!(validate_structure(&spec(vec![default_cas(); 100])).is_empty());
        assert_eq!(
            validate_structure(&spec(vec![default_cas(); 101])).messages(),
            vec!["spec.sources: Invalid value: 101: spec.sources in body should have at most 100 items"]
        );
    }

    #[test]
    fn empty_source_name_and_key_are_too_short() {
        let source = BundleSource {
            secret: Some(SourceObjectKeySelector {
                name: Some(String::new()),
                key: Some(String::new()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            validate_structure(&spec(vec![source])).messages(),
            vec![
                "spec.sources[0].secret.name: Invalid value: \"\": spec.sources[0].secret.name in body should be at least 1 chars long",
                "spec.sources[0].secret.key: Invalid value: \"\": spec.sources[0].secret.key in body should be at least 1 chars long",
            ]
        );
    }

    #[test]
    fn target_key_and_password_lengths() {
        let mut s = spec(vec![default_cas()]);
        s.target.config_map = Some(KeySelector::new(""));
        s.target.additional_formats = Some(AdditionalFormats {
            jks: None,
            pkcs12: Some(Pkcs12Format {
                key_selector: KeySelector {
                    key: "trust.p12".to_string(),
                    format: None,
                    password: Some("x".repeat(129)),
                },
            }),
        });

        let errors = validate_structure(&s);
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "spec.target.configMap.key",
                "spec.target.additionalFormats.pkcs12.password",
            ]
        );
        assert!(errors.messages()[1].ends_with("should be at most 128 chars long"));
    }

    #[test]
    fn password_at_the_limit_is_accepted() {
        let mut s = spec(vec![default_cas()]);
        s.target.secret = Some(KeySelector {
            key: "trust.jks".to_string(),
            format: None,
            password: Some("x".repeat(128)),
        });
        assert!(validate_structure(&s).is_empty());

        s.target.secret = Some(KeySelector {
            key: "trust.jks".to_string(),
            format: None,
            password: Some(String::new()),
        });
        assert_eq!(validate_structure(&s).len(), 1);
    }
}
