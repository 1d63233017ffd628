//! Pure predicates behind each Bundle invariant
//!
//! Validators turn a failing predicate into a fault; keeping the predicates
//! separate lets each constraint be tested on its own.

use trust_common::crd::{AdditionalFormats, BundleSource, BundleTarget, SourceObjectKeySelector};

/// Exactly one of configMap, secret, inLine, useDefaultCAs=true is set
pub fn defines_exactly_one_source(source: &BundleSource) -> bool {
    source.populated().len() == 1
}

/// Exactly one of name, selector is set
pub fn has_one_object_specifier(selector: &SourceObjectKeySelector) -> bool {
    selector.object_ref().is_some()
}

/// Exactly one of key, includeAllKeys=true is set
pub fn has_one_key_specifier(selector: &SourceObjectKeySelector) -> bool {
    selector.key_ref().is_some()
}

/// No more than one source requests the default CA package
pub fn requests_default_cas_at_most_once(sources: &[BundleSource]) -> bool {
    sources.iter().filter(|s| s.uses_default_cas()).count() <= 1
}

/// At least one of target configMap, secret is set
pub fn defines_a_target(target: &BundleTarget) -> bool {
    target.config_map.is_some() || target.secret.is_some()
}

/// No additional-format key collides with a primary configMap/secret key.
///
/// Empty keys are skipped; they are reported on their own.
pub fn additional_keys_disjoint(target: &BundleTarget) -> bool {
    let primary = target.primary_keys();
    target
        .additional_format_keys()
        .iter()
        .filter(|(_, key)| !key.is_empty())
        .all(|(_, key)| primary.iter().all(|(_, p)| p != key))
}

/// JKS and PKCS12 keys differ when both are requested
pub fn additional_keys_unique(formats: &AdditionalFormats) -> bool {
    match (&formats.jks, &formats.pkcs12) {
        (Some(jks), Some(pkcs12)) => {
            jks.key_selector.key.is_empty() || jks.key_selector.key != pkcs12.key_selector.key
        }
        _ => true,
    }
}

/// The source reads the Bundle's own target entry.
///
/// A source names the target object when its `name` equals the Bundle name,
/// and reads the written entry when its `key` equals the target key.
pub fn is_self_reference(
    bundle_name: &str,
    source: &SourceObjectKeySelector,
    target_key: &str,
) -> bool {
    !bundle_name.is_empty()
        && source.name() == Some(bundle_name)
        && source.key() == Some(target_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
    use trust_common::crd::{JksFormat, KeySelector, Pkcs12Format};

    fn object(name: Option<&str>, key: Option<&str>) -> SourceObjectKeySelector {
        SourceObjectKeySelector {
            name: name.map(String::from),
            key: key.map(String::from),
            ..Default::default()
        }
    }

    fn target(cm: &str, secret: &str, jks: &str, pkcs12: &str) -> BundleTarget {
        let selector = |key: &str| (!key.is_empty()).then(|| KeySelector::new(key));
        BundleTarget {
            config_map: selector(cm),
            secret: selector(secret),
            additional_formats: Some(AdditionalFormats {
                jks: selector(jks).map(|key_selector| JksFormat { key_selector }),
                pkcs12: selector(pkcs12).map(|key_selector| Pkcs12Format { key_selector }),
            }),
            namespace_selector: None,
        }
    }

    #[test]
    fn source_kinds_are_exclusive() {
        let none = BundleSource::default();
        assert!(!defines_exactly_one_source(&none));

        let inline = BundleSource {
            in_line: Some(String::new()),
            ..Default::default()
        };
        assert!(defines_exactly_one_source(&inline));

        let default_false = BundleSource {
            use_default_cas: Some(false),
            ..Default::default()
        };
        assert!(!defines_exactly_one_source(&default_false));

        let multiple = BundleSource {
            in_line: Some(String::new()),
            use_default_cas: Some(true),
            ..Default::default()
        };
        assert!(!defines_exactly_one_source(&multiple));
    }

    #[test]
    fn object_specifier_is_name_xor_selector() {
        assert!(!has_one_object_specifier(&object(None, Some("k"))));
        assert!(has_one_object_specifier(&object(Some("ca"), Some("k"))));

        let mut by_selector = object(None, Some("k"));
        by_selector.selector = Some(LabelSelector::default());
        assert!(has_one_object_specifier(&by_selector));

        by_selector.name = Some("ca".to_string());
        assert!(!has_one_object_specifier(&by_selector));

        // An empty name is unset, leaving the selector as the only specifier
        by_selector.name = Some(String::new());
        assert!(has_one_object_specifier(&by_selector));
    }

    #[test]
    fn key_specifier_is_key_xor_include_all() {
        assert!(!has_one_key_specifier(&object(Some("ca"), None)));
        assert!(has_one_key_specifier(&object(Some("ca"), Some("ca.crt"))));

        let mut all = object(Some("ca"), None);
        all.include_all_keys = Some(true);
        assert!(has_one_key_specifier(&all));

        all.key = Some("ca.crt".to_string());
        assert!(!has_one_key_specifier(&all));

        all.key = Some(String::new());
        assert!(has_one_key_specifier(&all));
    }

    #[test]
    fn default_cas_at_most_once() {
        let default_cas = BundleSource {
            use_default_cas: Some(true),
            ..Default::default()
        };
        assert!(requests_default_cas_at_most_once(&[]));
        assert!(requests_default_cas_at_most_once(&[default_cas.clone()]));
        assert!(!requests_default_cas_at_most_once(&[
            default_cas.clone(),
            default_cas
        ]));
    }

    #[test]
    fn target_requires_configmap_or_secret() {
        assert!(!defines_a_target(&BundleTarget::default()));
        assert!(defines_a_target(&target("c", "", "", "")));
        assert!(defines_a_target(&target("", "s", "", "")));
    }

    #[test]
    fn additional_keys_must_avoid_primary_keys() {
        assert!(additional_keys_disjoint(&target("c", "s", "j", "p")));
        assert!(additional_keys_disjoint(&target("ca.crt", "ca.crt", "", "")));
        assert!(!additional_keys_disjoint(&target("c", "s", "c", "")));
        assert!(!additional_keys_disjoint(&target("c", "s", "", "s")));
        assert!(!additional_keys_disjoint(&target("c", "s", "j", "c")));
    }

    #[test]
    fn additional_keys_must_differ() {
        let formats = |jks: &str, pkcs12: &str| {
            target("c", "", jks, pkcs12)
                .additional_formats
                .unwrap_or_default()
        };
        assert!(additional_keys_unique(&formats("", "")));
        assert!(additional_keys_unique(&formats("trust.jks", "")));
        assert!(additional_keys_unique(&formats("trust.jks", "trust.p12")));
        assert!(!additional_keys_unique(&formats("cacerts", "cacerts")));
    }

    #[test]
    fn self_reference_needs_same_name_and_key() {
        let source = object(Some("my-bundle"), Some("ca.crt"));
        assert!(is_self_reference("my-bundle", &source, "ca.crt"));
        assert!(!is_self_reference("my-bundle", &source, "other.crt"));
        assert!(!is_self_reference("other-bundle", &source, "ca.crt"));
        assert!(!is_self_reference("", &object(Some(""), Some("ca.crt")), "ca.crt"));
    }
}
