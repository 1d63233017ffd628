//! Update transition guard
//!
//! A target object that has been written may not be dropped from the spec by
//! an update. Deletion of the whole Bundle is not guarded.

use trust_common::crd::{BundleSpec, ObjectKind};
use trust_common::{FieldError, FieldPath};

/// Fault for dropping `spec.target.configMap`, reported at `spec.target.configmap`
pub const MSG_CONFIGMAP_REMOVAL: &str = "target configMap removal is not allowed";
/// Fault for dropping `spec.target.secret`
pub const MSG_SECRET_REMOVAL: &str = "target secret removal is not allowed";

/// Check the `old` -> `new` transition of the spec located at `path`.
///
/// Returns the first illegal removal, configMap before secret. A returned
/// fault rejects the update on its own.
pub fn check_transition(
    old: &BundleSpec,
    new: &BundleSpec,
    path: &FieldPath,
) -> Option<FieldError> {
    ObjectKind::ALL.into_iter().find_map(|kind| {
        let removed = old.target.object(kind).is_some() && new.target.object(kind).is_none();
        removed.then(|| {
            FieldError::invalid(
                path.child("target").child(removal_field(kind)),
                "",
                removal_message(kind),
            )
        })
    })
}

/// Removal faults name the target in lowercase, unlike the schema field
fn removal_field(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::ConfigMap => "configmap",
        ObjectKind::Secret => "secret",
    }
}

fn removal_message(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::ConfigMap => MSG_CONFIGMAP_REMOVAL,
        ObjectKind::Secret => MSG_SECRET_REMOVAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trust_common::crd::{BundleSource, BundleTarget, KeySelector};

    fn spec(cm: Option<&str>, secret: Option<&str>) -> BundleSpec {
        BundleSpec {
            sources: vec![BundleSource {
                use_default_cas: Some(true),
                ..Default::default()
            }],
            target: BundleTarget {
                config_map: cm.map(KeySelector::new),
                secret: secret.map(KeySelector::new),
                ..Default::default()
            },
        }
    }

    fn check(old: &BundleSpec, new: &BundleSpec) -> Option<String> {
        check_transition(old, new, &FieldPath::new("spec")).map(|e| e.to_string())
    }

    #[test]
    fn configmap_removal_is_rejected() {
        assert_eq!(
            check(&spec(Some("ca.crt"), None), &spec(None, Some("ca.crt"))).as_deref(),
            Some("spec.target.configmap: Invalid value: \"\": target configMap removal is not allowed")
        );
    }

    #[test]
    fn secret_removal_is_rejected() {
        assert_eq!(
            check(&spec(Some("ca.crt"), Some("ca.crt")), &spec(Some("ca.crt"), None)).as_deref(),
            Some("spec.target.secret: Invalid value: \"\": target secret removal is not allowed")
        );
    }

    #[test]
    fn configmap_is_reported_before_secret() {
        let fault = check(&spec(Some("a"), Some("b")), &spec(None, None));
        assert!(fault.is_some_and(|f| f.contains("target configMap removal")));
    }

    #[test]
    fn removal_path_uses_lowercase_configmap() {
        let fault = check_transition(
            &spec(Some("a"), Some("a")),
            &spec(None, Some("a")),
            &FieldPath::new("spec"),
        )
        .expect("configMap removed");
        assert_eq!(fault.path.to_string(), "spec.target.configmap");
    }

    #[test]
    fn additions_and_key_changes_are_allowed() {
        assert_eq!(check(&spec(Some("a"), None), &spec(Some("a"), Some("b"))), None);
        assert_eq!(check(&spec(Some("a"), None), &spec(Some("renamed"), None)), None);
        assert_eq!(check(&spec(None, None), &spec(None, None)), None);
    }
}
