//! Admission decision for Bundle create, update and delete
//!
//! [`BundleValidator`] runs the mutation guard (updates only), then the
//! source and target validators, and folds every fault into one
//! [`Decision`].

use tracing::{debug, info, warn};
use trust_common::crd::{Bundle, BundleSpec};
use trust_common::{Error, FieldErrorList, FieldPath, Result};

use crate::guard::check_transition;
use crate::selector::{LabelSelectorValidator, SelectorValidator};
use crate::source::validate_sources;
use crate::target::validate_target;

/// Kind of admission request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A new Bundle
    Create,
    /// A change to an existing Bundle
    Update,
    /// Removal of a Bundle
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::bad_request(format!(
                "invalid operation: {s}, expected one of: create, update, delete"
            ))),
        }
    }
}

/// Outcome of validating one request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decision {
    /// Non-fatal notices for the caller
    pub warnings: Vec<String>,
    /// Every fault found; empty means admitted
    pub faults: FieldErrorList,
}

impl Decision {
    /// Admitted with no warnings
    pub fn admitted() -> Self {
        Self::default()
    }

    /// Decision carrying `faults`; admitted when the list is empty
    pub fn from_faults(faults: FieldErrorList) -> Self {
        Self {
            warnings: Vec::new(),
            faults,
        }
    }

    /// True when no fault was found
    pub fn is_admitted(&self) -> bool {
        self.faults.is_empty()
    }

    /// Warnings when admitted, otherwise [`Error::Invalid`] with every fault
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.faults.is_empty() {
            Ok(self.warnings)
        } else {
            Err(Error::Invalid(self.faults))
        }
    }
}

/// Validates Bundles on admission.
///
/// Holds no per-request state; one instance can serve concurrent requests.
#[derive(Clone, Debug, Default)]
pub struct BundleValidator<S = LabelSelectorValidator> {
    selectors: S,
}

impl BundleValidator {
    /// Validator using the built-in label selector rules
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: SelectorValidator> BundleValidator<S> {
    /// Validator delegating selector checks to `selectors`
    pub fn with_selector_validator(selectors: S) -> Self {
        Self { selectors }
    }

    /// Validate a new Bundle
    pub fn validate_create(&self, bundle: &Bundle) -> Decision {
        let name = bundle.bundle_name();
        debug!(bundle = %name, operation = %Operation::Create, "Received validation request");
        self.decide(name, self.validate_spec(name, &bundle.spec))
    }

    /// Validate an update from `old` to `new`.
    ///
    /// An illegal target removal rejects the update without running any
    /// other check.
    pub fn validate_update(&self, old: &Bundle, new: &Bundle) -> Decision {
        let name = new.bundle_name();
        debug!(bundle = %name, operation = %Operation::Update, "Received validation request");

        if let Some(fault) = check_transition(&old.spec, &new.spec, &FieldPath::new("spec")) {
            warn!(bundle = %name, path = %fault.path, "Rejected target removal");
            return Decision::from_faults(FieldErrorList::from(vec![fault]));
        }

        self.decide(name, self.validate_spec(name, &new.spec))
    }

    /// Validate removal of a Bundle; always admitted
    pub fn validate_delete(&self, bundle: &Bundle) -> Decision {
        debug!(bundle = %bundle.bundle_name(), operation = %Operation::Delete, "Received validation request");
        Decision::admitted()
    }

    /// Dispatch on `operation`.
    ///
    /// Fails with [`Error::BadRequest`] for an update without the previous
    /// object.
    pub fn validate(
        &self,
        operation: Operation,
        old: Option<&Bundle>,
        new: &Bundle,
    ) -> Result<Decision> {
        match operation {
            Operation::Create => Ok(self.validate_create(new)),
            Operation::Update => {
                let old = old.ok_or_else(|| {
                    Error::bad_request("update requires the previous Bundle")
                })?;
                Ok(self.validate_update(old, new))
            }
            Operation::Delete => Ok(self.validate_delete(new)),
        }
    }

    /// Source faults in source order, then target faults
    fn validate_spec(&self, name: &str, spec: &BundleSpec) -> FieldErrorList {
        let path = FieldPath::new("spec");
        let mut faults = validate_sources(name, spec, &self.selectors, &path);
        faults.extend(validate_target(&spec.target, &self.selectors, &path.child("target")));
        faults
    }

    fn decide(&self, name: &str, faults: FieldErrorList) -> Decision {
        if !faults.is_empty() {
            info!(bundle = %name, faults = faults.len(), "Bundle rejected");
        }
        Decision::from_faults(faults)
    }
}
