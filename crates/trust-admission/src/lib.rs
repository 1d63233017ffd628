//! Admission validation for trust Bundles
//!
//! Decides whether a Bundle create, update or delete is admitted. Every
//! fault found is reported at once; only a rejected target removal on
//! update stops validation early.

#![deny(missing_docs)]

pub mod guard;
pub mod predicates;
pub mod schema;
pub mod selector;
pub mod source;
pub mod target;
pub mod validator;

pub use guard::check_transition;
pub use schema::validate_structure;
pub use selector::{LabelSelectorValidator, SelectorValidator};
pub use source::validate_sources;
pub use target::validate_target;
pub use validator::{BundleValidator, Decision, Operation};
