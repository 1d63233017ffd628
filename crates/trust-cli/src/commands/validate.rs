//! Validate command
//!
//! Runs Bundle manifests through the same pipeline the API server applies:
//! schema constraints first, then the admission checks.

use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use trust_admission::{validate_structure, BundleValidator, Decision, Operation};
use trust_common::crd::Bundle;
use trust_common::BUNDLE_KIND;

use super::{render_structured, OutputFormat};
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest with one or more Bundles (multi-document YAML)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Previously stored Bundles; validates the change as an update
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Admission operation (default: update with --previous, otherwise create)
    #[arg(long)]
    pub operation: Option<Operation>,

    /// Skip the CRD schema constraints and run only the admission checks
    #[arg(long)]
    pub skip_schema: bool,
}

/// Verdict for one Bundle
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleReport {
    pub name: String,
    pub operation: String,
    pub admitted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<String>,
}

impl BundleReport {
    fn new(name: &str, operation: Operation, decision: Decision) -> Self {
        Self {
            name: name.to_string(),
            operation: operation.to_string(),
            admitted: decision.is_admitted(),
            faults: decision.faults.messages(),
            warnings: decision.warnings,
        }
    }
}

pub fn run(args: ValidateArgs, output: &OutputFormat) -> Result<()> {
    let bundles = load_bundles(&args.file)?;
    let previous = match &args.previous {
        Some(path) => load_bundles(path)?,
        None => Vec::new(),
    };
    let operation = args.operation.unwrap_or(if args.previous.is_some() {
        Operation::Update
    } else {
        Operation::Create
    });

    let reports = evaluate(&bundles, &previous, operation, args.skip_schema)?;
    println!("{}", render(&reports, output)?);

    let rejected = reports.iter().filter(|r| !r.admitted).count();
    if rejected > 0 {
        return Err(Error::validation(format!(
            "{} of {} bundles rejected",
            rejected,
            reports.len()
        )));
    }
    Ok(())
}

fn load_bundles(path: &Path) -> Result<Vec<Bundle>> {
    if !path.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }
    let content = std::fs::read_to_string(path)?;
    parse_bundles(&content)
}

/// Parse every Bundle document in `content`; empty documents are skipped
pub fn parse_bundles(content: &str) -> Result<Vec<Bundle>> {
    let mut bundles = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        let kind = value
            .get("kind")
            .and_then(|k| k.as_str())
            .ok_or_else(|| Error::validation("missing kind"))?;
        if kind != BUNDLE_KIND {
            return Err(Error::validation(format!(
                "unexpected kind {kind}, expected {BUNDLE_KIND}"
            )));
        }

        let bundle = serde_yaml::from_value(value).map_err(|e| {
            Error::Common(trust_common::Error::serialization_for(BUNDLE_KIND, e.to_string()))
        })?;
        bundles.push(bundle);
    }
    Ok(bundles)
}

/// Validate `bundles` for `operation`.
///
/// For updates the previous object is looked up in `previous` by name.
pub fn evaluate(
    bundles: &[Bundle],
    previous: &[Bundle],
    operation: Operation,
    skip_schema: bool,
) -> Result<Vec<BundleReport>> {
    let validator = BundleValidator::new();
    let mut reports = Vec::with_capacity(bundles.len());

    for bundle in bundles {
        let name = bundle.bundle_name();
        let old = previous.iter().find(|p| p.bundle_name() == name);
        if operation == Operation::Update && old.is_none() {
            return Err(Error::validation(format!(
                "no previous Bundle named {name:?}"
            )));
        }

        let decision = match structural_faults(bundle, operation, skip_schema) {
            Some(decision) => decision,
            None => validator.validate(operation, old, bundle)?,
        };
        reports.push(BundleReport::new(name, operation, decision));
    }

    Ok(reports)
}

/// Schema faults stop the pipeline before admission runs
fn structural_faults(bundle: &Bundle, operation: Operation, skip_schema: bool) -> Option<Decision> {
    if skip_schema || operation == Operation::Delete {
        return None;
    }
    let faults = validate_structure(&bundle.spec);
    if faults.is_empty() {
        return None;
    }
    debug!(bundle = %bundle.bundle_name(), faults = faults.len(), "Schema validation failed");
    Some(Decision::from_faults(faults))
}

fn render(reports: &[BundleReport], output: &OutputFormat) -> Result<String> {
    if let Some(rendered) = render_structured(&reports, output)? {
        return Ok(rendered);
    }

    let mut lines = Vec::new();
    for report in reports {
        let verdict = if report.admitted { "admitted" } else { "rejected" };
        lines.push(format!("bundle/{} {} ({})", report.name, verdict, report.operation));
        for warning in &report.warnings {
            lines.push(format!("  warning: {}", warning));
        }
        for fault in &report.faults {
            lines.push(format!("  - {}", fault));
        }
    }
    Ok(lines.join("\n"))
}
