//! Print the Bundle CRD

use kube::CustomResourceExt;
use trust_common::crd::Bundle;

use super::{render_structured, OutputFormat};
use crate::Result;

pub fn run(output: &OutputFormat) -> Result<()> {
    println!("{}", render(output)?);
    Ok(())
}

/// The CRD manifest; YAML unless JSON was asked for
pub fn render(output: &OutputFormat) -> Result<String> {
    let crd = Bundle::crd();
    match render_structured(&crd, output)? {
        Some(rendered) => Ok(rendered),
        None => Ok(serde_yaml::to_string(&crd)?),
    }
}
