//! CLI commands

use clap::ValueEnum;
use serde::Serialize;

use crate::Result;

pub mod crd;
pub mod validate;

/// Output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

/// Serialize `value` as JSON or YAML; `None` for text output
pub fn render_structured<T: Serialize>(
    value: &T,
    output: &OutputFormat,
) -> Result<Option<String>> {
    match output {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
    }
}
