//! trust-bundle CLI library

pub mod commands;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

use commands::OutputFormat;

/// trust-bundle - validate trust Bundle manifests
#[derive(Parser, Debug)]
#[command(name = "trust-bundle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(
        short,
        long,
        env = "TRUST_BUNDLE_OUTPUT",
        default_value = "text",
        global = true
    )]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate Bundle manifests the way admission would
    Validate(commands::validate::ValidateArgs),
    /// Print the Bundle CustomResourceDefinition
    Crd,
}

impl Cli {
    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Validate(args) => commands::validate::run(args, &self.output),
            Commands::Crd => commands::crd::run(&self.output),
        }
    }
}
