//! crdify - evaluate changes to Kubernetes CustomResourceDefinitions

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use console::style;
use crdify_core::{Config, Format, Runner};
use miette::{IntoDiagnostic, Result, WrapErr};

mod exit_codes;
mod loaders;

/// crdify evaluates changes to Kubernetes CustomResourceDefinitions, helping
/// cluster administrators, GitOps practitioners, and extension developers
/// catch changes that would break existing clusters or users.
///
/// References name where each CRD revision comes from:
///
///   crdify file://old.yaml file://new.yaml
///   crdify git://main?path=crds/widget.yaml file://crds/widget.yaml
#[derive(Parser)]
#[command(name = "crdify")]
#[command(version)]
#[command(about = "Evaluate changes to Kubernetes CustomResourceDefinitions")]
#[command(propagate_version = true)]
struct Cli {
    /// Reference to the old CRD revision
    old: String,

    /// Reference to the new CRD revision
    new: String,

    /// Filepath to load check configuration from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format for identified incompatibilities
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plaintext)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Plaintext,
    Markdown,
    Json,
    Yaml,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Format {
        match format {
            OutputFormat::Plaintext => Format::PlainText,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    let runner = Runner::new(&config)
        .into_diagnostic()
        .wrap_err("configuring validation runner")?;

    let old = loaders::load(&cli.old)
        .into_diagnostic()
        .wrap_err_with(|| format!("loading old CustomResourceDefinition {}", cli.old))?;
    let new = loaders::load(&cli.new)
        .into_diagnostic()
        .wrap_err_with(|| format!("loading new CustomResourceDefinition {}", cli.new))?;

    let results = runner
        .run(&old, &new)
        .into_diagnostic()
        .wrap_err("comparing CustomResourceDefinitions")?;

    let report = results
        .render(cli.output.into())
        .into_diagnostic()
        .wrap_err("rendering results")?;
    print!("{report}");

    if results.has_failures() {
        eprintln!(
            "{} incompatible changes detected in {}",
            style("✗").red(),
            new.name()
        );
        std::process::exit(exit_codes::INCOMPATIBLE);
    }

    std::process::exit(exit_codes::SUCCESS);
}
