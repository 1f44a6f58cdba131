#![cfg_attr(feature = "strict", deny(warnings))]

pub mod cli;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::CommandFactory;
use kipepeo::{
    Catalog, CatalogError, HttpHubClient, HubClient, ModelDescriptor, Outcome, Summary,
    download_selection,
};

use cli::Cli;

const RULE_WIDTH: usize = 80;

pub fn run(cli: Cli) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    if cli.list {
        return list(&cli, &mut out);
    }

    let client = HttpHubClient::new()?;
    run_with(&cli, &client, &mut out)
}

/// Prints the catalog. Needs no hub client.
pub fn list(cli: &Cli, out: &mut impl Write) -> Result<ExitCode> {
    let catalog = Catalog::load(&cli.config)?;
    print_catalog(out, &catalog)?;
    Ok(ExitCode::SUCCESS)
}

/// Runs the CLI against an arbitrary hub client, writing user-facing output
/// to `out`. Configuration and selection errors are returned; per-model
/// failures only affect the exit code.
pub fn run_with(cli: &Cli, client: &dyn HubClient, out: &mut impl Write) -> Result<ExitCode> {
    if cli.list {
        return list(cli, out);
    }

    let catalog = Catalog::load(&cli.config)?;

    let selection = match catalog.resolve_selection(cli.all, cli.models.as_deref()) {
        Err(CatalogError::NothingSelected) => {
            writeln!(out, "{}", Cli::command().render_help())?;
            return Ok(ExitCode::FAILURE);
        }
        selection => selection?,
    };

    let output_dir = match &cli.output {
        Some(dir) => dir.clone(),
        None => kipepeo::default_output_dir()?,
    };
    tracing::debug!(output_dir = %output_dir.display(), dry_run = cli.dry_run, "resolved selection");

    print_banner(out, &selection, &output_dir, cli.dry_run)?;

    let mut written = Ok(());
    let summary = download_selection(
        &selection,
        &output_dir,
        cli.dry_run,
        client,
        |descriptor, outcome| {
            if written.is_ok() {
                written = print_outcome(out, descriptor, outcome);
            }
        },
    );
    written?;

    print_summary(out, &summary)?;

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn rule(out: &mut impl Write, c: char) -> io::Result<()> {
    writeln!(out, "{}", c.to_string().repeat(RULE_WIDTH))
}

fn print_catalog(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "\nAvailable Models:")?;
    rule(out, '-')?;
    for model in catalog.iter() {
        let size = model
            .size_mb
            .map(|size| size.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        writeln!(
            out,
            "{:<6} | {:>8} MB | {}/{}",
            model.name, size, model.repo_id, model.filename
        )?;
    }
    rule(out, '-')
}

fn print_banner(
    out: &mut impl Write,
    selection: &[&ModelDescriptor],
    output_dir: &Path,
    dry_run: bool,
) -> io::Result<()> {
    let names: Vec<&str> = selection.iter().map(|d| d.name.as_str()).collect();

    writeln!(out)?;
    rule(out, '=')?;
    writeln!(out, "Kipepeo Model Downloader")?;
    rule(out, '=')?;
    writeln!(out, "Models to download: {}", names.join(", "))?;
    writeln!(out, "Output directory: {}", output_dir.display())?;
    writeln!(out, "Dry run: {dry_run}")?;
    rule(out, '=')?;
    writeln!(out)
}

fn print_outcome(
    out: &mut impl Write,
    descriptor: &ModelDescriptor,
    outcome: &Outcome,
) -> io::Result<()> {
    match outcome {
        Outcome::AlreadyPresent(_) => {
            writeln!(out, "✓ Model already exists: {}", descriptor.filename)
        }
        Outcome::WouldDownload(path) => writeln!(
            out,
            "[DRY RUN] Would download: {}/{} -> {}",
            descriptor.repo_id,
            descriptor.filename,
            path.display()
        ),
        Outcome::Downloaded(_) => {
            writeln!(out, "✓ Successfully downloaded: {}", descriptor.filename)
        }
        Outcome::Failed(e) => {
            writeln!(out, "✗ Failed to download {}: {}", descriptor.filename, e)
        }
    }
}

fn print_summary(out: &mut impl Write, summary: &Summary) -> io::Result<()> {
    writeln!(out)?;
    rule(out, '=')?;
    writeln!(
        out,
        "Download Summary: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    )?;
    rule(out, '=')
}
