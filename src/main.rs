//! Binary entry point for docreg.
//!
//! This binary provides the CLI interface for the documentation validator.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use docreg::cli::{ReportFormat, render_migration, render_report};
use docreg::config::DocregConfig;
use docreg::observability;
use docreg::services::{
    BulkMigrator, FrontMatterStamper, MigrationManifest, StampOutcome, StampRequest,
};
use docreg::{RunMode, ValidationService};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Docreg - Documentation corpus validator and registry generator.
#[derive(Parser)]
#[command(name = "docreg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Validate documentation and regenerate the registry.
    Validate {
        /// Validate only; do not regenerate the registry.
        #[arg(long, alias = "pre-commit")]
        check_only: bool,

        /// Documentation root (overrides config).
        #[arg(long)]
        docs_root: Option<PathBuf>,

        /// Registry output path (overrides config).
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Output format (text, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Add a front-matter block to a document that lacks one.
    Stamp {
        /// Document to stamp.
        file: PathBuf,

        /// Document identifier, e.g. DOC-2025-00042.
        #[arg(long)]
        doc_id: String,

        /// Document title.
        #[arg(long)]
        title: String,

        /// Tag (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// One-line summary.
        #[arg(long)]
        summary: String,

        /// Document type.
        #[arg(long, default_value = "guide")]
        doc_type: String,

        /// Lifecycle status.
        #[arg(long, default_value = "active")]
        status: String,

        /// Canonical flag.
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        canonical: bool,

        /// Creation date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        created: Option<NaiveDate>,

        /// Print the result instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply a migration manifest: stamp, move, or archive many documents.
    Migrate {
        /// Manifest file (TOML); paths inside resolve against its directory.
        manifest: PathBuf,

        /// Report what would happen without touching any file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_env(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: DocregConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate {
            check_only,
            docs_root,
            registry,
            format,
        } => cmd_validate(config, check_only, docs_root, registry, &format),

        Commands::Stamp {
            file,
            doc_id,
            title,
            tags,
            summary,
            doc_type,
            status,
            canonical,
            created,
            dry_run,
        } => {
            let mut request = StampRequest::new(doc_id, title)
                .with_doc_type(&doc_type)?
                .with_status(&status)?
                .with_canonical(canonical)
                .with_tags(tags)
                .with_summary(summary);
            if let Some(created) = created {
                request = request.with_created(created);
            }
            cmd_stamp(&request, &file, dry_run)
        },

        Commands::Migrate { manifest, dry_run } => cmd_migrate(&manifest, dry_run),

        Commands::Config { show } => cmd_config(&config, show),
    }
}

/// Loads configuration from `--config`, `DOCREG_CONFIG_PATH`, or the defaults.
fn load_config(path: Option<&str>) -> Result<DocregConfig, Box<dyn std::error::Error>> {
    DocregConfig::resolve(path.map(Path::new)).map_err(Into::into)
}

/// Validate command.
fn cmd_validate(
    mut config: DocregConfig,
    check_only: bool,
    docs_root: Option<PathBuf>,
    registry: Option<PathBuf>,
    format: &str,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if let Some(root) = docs_root {
        config = config.with_docs_root(root);
    }
    if let Some(path) = registry {
        config = config.with_registry_path(path);
    }

    let format: ReportFormat = format.parse()?;
    let mode = if check_only {
        RunMode::CheckOnly
    } else {
        RunMode::Full
    };

    if format == ReportFormat::Text {
        println!("Validating documentation...");
        println!();
    }

    let report = ValidationService::new(config).run(mode)?;
    print!("{}", render_report(&report, format));

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Stamp command.
fn cmd_stamp(
    request: &StampRequest,
    file: &Path,
    dry_run: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match FrontMatterStamper::new().stamp_file(request, file, dry_run)? {
        StampOutcome::Stamped(content) if dry_run => print!("{content}"),
        StampOutcome::Stamped(_) => println!("Added front-matter: {}", file.display()),
        StampOutcome::AlreadyStamped => {
            println!("Skipping (has front-matter): {}", file.display());
        },
    }
    Ok(ExitCode::SUCCESS)
}

/// Migrate command.
fn cmd_migrate(
    manifest_path: &Path,
    dry_run: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let manifest = MigrationManifest::load(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));

    println!("Migrating {} entries...", manifest.entries.len());
    println!();
    let stats = BulkMigrator::new(base).with_dry_run(dry_run).run(&manifest)?;
    print!("{}", render_migration(&stats));
    Ok(ExitCode::SUCCESS)
}

/// Config command.
fn cmd_config(config: &DocregConfig, show: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if show {
        print!("{}", config.to_toml()?);
    } else {
        println!("Use --show to display configuration");
    }
    Ok(ExitCode::SUCCESS)
}
