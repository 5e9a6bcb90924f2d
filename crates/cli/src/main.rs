//! AzureRM migration tracker CLI
//!
//! Thin console consumer of the scanner engine: per-service migration
//! reports, offender listings, and CSV emission of totals across released
//! versions for charting.

use anyhow::{Context, Result};
use azurerm_migration_tracker_scanner::{Repo, SdkMarkers, Version};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "azurerm-migration-tracker")]
#[command(version, about = "Track SDK migration progress across the AzureRM provider", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML file overriding the built-in SDK marker table
    #[arg(long, global = true)]
    markers: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-service migration report for the current working tree
    #[command(after_help = "EXAMPLES:\n  \
        # Colored console report\n  \
        azurerm-migration-tracker report ../terraform-provider-azurerm\n\n  \
        # Markdown checklist for the tracking issue\n  \
        azurerm-migration-tracker report ../terraform-provider-azurerm --format issue")]
    Report {
        /// Path to the provider working tree
        repo: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "console")]
        format: ReportFormat,
    },

    /// List resources and data sources that still need migration
    List {
        /// Path to the provider working tree
        repo: PathBuf,

        /// Which offenders to list
        #[arg(value_enum)]
        kind: ListKind,
    },

    /// Check out and scan every release tag, writing totals-over-time CSVs
    #[command(after_help = "Checks out tags in place, newest first, so the \
        working tree must be disposable. Hotfix releases (patch != 0) are \
        skipped.")]
    History {
        /// Path to the provider git working directory
        repo: PathBuf,

        /// Oldest tag to scan down to
        #[arg(long, default_value = "v2.10.0")]
        until: String,

        /// Output directory for the CSV files
        #[arg(long, default_value = "graphs")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Console,
    Issue,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListKind {
    /// Files still referencing the legacy SDK generation
    Legacy,
    /// Elements not yet converted to the typed interface
    Typed,
    /// Untyped resources sharing one create/update function
    CreateUpdate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let markers = match &cli.markers {
        Some(path) => SdkMarkers::from_file(path)
            .with_context(|| format!("loading marker rules from {}", path.display()))?,
        None => SdkMarkers::default(),
    };

    match cli.command {
        Commands::Report { repo, format } => report_command(&repo, format, &markers),
        Commands::List { repo, kind } => list_command(&repo, kind, &markers),
        Commands::History { repo, until, out } => history_command(&repo, &until, &out, &markers),
    }
}

/// Scan whatever is currently on disk as a synthetic `main` version
fn scan_working_tree(repo: &Path, markers: &SdkMarkers) -> Result<Version> {
    println!(
        "{} Scanning {}...",
        "→".cyan(),
        repo.display().to_string().cyan()
    );

    let mut version = Version::working_tree("main", repo);
    version
        .scan_services(markers)
        .with_context(|| format!("scanning services under {}", repo.display()))?;

    let totals = version.totals();
    println!(
        "{} {} services with {} resources and {} data sources",
        "✓".green(),
        version.services.len().to_string().magenta(),
        totals.resources,
        totals.data_sources,
    );

    Ok(version)
}

fn report_command(repo: &Path, format: ReportFormat, markers: &SdkMarkers) -> Result<()> {
    let version = scan_working_tree(repo, markers)?;

    match format {
        ReportFormat::Console => report_console(&version),
        ReportFormat::Issue => report_issue(&version),
    }

    Ok(())
}

fn report_console(version: &Version) {
    let mut fully_migrated = 0;
    let mut partially_migrated = 0;
    let mut using_legacy = 0;

    for service in &version.services {
        let t = service.totals();
        let count = t.element_count();

        // nothing to report for services already done
        if t.sdk_modern > 0 && t.sdk_legacy == 0 && t.sdk_both == 0 {
            fully_migrated += 1;
            continue;
        }
        if t.sdk_both > 0 {
            partially_migrated += 1;
        }
        if t.sdk_legacy > 0 {
            using_legacy += 1;
        }

        println!(
            " {} ({} resources, {} data sources)",
            service.name.cyan(),
            service.resources.len().to_string().magenta(),
            service.data_sources.len().to_string().magenta(),
        );

        if t.sdk_both != 0 {
            println!(
                "    Modern SDK: {} / {} ({} partial)",
                t.sdk_modern - t.sdk_both,
                count,
                t.sdk_both
            );
        } else {
            println!("    Modern SDK: {} / {}", t.sdk_modern, count);
        }
        println!("    Typed:      {} / {}", t.typed, count);
        println!();
    }

    println!("Services fully migrated: {fully_migrated}");
    println!("Services partially migrated: {partially_migrated}");
    println!("Services still using the legacy SDK: {using_legacy}");
}

/// Markdown checklist in the shape the migration tracking issue expects
fn report_issue(version: &Version) {
    println!();
    println!("## Service Packages");
    println!();

    let mut services_done = 0;
    let mut services_partial = 0;
    let mut elements_total = 0;
    let mut elements_done = 0;
    let mut elements_partial = 0;

    for service in &version.services {
        let t = service.totals();
        let count = t.element_count();

        let done = t.sdk_legacy == 0 && t.sdk_both == 0;
        if done {
            services_done += 1;
        }
        if t.sdk_both != 0 {
            services_partial += 1;
        }

        elements_total += count;
        elements_done += t.sdk_modern - t.sdk_both;
        elements_partial += t.sdk_both;

        if done {
            println!("- [X] `{}` _({})_", service.name, count);
        } else {
            println!(
                "- [ ] `{}` _({}/{})_",
                service.name,
                t.sdk_modern - t.sdk_both,
                count
            );
        }
    }

    println!();
    println!(
        "services: {} of {} (+{} partial)",
        services_done,
        version.services.len(),
        services_partial
    );
    println!(
        "resources/datasources: {} of {} (+{} partial)",
        elements_done, elements_total, elements_partial
    );
}

fn list_command(repo: &Path, kind: ListKind, markers: &SdkMarkers) -> Result<()> {
    let version = scan_working_tree(repo, markers)?;

    match kind {
        ListKind::Legacy => list_legacy(&version),
        ListKind::Typed => list_typed(&version),
        ListKind::CreateUpdate => list_create_update(&version),
    }

    Ok(())
}

fn list_legacy(version: &Version) {
    let mut total = 0;
    let mut to_migrate = 0;

    for service in &version.services {
        let t = service.totals();
        total += t.element_count();

        if t.sdk_legacy == 0 {
            continue;
        }
        to_migrate += t.sdk_legacy;

        println!(
            " {} ({}/{} using the legacy SDK)",
            service.name.cyan(),
            t.sdk_legacy.to_string().magenta(),
            t.element_count().to_string().magenta(),
        );

        for element in service.filter_elements(|e| e.info().uses_sdk_legacy) {
            let info = element.info();
            if info.uses_sdk_modern {
                println!(
                    "    {}/{} {}",
                    info.service_path.display().to_string().dimmed(),
                    info.file_name,
                    "(partial)".yellow()
                );
            } else {
                println!(
                    "    {}/{}",
                    info.service_path.display().to_string().dimmed(),
                    info.file_name
                );
            }
        }
        println!();
    }

    println!();
    println!(
        "{}/{} resources and data sources still using the legacy SDK",
        to_migrate.to_string().red(),
        total.to_string().yellow(),
    );
}

fn list_typed(version: &Version) {
    let mut total = 0;
    let mut to_migrate = 0;

    for service in &version.services {
        let t = service.totals();
        total += t.element_count();

        let count = t.element_count();
        if t.typed == count {
            continue;
        }
        to_migrate += count - t.typed;

        println!(
            " {} ({} not typed)",
            service.name.cyan(),
            (count - t.typed).to_string().magenta(),
        );

        for element in service.filter_elements(|e| !e.info().is_typed) {
            let info = element.info();
            println!(
                "    {}/{}",
                info.service_path.display().to_string().dimmed(),
                info.file_name
            );
        }
        println!();
    }

    println!();
    println!(
        "{}/{} resources and data sources still to convert to the typed interface",
        to_migrate.to_string().red(),
        total.to_string().yellow(),
    );
}

fn list_create_update(version: &Version) {
    let mut total = 0;
    let mut to_migrate = 0;

    for service in &version.services {
        let t = service.totals();
        total += t.element_count();

        if t.create_update == 0 {
            continue;
        }
        to_migrate += t.create_update;

        println!(
            " {} ({} sharing a create/update function)",
            service.name.cyan(),
            t.create_update.to_string().magenta(),
        );

        for element in service.filter_elements(|e| e.shared_create_update()) {
            let info = element.info();
            println!(
                "    {}/{}",
                info.service_path.display().to_string().dimmed(),
                info.file_name
            );
        }
        println!();
    }

    println!();
    println!(
        "{}/{} resources that need their shared create/update function split",
        to_migrate.to_string().red(),
        total.to_string().yellow(),
    );
}

fn history_command(repo_path: &Path, until: &str, out: &Path, markers: &SdkMarkers) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    println!(
        "{} Scanning {}...",
        "→".cyan(),
        repo_path.display().to_string().cyan()
    );

    let repo = Repo::open(repo_path)
        .with_context(|| format!("opening repository {}", repo_path.display()))?;
    let versions = repo.versions().context("listing release tags")?;
    println!(
        "{} found {} release tags",
        "✓".green(),
        versions.len().to_string().green()
    );

    let mut scanned = Vec::new();
    for mut version in versions {
        // hotfix releases track their minor release, nothing new to chart
        if !version.name.ends_with(".0") {
            println!("  {} {} skipped (hotfix)", "→".cyan(), version.name.green());
            continue;
        }

        println!("  {} checking out {}...", "→".cyan(), version.name.green());
        repo.checkout_tag(&version.name)
            .with_context(|| format!("checking out {}", version.name))?;
        version
            .scan_services(markers)
            .with_context(|| format!("scanning services for {}", version.name))?;

        let totals = version.totals();
        println!(
            "    {} services, {} resources and {} data sources",
            totals.services.to_string().magenta(),
            totals.resources.to_string().cyan(),
            totals.data_sources.to_string().blue(),
        );

        let reached_cutoff = version.name == until;
        scanned.push(version);
        if reached_cutoff {
            break;
        }
    }

    // oldest first for charting consumers
    scanned.reverse();

    write_elements_csv(&scanned, out)?;
    write_migration_csv(&scanned, out)?;

    Ok(())
}

fn write_elements_csv(versions: &[Version], out: &Path) -> Result<()> {
    let mut csv = String::from("version,services,resources,data-sources\n");
    for version in versions {
        let t = version.totals();
        csv.push_str(&format!(
            "{},{},{},{}\n",
            version.name, t.services, t.resources, t.data_sources
        ));
    }

    let path = out.join("resources-data-sources.csv");
    fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?;
    println!("{} wrote {}", "✓".green(), path.display());

    Ok(())
}

fn write_migration_csv(versions: &[Version], out: &Path) -> Result<()> {
    let mut csv = String::from(
        "version,services,resources,resources-migrated,data-sources,data-sources-migrated\n",
    );
    for version in versions {
        let t = version.totals();
        let resources = version.resource_totals();
        let data_sources = version.data_source_totals();
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            version.name,
            t.services,
            t.resources,
            resources.sdk_modern,
            t.data_sources,
            data_sources.sdk_modern
        ));
    }

    let path = out.join("sdk-migration.csv");
    fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?;
    println!("{} wrote {}", "✓".green(), path.display());

    Ok(())
}
