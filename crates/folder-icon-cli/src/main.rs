mod commands;
mod logging;
mod progress;
mod prompt;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use folder_icon_core::{AppConfig, FolderIconEngine, Report};
use progress::CliReporter;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match folder_icon_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Process(process_args)) => {
            let mut config = config;
            if process_args.keep_originals {
                config.keep_originals = true;
            }
            let directory = match process_args.directory {
                Some(directory) => directory,
                None => prompt::prompt_directory()?,
            };
            run_process(config, &directory)
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => run_interactive(config),
    }
}

fn run_interactive(config: AppConfig) -> anyhow::Result<()> {
    let directory = prompt::prompt_directory()?;

    if !config.keep_originals {
        let prompt = format!(
            "Converted images in {} will be deleted. Continue?",
            directory.display()
        );
        if !prompt::prompt_confirm(&prompt, Some(true))? {
            info!("Nothing changed.");
            return Ok(());
        }
    }

    run_process(config, &directory)
}

fn run_process(config: AppConfig, directory: &Path) -> anyhow::Result<()> {
    let engine = FolderIconEngine::new(config);
    let reporter = CliReporter::new();
    let report = engine
        .process(directory, &reporter)
        .with_context(|| format!("Failed to process {}", directory.display()))?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &Report) {
    println!();
    if report.is_noop() {
        info!("No image files found in {}", report.directory.display());
        return;
    }

    info!(
        "Convert: {}, Fold: {}",
        format!("{:.2}s", report.convert_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.fold_duration.as_secs_f64()).green(),
    );
    info!(
        "{} converted ({} single-size), {} already icons, {} originals deleted, {} folders",
        format!("{}", report.converted.len()).green(),
        format!("{}", report.degraded.len()).yellow(),
        format!("{}", report.existing_icons.len()).cyan(),
        format!("{}", report.purged.len()).cyan(),
        format!("{}", report.folders.len()).green(),
    );

    for folder in &report.folders {
        println!("  {} {}", "✓".green(), folder.display());
    }

    if report.has_failures() {
        println!(
            "{}",
            format!("{} item(s) had problems:", report.failures.len()).red()
        );
        for failure in &report.failures {
            println!(
                "  {} [{}] {}: {}",
                "✗".red(),
                failure.stage,
                failure.path.display(),
                failure.error
            );
        }
    }

    if !report.folders.is_empty() {
        println!("You may need to refresh Explorer to see the new icons.");
    }
}
