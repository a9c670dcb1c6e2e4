use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};

use trailrs::config::{AppConfig, ReportFormat};
use trailrs::error::ErrorSeverity;
use trailrs::export::{self, TrackReport};
use trailrs::logging::{init_logging, LogLevel};
use trailrs::{AnalysisCache, ImportManager, Track, TrackAnalyzer};

/// TrailRS - Activity Track Analytics CLI
///
/// Derives grade, climbing segments, cumulative elevation and mile splits
/// from recorded distance, elevation and time series.
#[derive(Parser)]
#[command(name = "trailrs")]
#[command(author = "TrailRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Activity track analytics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more track files (JSON or CSV)
    Analyze {
        /// Track files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report format (text, json); defaults to the configured format
        #[arg(short = 'f', long)]
        format: Option<ReportFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(level) = LogLevel::from_verbosity(cli.verbose) {
        config.logging.level = level;
    }
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Analyze {
            files,
            format,
            output,
        } => {
            let format = format.unwrap_or(config.output.format);
            run_analyze(&config, &files, format, output.as_deref())?;
        }

        Commands::Config { list, set, get } => {
            run_config(config, cli.config, list, set, get)?;
        }
    }

    Ok(())
}

fn run_analyze(
    config: &AppConfig,
    files: &[PathBuf],
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let manager = ImportManager::new();

    let progress = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut sources: Vec<String> = Vec::new();
    let mut tracks: Vec<Track> = Vec::new();
    for file in files {
        if let Some(pb) = &progress {
            pb.set_message(file.display().to_string());
        }
        match manager.import_file(file) {
            Ok(track) => {
                sources.push(file.display().to_string());
                tracks.push(track);
            }
            Err(e) => {
                match e.severity() {
                    ErrorSeverity::Warning => {
                        tracing::warn!(file = %file.display(), error = %e, "Import failed")
                    }
                    _ => tracing::error!(file = %file.display(), error = %e, "Import failed"),
                }
                eprintln!("{} {}", "✗".red(), e.user_message().red());
            }
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if tracks.is_empty() {
        return Err(anyhow!("No track could be imported"));
    }

    let mut cache = AnalysisCache::new(TrackAnalyzer::new());
    let outcomes = cache.analyze_all(&tracks);

    let reports: Vec<TrackReport> = sources
        .iter()
        .zip(&tracks)
        .zip(&outcomes)
        .map(|((source, track), outcome)| {
            TrackReport::new(source, track.name.as_deref(), outcome)
        })
        .collect();

    match (format, output) {
        (ReportFormat::Json, Some(path)) => {
            if let [report] = reports.as_slice() {
                export::export_json(report, path)?;
            } else {
                export::export_json(&reports, path)?;
            }
        }
        (ReportFormat::Json, None) => {
            let json = if let [report] = reports.as_slice() {
                export::to_json(report)?
            } else {
                export::to_json(&reports)?
            };
            println!("{}", json);
        }
        (ReportFormat::Text, Some(path)) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create report: {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            write_text_reports(&mut writer, config, &reports)?;
            writer.flush()?;
        }
        (ReportFormat::Text, None) => {
            let stdout = std::io::stdout();
            write_text_reports(&mut stdout.lock(), config, &reports)?;
        }
    }

    if let Some(path) = output {
        println!(
            "{} {}",
            "✓ Report written to".green(),
            path.display().to_string().green()
        );
    }

    let unavailable = outcomes.iter().filter(|o| !o.is_available()).count();
    if unavailable > 0 {
        eprintln!(
            "{}",
            format!("{} of {} tracks had no analytics", unavailable, outcomes.len()).yellow()
        );
    }

    Ok(())
}

fn write_text_reports<W: Write>(
    out: &mut W,
    config: &AppConfig,
    reports: &[TrackReport],
) -> Result<()> {
    for report in reports {
        export::write_text_report(out, report.title(), report.analytics, &config.output)?;
    }
    Ok(())
}

fn run_config(
    mut config: AppConfig,
    path: Option<PathBuf>,
    list: bool,
    set: Option<String>,
    get: Option<String>,
) -> Result<()> {
    if list {
        println!("{}", "Configuration:".bold());
        for (key, value) in config.list() {
            println!("  {} = {}", key.cyan(), value);
        }
    } else if let Some(key_value) = set {
        let (key, value) = key_value
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", key_value))?;
        config.set(key.trim(), value.trim())?;

        let path = path.unwrap_or_else(AppConfig::default_config_path);
        config.save_to_file(&path)?;
        println!("{} {} = {}", "✓".green(), key.trim(), value.trim());
    } else if let Some(key) = get {
        println!("{}", config.get(&key)?);
    } else {
        println!(
            "Config file: {}",
            path.unwrap_or_else(AppConfig::default_config_path).display()
        );
    }

    Ok(())
}
