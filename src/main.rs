mod cleaner;
mod cli;
mod config;
mod error;
mod output;
mod safety;
mod scanner;
mod utils;
mod volumes;

use anyhow::{anyhow, Result};
use cleaner::{DeleteEvent, DeletionPipeline, OutcomeStatus};
use cli::{Cli, Commands, ConfigActions, OutputFormat};
use config::Config;
use output::{DeleteReport, ScanReport};
use safety::PolicyGate;
use scanner::{FileRecord, ScanCoordinator, ScanEvent};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use utils::format_size;
use volumes::ScanRoot;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = match Config::load() {
        Ok(config) => run(cli, config),
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    match cli.command {
        Commands::Scan {
            volume,
            path,
            threshold,
            format,
            out,
        } => run_scan(volume, path, threshold, format, out.as_deref(), &config)?,
        Commands::Delete {
            from,
            paths,
            yes,
            no_gated,
            format,
            out,
        } => run_delete(&from, &paths, yes, no_gated, format, out.as_deref(), &config)?,
        Commands::Config { action } => run_config(action, config)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn run_scan(
    volume: Option<PathBuf>,
    path: Option<PathBuf>,
    threshold_mib: Option<u64>,
    format: OutputFormat,
    out: Option<&str>,
    config: &Config,
) -> Result<()> {
    let mode = if let Some(dir) = path {
        ScanRoot::Subtree(dir)
    } else if let Some(mount) = volume {
        ScanRoot::Volume(mount)
    } else {
        ScanRoot::AllVolumes
    };

    let threshold = threshold_mib
        .map(|mib| mib * 1024 * 1024)
        .unwrap_or(config.scan.threshold_bytes);

    let coordinator = ScanCoordinator::new(threshold);
    // Root validation happens here, before any progress is shown.
    let session = coordinator.scan(&mode)?;
    let roots = session.roots.clone();

    let human = matches!(format, OutputFormat::Human);
    if human {
        println!(
            "Scanning {} root(s) for files >= {}",
            roots.len(),
            format_size(threshold)
        );
    }

    let mut progress = session.progress();
    let mut records: Vec<FileRecord> = Vec::new();
    let mut summary = None;

    for event in session.events.iter() {
        match event {
            ScanEvent::Found(record) => {
                if human {
                    println!(
                        "  {:>12}  {}  [{}]",
                        format_size(record.size_bytes),
                        record.path.display(),
                        record.volume
                    );
                }
                records.push(record);
            }
            ScanEvent::RootDone { root } => {
                progress.root_done();
                if human {
                    println!("[{:>3}%] finished {}", progress.percent(), root.display());
                }
            }
            ScanEvent::Complete(s) => summary = Some(s),
        }
    }

    let summary = summary.ok_or_else(|| anyhow!("scan worker exited without completing"))?;
    debug_assert!(progress.is_complete());
    if human {
        println!(
            "Scan complete: {} file(s), {}",
            summary.record_count,
            format_size(summary.total_bytes)
        );
    }

    let report = ScanReport::new(roots, threshold, records, &summary);
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(out_path) = out {
        fs::write(out_path, &json)?;
        if human {
            println!("Report written to {}", out_path);
        }
    }
    if matches!(format, OutputFormat::Json) {
        println!("{}", json);
    }

    Ok(())
}

fn run_delete(
    from: &str,
    paths: &[PathBuf],
    yes: bool,
    no_gated: bool,
    format: OutputFormat,
    out: Option<&str>,
    config: &Config,
) -> Result<()> {
    let content = fs::read_to_string(from)?;
    let report: ScanReport = serde_json::from_str(&content)?;

    let selected: Vec<FileRecord> = if paths.is_empty() {
        report.records
    } else {
        report
            .records
            .into_iter()
            .filter(|record| paths.iter().any(|p| p == &record.path))
            .collect()
    };

    let human = matches!(format, OutputFormat::Human);
    if selected.is_empty() {
        if human {
            println!("No records selected from {}", from);
        }
        return Ok(());
    }

    let gate = PolicyGate::new(config.delete.system_volume.clone());
    let pipeline = DeletionPipeline::new(gate).with_fallback(config.delete.use_fallback);

    let confirm: Box<dyn Fn(&Path) -> bool + Send> = if yes {
        Box::new(|_| true)
    } else if no_gated {
        Box::new(|_| false)
    } else {
        Box::new(prompt_confirm)
    };

    if human {
        println!("Deleting {} file(s)", selected.len());
    }

    let session = pipeline.delete(selected, confirm);
    let mut progress = session.progress();
    let mut outcomes = Vec::new();
    let mut summary = None;

    for event in session.events.iter() {
        match event {
            DeleteEvent::Outcome(outcome) => {
                progress.item_done();
                if human {
                    let line = match outcome.status {
                        OutcomeStatus::Deleted => format!("Deleted: {}", outcome.path.display()),
                        OutcomeStatus::Skipped => format!("Skipped: {}", outcome.path.display()),
                        OutcomeStatus::Failed => format!(
                            "Failed: {} ({})",
                            outcome.path.display(),
                            outcome.detail.as_deref().unwrap_or("unknown error")
                        ),
                    };
                    println!("[{:>3}%] {}", progress.percent(), line);
                }
                outcomes.push(outcome);
            }
            DeleteEvent::Complete(s) => summary = Some(s),
        }
    }

    let summary = summary.ok_or_else(|| anyhow!("deletion worker exited without completing"))?;
    debug_assert!(progress.is_complete());
    if human {
        println!(
            "Done: {} deleted, {} skipped, {} failed, freed {}",
            summary.deleted,
            summary.skipped,
            summary.failed,
            format_size(summary.bytes_freed)
        );
    }

    let delete_report = DeleteReport::new(Some(from.to_string()), outcomes, &summary);
    let json = serde_json::to_string_pretty(&delete_report)?;

    if let Some(out_path) = out {
        fs::write(out_path, &json)?;
        if human {
            println!("Report written to {}", out_path);
        }
    }
    if matches!(format, OutputFormat::Json) {
        println!("{}", json);
    }

    Ok(())
}

/// Modal prompt for policy-gated paths. Runs on the pipeline worker and
/// blocks it until answered; anything but an explicit yes declines.
fn prompt_confirm(path: &Path) -> bool {
    print!(
        "Allow delete on the system volume for {}? [y/N] ",
        path.display()
    );
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}

fn run_config(action: ConfigActions, mut config: Config) -> Result<()> {
    match action {
        ConfigActions::Show => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigActions::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
    }
    Ok(())
}
