use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bigclean")]
#[command(about = "Find and delete oversized files across mounted volumes", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Scan for files above the size threshold")]
    Scan {
        #[arg(short, long, help = "Scan a single mounted volume", conflicts_with = "path")]
        volume: Option<PathBuf>,
        #[arg(short, long, help = "Scan one directory subtree")]
        path: Option<PathBuf>,
        #[arg(short, long, help = "Override the threshold, in MiB")]
        threshold: Option<u64>,
        #[arg(short = 'F', long, default_value = "human")]
        format: OutputFormat,
        #[arg(short, long, help = "Write the scan report to a file")]
        out: Option<String>,
    },
    #[command(about = "Delete files selected from a saved scan report")]
    Delete {
        #[arg(short, long, help = "Scan report produced by 'scan --out'")]
        from: String,
        #[arg(value_name = "PATH", help = "Restrict deletion to these record paths")]
        paths: Vec<PathBuf>,
        #[arg(long, help = "Answer every confirmation prompt with yes")]
        yes: bool,
        #[arg(long, help = "Skip every policy-gated item without prompting")]
        no_gated: bool,
        #[arg(short = 'F', long, default_value = "human")]
        format: OutputFormat,
        #[arg(short, long, help = "Write the deletion report to a file")]
        out: Option<String>,
    },
    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Subcommand)]
pub enum ConfigActions {
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Set a configuration value")]
    Set {
        #[arg(short, long)]
        key: String,
        #[arg(short, long)]
        value: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
