use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::model::Tactic;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dvdlite",
    about = "dvdlite - damn vulnerable drone attack-simulation engine",
    version
)]
pub struct Args {
    /// Attack to execute, by registry name
    #[arg(short, long)]
    pub attack: Option<String>,

    /// Comma-separated attack names for a batch run
    #[arg(short, long, value_delimiter = ',')]
    pub batch: Vec<String>,

    /// List all registered attacks and exit
    #[arg(short, long)]
    pub list: bool,

    /// Show scenario details for one attack and exit
    #[arg(short, long)]
    pub info: Option<String>,

    /// Restrict listing to one tactic
    #[arg(long)]
    pub tactic: Option<TacticFilter>,

    /// Target IP override (defaults to the configured target)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Minimum confidence for stored CTI indicators
    #[arg(long, default_value = "60")]
    pub min_confidence: u8,

    /// Export formats for collected CTI indicators
    #[arg(long, value_delimiter = ',')]
    pub export: Vec<ExportFormat>,

    /// Directory for exported CTI files
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Enable verbose logging of all operations
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide progress bars and use quiet output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum TacticFilter {
    Recon,
    Tampering,
    Dos,
    Injection,
    Exfiltration,
    Firmware,
}

impl From<TacticFilter> for Tactic {
    fn from(filter: TacticFilter) -> Self {
        match filter {
            TacticFilter::Recon => Tactic::Reconnaissance,
            TacticFilter::Tampering => Tactic::ProtocolTampering,
            TacticFilter::Dos => Tactic::DenialOfService,
            TacticFilter::Injection => Tactic::Injection,
            TacticFilter::Exfiltration => Tactic::Exfiltration,
            TacticFilter::Firmware => Tactic::FirmwareAttacks,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ExportFormat {
    Json,
    Csv,
}
