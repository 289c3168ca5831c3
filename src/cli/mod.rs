//! CLI definitions.

pub mod commands;

use allocator_core::types::{AllocationMode, UserPortfolio};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "allocator")]
#[command(author, version, about = "Ratio-driven four-asset allocation calculator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "ALLOCATOR_CONFIG")]
    pub config: PathBuf,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Use no network: quotes unavailable, history from `market.history_dir`
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show signals and the target allocation
    Signals(SignalsArgs),
    /// Compare holdings with the target allocation
    Recommend(RecommendArgs),
    /// Write a JSON snapshot of holdings, signals and recommendations
    Export(ExportArgs),
    /// Refresh periodically and report every change
    Watch(WatchArgs),
    /// Answer one quote-service request through the provider chain
    Proxy(ProxyArgs),
    /// Validate configuration and print the effective values
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Simple,
    Extreme,
}

impl From<ModeArg> for AllocationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => AllocationMode::Simple,
            ModeArg::Extreme => AllocationMode::Extreme,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Current holdings in currency units.
#[derive(clap::Args, Clone)]
pub struct PortfolioArgs {
    #[arg(long, default_value = "0")]
    pub stocks: Decimal,

    #[arg(long, default_value = "0")]
    pub gold: Decimal,

    #[arg(long, default_value = "0")]
    pub bonds: Decimal,

    #[arg(long, default_value = "0")]
    pub cash: Decimal,
}

impl PortfolioArgs {
    pub fn portfolio(&self) -> UserPortfolio {
        UserPortfolio::new(self.stocks, self.gold, self.bonds, self.cash)
    }
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Allocation mode, overrides the configured one
    #[arg(short, long)]
    pub mode: Option<ModeArg>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    /// Allocation mode, overrides the configured one
    #[arg(short, long)]
    pub mode: Option<ModeArg>,

    /// HOLD band in percentage points, overrides the configured one
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    /// Allocation mode, overrides the configured one
    #[arg(short, long)]
    pub mode: Option<ModeArg>,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    /// Allocation mode, overrides the configured one
    #[arg(short, long)]
    pub mode: Option<ModeArg>,

    /// Refresh interval in seconds, overrides the configured one
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Enable transition smoothing
    #[arg(long)]
    pub smooth: bool,
}

#[derive(clap::Args)]
pub struct ProxyArgs {
    /// Query parameters as key=value, e.g. endpoint=quote symbol=GLD
    #[arg(required = true, value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}
