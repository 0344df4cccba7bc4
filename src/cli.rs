use crate::analyzers::StrategyKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bigo")]
#[command(about = "Estimate the time complexity of JavaScript and TypeScript functions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v: debug, -vv: trace); RUST_LOG applies otherwise
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate the complexity of every named function
    Analyze {
        /// Files or directories to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Extraction strategy (overrides the config file)
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Show the evidence behind each estimate
        #[arg(short, long)]
        evidence: bool,

        /// Propagation pass ceiling
        #[arg(
            long = "max-passes",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        max_passes: Option<usize>,

        /// Configuration file (defaults to the nearest .bigo.toml)
        #[arg(short, long, env = "BIGO_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Parse with tree-sitter
    Ast,
    /// Match function shapes with regular expressions
    Pattern,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Text => crate::io::output::OutputFormat::Text,
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
        }
    }
}

impl From<StrategyArg> for StrategyKind {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Ast => StrategyKind::Ast,
            StrategyArg::Pattern => StrategyKind::Pattern,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
