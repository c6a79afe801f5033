//! SDB - Simulator Debugger
//!
//! Evaluates debugger expressions and replays watchpoint sessions against a
//! simulated RV32 register file and memory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use sdb_common::SdbConfig;
use sdb_engine::{Engine, EngineConfig};

mod cmd;
mod utils;

/// Command-line interface for SDB
#[derive(Debug, Parser)]
#[command(name = "sdb")]
#[command(about = "Simulator Debugger - expression evaluation and watchpoints for instruction-level simulators")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ~/.sdb.toml)
    #[arg(long, env = "SDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to $TMP/sdb-logs/sdb
    #[arg(long)]
    pub log_file: bool,

    /// Initial register value, e.g. `--reg sp=0x80001000` (repeatable)
    #[arg(long = "reg", value_name = "NAME=VALUE", global = true, value_parser = utils::parse_register_assignment)]
    pub registers: Vec<(String, u64)>,

    /// Initial 4-byte memory word, e.g. `--mem 0x80000000=0x413` (repeatable)
    #[arg(long = "mem", value_name = "ADDR=VALUE", global = true, value_parser = utils::parse_memory_assignment)]
    pub memory: Vec<(u64, u64)>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate an expression against the initial machine state
    Eval {
        /// Expression to evaluate; multiple words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Show how an expression is tokenized
    Tokens {
        /// Expression to tokenize; multiple words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Replay a step script with watchpoints
    Run {
        /// TOML script with `watch` expressions and `[[step]]` tables
        script: PathBuf,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    sdb_common::logging::init_logging("sdb", cli.log_file)?;

    let config = match &cli.config {
        Some(path) => SdbConfig::load_from(path)?,
        None => SdbConfig::load()?,
    };
    tracing::debug!(?config, "configuration loaded");

    let mut engine = Engine::new(EngineConfig::from(&config));
    let mut machine = utils::build_machine(&cli.registers, &cli.memory)?;

    match &cli.command {
        Commands::Eval { expression } => {
            cmd::evaluate_expression(&engine, &machine, &expression.join(" "))
        }
        Commands::Tokens { expression } => cmd::show_tokens(&engine, &expression.join(" ")),
        Commands::Run { script, json } => {
            tracing::info!("Running script: {}", script.display());
            cmd::run_script(&mut engine, &mut machine, script, *json)
        }
    }
}
