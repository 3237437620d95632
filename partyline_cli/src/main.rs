mod commands;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use partyline_lib::{Db, Engine, EngineConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "partyline")]
#[command(about = "Party-line analysis of congressional roll-call votes")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// SQLite vote store (falls back to PARTYLINE_DB, then the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML config file (falls back to PARTYLINE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank legislators by how often they broke with their caucus
    Summary(commands::summary::SummaryArgs),
    /// Party breakdown of one or more roll calls
    Vote(commands::votes::VoteArgs),
    /// Latest roll call per bill and nomination
    Latest(commands::votes::LatestArgs),
    /// One legislator's party-line record
    Legislator(commands::legislator::LegislatorArgs),
    /// Ballots on a nomination vote
    Nomination(commands::nominations::NominationArgs),
    /// List nomination votes
    Nominations(commands::nominations::NominationsArgs),
    /// One bill and its vote history
    Bill(commands::bills::BillArgs),
    /// List bills that received a recorded vote
    Bills(commands::bills::BillsArgs),
    /// Show the congress session table
    Sessions(commands::check::SessionsArgs),
    /// Report data-quality issues in the store
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("partyline=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        "table" => OutputFormat::Table,
        other => bail!(
            "Invalid --output value: '{}'. Valid options: table, json, csv, markdown",
            other
        ),
    };

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os("PARTYLINE_CONFIG").map(PathBuf::from));
    let config = match config_path {
        Some(ref path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let db_path = cli
        .db
        .clone()
        .or_else(|| std::env::var_os("PARTYLINE_DB").map(PathBuf::from))
        .or_else(|| config.db_path.clone())
        .context("No vote store given. Pass --db, set PARTYLINE_DB, or set db_path in the config file")?;

    let engine = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || open_engine(&db_path, &config)).await??
    };
    tracing::debug!("Loaded snapshot {}", engine.as_of());

    match &cli.command {
        Commands::Summary(args) => commands::summary::run(args, &engine, &config, &format)?,
        Commands::Vote(args) => commands::votes::run_vote(args, &engine, &format)?,
        Commands::Latest(args) => commands::votes::run_latest(args, &engine, &format)?,
        Commands::Legislator(args) => commands::legislator::run(args, &engine, &format)?,
        Commands::Nomination(args) => commands::nominations::run_nomination(args, &engine, &format)?,
        Commands::Nominations(args) => commands::nominations::run_list(args, &engine, &format)?,
        Commands::Bill(args) => commands::bills::run_bill(args, &engine, &format)?,
        Commands::Bills(args) => commands::bills::run_list(args, &engine, &format)?,
        Commands::Sessions(args) => commands::check::run_sessions(args, &engine, &format)?,
        Commands::Check => commands::check::run_check(&engine, &format)?,
    }

    Ok(())
}

fn open_engine(db_path: &Path, config: &EngineConfig) -> Result<Engine> {
    if !db_path.exists() {
        bail!("Vote store not found: {}", db_path.display());
    }
    let db = Db::open(db_path)?;
    Ok(Engine::open(&db, config)?)
}
