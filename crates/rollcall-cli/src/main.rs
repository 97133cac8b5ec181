//! Rollcall replay entry point.
//!
//! # Usage
//!
//! ```bash
//! # Replay a script file
//! rollcall --script session.jsonl --nickname carol
//!
//! # Read the script from stdin
//! cat session.jsonl | rollcall
//! ```

use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};

use clap::Parser;
use rollcall_cli::{ReplayConfig, parse, replay};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Rollcall membership replay
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(about = "Replay chat membership push events and print the resulting state")]
#[command(version)]
struct Args {
    /// Script of JSON-lines events (reads stdin if omitted)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Nickname of the local user
    #[arg(short, long, default_value = "anonymous")]
    nickname: String,

    /// Start with the conversations panel expanded
    #[arg(long)]
    expanded: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let script = match &args.script {
        Some(path) => parse(BufReader::new(File::open(path)?))?,
        None => parse(io::stdin().lock())?,
    };

    let config = ReplayConfig { nickname: args.nickname, expanded: args.expanded };
    let report = replay(&config, script).await?;

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    Ok(())
}
