mod discover;
mod dispatch;
mod error;
mod models;
mod parser;
mod scheduler;
mod stream;

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::Parser;
use dispatch::{Dispatcher, DryRunDispatcher, HttpDispatcher};
use stream::{EntryStream, Filter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL requests are replayed against, e.g. http://localhost:8000
    target: String,

    /// One or more glob patterns naming the log files to replay
    #[arg(required = true)]
    paths: Vec<String>,

    /// Print requests instead of sending them
    #[arg(long)]
    dryrun: bool,

    /// Pacing multiplier over recorded deltas; 0 replays back-to-back
    #[arg(long, default_value_t = 0.0)]
    rate: f64,

    /// Skip entries before this time (YYYY-MM-DD[THH:MM[:SS]], UTC)
    #[arg(long, value_parser = parse_bound)]
    start: Option<DateTime<Utc>>,

    /// Skip entries after this time (YYYY-MM-DD[THH:MM[:SS]], UTC)
    #[arg(long, value_parser = parse_bound)]
    end: Option<DateTime<Utc>>,

    /// Stop after this many replayed entries
    #[arg(long)]
    count: Option<usize>,

    /// Per-request timeout in seconds when actually sending
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

fn parse_bound(raw: &str) -> Result<DateTime<Utc>, String> {
    for layout in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc())
        .map_err(|_| format!("unrecognized timestamp {raw:?}, expected YYYY-MM-DD[THH:MM[:SS]]"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let files = discover::discover(&args.paths)?;
    if files.is_empty() {
        warn!(patterns = ?args.paths, "no log files matched");
    }

    let entries = EntryStream::new(
        files,
        Filter {
            start: args.start,
            end: args.end,
            max_count: args.count,
        },
    );

    let dispatcher: Box<dyn Dispatcher> = if args.dryrun {
        Box::new(DryRunDispatcher::new(&args.target))
    } else {
        Box::new(HttpDispatcher::new(
            &args.target,
            Duration::from_secs(args.timeout),
        )?)
    };

    let summary = scheduler::replay(entries, args.rate, dispatcher.as_ref()).await?;
    info!(
        replayed = summary.replayed,
        log_seconds = summary.elapsed,
        "replay finished"
    );
    Ok(())
}
