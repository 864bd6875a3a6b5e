mod args;
mod generator;
mod stream;

use args::CliArgs;
use clap::Parser;
use stream::run_log_stream;
use tokio::signal;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    eprintln!("Generating access-log lines at {} lines/sec", args.rate());

    tokio::select! {
        result = run_log_stream(*args.rate(), *args.count(), args.out().clone()) => result,
        _ = signal::ctrl_c() => {
            eprintln!("\nStopping log generation...");
            Ok(())
        }
    }
}
