use std::path::PathBuf;

use clap::Parser;
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "log-gen")]
#[command(about = "Generate synthetic access-log traffic for replay testing", long_about = None)]
pub struct CliArgs {
    /// Lines per second; 0 writes as fast as possible
    #[arg(long, default_value_t = 10)]
    rate: u64,

    /// Stop after this many lines; omit for an unbounded stream
    #[arg(long)]
    count: Option<u64>,

    /// Append to this file instead of writing to stdout
    #[arg(long)]
    out: Option<PathBuf>,
}
