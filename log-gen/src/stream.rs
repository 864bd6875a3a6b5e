use std::path::PathBuf;

use rand::{SeedableRng, rngs::StdRng};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt, stdout};
use tokio::time::{Duration, sleep};

use crate::generator::generate_line;

pub async fn run_log_stream(
    rate: u64,
    count: Option<u64>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut sink: Box<dyn AsyncWrite + Unpin + Send> = match out {
        Some(path) => Box::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?,
        ),
        None => Box::new(stdout()),
    };

    let mut rng = StdRng::from_os_rng();
    let delay = (rate > 0).then(|| Duration::from_secs_f64(1f64 / rate as f64));

    let mut written = 0u64;
    while count.is_none_or(|max| written < max) {
        let mut line = generate_line(&mut rng);
        line.push('\n');
        sink.write_all(line.as_bytes()).await?;
        written += 1;

        if let Some(d) = delay {
            sleep(d).await;
        }
    }
    sink.flush().await?;
    Ok(())
}
