use tokio::time::{Duration, sleep};

use crate::dispatch::Dispatcher;
use crate::error::ReplayError;
use crate::models::LogEntry;

/// End-of-run accounting: how many entries were dispatched and how many
/// seconds of log time they spanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub replayed: usize,
    pub elapsed: u64,
}

/// Paces the entry stream and hands each entry to the dispatcher.
///
/// `rate` scales the recorded deltas: 1.0 replays at the original cadence,
/// 0.5 twice as fast, and 0 (the default) dispatches back-to-back. The
/// pacing sleep is the only suspension point besides the dispatch itself.
/// `elapsed` is logical log time, accumulated independently of wall-clock
/// pacing. The first stream error or dispatch failure aborts the run.
pub async fn replay<I>(
    entries: I,
    rate: f64,
    dispatcher: &dyn Dispatcher,
) -> Result<ReplaySummary, ReplayError>
where
    I: IntoIterator<Item = Result<LogEntry, ReplayError>>,
{
    // Negative and NaN rates disable pacing, same as the default 0.
    let rate = if rate.is_finite() && rate > 0.0 { rate } else { 0.0 };
    let mut summary = ReplaySummary::default();
    for entry in entries {
        let entry = entry?;
        let wait = rate * entry.delta as f64;
        if wait > 0.0 {
            sleep(Duration::from_secs_f64(wait)).await;
        }
        summary.elapsed += entry.delta;
        dispatcher.play(summary.elapsed, &entry).await?;
        summary.replayed += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dispatch::DispatchError;
    use crate::models::Method;
    use crate::parser::ParseError;
    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(u64, String)>>,
    }

    #[async_trait]
    impl Dispatcher for Recording {
        async fn play(&self, elapsed: u64, entry: &LogEntry) -> Result<(), DispatchError> {
            self.calls.lock().unwrap().push((elapsed, entry.path.clone()));
            Ok(())
        }
    }

    fn entry(path: &str, delta: u64) -> Result<LogEntry, ReplayError> {
        Ok(LogEntry {
            remote_host: "127.0.0.1".into(),
            remote_log_name: None,
            remote_user: None,
            timestamp: FixedOffset::west_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2000, 10, 10, 13, 55, 36)
                .unwrap(),
            method: Method::Get,
            path: path.into(),
            protocol: Some("HTTP/1.0".into()),
            status: Some(200),
            content_length: Some(42),
            delta,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn rate_scales_recorded_deltas() {
        let dispatcher = Recording::default();
        let begin = Instant::now();
        replay(vec![entry("/a", 3)], 2.0, &dispatcher).await.unwrap();
        assert_eq!(begin.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_rate_dispatches_back_to_back() {
        let dispatcher = Recording::default();
        let begin = Instant::now();
        replay(vec![entry("/a", 3), entry("/b", 500)], 0.0, &dispatcher)
            .await
            .unwrap();
        assert_eq!(begin.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn negative_rate_disables_pacing() {
        let dispatcher = Recording::default();
        let begin = Instant::now();
        replay(vec![entry("/a", 3)], -1.5, &dispatcher).await.unwrap();
        assert_eq!(begin.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_accumulates_log_time_in_order() {
        let dispatcher = Recording::default();
        let summary = replay(
            vec![entry("/a", 0), entry("/b", 4), entry("/c", 2)],
            1.0,
            &dispatcher,
        )
        .await
        .unwrap();

        let calls = dispatcher.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                (0, "/a".to_string()),
                (4, "/b".to_string()),
                (6, "/c".to_string()),
            ]
        );
        assert_eq!(
            summary,
            ReplaySummary {
                replayed: 3,
                elapsed: 6,
            }
        );
    }

    #[tokio::test]
    async fn stream_error_aborts_before_later_entries() {
        let dispatcher = Recording::default();
        let entries = vec![
            entry("/a", 0),
            Err(ReplayError::Parse {
                path: PathBuf::from("access.log"),
                line: 2,
                source: ParseError::Grammar,
            }),
            entry("/b", 0),
        ];
        let result = replay(entries, 0.0, &dispatcher).await;
        assert!(matches!(
            result,
            Err(ReplayError::Parse { line: 2, .. })
        ));
        assert_eq!(dispatcher.calls.lock().unwrap().len(), 1);
    }
}
