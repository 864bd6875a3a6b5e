use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::ReplayError;
use crate::models::{LogEntry, Method};
use crate::parser::LogParser;

/// Verbs that are actually replayed. The parse grammar stays broad so that
/// mutating requests still advance the delta baseline and count against the
/// time window, but replay itself is read-only.
const REPLAY_METHODS: [Method; 3] = [Method::Get, Method::Head, Method::Options];

#[derive(Debug, Clone, Copy, Default)]
pub struct Filter {
    /// Inclusive lower timestamp bound; earlier entries are skipped.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound; later entries are skipped.
    pub end: Option<DateTime<Utc>>,
    /// Cap on yielded entries across all files.
    pub max_count: Option<usize>,
}

/// Lazy sequence of [`LogEntry`] values drawn from one or more log files in
/// order, sharing a single [`LogParser`] so deltas stay continuous across
/// file boundaries. Files are opened one at a time; once `max_count` is
/// reached the stream stops mid-file and never opens the rest.
///
/// Forward-only and single-pass: replaying again means a fresh stream.
pub struct EntryStream {
    files: std::vec::IntoIter<PathBuf>,
    filter: Filter,
    parser: LogParser,
    current: Option<Reader>,
    yielded: usize,
    failed: bool,
}

struct Reader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl EntryStream {
    pub fn new(paths: Vec<PathBuf>, filter: Filter) -> Self {
        Self {
            files: paths.into_iter(),
            filter,
            parser: LogParser::new(),
            current: None,
            yielded: 0,
            failed: false,
        }
    }

    fn selects(&self, entry: &LogEntry) -> bool {
        let ts = entry.timestamp.with_timezone(&Utc);
        if self.filter.start.is_some_and(|start| ts < start) {
            return false;
        }
        if self.filter.end.is_some_and(|end| ts > end) {
            return false;
        }
        REPLAY_METHODS.contains(&entry.method)
    }
}

impl Iterator for EntryStream {
    type Item = Result<LogEntry, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.filter.max_count.is_some_and(|max| self.yielded >= max) {
            return None;
        }
        loop {
            if self.current.is_none() {
                let path = self.files.next()?;
                match File::open(&path) {
                    Ok(file) => {
                        self.current = Some(Reader {
                            path,
                            lines: BufReader::new(file).lines(),
                            line_no: 0,
                        });
                    }
                    Err(source) => {
                        self.failed = true;
                        return Some(Err(ReplayError::Io { path, source }));
                    }
                }
            }
            let reader = self.current.as_mut().expect("a file is open");
            let line = match reader.lines.next() {
                None => {
                    self.current = None;
                    continue;
                }
                Some(Err(source)) => {
                    let path = reader.path.clone();
                    self.failed = true;
                    return Some(Err(ReplayError::Io { path, source }));
                }
                Some(Ok(line)) => line,
            };
            reader.line_no += 1;
            match self.parser.parse_line(&line) {
                Err(source) => {
                    let path = reader.path.clone();
                    let line = reader.line_no;
                    self.failed = true;
                    return Some(Err(ReplayError::Parse { path, line, source }));
                }
                Ok(entry) => {
                    if self.selects(&entry) {
                        self.yielded += 1;
                        return Some(Ok(entry));
                    }
                }
            }
        }
    }
}
