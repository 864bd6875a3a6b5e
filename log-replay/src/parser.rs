use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use thiserror::Error;

use crate::models::{LogEntry, Method};

// Common Log Format, e.g.
//   127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326
// Combined Log Format lines match too: the referer/user-agent tail past the
// length field is simply left unmatched.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<remote_host>\S+) (?P<remote_log_name>\S+) (?P<remote_user>\S+) \[(?P<timestamp>[^\]]+)\] "(?P<request>[^"]+)" (?P<status>\d+|-) (?P<content_length>\d+|-)"#,
    )
    .expect("log line pattern compiles")
});

// Timestamp layout inside the brackets: 10/Oct/2000:13:55:36 -0700
const TS_LAYOUT: &str = "%d/%b/%Y:%H:%M:%S %z";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line does not match common/combined log format")]
    Grammar,
    #[error("bad timestamp {0:?}: {1}")]
    Timestamp(String, #[source] chrono::ParseError),
    #[error("request line {0:?} is not \"METHOD PATH\" or \"METHOD PATH PROTOCOL\"")]
    Request(String),
    #[error("unknown method {0:?}")]
    Method(String),
    #[error("{field} {value:?} out of range")]
    Number { field: &'static str, value: String },
}

/// Translates raw log lines into [`LogEntry`] values.
///
/// The parser is stateful: it keeps the largest timestamp seen so far so
/// that every entry carries its whole-second delta from the previous one.
/// A single instance is threaded through all files of a run, which keeps
/// deltas continuous across file boundaries.
#[derive(Debug, Default)]
pub struct LogParser {
    last_timestamp: Option<DateTime<FixedOffset>>,
}

impl LogParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_line(&mut self, line: &str) -> Result<LogEntry, ParseError> {
        let caps = LINE_PATTERN.captures(line).ok_or(ParseError::Grammar)?;

        let ts_raw = &caps["timestamp"];
        let timestamp = DateTime::parse_from_str(ts_raw, TS_LAYOUT)
            .map_err(|e| ParseError::Timestamp(ts_raw.to_string(), e))?;

        let (method, path, protocol) = split_request(&caps["request"])?;

        Ok(LogEntry {
            remote_host: caps["remote_host"].to_string(),
            remote_log_name: present(&caps["remote_log_name"]),
            remote_user: present(&caps["remote_user"]),
            timestamp,
            method,
            path,
            protocol,
            status: number(&caps["status"], "status")?,
            content_length: number(&caps["content_length"], "content length")?,
            delta: self.advance(timestamp),
        })
    }

    // The baseline only ever moves forward, so an out-of-order line yields
    // delta 0 without rewinding it.
    fn advance(&mut self, timestamp: DateTime<FixedOffset>) -> u64 {
        let delta = match self.last_timestamp {
            Some(last) => (timestamp - last).num_seconds().max(0) as u64,
            None => 0,
        };
        if self.last_timestamp.is_none_or(|last| timestamp > last) {
            self.last_timestamp = Some(timestamp);
        }
        delta
    }
}

fn split_request(request: &str) -> Result<(Method, String, Option<String>), ParseError> {
    let tokens: Vec<&str> = request.split(' ').collect();
    let (method, path, protocol) = match tokens.as_slice() {
        [method, path] => (*method, *path, None),
        [method, path, protocol] => (*method, *path, Some(protocol.to_string())),
        _ => return Err(ParseError::Request(request.to_string())),
    };
    let method = method
        .parse()
        .map_err(|_| ParseError::Method(method.to_string()))?;
    Ok((method, path.to_string(), protocol))
}

/// Maps the `-` placeholder to "no value".
fn present(field: &str) -> Option<String> {
    (field != "-").then(|| field.to_string())
}

fn number<T: FromStr>(field: &str, name: &'static str) -> Result<Option<T>, ParseError> {
    if field == "-" {
        return Ok(None);
    }
    field
        .parse()
        .map(Some)
        .map_err(|_| ParseError::Number {
            field: name,
            value: field.to_string(),
        })
}
