use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    #[display("GET")]
    Get,
    #[display("POST")]
    Post,
    #[display("PUT")]
    Put,
    #[display("TRACE")]
    Trace,
    #[display("OPTIONS")]
    Options,
    #[display("HEAD")]
    Head,
    #[display("DELETE")]
    Delete,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "TRACE" => Ok(Self::Trace),
            "OPTIONS" => Ok(Self::Options),
            "HEAD" => Ok(Self::Head),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unknown method {other:?}")),
        }
    }
}

/// One parsed access-log line. `delta` is the whole seconds elapsed since
/// the previous entry of the same parser session; the first entry gets 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub remote_host: String,
    pub remote_log_name: Option<String>,
    pub remote_user: Option<String>,
    pub timestamp: DateTime<FixedOffset>,
    pub method: Method,
    pub path: String,
    pub protocol: Option<String>,
    pub status: Option<u16>,
    pub content_length: Option<u64>,
    pub delta: u64,
}

impl LogEntry {
    pub fn ok(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn entry_with_status(status: Option<u16>) -> LogEntry {
        LogEntry {
            remote_host: "127.0.0.1".into(),
            remote_log_name: None,
            remote_user: None,
            timestamp: FixedOffset::west_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2000, 10, 10, 13, 55, 36)
                .unwrap(),
            method: Method::Get,
            path: "/".into(),
            protocol: None,
            status,
            content_length: Some(0),
            delta: 0,
        }
    }

    #[test]
    fn ok_covers_the_2xx_range_only() {
        assert!(entry_with_status(Some(200)).ok());
        assert!(entry_with_status(Some(299)).ok());
        assert!(!entry_with_status(Some(300)).ok());
        assert!(!entry_with_status(Some(199)).ok());
        assert!(!entry_with_status(None).ok());
    }

    #[test]
    fn method_parses_and_displays_canonical_verbs() {
        assert_eq!("GET".parse::<Method>(), Ok(Method::Get));
        assert_eq!(Method::Options.to_string(), "OPTIONS");
        assert!("PATCH".parse::<Method>().is_err());
        assert!("get".parse::<Method>().is_err());
    }
}
