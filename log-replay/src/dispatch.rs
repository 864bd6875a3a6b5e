use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::warn;

use crate::models::{LogEntry, Method};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// One replayed request. `elapsed` is the logical offset in seconds from
/// the first entry of the run, for labeling only.
#[async_trait]
pub trait Dispatcher {
    async fn play(&self, elapsed: u64, entry: &LogEntry) -> Result<(), DispatchError>;
}

/// Sends each entry as a real HTTP request against the target.
pub struct HttpDispatcher {
    client: Client,
    base: String,
}

impl HttpDispatcher {
    pub fn new(target: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: strip_trailing_slash(target).to_string(),
        })
    }

    fn url(&self, entry: &LogEntry) -> String {
        format!("{}{}", self.base, entry.path)
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn play(&self, _elapsed: u64, entry: &LogEntry) -> Result<(), DispatchError> {
        let url = self.url(entry);
        let response = self
            .client
            .request(entry.method.into(), &url)
            .send()
            .await?;
        let got = response.status().as_u16();
        if let Some(expected) = entry.status {
            // Verification signal only; the run keeps going.
            if got != expected {
                warn!(%url, expected, got, "response status does not match the log");
            }
        }
        Ok(())
    }
}

/// Prints what would be sent instead of sending it.
pub struct DryRunDispatcher {
    base: String,
}

impl DryRunDispatcher {
    pub fn new(target: &str) -> Self {
        Self {
            base: strip_trailing_slash(target).to_string(),
        }
    }
}

#[async_trait]
impl Dispatcher for DryRunDispatcher {
    async fn play(&self, elapsed: u64, entry: &LogEntry) -> Result<(), DispatchError> {
        println!("{elapsed:>8}s {} {}{}", entry.method, self.base, entry.path);
        Ok(())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Trace => reqwest::Method::TRACE,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Head => reqwest::Method::HEAD,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

fn strip_trailing_slash(target: &str) -> &str {
    target.strip_suffix('/').unwrap_or(target)
}
