use std::error::Error as StdError;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::{Client, redirect};
use tokio::time::{self, Instant};
use tracing::debug;

use crate::models::{Outcome, PingResult, PingRun};

/// Identifying header sent with every probe.
pub const USER_AGENT: &str = concat!("pinger/", env!("CARGO_PKG_VERSION"));

/// Issues concurrent GET probes. Cheap to clone; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct Pinger {
    client: Client,
    max_concurrent_checks: Option<usize>,
}

impl Pinger {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::limited(10))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Pinger {
            client,
            max_concurrent_checks: None,
        }
    }

    /// Caps how many probes are in flight at once. `None` is unbounded.
    pub fn with_concurrency_limit(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_checks = limit.filter(|n| *n > 0);
        self
    }

    /// Probes one URL. Never fails: transport errors and timeouts end up
    /// in the result.
    pub async fn ping_one(&self, url: &str, timeout_ms: u64) -> PingResult {
        let started = Instant::now();
        let request = self.client.get(url).send();
        let deadline = time::sleep(Duration::from_millis(timeout_ms));

        // Whichever branch loses is dropped here, which aborts the request
        // or disarms the timer.
        let outcome = tokio::select! {
            response = request => match response {
                Ok(resp) => Outcome::Responded { status: resp.status().as_u16() },
                Err(e) => Outcome::Failed { error: describe(&e) },
            },
            () = deadline => Outcome::Failed {
                error: format!("request timed out after {}ms", timeout_ms),
            },
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &outcome {
            Outcome::Responded { status } => debug!(url, status, elapsed_ms, "target up"),
            Outcome::Failed { error } => debug!(url, error = %error, elapsed_ms, "target down"),
        }

        PingResult {
            url: url.to_string(),
            outcome,
            elapsed_ms,
        }
    }

    /// Probes every target and waits for all of them. Results keep the
    /// order of `targets`.
    pub async fn ping_all(&self, targets: &[String], timeout_ms: u64) -> PingRun {
        let width = self
            .max_concurrent_checks
            .unwrap_or(targets.len())
            .max(1);

        let probes: Vec<_> = targets
            .iter()
            .map(|url| self.ping_one(url, timeout_ms))
            .collect();
        let results = stream::iter(probes)
            .buffered(width)
            .collect::<Vec<_>>()
            .await;

        PingRun::new(results)
    }
}

fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
