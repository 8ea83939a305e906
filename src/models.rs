use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A loaded, validated target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Normalized absolute URLs, in document order. Never empty.
    pub targets: Vec<String>,
    pub timeout_ms: u64,
    /// Where the list came from, echoed back for diagnostics.
    pub config_path: String,
}

/// How a single probe ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Any HTTP response arrived in time, whatever its status.
    Responded { status: u16 },
    /// Timeout, DNS or connection failure.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResult {
    pub url: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

impl PingResult {
    pub fn status(&self) -> Option<u16> {
        match self.outcome {
            Outcome::Responded { status } => Some(status),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Responded { .. } => None,
            Outcome::Failed { error } => Some(error),
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self.outcome, Outcome::Responded { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub up: usize,
    pub down: usize,
}

impl Summary {
    pub fn from_results(results: &[PingResult]) -> Self {
        let total = results.len();
        let down = results.iter().filter(|r| !r.is_up()).count();
        Summary {
            total,
            up: total - down,
            down,
        }
    }
}

/// Everything one pass over the targets produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingRun {
    pub results: Vec<PingResult>,
    pub summary: Summary,
}

impl PingRun {
    pub fn new(results: Vec<PingResult>) -> Self {
        let summary = Summary::from_results(&results);
        PingRun { results, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn up(url: &str, status: u16) -> PingResult {
        PingResult {
            url: url.to_string(),
            outcome: Outcome::Responded { status },
            elapsed_ms: 12,
        }
    }

    fn down(url: &str) -> PingResult {
        PingResult {
            url: url.to_string(),
            outcome: Outcome::Failed {
                error: "connection refused".to_string(),
            },
            elapsed_ms: 3,
        }
    }

    #[test]
    fn summary_counts_server_errors_as_up() {
        let results = vec![up("https://a/", 200), up("https://b/", 503), down("https://c/")];
        let summary = Summary::from_results(&results);
        assert_eq!(
            summary,
            Summary {
                total: 3,
                up: 2,
                down: 1
            }
        );
        assert_eq!(summary.up + summary.down, summary.total);
    }

    #[test]
    fn empty_run_has_zero_summary() {
        let run = PingRun::new(Vec::new());
        assert!(run.results.is_empty());
        assert_eq!(run.summary, Summary::default());
    }

    #[test]
    fn result_serializes_only_the_field_that_applies() {
        let ok = serde_json::to_value(up("https://a/", 404)).unwrap();
        assert_eq!(ok, json!({"url": "https://a/", "status": 404, "elapsedMs": 12}));

        let failed = serde_json::to_value(down("https://c/")).unwrap();
        assert_eq!(
            failed,
            json!({"url": "https://c/", "error": "connection refused", "elapsedMs": 3})
        );
    }

    #[test]
    fn timestamps_are_utc_millis() {
        let stamp = timestamp_now();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn accessors_expose_exactly_one_side() {
        let ok = up("https://a/", 500);
        assert_eq!(ok.status(), Some(500));
        assert!(ok.error().is_none());

        let failed = down("https://c/");
        assert!(failed.status().is_none());
        assert_eq!(failed.error(), Some("connection refused"));
    }
}
