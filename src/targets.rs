use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{DEFAULT_SOURCE, DEFAULT_TIMEOUT_MS, LoaderOptions};
use crate::error::ConfigError;
use crate::models::Configuration;

/// Accepted top-level shapes of a target document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetDocument {
    Bare(Vec<Value>),
    Wrapped {
        targets: Option<Value>,
        #[serde(rename = "timeoutMs")]
        timeout_ms: Option<Value>,
    },
}

/// Reads, parses and validates the target list named by `options`.
pub async fn load_config(options: &LoaderOptions) -> Result<Configuration, ConfigError> {
    let path = options
        .source_path_override
        .clone()
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

    parse_config(&raw, options, &path)
}

/// Parsing half of [`load_config`]; `path` is only used for diagnostics.
pub fn parse_config(
    raw: &str,
    options: &LoaderOptions,
    path: &str,
) -> Result<Configuration, ConfigError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    let document = TargetDocument::deserialize(value).map_err(|_| ConfigError::Shape {
        path: path.to_string(),
    })?;

    let (candidates, document_timeout) = match document {
        TargetDocument::Bare(list) => (Some(list), None),
        TargetDocument::Wrapped {
            targets,
            timeout_ms,
        } => {
            let list = match targets {
                Some(Value::Array(list)) => Some(list),
                _ => None,
            };
            (list, timeout_ms.and_then(|v| read_timeout(&v, path)))
        }
    };

    let timeout_ms = options
        .timeout_override
        .or(document_timeout)
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    let candidates = match candidates {
        Some(list) if !list.is_empty() => list,
        _ => {
            return Err(ConfigError::NoTargets {
                path: path.to_string(),
            });
        }
    };

    let targets: Vec<String> = candidates
        .iter()
        .filter_map(|candidate| {
            let normalized = normalize_target(candidate);
            if normalized.is_none() {
                warn!(entry = %candidate, config = path, "dropping invalid target");
            }
            normalized
        })
        .collect();

    if targets.is_empty() {
        return Err(ConfigError::NoValidTargets {
            path: path.to_string(),
        });
    }

    debug!(count = targets.len(), timeout_ms, config = path, "loaded targets");

    Ok(Configuration {
        targets,
        timeout_ms,
        config_path: path.to_string(),
    })
}

/// Trimmed, re-serialized absolute URL, or `None` if the entry is unusable.
pub fn normalize_target(candidate: &Value) -> Option<String> {
    let trimmed = candidate.as_str()?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed).ok().map(String::from)
}

fn read_timeout(value: &Value, path: &str) -> Option<u64> {
    let timeout = value.as_u64();
    if timeout.is_none() {
        warn!(%value, config = path, "ignoring non-integer timeoutMs");
    }
    timeout
}
