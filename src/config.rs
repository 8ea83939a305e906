use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Default location of the target list.
pub const DEFAULT_SOURCE: &str = "targets.json";
/// Probe timeout when neither the environment nor the document sets one.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const TRUTHY: [&str; 5] = ["1", "true", "yes", "y", "on"];

/// Raw process-level settings. Values stay strings so that malformed
/// overrides fall through instead of failing the load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub targets_json: Option<String>,
    pub timeout_ms: Option<String>,
    pub fail_on_error: Option<String>,
    pub max_concurrent_checks: Option<String>,
}

/// Overrides handed to the loader explicitly rather than read from the
/// environment inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    pub source_path_override: Option<String>,
    pub timeout_override: Option<u64>,
}

impl Settings {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            source_path_override: self.targets_json.clone(),
            timeout_override: self.timeout_ms.as_deref().and_then(parse_millis),
        }
    }

    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error.as_deref().is_some_and(parse_flag)
    }

    /// `None` means unbounded fan-out.
    pub fn concurrency_limit(&self) -> Option<usize> {
        self.max_concurrent_checks
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
    }
}

/// Settings file `config/pinger.*` (optional) overlaid by the process environment.
pub fn load_settings() -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::with_name("config/pinger").required(false))
        .add_source(Environment::default())
        .build()?;
    Ok(settings.try_deserialize()?)
}

/// Same as [`load_settings`] but over a fixed variable map and no file.
pub fn settings_from_vars<I, K, V>(vars: I) -> Result<Settings>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let map: config::Map<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let settings = Config::builder()
        .add_source(Environment::default().source(Some(map)))
        .build()?;
    Ok(settings.try_deserialize()?)
}

/// Leading decimal digits of the trimmed input (an optional `+` sign is
/// skipped), if any.
pub fn parse_millis(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

pub fn parse_flag(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    TRUTHY.contains(&value.as_str())
}
