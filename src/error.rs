use thiserror::Error;

/// Failure to produce a usable target list. Fatal to the whole invocation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported document in {path}: expected a list of URLs or an object with a `targets` list")]
    Shape { path: String },

    #[error("No targets found in {path}. Expected {{ \"targets\": [\"https://...\"] }}")]
    NoTargets { path: String },

    #[error("No valid URLs found in {path}.")]
    NoValidTargets { path: String },
}

impl ConfigError {
    /// Source identifier the error refers to.
    pub fn path(&self) -> &str {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Shape { path }
            | ConfigError::NoTargets { path }
            | ConfigError::NoValidTargets { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_is_rendered_once_in_the_chain() {
        let err = ConfigError::Read {
            path: "/tmp/absent.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "failed to read /tmp/absent.json");

        let chained = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chained, "failed to read /tmp/absent.json: no such file");
    }

    #[test]
    fn parse_errors_keep_the_serde_cause_as_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let cause = source.to_string();
        let err = ConfigError::Parse {
            path: "targets.json".to_string(),
            source,
        };

        let chained = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chained, format!("failed to parse targets.json: {}", cause));
        assert_eq!(chained.matches(&cause).count(), 1);
    }
}
