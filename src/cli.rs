use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::check::Pinger;
use crate::config::Settings;
use crate::models::timestamp_now;
use crate::report::{exit_ok, header_line, print_run};
use crate::targets::load_config;

/// Checks that a list of URLs answers HTTP requests.
///
/// Without a subcommand, runs a single pass and exits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve checks over HTTP, one pass per GET request.
    Serve {
        #[arg(long, env = "PINGER_BIND", default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

/// One console pass over the targets. `Ok(false)` when the process should
/// exit non-zero because of downs; configuration failures are `Err`.
pub async fn run_once(settings: &Settings) -> Result<bool> {
    let started_at = timestamp_now();

    let config = load_config(&settings.loader_options()).await?;
    println!(
        "{}",
        header_line(&started_at, config.targets.len(), config.timeout_ms)
    );

    let run = Pinger::new()?
        .with_concurrency_limit(settings.concurrency_limit())
        .ping_all(&config.targets, config.timeout_ms)
        .await;
    print_run(&run);

    Ok(exit_ok(settings, &run.summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings_from_vars;
    use std::io::Write;

    /// A target list holding one URL on a closed local port.
    async fn unreachable_targets() -> tempfile::NamedTempFile {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"targets": ["http://{}/"], "timeoutMs": 2000}}"#, addr).unwrap();
        file
    }

    #[tokio::test]
    async fn downs_without_flag_exit_zero() {
        let file = unreachable_targets().await;
        let settings =
            settings_from_vars([("TARGETS_JSON", file.path().to_string_lossy().into_owned())])
                .unwrap();

        assert!(run_once(&settings).await.unwrap());
    }

    #[tokio::test]
    async fn downs_with_flag_exit_non_zero() {
        let file = unreachable_targets().await;
        let settings = settings_from_vars([
            ("TARGETS_JSON", file.path().to_string_lossy().into_owned()),
            ("FAIL_ON_ERROR", "yes".to_string()),
        ])
        .unwrap();

        assert!(!run_once(&settings).await.unwrap());
    }

    #[tokio::test]
    async fn missing_configuration_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("targets.json").to_string_lossy().into_owned();
        let settings = settings_from_vars([("TARGETS_JSON", missing.clone())]).unwrap();

        let err = run_once(&settings).await.unwrap_err();
        assert!(format!("{:#}", err).starts_with(&format!("failed to read {}: ", missing)));
    }

    #[test]
    fn no_arguments_runs_once() {
        let cli = Cli::try_parse_from(["pinger"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_bind_address() {
        let cli = Cli::try_parse_from(["pinger", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Some(Command::Serve { bind }) => assert_eq!(bind, "0.0.0.0:9000"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["pinger", "--report"]).is_err());
    }
}
