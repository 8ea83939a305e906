use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pinger::check::Pinger;
use pinger::cli::{Cli, Command, run_once};
use pinger::config::load_settings;
use pinger::server::{self, AppState, SettingsSource};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        None => match load_settings() {
            Ok(settings) => run_once(&settings).await,
            Err(e) => Err(e),
        },
        Some(Command::Serve { bind }) => run_server(&bind).await.map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_server(bind: &str) -> Result<()> {
    let state = AppState {
        pinger: Pinger::new()?,
        settings: SettingsSource::Process,
    };
    server::serve(bind, state).await
}
