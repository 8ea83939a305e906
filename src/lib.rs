//! Concurrent HTTP reachability checks over a configured list of URLs.
//!
//! [`targets::load_config`] produces the target list, [`check::Pinger`]
//! probes it, and the binary renders the outcome either on the console or
//! through [`server`].

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod server;
pub mod targets;

pub use check::Pinger;
pub use config::{LoaderOptions, Settings};
pub use error::ConfigError;
pub use models::{Configuration, Outcome, PingResult, PingRun, Summary};
