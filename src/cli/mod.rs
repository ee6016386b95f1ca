//! Command line entrypoints
//!
//! - `serve`: HTTP API (migrates and seeds on startup)
//! - `migrate`: apply, revert or inspect the schema
//! - `wait`: block until dependencies are reachable, then exec a command

pub mod migrate;
pub mod serve;
pub mod wait;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging::{self, LoggingConfig};

/// Facility management backend
#[derive(Parser)]
#[command(name = "facility-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Manage database migrations
    Migrate {
        #[command(subcommand)]
        action: migrate::MigrateAction,
    },

    /// Wait for TCP dependencies, then run a command
    Wait(wait::WaitArgs),
}

/// Load `.env` and configuration, then install logging.
///
/// A configuration that fails to load falls back to defaults (still honoring
/// `DATABASE_URL`) and is reported once logging is up.
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let loaded = AppConfig::load();
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => AppConfig::default().with_env_overrides(),
    };

    logging::init_logging(&LoggingConfig::from(&config));

    if let Err(e) = loaded {
        warn!(error = %e, "Configuration could not be loaded, using defaults");
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_migrate_down() {
        let cli = Cli::try_parse_from(["facility-server", "migrate", "down"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Migrate {
                action: migrate::MigrateAction::Down
            }
        ));
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["facility-server", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }
}
