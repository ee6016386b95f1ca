//! Migrate command - applies or reverts the schema

use clap::Subcommand;
use tracing::info;

use crate::infrastructure::storage::{connect_pool, Migrator, PostgresMigrator};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Revert the most recently applied migration
    Down,
    /// Print applied and pending versions
    Status,
}

pub async fn run(action: MigrateAction) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let pg = config.postgres_config();
    info!(url = %pg.redacted_url(), ?action, "Running migration command");

    let pool = connect_pool(&pg).await?;
    let migrator = PostgresMigrator::facility(pool.clone());

    match action {
        MigrateAction::Up => {
            let applied = migrator.run().await?;
            println!("Applied {} migration(s)", applied);
        }
        MigrateAction::Down => match migrator.revert().await? {
            Some(version) => println!("Reverted migration {}", version),
            None => println!("Nothing to revert"),
        },
        MigrateAction::Status => {
            let applied = migrator.applied_versions().await?;
            let pending: Vec<i64> = migrator
                .pending()
                .await?
                .iter()
                .map(|m| m.version)
                .collect();

            match migrator.version().await? {
                Some(version) => println!("Current version: {}", version),
                None => println!("Current version: none"),
            }
            println!("Applied: {:?}", applied);
            println!("Pending: {:?}", pending);
        }
    }

    pool.close().await;

    Ok(())
}
