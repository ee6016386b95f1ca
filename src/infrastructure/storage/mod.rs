//! Storage infrastructure - connection pooling, migrations and backend selection

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{Storage, StorageConfig, StorageFactory, StorageType};
pub use migrations::{facility_migrations, run_facility_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{connect_pool, ping, PostgresConfig, DEFAULT_DATABASE_URL};
