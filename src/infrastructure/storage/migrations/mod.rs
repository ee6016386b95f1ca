//! Versioned schema migrations tracked in `_migrations`

mod schema;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Executor;
use tracing::{debug, info};

use crate::domain::DomainError;

pub use schema::facility_migrations;

const CREATE_TRACKING_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS _migrations (
    version BIGINT PRIMARY KEY,
    description TEXT NOT NULL,
    installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

#[async_trait]
pub trait Migrator: Send + Sync {
    /// Apply everything pending, returning how many migrations ran
    async fn run(&self) -> Result<usize, DomainError>;

    /// Undo the newest applied migration, returning its version
    async fn revert(&self) -> Result<Option<i64>, DomainError>;

    /// Newest applied version, `None` on an empty database
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// One schema step with its inverse
#[derive(Debug, Clone)]
pub struct Migration {
    /// Strictly increasing across the list
    pub version: i64,
    pub description: String,
    pub up: String,
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Self::Up => "apply",
            Self::Down => "revert",
        }
    }
}

fn storage_error(context: impl std::fmt::Display) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::storage(format!("{}: {}", context, e))
}

#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool, migrations: Vec<Migration>) -> Self {
        Self { pool, migrations }
    }

    pub fn facility(pool: PgPool) -> Self {
        Self::new(pool, facility_migrations())
    }

    async fn ensure_tracking_table(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_TRACKING_TABLE)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Cannot create _migrations"))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error(format!("Cannot read status of migration {}", version)))
    }

    /// Run one migration in `direction` and update `_migrations` in the same
    /// transaction. Returns false when there was nothing to do.
    async fn step(&self, migration: &Migration, direction: Direction) -> Result<bool, DomainError> {
        self.ensure_tracking_table().await?;

        let applied = self.is_applied(migration.version).await?;
        if applied == (direction == Direction::Up) {
            debug!(version = migration.version, ?direction, "Migration already in place");
            return Ok(false);
        }

        let context = format!("Cannot {} migration {}", direction.verb(), migration.version);
        let mut tx = self.pool.begin().await.map_err(storage_error(&context))?;

        let (body, bookkeeping) = match direction {
            Direction::Up => (
                &migration.up,
                sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
                    .bind(migration.version)
                    .bind(&migration.description),
            ),
            Direction::Down => (
                &migration.down,
                sqlx::query("DELETE FROM _migrations WHERE version = $1").bind(migration.version),
            ),
        };

        // A bare &str without binds goes over the simple protocol, which allows several statements
        Executor::execute(&mut *tx, body.as_str())
            .await
            .map_err(storage_error(&context))?;
        bookkeeping
            .execute(&mut *tx)
            .await
            .map_err(storage_error(&context))?;
        tx.commit().await.map_err(storage_error(&context))?;

        info!(
            version = migration.version,
            description = %migration.description,
            action = direction.verb(),
            "Migration complete"
        );

        Ok(true)
    }

    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.step(migration, Direction::Up).await
    }

    pub async fn revert_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.step(migration, Direction::Down).await
    }

    pub async fn applied_versions(&self) -> Result<Vec<i64>, DomainError> {
        self.ensure_tracking_table().await?;

        sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Cannot list applied migrations"))
    }

    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        Ok(self.applied_versions().await?.last().copied())
    }

    /// Known migrations not yet recorded in `_migrations`
    pub async fn pending(&self) -> Result<Vec<&Migration>, DomainError> {
        let applied = self.applied_versions().await?;

        Ok(pending_of(&self.migrations, &applied))
    }
}

fn pending_of<'a>(migrations: &'a [Migration], applied: &[i64]) -> Vec<&'a Migration> {
    migrations
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect()
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<usize, DomainError> {
        let mut count = 0;

        for migration in &self.migrations {
            if self.run_migration(migration).await? {
                count += 1;
            }
        }

        Ok(count)
    }

    async fn revert(&self) -> Result<Option<i64>, DomainError> {
        let Some(version) = self.current_version().await? else {
            return Ok(None);
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!(
                    "Applied migration {} is unknown to this binary",
                    version
                ))
            })?;

        self.revert_migration(migration).await?;

        Ok(Some(version))
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.current_version().await
    }
}

pub async fn run_facility_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    PostgresMigrator::facility(pool.clone()).run().await
}
