//! Backend selection for the department store

use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::domain::department::DepartmentRepository;
use crate::domain::DomainError;
use crate::infrastructure::department::{InMemoryDepartmentRepository, PostgresDepartmentRepository};

use super::postgres::{connect_pool, PostgresConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Process-local, lost on restart
    InMemory,
    Postgres,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Repositories backing the service, plus the pool when running on Postgres
#[derive(Debug, Clone)]
pub struct Storage {
    pub departments: Arc<dyn DepartmentRepository>,
    pub pool: Option<PgPool>,
}

impl Storage {
    pub fn in_memory() -> Self {
        Self {
            departments: Arc::new(InMemoryDepartmentRepository::new()),
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            departments: Arc::new(PostgresDepartmentRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }
}

#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Build the configured backend; connects to Postgres when selected
    pub async fn create(config: &StorageConfig) -> Result<Storage, DomainError> {
        info!(backend = ?config.storage_type(), "Initializing storage");

        let storage = match config {
            StorageConfig::InMemory => Storage::in_memory(),
            StorageConfig::Postgres(pg) => Storage::postgres(connect_pool(pg).await?),
        };

        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_type() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!(" In-Memory ".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("postgres".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert_eq!("PG".parse::<StorageType>().unwrap(), StorageType::Postgres);

        let err = "sqlite".parse::<StorageType>().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_storage_config_type() {
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::Postgres(PostgresConfig::default()).storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_create_in_memory_starts_empty() {
        let storage = StorageFactory::create(&StorageConfig::InMemory).await.unwrap();

        assert!(storage.pool.is_none());
        assert_eq!(storage.departments.count(&Default::default()).await.unwrap(), 0);
    }
}
