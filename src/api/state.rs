//! Application state shared by handlers

use sqlx::PgPool;

use crate::infrastructure::department::DepartmentService;
use crate::infrastructure::storage::Storage;

#[derive(Debug, Clone)]
pub struct AppState {
    pub department_service: DepartmentService,
    /// Present when running against Postgres; `/ready` pings it
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(department_service: DepartmentService, pool: Option<PgPool>) -> Self {
        Self {
            department_service,
            pool,
        }
    }

    pub fn from_storage(storage: Storage) -> Self {
        Self::new(DepartmentService::new(storage.departments), storage.pool)
    }
}
