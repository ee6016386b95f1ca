//! PostgreSQL department repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::department::{Department, DepartmentQuery, DepartmentRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of DepartmentRepository
#[derive(Debug, Clone)]
pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn get(&self, id: i32) -> Result<Option<Department>, DomainError> {
        let row = sqlx::query("SELECT id, name, buffs, rabbited FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get department: {}", e)))?;

        row.as_ref().map(row_to_department).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Department>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, buffs, rabbited
            FROM departments
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get department by name: {}", e)))?;

        row.as_ref().map(row_to_department).transpose()
    }

    async fn create(&self, department: Department) -> Result<Department, DomainError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO departments (name, buffs, rabbited)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(department.name())
        .bind(department.buffs())
        .bind(department.is_rabbited())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create department: {}", e)))?;

        Ok(department.with_id(id))
    }

    async fn update(&self, department: Department) -> Result<Department, DomainError> {
        let id = department
            .id()
            .ok_or_else(|| DomainError::invalid_id("Cannot update a department that was never saved"))?;

        let result = sqlx::query(
            r#"
            UPDATE departments
            SET name = $2, buffs = $3, rabbited = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(department.name())
        .bind(department.buffs())
        .bind(department.is_rabbited())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update department: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Department '{}' not found",
                id
            )));
        }

        Ok(department)
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete department: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &DepartmentQuery) -> Result<Vec<Department>, DomainError> {
        // LIMIT NULL means no limit in PostgreSQL
        let rows = sqlx::query(
            r#"
            SELECT id, name, buffs, rabbited
            FROM departments
            WHERE ($1::BOOLEAN IS NULL OR rabbited = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.rabbited)
        .bind(query.limit.map(|l| l as i64))
        .bind(query.offset.unwrap_or(0) as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list departments: {}", e)))?;

        rows.iter().map(row_to_department).collect()
    }

    async fn count(&self, query: &DepartmentQuery) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM departments WHERE ($1::BOOLEAN IS NULL OR rabbited = $1)",
        )
        .bind(query.rabbited)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count departments: {}", e)))?;

        Ok(count as usize)
    }

    async fn assign_project(&self, department_id: i32, project_id: i32) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO project_department_association (department_id, project_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(department_id)
        .bind(project_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let is_fk = e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation());

            if is_fk {
                DomainError::not_found(format!(
                    "Department '{}' or project '{}' not found",
                    department_id, project_id
                ))
            } else {
                DomainError::storage(format!("Failed to assign project: {}", e))
            }
        })?;

        Ok(())
    }

    async fn projects_of(&self, department_id: i32) -> Result<Vec<i32>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT project_id
            FROM project_department_association
            WHERE department_id = $1
            ORDER BY project_id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list department projects: {}", e)))
    }
}

fn row_to_department(row: &sqlx::postgres::PgRow) -> Result<Department, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Invalid department row: {}", e));

    let id: i32 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let buffs: Vec<String> = row.try_get("buffs").map_err(decode)?;
    let rabbited: bool = row.try_get("rabbited").map_err(decode)?;

    Ok(Department::restore(id, name, buffs, rabbited))
}
