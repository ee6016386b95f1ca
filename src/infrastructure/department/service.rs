//! Department service

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::department::{Department, DepartmentQuery, DepartmentRepository};
use crate::domain::DomainError;

/// Request for creating a new department
#[derive(Debug, Clone)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub buffs: Vec<String>,
    pub rabbited: bool,
}

/// Request for updating a department; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub buffs: Option<Vec<String>>,
    pub rabbited: Option<bool>,
}

/// Department service
#[derive(Debug, Clone)]
pub struct DepartmentService {
    repository: Arc<dyn DepartmentRepository>,
}

impl DepartmentService {
    pub fn new(repository: Arc<dyn DepartmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateDepartmentRequest) -> Result<Department, DomainError> {
        info!(name = %request.name, "Creating department");

        let mut department = Department::new(request.name)?.with_buffs(request.buffs)?;
        department.set_rabbited(request.rabbited);

        self.repository.create(department).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<Department>, DomainError> {
        self.repository.get(id).await
    }

    /// First department carrying exactly this name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Department>, DomainError> {
        debug!(name = %name, "Looking up department by name");
        self.repository.get_by_name(name.trim()).await
    }

    pub async fn list(&self, query: Option<DepartmentQuery>) -> Result<Vec<Department>, DomainError> {
        self.repository.list(&query.unwrap_or_default()).await
    }

    pub async fn count(&self, query: Option<DepartmentQuery>) -> Result<usize, DomainError> {
        self.repository.count(&query.unwrap_or_default()).await
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateDepartmentRequest,
    ) -> Result<Department, DomainError> {
        info!(id, "Updating department");

        let mut department = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Department '{}' not found", id)))?;

        if let Some(name) = request.name {
            department.set_name(name)?;
        }

        if let Some(buffs) = request.buffs {
            department.set_buffs(buffs)?;
        }

        if let Some(rabbited) = request.rabbited {
            department.set_rabbited(rabbited);
        }

        self.repository.update(department).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        info!(id, "Deleting department");

        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found(format!("Department '{}' not found", id)));
        }

        Ok(())
    }

    pub async fn assign_project(&self, department_id: i32, project_id: i32) -> Result<(), DomainError> {
        info!(department_id, project_id, "Assigning project to department");
        self.repository.assign_project(department_id, project_id).await
    }

    pub async fn projects_of(&self, department_id: i32) -> Result<Vec<i32>, DomainError> {
        if self.repository.get(department_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Department '{}' not found",
                department_id
            )));
        }

        self.repository.projects_of(department_id).await
    }

    /// Insert the seed department unless one with the same name exists.
    /// Returns the existing or newly created department.
    pub async fn ensure_seeded(
        &self,
        name: &str,
        buffs: &[String],
    ) -> Result<Department, DomainError> {
        let department = Department::new(name)?.with_buffs(buffs.to_vec())?;

        if let Some(existing) = self.repository.get_by_name(department.name()).await? {
            debug!(name = %department.name(), id = ?existing.id(), "Seed department already present");
            return Ok(existing);
        }

        let created = self.repository.create(department).await?;

        info!(name = %name, id = ?created.id(), "Seeded department");

        Ok(created)
    }
}
