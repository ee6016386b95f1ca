//! Department repository trait

use async_trait::async_trait;

use super::entity::Department;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Query parameters for listing departments
#[derive(Debug, Clone, Default)]
pub struct DepartmentQuery {
    /// Only departments with this rabbit protocol state
    pub rabbited: Option<bool>,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Offset for pagination
    pub offset: Option<usize>,
}

impl DepartmentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rabbited(mut self, rabbited: bool) -> Self {
        self.rabbited = Some(rabbited);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn matches(&self, department: &Department) -> bool {
        match self.rabbited {
            Some(r) => department.is_rabbited() == r,
            None => true,
        }
    }
}

/// Repository for managing departments
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync + std::fmt::Debug {
    /// Get a department by ID
    async fn get(&self, id: i32) -> Result<Option<Department>, DomainError>;

    /// Get the first department (lowest ID) with exactly this name
    async fn get_by_name(&self, name: &str) -> Result<Option<Department>, DomainError>;

    /// Insert a new department, returning it with its assigned ID
    async fn create(&self, department: Department) -> Result<Department, DomainError>;

    /// Update an existing department
    async fn update(&self, department: Department) -> Result<Department, DomainError>;

    /// Delete a department by ID
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;

    /// List departments ordered by ID
    async fn list(&self, query: &DepartmentQuery) -> Result<Vec<Department>, DomainError>;

    /// Count departments matching query
    async fn count(&self, query: &DepartmentQuery) -> Result<usize, DomainError>;

    /// Link a project to a department; linking twice is a no-op
    async fn assign_project(&self, department_id: i32, project_id: i32) -> Result<(), DomainError>;

    /// IDs of the projects linked to a department
    async fn projects_of(&self, department_id: i32) -> Result<Vec<i32>, DomainError>;
}
