//! In-memory department repository for development and tests

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::department::{Department, DepartmentQuery, DepartmentRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct State {
    next_id: i32,
    departments: BTreeMap<i32, Department>,
    /// (department_id, project_id)
    projects: BTreeSet<(i32, i32)>,
    /// Project ids that assignments may reference
    known_projects: BTreeSet<i32>,
}

/// In-memory implementation of DepartmentRepository
///
/// IDs are assigned sequentially from 1, like a `SERIAL` column.
#[derive(Debug, Default)]
pub struct InMemoryDepartmentRepository {
    state: RwLock<State>,
}

impl InMemoryDepartmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository whose project table holds `project_ids`
    pub fn with_projects(project_ids: impl IntoIterator<Item = i32>) -> Self {
        let state = State {
            known_projects: project_ids.into_iter().collect(),
            ..State::default()
        };

        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn get(&self, id: i32) -> Result<Option<Department>, DomainError> {
        Ok(self.state.read().await.departments.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Department>, DomainError> {
        let state = self.state.read().await;

        // BTreeMap iterates in ID order, so this is the lowest matching ID
        Ok(state
            .departments
            .values()
            .find(|d| d.name() == name)
            .cloned())
    }

    async fn create(&self, department: Department) -> Result<Department, DomainError> {
        let mut state = self.state.write().await;

        state.next_id += 1;
        let id = state.next_id;
        let department = department.with_id(id);
        state.departments.insert(id, department.clone());

        Ok(department)
    }

    async fn update(&self, department: Department) -> Result<Department, DomainError> {
        let id = department
            .id()
            .ok_or_else(|| DomainError::invalid_id("Cannot update a department that was never saved"))?;

        let mut state = self.state.write().await;

        match state.departments.get_mut(&id) {
            Some(existing) => {
                *existing = department.clone();
                Ok(department)
            }
            None => Err(DomainError::not_found(format!(
                "Department '{}' not found",
                id
            ))),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        let removed = state.departments.remove(&id).is_some();
        state.projects.retain(|(dep, _)| *dep != id);

        Ok(removed)
    }

    async fn list(&self, query: &DepartmentQuery) -> Result<Vec<Department>, DomainError> {
        let state = self.state.read().await;

        let result = state
            .departments
            .values()
            .filter(|d| query.matches(d))
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(result)
    }

    async fn count(&self, query: &DepartmentQuery) -> Result<usize, DomainError> {
        let state = self.state.read().await;
        Ok(state.departments.values().filter(|d| query.matches(d)).count())
    }

    async fn assign_project(&self, department_id: i32, project_id: i32) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        if !state.departments.contains_key(&department_id)
            || !state.known_projects.contains(&project_id)
        {
            return Err(DomainError::not_found(format!(
                "Department '{}' or project '{}' not found",
                department_id, project_id
            )));
        }

        state.projects.insert((department_id, project_id));
        Ok(())
    }

    async fn projects_of(&self, department_id: i32) -> Result<Vec<i32>, DomainError> {
        let state = self.state.read().await;

        Ok(state
            .projects
            .range((department_id, i32::MIN)..=(department_id, i32::MAX))
            .map(|(_, project)| *project)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(name: &str) -> Department {
        Department::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryDepartmentRepository::new();

        let a = repo.create(department("Control")).await.unwrap();
        let b = repo.create(department("Training")).await.unwrap();

        assert_eq!(a.id(), Some(1));
        assert_eq!(b.id(), Some(2));
        assert_eq!(repo.get(2).await.unwrap().unwrap().name(), "Training");
    }

    #[tokio::test]
    async fn test_get_by_name_returns_first_match() {
        let repo = InMemoryDepartmentRepository::new();

        repo.create(department("Testing")).await.unwrap();
        repo.create(department("Testing")).await.unwrap();

        let found = repo.get_by_name("Testing").await.unwrap().unwrap();
        assert_eq!(found.id(), Some(1));
        assert!(repo.get_by_name("testing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update() {
        let repo = InMemoryDepartmentRepository::new();
        let mut dep = repo.create(department("Safety")).await.unwrap();

        dep.set_rabbited(true);
        repo.update(dep).await.unwrap();

        assert!(repo.get(1).await.unwrap().unwrap().is_rabbited());
    }

    #[tokio::test]
    async fn test_update_missing_or_unsaved() {
        let repo = InMemoryDepartmentRepository::new();

        let unsaved = repo.update(department("Ghost")).await;
        assert!(matches!(unsaved, Err(DomainError::InvalidId { .. })));

        let missing = repo.update(department("Ghost").with_id(42)).await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_drops_project_links() {
        let repo = InMemoryDepartmentRepository::with_projects([10]);
        let dep = repo.create(department("Welfare")).await.unwrap();
        let id = dep.id().unwrap();

        repo.assign_project(id, 10).await.unwrap();
        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.projects_of(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_pagination_and_filter() {
        let repo = InMemoryDepartmentRepository::new();

        for name in ["A", "B", "C", "D"] {
            repo.create(department(name)).await.unwrap();
        }

        let mut c = repo.get(3).await.unwrap().unwrap();
        c.set_rabbited(true);
        repo.update(c).await.unwrap();

        let page = repo
            .list(&DepartmentQuery::new().with_offset(1).with_limit(2))
            .await
            .unwrap();
        let names: Vec<&str> = page.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["B", "C"]);

        let locked = DepartmentQuery::new().with_rabbited(true);
        assert_eq!(repo.count(&locked).await.unwrap(), 1);
        assert_eq!(repo.count(&DepartmentQuery::new()).await.unwrap(), 4);
        assert!(repo
            .list(&DepartmentQuery::new().with_offset(10))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_assign_project_idempotent() {
        let repo = InMemoryDepartmentRepository::with_projects([3, 7]);
        let id = repo.create(department("Records")).await.unwrap().id().unwrap();

        repo.assign_project(id, 7).await.unwrap();
        repo.assign_project(id, 7).await.unwrap();
        repo.assign_project(id, 3).await.unwrap();

        assert_eq!(repo.projects_of(id).await.unwrap(), vec![3, 7]);
        assert!(repo.assign_project(99, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_assign_unknown_project_is_not_found() {
        let repo = InMemoryDepartmentRepository::with_projects([7]);
        let id = repo.create(department("Records")).await.unwrap().id().unwrap();

        let result = repo.assign_project(id, 8).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(repo.projects_of(id).await.unwrap().is_empty());

        let empty = InMemoryDepartmentRepository::new();
        let id = empty.create(department("Records")).await.unwrap().id().unwrap();
        assert!(empty.assign_project(id, 7).await.is_err());
    }

    #[tokio::test]
    async fn test_create_after_delete_keeps_counting() {
        let repo = InMemoryDepartmentRepository::new();

        let first = repo.create(department("Control")).await.unwrap();
        repo.delete(first.id().unwrap()).await.unwrap();
        let second = repo.create(department("Control")).await.unwrap();

        assert_eq!(second.id(), Some(2));
        assert_eq!(repo.get(2).await.unwrap().unwrap().id(), Some(2));
    }
}
