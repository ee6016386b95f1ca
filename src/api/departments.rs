//! Department endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::department::{Department, DepartmentQuery};
use crate::domain::DomainError;
use crate::infrastructure::department::{CreateDepartmentRequest, UpdateDepartmentRequest};

/// Largest page a single list request may ask for
pub const MAX_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartmentApiRequest {
    pub name: String,
    #[serde(default)]
    pub buffs: Vec<String>,
    #[serde(default)]
    pub rabbited: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDepartmentApiRequest {
    pub name: Option<String>,
    pub buffs: Option<Vec<String>>,
    pub rabbited: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDepartmentsParams {
    pub rabbited: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListDepartmentsParams {
    fn filter(&self) -> DepartmentQuery {
        let mut query = DepartmentQuery::new();
        if let Some(rabbited) = self.rabbited {
            query = query.with_rabbited(rabbited);
        }
        query
    }

    fn page(&self) -> Result<DepartmentQuery, ApiError> {
        let mut query = self.filter();

        if let Some(limit) = self.limit {
            if limit > MAX_PAGE_SIZE {
                return Err(ApiError::bad_request(format!(
                    "'limit' must be at most {}",
                    MAX_PAGE_SIZE
                ))
                .with_param("limit"));
            }
            query = query.with_limit(limit);
        }

        if let Some(offset) = self.offset {
            query = query.with_offset(offset);
        }

        Ok(query)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentResponse {
    pub id: Option<i32>,
    pub name: String,
    pub buffs: Vec<String>,
    pub rabbited: bool,
}

impl From<&Department> for DepartmentResponse {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id(),
            name: department.name().to_string(),
            buffs: department.buffs().to_vec(),
            rabbited: department.is_rabbited(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDepartmentsResponse {
    pub departments: Vec<DepartmentResponse>,
    /// Matching departments ignoring limit and offset
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentProjectsResponse {
    pub department_id: i32,
    pub project_ids: Vec<i32>,
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| {
        DomainError::invalid_id(format!("'{}' is not a valid department id", raw)).into()
    })
}

/// GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<ListDepartmentsParams>,
) -> Result<Json<ListDepartmentsResponse>, ApiError> {
    debug!(?params, "Listing departments");

    let page = params.page()?;
    let departments = state.department_service.list(Some(page)).await?;
    let total = state.department_service.count(Some(params.filter())).await?;

    Ok(Json(ListDepartmentsResponse {
        departments: departments.iter().map(DepartmentResponse::from).collect(),
        total,
    }))
}

/// POST /api/departments
pub async fn create_department(
    State(state): State<AppState>,
    Json(request): Json<CreateDepartmentApiRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(name = %request.name, "Creating department");

    let department = state
        .department_service
        .create(CreateDepartmentRequest {
            name: request.name,
            buffs: request.buffs,
            rabbited: request.rabbited,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DepartmentResponse::from(&department)),
    ))
}

/// GET /api/departments/{id}
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let id = parse_id(&id)?;
    debug!(id, "Getting department");

    let department = state
        .department_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Department '{}' not found", id)))?;

    Ok(Json(DepartmentResponse::from(&department)))
}

/// GET /api/departments/by-name/{name}
pub async fn get_department_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    debug!(name = %name, "Getting department by name");

    let department = state
        .department_service
        .get_by_name(&name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Department named '{}' not found", name)))?;

    Ok(Json(DepartmentResponse::from(&department)))
}

/// PUT /api/departments/{id}
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDepartmentApiRequest>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let id = parse_id(&id)?;
    debug!(id, "Updating department");

    let department = state
        .department_service
        .update(
            id,
            UpdateDepartmentRequest {
                name: request.name,
                buffs: request.buffs,
                rabbited: request.rabbited,
            },
        )
        .await?;

    Ok(Json(DepartmentResponse::from(&department)))
}

/// DELETE /api/departments/{id}
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    debug!(id, "Deleting department");

    state.department_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/departments/{id}/projects
pub async fn list_department_projects(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DepartmentProjectsResponse>, ApiError> {
    let id = parse_id(&id)?;

    let project_ids = state.department_service.projects_of(id).await?;

    Ok(Json(DepartmentProjectsResponse {
        department_id: id,
        project_ids,
    }))
}

/// PUT /api/departments/{id}/projects/{project_id}
pub async fn assign_department_project(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let project_id = project_id.parse::<i32>().map_err(|_| {
        ApiError::bad_request(format!("'{}' is not a valid project id", project_id))
            .with_param("project_id")
    })?;
    debug!(id, project_id, "Assigning project");

    state
        .department_service
        .assign_project(id, project_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
