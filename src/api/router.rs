use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::departments;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Department routes, mounted under `/api/departments`
fn department_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(departments::list_departments).post(departments::create_department),
        )
        .route("/by-name/{name}", get(departments::get_department_by_name))
        .route(
            "/{id}",
            get(departments::get_department)
                .put(departments::update_department)
                .delete(departments::delete_department),
        )
        .route("/{id}/projects", get(departments::list_department_projects))
        .route(
            "/{id}/projects/{project_id}",
            put(departments::assign_department_project),
        )
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api/departments", department_routes())
        // Route layer so `MatchedPath` is already set when requests are logged
        .route_layer(middleware::from_fn(logging_middleware))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
