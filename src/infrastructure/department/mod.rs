//! Department infrastructure implementations

mod in_memory;
mod postgres_repository;
mod service;

pub use in_memory::InMemoryDepartmentRepository;
pub use postgres_repository::PostgresDepartmentRepository;
pub use service::{CreateDepartmentRequest, DepartmentService, UpdateDepartmentRequest};
