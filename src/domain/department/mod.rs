//! Departments: groups of agents sharing buffs and project assignments

mod entity;
mod repository;

pub use entity::{normalize_department_name, validate_buffs, Department, MAX_DEPARTMENT_NAME_LENGTH};
pub use repository::{DepartmentQuery, DepartmentRepository};

#[cfg(test)]
pub use repository::MockDepartmentRepository;
