//! Department entity

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum length of a department name
pub const MAX_DEPARTMENT_NAME_LENGTH: usize = 100;

/// Trim a department name and check it against the column limits
pub fn normalize_department_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(DomainError::validation("Department name cannot be empty"));
    }

    // VARCHAR(100) counts characters, not bytes
    if trimmed.chars().count() > MAX_DEPARTMENT_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Department name cannot exceed {} characters",
            MAX_DEPARTMENT_NAME_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}

/// Validate department-wide buffs; each buff is a non-empty line of text
pub fn validate_buffs(buffs: &[String]) -> Result<(), DomainError> {
    if buffs.iter().any(|b| b.trim().is_empty()) {
        return Err(DomainError::validation("Department buffs cannot be empty strings"));
    }

    Ok(())
}

/// A facility department
///
/// Agents are assigned to at most one department; projects may span several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DepartmentRecord")]
pub struct Department {
    /// Database identifier, `None` until persisted
    id: Option<i32>,
    name: String,
    /// Buffs granted to every assigned agent
    buffs: Vec<String>,
    /// Locked down by the rabbit protocol
    rabbited: bool,
}

/// Wire shape of a department, checked on the way in
#[derive(Deserialize)]
struct DepartmentRecord {
    id: Option<i32>,
    name: String,
    #[serde(default)]
    buffs: Vec<String>,
    #[serde(default)]
    rabbited: bool,
}

impl TryFrom<DepartmentRecord> for Department {
    type Error = DomainError;

    fn try_from(record: DepartmentRecord) -> Result<Self, Self::Error> {
        let mut department = Department::new(record.name)?.with_buffs(record.buffs)?;
        department.id = record.id;
        department.rabbited = record.rabbited;
        Ok(department)
    }
}

impl Department {
    /// Create a new, unsaved department
    /// The name is stored trimmed
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = normalize_department_name(&name.into())?;

        Ok(Self {
            id: None,
            name,
            buffs: Vec::new(),
            rabbited: false,
        })
    }

    /// Rebuild a department loaded from storage
    pub fn restore(id: i32, name: String, buffs: Vec<String>, rabbited: bool) -> Self {
        Self {
            id: Some(id),
            name,
            buffs,
            rabbited,
        }
    }

    /// Set buffs (builder pattern)
    pub fn with_buffs(mut self, buffs: Vec<String>) -> Result<Self, DomainError> {
        validate_buffs(&buffs)?;
        self.buffs = buffs;
        Ok(self)
    }

    /// Assign the identifier given by storage
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    // Getters

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buffs(&self) -> &[String] {
        &self.buffs
    }

    pub fn is_rabbited(&self) -> bool {
        self.rabbited
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        self.name = normalize_department_name(&name.into())?;
        Ok(())
    }

    pub fn set_buffs(&mut self, buffs: Vec<String>) -> Result<(), DomainError> {
        validate_buffs(&buffs)?;
        self.buffs = buffs;
        Ok(())
    }

    /// Engage or lift the rabbit protocol lockdown
    pub fn set_rabbited(&mut self, rabbited: bool) {
        self.rabbited = rabbited;
    }
}
