//! Facility-wide projects progressed by departments

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProjectRecord")]
pub struct Project {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    max_clock: i32,
    curr_tick: i32,
}

#[derive(Deserialize)]
struct ProjectRecord {
    id: Option<i32>,
    name: String,
    description: Option<String>,
    max_clock: i32,
    #[serde(default)]
    curr_tick: i32,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = DomainError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        let mut project = Project::new(record.name, record.max_clock)?;
        project.set_tick(record.curr_tick)?;
        project.id = record.id;
        project.description = record.description;
        Ok(project)
    }
}

impl Project {
    pub fn new(name: impl Into<String>, max_clock: i32) -> Result<Self, DomainError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Project name cannot be empty"));
        }
        if max_clock < 1 {
            return Err(DomainError::validation("'max_clock' must be at least 1"));
        }

        Ok(Self {
            id: None,
            name,
            description: None,
            max_clock,
            curr_tick: 0,
        })
    }

    pub fn max_clock(&self) -> i32 {
        self.max_clock
    }

    pub fn curr_tick(&self) -> i32 {
        self.curr_tick
    }

    pub fn is_complete(&self) -> bool {
        self.curr_tick == self.max_clock
    }

    pub fn set_tick(&mut self, tick: i32) -> Result<(), DomainError> {
        DomainError::check_range("curr_tick", tick, 0, self.max_clock)?;
        self.curr_tick = tick;
        Ok(())
    }

    /// Advance by `ticks`, saturating at the clock size
    pub fn advance(&mut self, ticks: i32) {
        self.curr_tick = self.curr_tick.saturating_add(ticks).clamp(0, self.max_clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_bounds() {
        let mut p = Project::new("Overtime", 6).unwrap();

        assert!(p.set_tick(7).is_err());
        p.set_tick(6).unwrap();
        assert!(p.is_complete());
        assert!(Project::new("Empty", 0).is_err());
    }

    #[test]
    fn test_advance_saturates() {
        let mut p = Project::new("Overtime", 4).unwrap();

        p.advance(3);
        assert_eq!(p.curr_tick(), 3);
        p.advance(5);
        assert_eq!(p.curr_tick(), 4);
        p.advance(-10);
        assert_eq!(p.curr_tick(), 0);
    }

    #[test]
    fn test_deserialize_checks_tick() {
        let p: Project =
            serde_json::from_str(r#"{"id": 2, "name": "Overtime", "max_clock": 4, "curr_tick": 4}"#).unwrap();
        assert!(p.is_complete());

        let past_end = r#"{"id": 2, "name": "Overtime", "max_clock": 4, "curr_tick": 5}"#;
        assert!(serde_json::from_str::<Project>(past_end).is_err());
        assert!(serde_json::from_str::<Project>(r#"{"id": null, "name": "", "max_clock": 4}"#).is_err());
    }
}
