//! Progress clocks owned by either an agent or an abnormality

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Owner of a clock; exactly one side of the relation is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ClockOwner {
    Agent(i32),
    Abnormality(i32),
}

impl ClockOwner {
    /// Build from the two nullable foreign keys stored in `clocks`
    pub fn from_columns(
        agent_id: Option<i32>,
        abnormality_id: Option<i32>,
    ) -> Result<Self, DomainError> {
        match (agent_id, abnormality_id) {
            (Some(id), None) => Ok(Self::Agent(id)),
            (None, Some(id)) => Ok(Self::Abnormality(id)),
            _ => Err(DomainError::validation(
                "A clock belongs to exactly one agent or abnormality",
            )),
        }
    }

    /// Split into `(agent_id, abnormality_id)` columns
    pub fn to_columns(&self) -> (Option<i32>, Option<i32>) {
        match self {
            Self::Agent(id) => (Some(*id), None),
            Self::Abnormality(id) => (None, Some(*id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClockRecord")]
pub struct Clock {
    pub id: Option<i32>,
    pub owner: ClockOwner,
    max_count: i32,
    tick_count: i32,
    pub important: bool,
}

#[derive(Deserialize)]
struct ClockRecord {
    id: Option<i32>,
    owner: ClockOwner,
    max_count: i32,
    #[serde(default)]
    tick_count: i32,
    #[serde(default)]
    important: bool,
}

impl TryFrom<ClockRecord> for Clock {
    type Error = DomainError;

    fn try_from(record: ClockRecord) -> Result<Self, Self::Error> {
        let mut clock = Clock::new(record.owner, record.max_count)?;
        clock.set_ticks(record.tick_count)?;
        clock.id = record.id;
        clock.important = record.important;
        Ok(clock)
    }
}

impl Clock {
    pub fn new(owner: ClockOwner, max_count: i32) -> Result<Self, DomainError> {
        if max_count < 1 {
            return Err(DomainError::validation("'max_count' must be at least 1"));
        }

        Ok(Self {
            id: None,
            owner,
            max_count,
            tick_count: 0,
            important: false,
        })
    }

    pub fn max_count(&self) -> i32 {
        self.max_count
    }

    pub fn tick_count(&self) -> i32 {
        self.tick_count
    }

    pub fn is_full(&self) -> bool {
        self.tick_count == self.max_count
    }

    pub fn set_ticks(&mut self, ticks: i32) -> Result<(), DomainError> {
        DomainError::check_range("tick_count", ticks, 0, self.max_count)?;
        self.tick_count = ticks;
        Ok(())
    }

    /// Tick once; returns true when this tick filled the clock
    pub fn tick(&mut self) -> bool {
        if self.is_full() {
            return false;
        }

        self.tick_count += 1;
        self.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_exactly_one() {
        assert_eq!(
            ClockOwner::from_columns(Some(2), None).unwrap(),
            ClockOwner::Agent(2)
        );
        assert_eq!(
            ClockOwner::from_columns(None, Some(5)).unwrap().to_columns(),
            (None, Some(5))
        );
        assert!(ClockOwner::from_columns(None, None).is_err());
        assert!(ClockOwner::from_columns(Some(1), Some(1)).is_err());
    }

    #[test]
    fn test_tick_until_full() {
        let mut clock = Clock::new(ClockOwner::Agent(1), 2).unwrap();

        assert!(!clock.tick());
        assert!(clock.tick());
        assert!(!clock.tick());
        assert_eq!(clock.tick_count(), 2);
    }

    #[test]
    fn test_set_ticks_bounds() {
        let mut clock = Clock::new(ClockOwner::Abnormality(1), 4).unwrap();

        assert!(clock.set_ticks(5).is_err());
        clock.set_ticks(4).unwrap();
        assert!(clock.is_full());
        assert!(Clock::new(ClockOwner::Agent(1), 0).is_err());
    }

    #[test]
    fn test_deserialize_rejects_overfull_clock() {
        let full: Clock = serde_json::from_str(
            r#"{"id": 3, "owner": {"kind": "agent", "id": 1}, "max_count": 4, "tick_count": 4, "important": true}"#,
        )
        .unwrap();
        assert!(full.is_full());
        assert!(full.important);

        let overfull = r#"{"id": 3, "owner": {"kind": "agent", "id": 1}, "max_count": 4, "tick_count": 5}"#;
        assert!(serde_json::from_str::<Clock>(overfull).is_err());

        let empty = r#"{"id": 3, "owner": {"kind": "abnormality", "id": 1}, "max_count": 0}"#;
        assert!(serde_json::from_str::<Clock>(empty).is_err());
    }
}
