//! Domain layer - facility entities, game rules and repository traits

pub mod abnormality;
pub mod agent;
pub mod clock;
pub mod department;
pub mod error;
pub mod project;
pub mod rules;
pub mod tile;

pub use abnormality::{Abnormality, AbnormalityProfile, Activity, Ego};
pub use agent::{Ability, Action, ActionLevels, Agent, Harm, Virtue, Virtues};
pub use clock::{Clock, ClockOwner};
pub use department::{Department, DepartmentQuery, DepartmentRepository};
pub use error::DomainError;
pub use project::Project;
pub use rules::{EgoType, Rank, ThreatLevel, Trauma};
pub use tile::{ContainmentState, Tile};
