//! Abnormality domain module

mod entity;

pub use entity::{Abnormality, AbnormalityProfile, Activity, Ego, RESEARCH_CLOCKS};
