//! Agent domain module

mod entity;

pub use entity::{
    Ability, Action, ActionLevels, Agent, Harm, Virtue, Virtues, MAX_ABILITY_TICK,
    MAX_ACTION_LEVEL, MAX_HARM_LEVEL, MAX_HEAL, MAX_VIRTUE, MAX_VIRTUE_TICK,
};
