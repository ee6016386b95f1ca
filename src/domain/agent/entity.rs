//! Agent entity and its owned records

use serde::{Deserialize, Serialize};

use crate::domain::rules::{Rank, Trauma};
use crate::domain::DomainError;

pub const MAX_HEAL: i32 = 4;
pub const MAX_VIRTUE: i32 = 5;
pub const MAX_VIRTUE_TICK: i32 = 6;
pub const MAX_ABILITY_TICK: i32 = 8;
pub const MAX_ACTION_LEVEL: i32 = 4;
pub const MAX_HARM_LEVEL: i32 = 3;

/// The four virtues an agent levels up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Virtue {
    Fortitude,
    Prudence,
    Temperance,
    Justice,
}

/// Per-virtue values; used both for levels and for clock ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Virtues {
    pub fortitude: i32,
    pub prudence: i32,
    pub temperance: i32,
    pub justice: i32,
}

impl Virtues {
    pub fn get(&self, virtue: Virtue) -> i32 {
        match virtue {
            Virtue::Fortitude => self.fortitude,
            Virtue::Prudence => self.prudence,
            Virtue::Temperance => self.temperance,
            Virtue::Justice => self.justice,
        }
    }

    fn check(&self, suffix: &str, max: i32) -> Result<(), DomainError> {
        DomainError::check_range(&format!("fortitude{}", suffix), self.fortitude, 0, max)?;
        DomainError::check_range(&format!("prudence{}", suffix), self.prudence, 0, max)?;
        DomainError::check_range(&format!("temperance{}", suffix), self.temperance, 0, max)?;
        DomainError::check_range(&format!("justice{}", suffix), self.justice, 0, max)
    }
}

/// Actions an agent can roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Force,
    Endure,
    Lurk,
    Rush,
    Observe,
    Consort,
    Shoot,
    Protocol,
    Discipline,
    Skirmish,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Self::Force,
        Self::Endure,
        Self::Lurk,
        Self::Rush,
        Self::Observe,
        Self::Consort,
        Self::Shoot,
        Self::Protocol,
        Self::Discipline,
        Self::Skirmish,
    ];

    /// Virtues an action draws on
    pub fn virtues(&self) -> &'static [Virtue] {
        use Virtue::*;

        match self {
            Self::Force => &[Fortitude],
            Self::Endure => &[Fortitude, Prudence],
            Self::Lurk => &[Fortitude, Temperance],
            Self::Rush => &[Fortitude, Justice],
            Self::Observe => &[Prudence],
            Self::Consort => &[Prudence, Temperance],
            Self::Shoot => &[Prudence, Justice],
            Self::Protocol => &[Temperance],
            Self::Discipline => &[Temperance, Justice],
            Self::Skirmish => &[Justice],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Endure => "endure",
            Self::Lurk => "lurk",
            Self::Rush => "rush",
            Self::Observe => "observe",
            Self::Consort => "consort",
            Self::Shoot => "shoot",
            Self::Protocol => "protocol",
            Self::Discipline => "discipline",
            Self::Skirmish => "skirmish",
        }
    }
}

/// Level of each action, `0..=4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionLevels {
    pub force: i32,
    pub endure: i32,
    pub lurk: i32,
    pub rush: i32,
    pub observe: i32,
    pub consort: i32,
    pub shoot: i32,
    pub protocol: i32,
    pub discipline: i32,
    pub skirmish: i32,
}

impl ActionLevels {
    pub fn get(&self, action: Action) -> i32 {
        match action {
            Action::Force => self.force,
            Action::Endure => self.endure,
            Action::Lurk => self.lurk,
            Action::Rush => self.rush,
            Action::Observe => self.observe,
            Action::Consort => self.consort,
            Action::Shoot => self.shoot,
            Action::Protocol => self.protocol,
            Action::Discipline => self.discipline,
            Action::Skirmish => self.skirmish,
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        for action in Action::ALL {
            DomainError::check_range(
                &format!("{}_lvl", action.as_str()),
                self.get(action),
                0,
                MAX_ACTION_LEVEL,
            )?;
        }

        Ok(())
    }
}

/// An employee of the facility
///
/// `rank`, `stress` and `traumas` are interdependent and only change through
/// their setters; everything else is plain data checked by [`Agent::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AgentRecord")]
pub struct Agent {
    pub id: Option<i32>,
    pub name: String,
    pub blurb: Option<String>,
    pub current_status: Option<String>,
    pub character_notes: Option<String>,
    rank: Rank,
    stress: i32,
    traumas: Vec<Trauma>,
    pub physical_heal: i32,
    pub mental_heal: i32,
    /// Shown on the facility map
    pub is_visible: bool,
    /// Unspent experience for ability and E.G.O gift clocks
    pub agent_exp: i32,
    pub virtues: Virtues,
    pub virtue_ticks: Virtues,
    pub ability_tick: i32,
    pub actions: ActionLevels,
    pub tile_id: Option<i32>,
    pub department_id: Option<i32>,
    pub abnormality_id: Option<i32>,
}

#[derive(Deserialize)]
struct AgentRecord {
    id: Option<i32>,
    name: String,
    blurb: Option<String>,
    current_status: Option<String>,
    character_notes: Option<String>,
    rank: Rank,
    #[serde(default)]
    stress: i32,
    #[serde(default)]
    traumas: Vec<Trauma>,
    #[serde(default)]
    physical_heal: i32,
    #[serde(default)]
    mental_heal: i32,
    is_visible: bool,
    #[serde(default)]
    agent_exp: i32,
    #[serde(default)]
    virtues: Virtues,
    #[serde(default)]
    virtue_ticks: Virtues,
    #[serde(default)]
    ability_tick: i32,
    #[serde(default)]
    actions: ActionLevels,
    tile_id: Option<i32>,
    department_id: Option<i32>,
    abnormality_id: Option<i32>,
}

impl TryFrom<AgentRecord> for Agent {
    type Error = DomainError;

    fn try_from(r: AgentRecord) -> Result<Self, Self::Error> {
        let agent = Self {
            id: r.id,
            name: r.name,
            blurb: r.blurb,
            current_status: r.current_status,
            character_notes: r.character_notes,
            rank: r.rank,
            stress: r.stress,
            traumas: r.traumas,
            physical_heal: r.physical_heal,
            mental_heal: r.mental_heal,
            is_visible: r.is_visible,
            agent_exp: r.agent_exp,
            virtues: r.virtues,
            virtue_ticks: r.virtue_ticks,
            ability_tick: r.ability_tick,
            actions: r.actions,
            tile_id: r.tile_id,
            department_id: r.department_id,
            abnormality_id: r.abnormality_id,
        };

        agent.validate()?;
        Ok(agent)
    }
}

impl Agent {
    pub fn new(name: impl Into<String>, rank: Rank) -> Result<Self, DomainError> {
        let agent = Self {
            id: None,
            name: name.into(),
            blurb: None,
            current_status: None,
            character_notes: None,
            rank,
            stress: 0,
            traumas: Vec::new(),
            physical_heal: 0,
            mental_heal: 0,
            is_visible: true,
            agent_exp: 0,
            virtues: Virtues::default(),
            virtue_ticks: Virtues::default(),
            ability_tick: 0,
            actions: ActionLevels::default(),
            tile_id: None,
            department_id: None,
            abnormality_id: None,
        };

        agent.validate()?;
        Ok(agent)
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn stress(&self) -> i32 {
        self.stress
    }

    pub fn traumas(&self) -> &[Trauma] {
        &self.traumas
    }

    /// Change rank; a demotion fails if current stress or traumas exceed the new rank's limits
    pub fn set_rank(&mut self, rank: Rank) -> Result<(), DomainError> {
        check_stress(rank, self.stress)?;
        check_traumas(rank, &self.traumas)?;
        self.rank = rank;
        Ok(())
    }

    pub fn set_stress(&mut self, stress: i32) -> Result<(), DomainError> {
        check_stress(self.rank, stress)?;
        self.stress = stress;
        Ok(())
    }

    pub fn add_trauma(&mut self, trauma: Trauma) -> Result<(), DomainError> {
        let mut traumas = self.traumas.clone();
        traumas.push(trauma);
        check_traumas(self.rank, &traumas)?;
        self.traumas = traumas;
        Ok(())
    }

    pub fn set_traumas(&mut self, traumas: Vec<Trauma>) -> Result<(), DomainError> {
        check_traumas(self.rank, &traumas)?;
        self.traumas = traumas;
        Ok(())
    }

    /// Dice pool for an action: its level plus the governing virtue levels
    pub fn dice_pool(&self, action: Action) -> i32 {
        self.actions.get(action)
            + action
                .virtues()
                .iter()
                .map(|v| self.virtues.get(*v))
                .sum::<i32>()
    }

    /// Check every field constraint
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Agent name cannot be empty"));
        }

        check_stress(self.rank, self.stress)?;
        check_traumas(self.rank, &self.traumas)?;
        DomainError::check_range("physical_heal", self.physical_heal, 0, MAX_HEAL)?;
        DomainError::check_range("mental_heal", self.mental_heal, 0, MAX_HEAL)?;

        if self.agent_exp < 0 {
            return Err(DomainError::validation("'agent_exp' cannot be negative"));
        }

        self.virtues.check("", MAX_VIRTUE)?;
        self.virtue_ticks.check("_tick", MAX_VIRTUE_TICK)?;
        DomainError::check_range("ability_tick", self.ability_tick, 0, MAX_ABILITY_TICK)?;
        self.actions.check()
    }
}

fn check_stress(rank: Rank, stress: i32) -> Result<(), DomainError> {
    if stress < 0 || stress > rank.max_stress() {
        return Err(DomainError::validation(format!(
            "For rank {} agents, 'stress' must be between 0 and {}",
            rank,
            rank.max_stress()
        )));
    }

    Ok(())
}

fn check_traumas(rank: Rank, traumas: &[Trauma]) -> Result<(), DomainError> {
    if traumas.len() > rank.max_traumas() {
        return Err(DomainError::validation(format!(
            "For rank {} agents, you can only have up to {} trauma(s)",
            rank,
            rank.max_traumas()
        )));
    }

    for (i, t) in traumas.iter().enumerate() {
        if traumas[..i].contains(t) {
            return Err(DomainError::validation(format!("Duplicate trauma '{}'", t)));
        }
    }

    Ok(())
}

/// A named ability an agent has unlocked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
}

impl Ability {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Ability name cannot be empty"));
        }

        Ok(Self {
            id: None,
            name,
            description: None,
        })
    }
}

/// Physical or mental harm suffered by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HarmRecord")]
pub struct Harm {
    pub id: Option<i32>,
    pub agent_id: i32,
    level: i32,
    pub is_physical: bool,
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct HarmRecord {
    id: Option<i32>,
    agent_id: i32,
    level: i32,
    is_physical: bool,
    description: Option<String>,
}

impl TryFrom<HarmRecord> for Harm {
    type Error = DomainError;

    fn try_from(r: HarmRecord) -> Result<Self, Self::Error> {
        let mut harm = Harm::new(r.agent_id, r.level, r.is_physical)?;
        harm.id = r.id;
        harm.description = r.description;
        Ok(harm)
    }
}

impl Harm {
    pub fn new(agent_id: i32, level: i32, is_physical: bool) -> Result<Self, DomainError> {
        DomainError::check_range("level", level, 0, MAX_HARM_LEVEL)?;

        Ok(Self {
            id: None,
            agent_id,
            level,
            is_physical,
            description: None,
        })
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}
