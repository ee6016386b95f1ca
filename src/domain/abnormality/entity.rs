//! Abnormality and E.G.O entities

use serde::{Deserialize, Serialize};

use crate::domain::rules::{EgoType, ThreatLevel};
use crate::domain::DomainError;

/// Number of research clocks every abnormality carries
pub const RESEARCH_CLOCKS: usize = 4;

/// Combat and work profile of an abnormality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbnormalityProfile {
    pub description: String,
    pub damage_type: String,
    pub favored_work: String,
    pub disfavored_work: String,
    pub can_breach: bool,
    pub weaknesses: String,
    pub resists: String,
}

/// Activity state; an abnormality is never breaching and being worked on at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    #[default]
    Idle,
    Working,
    Breaching,
}

impl Activity {
    pub fn from_flags(is_breaching: bool, is_working: bool) -> Result<Self, DomainError> {
        match (is_breaching, is_working) {
            (false, false) => Ok(Self::Idle),
            (false, true) => Ok(Self::Working),
            (true, false) => Ok(Self::Breaching),
            (true, true) => Err(DomainError::validation(
                "An abnormality cannot be breaching and worked on at the same time",
            )),
        }
    }

    pub fn is_breaching(&self) -> bool {
        matches!(self, Self::Breaching)
    }

    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working)
    }
}

/// A contained entity studied by the facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AbnormalityRecord")]
pub struct Abnormality {
    pub id: Option<i32>,
    pub name: String,
    pub abno_code: String,
    /// Flavor text
    pub blurb: String,
    pub current_status: Option<String>,
    threat_level: ThreatLevel,
    activity: Activity,
    pub profile: AbnormalityProfile,
    management_notes: Vec<String>,
    management_show: usize,
    stories: Vec<String>,
    story_show: usize,
    clocks: [i32; RESEARCH_CLOCKS],
    pub clock_4_finished: bool,
    pub player_notes: Option<String>,
    pub tile_id: Option<i32>,
}

#[derive(Deserialize)]
struct AbnormalityRecord {
    id: Option<i32>,
    name: String,
    abno_code: String,
    blurb: String,
    current_status: Option<String>,
    threat_level: ThreatLevel,
    #[serde(default)]
    activity: Activity,
    profile: AbnormalityProfile,
    #[serde(default)]
    management_notes: Vec<String>,
    #[serde(default)]
    management_show: usize,
    #[serde(default)]
    stories: Vec<String>,
    #[serde(default)]
    story_show: usize,
    #[serde(default)]
    clocks: [i32; RESEARCH_CLOCKS],
    #[serde(default)]
    clock_4_finished: bool,
    player_notes: Option<String>,
    tile_id: Option<i32>,
}

impl TryFrom<AbnormalityRecord> for Abnormality {
    type Error = DomainError;

    fn try_from(record: AbnormalityRecord) -> Result<Self, Self::Error> {
        let mut abno = Abnormality::new(
            record.name,
            record.abno_code,
            record.blurb,
            record.threat_level,
            record.profile,
        )?;

        for (index, ticks) in record.clocks.into_iter().enumerate() {
            abno.set_clock(index, ticks)?;
        }
        abno.set_management_notes(record.management_notes, record.management_show)?;
        abno.set_stories(record.stories, record.story_show)?;

        abno.id = record.id;
        abno.current_status = record.current_status;
        abno.activity = record.activity;
        abno.clock_4_finished = record.clock_4_finished;
        abno.player_notes = record.player_notes;
        abno.tile_id = record.tile_id;

        Ok(abno)
    }
}

impl Abnormality {
    pub fn new(
        name: impl Into<String>,
        abno_code: impl Into<String>,
        blurb: impl Into<String>,
        threat_level: ThreatLevel,
        profile: AbnormalityProfile,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let abno_code = abno_code.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Abnormality name cannot be empty"));
        }
        if abno_code.trim().is_empty() {
            return Err(DomainError::validation("Abnormality code cannot be empty"));
        }

        Ok(Self {
            id: None,
            name,
            abno_code,
            blurb: blurb.into(),
            current_status: None,
            threat_level,
            activity: Activity::Idle,
            profile,
            management_notes: Vec::new(),
            management_show: 0,
            stories: Vec::new(),
            story_show: 0,
            clocks: [0; RESEARCH_CLOCKS],
            clock_4_finished: false,
            player_notes: None,
            tile_id: None,
        })
    }

    pub fn threat_level(&self) -> ThreatLevel {
        self.threat_level
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn management_notes(&self) -> &[String] {
        &self.management_notes
    }

    pub fn management_show(&self) -> usize {
        self.management_show
    }

    pub fn stories(&self) -> &[String] {
        &self.stories
    }

    pub fn story_show(&self) -> usize {
        self.story_show
    }

    pub fn clocks(&self) -> [i32; RESEARCH_CLOCKS] {
        self.clocks
    }

    /// Reclassify; fails if any research clock exceeds the new maximum
    pub fn set_threat_level(&mut self, threat_level: ThreatLevel) -> Result<(), DomainError> {
        for (i, ticks) in self.clocks.iter().enumerate() {
            check_clock(threat_level, i, *ticks)?;
        }

        self.threat_level = threat_level;
        Ok(())
    }

    pub fn set_activity(&mut self, activity: Activity) {
        self.activity = activity;
    }

    /// Set a research clock (0-based index) to `ticks`
    pub fn set_clock(&mut self, index: usize, ticks: i32) -> Result<(), DomainError> {
        if index >= RESEARCH_CLOCKS {
            return Err(DomainError::validation(format!(
                "Research clock index must be below {}",
                RESEARCH_CLOCKS
            )));
        }

        check_clock(self.threat_level, index, ticks)?;
        self.clocks[index] = ticks;
        Ok(())
    }

    /// Whether a research clock has been filled
    pub fn is_clock_finished(&self, index: usize) -> bool {
        self.clocks
            .get(index)
            .is_some_and(|t| *t == self.threat_level.max_clock())
    }

    pub fn set_management_notes(&mut self, notes: Vec<String>, show: usize) -> Result<(), DomainError> {
        check_shown("management_show", show, notes.len())?;
        self.management_notes = notes;
        self.management_show = show;
        Ok(())
    }

    pub fn set_stories(&mut self, stories: Vec<String>, show: usize) -> Result<(), DomainError> {
        check_shown("story_show", show, stories.len())?;
        self.stories = stories;
        self.story_show = show;
        Ok(())
    }

    /// Management notes unlocked so far
    pub fn visible_management_notes(&self) -> &[String] {
        self.management_notes
            .get(..self.management_show)
            .unwrap_or_default()
    }

    /// Stories unlocked so far
    pub fn visible_stories(&self) -> &[String] {
        self.stories.get(..self.story_show).unwrap_or_default()
    }
}

fn check_clock(threat_level: ThreatLevel, index: usize, ticks: i32) -> Result<(), DomainError> {
    let max = threat_level.max_clock();

    if ticks < 0 || ticks > max {
        return Err(DomainError::validation(format!(
            "'clock_{}' must be between 0 and {} for threat level {}, got {}",
            index + 1,
            max,
            threat_level,
            ticks
        )));
    }

    Ok(())
}

fn check_shown(field: &str, show: usize, len: usize) -> Result<(), DomainError> {
    if show > len {
        return Err(DomainError::validation(format!(
            "'{}' cannot exceed the number of entries ({}), got {}",
            field, len, show
        )));
    }

    Ok(())
}

/// Equipment or gift extracted from an abnormality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ego {
    pub id: Option<i32>,
    pub abnormality_id: i32,
    pub ego_type: EgoType,
    pub name: String,
    pub grade: ThreatLevel,
    pub effect: String,
    pub description: Option<String>,
}

impl Ego {
    pub fn new(
        abnormality_id: i32,
        ego_type: EgoType,
        name: impl Into<String>,
        grade: ThreatLevel,
        effect: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("E.G.O name cannot be empty"));
        }

        Ok(Self {
            id: None,
            abnormality_id,
            ego_type,
            name,
            grade,
            effect: effect.into(),
            description: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> AbnormalityProfile {
        AbnormalityProfile {
            description: "A small bird".to_string(),
            damage_type: "Red".to_string(),
            favored_work: "Instinct".to_string(),
            disfavored_work: "Repression".to_string(),
            can_breach: true,
            weaknesses: "Pale".to_string(),
            resists: "Black".to_string(),
        }
    }

    fn abno(level: ThreatLevel) -> Abnormality {
        Abnormality::new("Punishing Bird", "O-02-56", "Peck", level, profile()).unwrap()
    }

    #[test]
    fn test_new_abnormality_is_idle() {
        let a = abno(ThreatLevel::Teth);

        assert_eq!(a.activity(), Activity::Idle);
        assert_eq!(a.clocks(), [0; RESEARCH_CLOCKS]);
        assert!(Abnormality::new("", "X", "", ThreatLevel::He, profile()).is_err());
    }

    #[test]
    fn test_activity_flags_exclusive() {
        assert_eq!(Activity::from_flags(false, false).unwrap(), Activity::Idle);
        assert!(Activity::from_flags(true, false).unwrap().is_breaching());
        assert!(Activity::from_flags(false, true).unwrap().is_working());
        assert!(Activity::from_flags(true, true).is_err());
    }

    #[test]
    fn test_clock_bounded_by_threat_level() {
        let mut a = abno(ThreatLevel::Zayin);

        a.set_clock(0, 4).unwrap();
        assert!(a.is_clock_finished(0));
        assert!(a.set_clock(1, 5).is_err());
        assert!(a.set_clock(1, -1).is_err());
        assert!(a.set_clock(4, 0).is_err());
    }

    #[test]
    fn test_downgrade_rejected_when_clock_too_high() {
        let mut a = abno(ThreatLevel::Aleph);
        a.set_clock(2, 9).unwrap();

        assert!(a.set_threat_level(ThreatLevel::He).is_err());
        assert_eq!(a.threat_level(), ThreatLevel::Aleph);

        a.set_clock(2, 6).unwrap();
        a.set_threat_level(ThreatLevel::He).unwrap();
        assert!(a.is_clock_finished(2));
    }

    #[test]
    fn test_shown_notes_bounded() {
        let mut a = abno(ThreatLevel::He);
        let notes = vec!["first".to_string(), "second".to_string()];

        assert!(a.set_management_notes(notes.clone(), 3).is_err());
        a.set_management_notes(notes, 1).unwrap();
        assert_eq!(a.visible_management_notes(), &["first".to_string()]);

        a.set_stories(vec![], 0).unwrap();
        assert!(a.visible_stories().is_empty());
    }

    #[test]
    fn test_deserialize_checks_clocks_and_notes() {
        let mut json = serde_json::to_value(abno(ThreatLevel::He)).unwrap();
        json["clocks"] = serde_json::json!([6, 0, 0, 0]);
        let parsed: Abnormality = serde_json::from_value(json.clone()).unwrap();
        assert!(parsed.is_clock_finished(0));

        json["clocks"] = serde_json::json!([99, 0, 0, 0]);
        assert!(serde_json::from_value::<Abnormality>(json.clone()).is_err());

        json["clocks"] = serde_json::json!([0, 0, 0, 0]);
        json["management_show"] = serde_json::json!(3);
        let err = serde_json::from_value::<Abnormality>(json).unwrap_err();
        assert!(err.to_string().contains("management_show"));
    }

    #[test]
    fn test_serialized_abnormality_reads_back() {
        let mut a = abno(ThreatLevel::Waw);
        a.set_stories(vec!["one".to_string(), "two".to_string()], 2).unwrap();
        a.set_activity(Activity::Working);
        a.tile_id = Some(12);

        let text = serde_json::to_string(&a).unwrap();
        let parsed: Abnormality = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, a);
        assert_eq!(parsed.visible_stories().len(), 2);
    }

    #[test]
    fn test_ego_requires_name() {
        assert!(Ego::new(1, EgoType::Weapon, "Beak", ThreatLevel::Teth, "Bleed").is_ok());
        assert!(Ego::new(1, EgoType::Gift, "", ThreatLevel::Teth, "").is_err());
    }
}
