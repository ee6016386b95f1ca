//! Game rule tables shared by the facility entities
//!
//! Every enum here is also a Postgres enum type; the string forms below are
//! the stored labels, so renaming a variant requires a migration.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Danger classification of an abnormality, also used as the grade of an E.G.O
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Zayin,
    Teth,
    He,
    Waw,
    Aleph,
}

impl ThreatLevel {
    pub const ALL: [ThreatLevel; 5] = [
        Self::Zayin,
        Self::Teth,
        Self::He,
        Self::Waw,
        Self::Aleph,
    ];

    /// Number of ticks in each research clock for this threat level
    pub fn max_clock(&self) -> i32 {
        match self {
            Self::Zayin => 4,
            Self::Teth => 5,
            Self::He => 6,
            Self::Waw => 8,
            Self::Aleph => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zayin => "ZAYIN",
            Self::Teth => "TETH",
            Self::He => "HE",
            Self::Waw => "WAW",
            Self::Aleph => "ALEPH",
        }
    }
}

/// Agent rank; captains tolerate more stress and trauma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Rank {
    #[default]
    Agent,
    Captain,
}

impl Rank {
    pub const ALL: [Rank; 2] = [Self::Agent, Self::Captain];

    pub fn max_stress(&self) -> i32 {
        match self {
            Self::Agent => 6,
            Self::Captain => 8,
        }
    }

    pub fn max_traumas(&self) -> usize {
        match self {
            Self::Agent => 1,
            Self::Captain => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::Captain => "Captain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trauma {
    Cold,
    Haunted,
    Obsessed,
    Paranoid,
    Reckless,
    Soft,
    Unstable,
    Vicious,
}

impl Trauma {
    pub const ALL: [Trauma; 8] = [
        Self::Cold,
        Self::Haunted,
        Self::Obsessed,
        Self::Paranoid,
        Self::Reckless,
        Self::Soft,
        Self::Unstable,
        Self::Vicious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::Haunted => "Haunted",
            Self::Obsessed => "Obsessed",
            Self::Paranoid => "Paranoid",
            Self::Reckless => "Reckless",
            Self::Soft => "Soft",
            Self::Unstable => "Unstable",
            Self::Vicious => "Vicious",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EgoType {
    Weapon,
    Suit,
    Gift,
}

impl EgoType {
    pub const ALL: [EgoType; 3] = [Self::Weapon, Self::Suit, Self::Gift];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "Weapon",
            Self::Suit => "Suit",
            Self::Gift => "Gift",
        }
    }
}

macro_rules! impl_rule_str {
    ($ty:ident, $label:literal) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| DomainError::validation(format!("Unknown {}: '{}'", $label, s)))
            }
        }
    };
}

impl_rule_str!(ThreatLevel, "threat level");
impl_rule_str!(Rank, "rank");
impl_rule_str!(Trauma, "trauma");
impl_rule_str!(EgoType, "E.G.O type");

/// Renders enum labels as a SQL `CREATE TYPE ... AS ENUM` value list
pub(crate) fn sql_enum_labels<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threat_clock_sizes_increase_with_danger() {
        let sizes: Vec<i32> = ThreatLevel::ALL.iter().map(|t| t.max_clock()).collect();
        assert_eq!(sizes, vec![4, 5, 6, 8, 10]);
    }

    #[test]
    fn test_threat_level_serde_labels() {
        assert_eq!(serde_json::to_string(&ThreatLevel::Waw).unwrap(), "\"WAW\"");
        let parsed: ThreatLevel = serde_json::from_str("\"ALEPH\"").unwrap();
        assert_eq!(parsed, ThreatLevel::Aleph);
    }

    #[test]
    fn test_from_str_matches_display() {
        for t in ThreatLevel::ALL {
            assert_eq!(t.to_string().parse::<ThreatLevel>().unwrap(), t);
        }
        for t in Trauma::ALL {
            assert_eq!(t.to_string().parse::<Trauma>().unwrap(), t);
        }
        assert!("Manager".parse::<Rank>().is_err());
    }

    #[test]
    fn test_rank_limits() {
        assert_eq!(Rank::Agent.max_stress(), 6);
        assert_eq!(Rank::Captain.max_stress(), 8);
        assert_eq!(Rank::Agent.max_traumas(), 1);
        assert_eq!(Rank::Captain.max_traumas(), 2);
    }

    #[test]
    fn test_sql_enum_labels() {
        assert_eq!(
            sql_enum_labels(&EgoType::ALL),
            "'Weapon', 'Suit', 'Gift'"
        );
    }
}
