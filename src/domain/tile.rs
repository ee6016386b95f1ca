//! Facility map tiles

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const MAX_TILE_X: i32 = 27;
pub const MAX_TILE_Y: i32 = 15;

/// State of a containment unit built on a tile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainmentState {
    pub is_working: bool,
    pub meltdown: bool,
    pub work_type: Option<String>,
    pub engagement_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TileRecord")]
pub struct Tile {
    pub id: Option<i32>,
    x: i32,
    y: i32,
    can_place_containment: bool,
    /// Present only while the tile hosts a containment unit
    containment: Option<ContainmentState>,
}

#[derive(Deserialize)]
struct TileRecord {
    id: Option<i32>,
    x: i32,
    y: i32,
    can_place_containment: bool,
    containment: Option<ContainmentState>,
}

impl TryFrom<TileRecord> for Tile {
    type Error = DomainError;

    fn try_from(record: TileRecord) -> Result<Self, Self::Error> {
        let mut tile = Tile::new(record.x, record.y, record.can_place_containment)?;
        tile.id = record.id;

        if let Some(state) = record.containment {
            *tile.build_containment()? = state;
        }

        Ok(tile)
    }
}

impl Tile {
    pub fn new(x: i32, y: i32, can_place_containment: bool) -> Result<Self, DomainError> {
        DomainError::check_range("x", x, 0, MAX_TILE_X)?;
        DomainError::check_range("y", y, 0, MAX_TILE_Y)?;

        Ok(Self {
            id: None,
            x,
            y,
            can_place_containment,
            containment: None,
        })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn can_place_containment(&self) -> bool {
        self.can_place_containment
    }

    pub fn is_containment_unit(&self) -> bool {
        self.containment.is_some()
    }

    pub fn containment(&self) -> Option<&ContainmentState> {
        self.containment.as_ref()
    }

    /// Build a containment unit on this tile
    pub fn build_containment(&mut self) -> Result<&mut ContainmentState, DomainError> {
        if !self.can_place_containment {
            return Err(DomainError::validation(format!(
                "Tile ({}, {}) cannot hold a containment unit",
                self.x, self.y
            )));
        }

        Ok(self.containment.get_or_insert_with(ContainmentState::default))
    }

    /// Tear down the containment unit, clearing its state
    pub fn remove_containment(&mut self) -> Option<ContainmentState> {
        self.containment.take()
    }

    pub fn containment_mut(&mut self) -> Option<&mut ContainmentState> {
        self.containment.as_mut()
    }
}
