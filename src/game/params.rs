//! Match Parameters
//!
//! Read-only settings fixed when a match is created. The relay that
//! starts a room ships these to every participant, so besides serde the
//! struct exposes an explicit, versioned, ordered field list that any
//! transport can carry as a flat property bag.

use serde::{Serialize, Deserialize};

use crate::game::error::ParamsError;

/// Version of the ordered field schema. Bump when `FIELD_NAMES` changes.
pub const PARAM_SCHEMA_VERSION: u16 = 1;

/// Field order of the schema.
pub const FIELD_NAMES: [&str; 7] = [
    "map_name",
    "num_players",
    "tiles_for_victory",
    "fog_of_war_enabled",
    "rabbit_enabled",
    "first_player_first_turn_count",
    "player_default_turn_count",
];

/// Settings for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParameters {
    /// Which map to load
    pub map_name: String,
    /// Seats in the match
    pub num_players: u8,
    /// Owned-cell count that wins outright
    pub tiles_for_victory: u32,
    /// Hide cells more than two steps from a player's territory
    pub fog_of_war_enabled: bool,
    /// Enable the rabbit hazard and carrot tiles
    pub rabbit_enabled: bool,
    /// Moves the first player gets on the opening turn
    pub first_player_first_turn_count: u32,
    /// Base moves per turn before resource bonuses
    pub player_default_turn_count: u32,
}

impl Default for GameParameters {
    fn default() -> Self {
        Self {
            map_name: "Map1".to_string(),
            num_players: 2,
            tiles_for_victory: 20,
            fog_of_war_enabled: false,
            rabbit_enabled: true,
            first_player_first_turn_count: 1,
            player_default_turn_count: 2,
        }
    }
}

/// Highest seat count; owners travel as signed bytes with -1 for nobody.
pub const MAX_PLAYERS: u8 = i8::MAX as u8;

/// One value in the flat field list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    /// String field
    Text(String),
    /// Byte field
    U8(u8),
    /// Counter field
    U32(u32),
    /// Switch
    Bool(bool),
}

impl GameParameters {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.num_players < 2 {
            return Err(ParamsError::InvalidValue {
                field: "num_players",
                reason: "must be at least 2",
            });
        }
        if self.num_players > MAX_PLAYERS {
            return Err(ParamsError::InvalidValue {
                field: "num_players",
                reason: "must be at most 127",
            });
        }
        if self.first_player_first_turn_count == 0 {
            return Err(ParamsError::InvalidValue {
                field: "first_player_first_turn_count",
                reason: "must be positive",
            });
        }
        if self.player_default_turn_count == 0 {
            return Err(ParamsError::InvalidValue {
                field: "player_default_turn_count",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Flatten into schema order.
    pub fn to_fields(&self) -> Vec<ParamValue> {
        vec![
            ParamValue::Text(self.map_name.clone()),
            ParamValue::U8(self.num_players),
            ParamValue::U32(self.tiles_for_victory),
            ParamValue::Bool(self.fog_of_war_enabled),
            ParamValue::Bool(self.rabbit_enabled),
            ParamValue::U32(self.first_player_first_turn_count),
            ParamValue::U32(self.player_default_turn_count),
        ]
    }

    /// Rebuild from a schema-ordered field list.
    pub fn from_fields(version: u16, fields: Vec<ParamValue>) -> Result<Self, ParamsError> {
        if version != PARAM_SCHEMA_VERSION {
            return Err(ParamsError::VersionMismatch {
                found: version,
                expected: PARAM_SCHEMA_VERSION,
            });
        }
        if fields.len() != FIELD_NAMES.len() {
            return Err(ParamsError::FieldCount {
                expected: FIELD_NAMES.len(),
                found: fields.len(),
            });
        }

        let mut it = fields.into_iter().zip(FIELD_NAMES);
        let mut next = || it.next().ok_or(ParamsError::FieldCount {
            expected: FIELD_NAMES.len(),
            found: 0,
        });

        Ok(Self {
            map_name: text(next()?)?,
            num_players: byte(next()?)?,
            tiles_for_victory: word(next()?)?,
            fog_of_war_enabled: flag(next()?)?,
            rabbit_enabled: flag(next()?)?,
            first_player_first_turn_count: word(next()?)?,
            player_default_turn_count: word(next()?)?,
        })
    }

    /// Compact binary form: schema version followed by the field list.
    pub fn encode(&self) -> Result<Vec<u8>, ParamsError> {
        bincode::serialize(&(PARAM_SCHEMA_VERSION, self.to_fields()))
            .map_err(|e| ParamsError::Malformed(e.to_string()))
    }

    /// Inverse of `encode`.
    pub fn decode(bytes: &[u8]) -> Result<Self, ParamsError> {
        let (version, fields): (u16, Vec<ParamValue>) = bincode::deserialize(bytes)
            .map_err(|e| ParamsError::Malformed(e.to_string()))?;
        Self::from_fields(version, fields)
    }

    /// Parse from JSON. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        serde_json::from_str(json).map_err(|e| ParamsError::Malformed(e.to_string()))
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String, ParamsError> {
        serde_json::to_string_pretty(self).map_err(|e| ParamsError::Malformed(e.to_string()))
    }
}

fn text((value, name): (ParamValue, &'static str)) -> Result<String, ParamsError> {
    match value {
        ParamValue::Text(s) => Ok(s),
        _ => Err(ParamsError::FieldType(name)),
    }
}

fn byte((value, name): (ParamValue, &'static str)) -> Result<u8, ParamsError> {
    match value {
        ParamValue::U8(v) => Ok(v),
        _ => Err(ParamsError::FieldType(name)),
    }
}

fn word((value, name): (ParamValue, &'static str)) -> Result<u32, ParamsError> {
    match value {
        ParamValue::U32(v) => Ok(v),
        _ => Err(ParamsError::FieldType(name)),
    }
}

fn flag((value, name): (ParamValue, &'static str)) -> Result<bool, ParamsError> {
    match value {
        ParamValue::Bool(v) => Ok(v),
        _ => Err(ParamsError::FieldType(name)),
    }
}

// =============================================================================
// TESTS
// =============================================================================
