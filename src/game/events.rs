//! Game Events
//!
//! Everything the engine changes is also reported as an event, so the
//! rendering layer can animate deltas instead of diffing boards.

use serde::{Serialize, Deserialize};
use crate::core::hex::TilePos;
use crate::game::tile::PlayerId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player claimed an empty cell
    RootGrown {
        player: PlayerId,
        pos: TilePos,
    },

    /// Player destroyed a rival's roots (or tree)
    RootCut {
        player: PlayerId,
        victim: PlayerId,
        pos: TilePos,
    },

    /// Player cleared a dead root
    DeadRootCleared {
        player: PlayerId,
        pos: TilePos,
    },

    /// Roots cut off from their tree died at turn start
    RootsDied {
        player: PlayerId,
        positions: Vec<TilePos>,
    },

    /// Per-turn move allotment changed
    MovesChanged {
        player: PlayerId,
        num_moves: u32,
    },

    /// Rabbit stepped to a new cell
    RabbitMoved {
        from: TilePos,
        to: TilePos,
    },

    /// Rabbit mood flipped
    RabbitEnraged {
        enraged: bool,
    },

    /// Rabbit reached and ate the carrot
    CarrotEaten {
        pos: TilePos,
    },

    /// New turn began
    TurnStarted {
        turn_number: u32,
        player: PlayerId,
        moves: u32,
    },

    /// Seat passed over because its tree is gone
    TurnSkipped {
        player: PlayerId,
    },

    /// Player disconnected and lost their tree
    PlayerLeft {
        player: PlayerId,
    },

    /// Match decided
    GameWon {
        winner: PlayerId,
    },
}

/// A game event stamped with the turn it happened in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Turn counter when the event occurred
    pub turn_number: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(turn_number: u32, data: GameEventData) -> Self {
        Self { turn_number, data }
    }

    /// Player the event is about, if any.
    pub fn player(&self) -> Option<PlayerId> {
        match &self.data {
            GameEventData::RootGrown { player, .. }
            | GameEventData::RootCut { player, .. }
            | GameEventData::DeadRootCleared { player, .. }
            | GameEventData::RootsDied { player, .. }
            | GameEventData::MovesChanged { player, .. }
            | GameEventData::TurnStarted { player, .. }
            | GameEventData::TurnSkipped { player }
            | GameEventData::PlayerLeft { player } => Some(*player),
            GameEventData::GameWon { winner } => Some(*winner),
            GameEventData::RabbitMoved { .. }
            | GameEventData::RabbitEnraged { .. }
            | GameEventData::CarrotEaten { .. } => None,
        }
    }

    /// Cells whose rendering this event invalidates.
    pub fn touched_positions(&self) -> Vec<TilePos> {
        match &self.data {
            GameEventData::RootGrown { pos, .. }
            | GameEventData::RootCut { pos, .. }
            | GameEventData::DeadRootCleared { pos, .. }
            | GameEventData::CarrotEaten { pos } => vec![*pos],
            GameEventData::RootsDied { positions, .. } => positions.clone(),
            GameEventData::RabbitMoved { from, to } => vec![*from, *to],
            _ => Vec::new(),
        }
    }
}
