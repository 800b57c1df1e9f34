//! Turn and Action Engine
//!
//! `GameLogic` owns the board and is the only thing that mutates it.
//! External layers feed it one action at a time, in the order the relay
//! decided, then read back the board, the frontier and the fog to render.
//!
//! ## Turn flow
//!
//! 1. `do_action` validates the target against the acting player's frontier
//! 2. The tile is claimed, cut or cleared and move bonuses are settled
//! 3. Tile counts and victory are recomputed
//! 4. When the turn's moves run out, the next turn starts: the rabbit
//!    moves, the new player's cut-off roots die, and their move allotment
//!    is loaded
//!
//! The engine does not check whose turn it is against the caller. That is
//! the dispatch layer's job.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::hex::TilePos;
use crate::core::rng::DeterministicRng;
use crate::game::board::Board;
use crate::game::connectivity::{
    connected_roots, fog_positions, kill_roots, seen_tiles, valid_root_growth_tiles,
};
use crate::game::error::ActionError;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::params::GameParameters;
use crate::game::rabbit::{step_calm, step_enraged, strip_rabbit_and_carrots};
use crate::game::tile::{AboveType, GroundType, PlayerId};

/// Hazard seed used when the caller does not pick one.
pub const DEFAULT_RNG_SEED: u64 = 12345;

/// Actions a player can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Claim, cut or clear a frontier cell
    GrowRoot,
}

/// What an accepted action did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// Empty cell became the actor's roots
    Grown,
    /// A rival's roots or tree were destroyed
    Cut {
        /// Former owner
        victim: PlayerId,
    },
    /// A dead root was cleared away
    Cleared,
    /// Accepted, but nothing changed
    Unchanged,
}

/// Per-seat bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat
    pub id: PlayerId,
    /// Cells owned, tree included
    pub tiles_controlled: u32,
    /// Moves granted at the start of each of this player's turns
    pub num_moves: u32,
}

/// What one seat should be shown after an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Seat this view is for
    pub player: PlayerId,
    /// Is this seat acting now?
    pub is_my_turn: bool,
    /// Moves left in the current turn
    pub remaining_moves: u32,
    /// Highlighted targets; empty unless it is this seat's turn
    pub growth_tiles: BTreeSet<TilePos>,
    /// Hidden cells
    pub fog: BTreeSet<TilePos>,
    /// Winner, once decided
    pub winner: Option<PlayerId>,
}

/// Authoritative game state and rules.
#[derive(Clone, Debug)]
pub struct GameLogic {
    params: GameParameters,
    board: Board,
    players: Vec<Player>,
    turn_number: u32,
    current_player: PlayerId,
    remaining_moves: u32,
    winner: Option<PlayerId>,
    rabbit_enraged: bool,
    rng_seed: u64,
    rng: DeterministicRng,
    action_log: Vec<(PlayerAction, TilePos)>,
    pending_events: Vec<GameEvent>,
}

impl GameLogic {
    /// Start a match with the default hazard seed.
    pub fn new(params: GameParameters, board: Board) -> Result<Self, ActionError> {
        Self::with_seed(params, board, DEFAULT_RNG_SEED)
    }

    /// Start a match with an explicit hazard seed.
    ///
    /// The board must fit the seat count (see `Board::check_seats`).
    /// Carrots and the rabbit are removed from the board when the hazard
    /// is disabled. Each player's allotment starts at the default turn
    /// count plus one per move-granting cell they already own.
    pub fn with_seed(params: GameParameters, mut board: Board, rng_seed: u64) -> Result<Self, ActionError> {
        params.validate()?;
        board.check_seats(params.num_players)?;

        if !params.rabbit_enabled {
            strip_rabbit_and_carrots(&mut board);
        }

        let players = (0..params.num_players)
            .map(|seat| {
                let id = PlayerId(seat);
                let bonus = board
                    .iter()
                    .filter(|(_, t)| t.is_owned_by(id) && t.ground.grants_move())
                    .count() as u32;
                Player {
                    id,
                    tiles_controlled: board.owned_count(id),
                    num_moves: params.player_default_turn_count + bonus,
                }
            })
            .collect();

        let rabbit_enraged = params.rabbit_enabled
            && board
                .iter()
                .any(|(_, t)| t.owner.is_some() && t.ground == GroundType::Carrot);

        info!(
            "New match on '{}': {}x{} board, {} players",
            params.map_name,
            board.width(),
            board.height(),
            params.num_players
        );

        Ok(Self {
            remaining_moves: params.first_player_first_turn_count,
            params,
            board,
            players,
            turn_number: 0,
            current_player: PlayerId(0),
            winner: None,
            rabbit_enraged,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            action_log: Vec::new(),
            pending_events: Vec::new(),
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Match settings.
    pub fn params(&self) -> &GameParameters {
        &self.params
    }

    /// Read-only board for rendering.
    pub fn tiles(&self) -> &Board {
        &self.board
    }

    /// Seat bookkeeping, indexed by seat.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Bookkeeping for one seat.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Seat whose turn it is.
    pub fn current_turn(&self) -> PlayerId {
        self.current_player
    }

    /// Turns started so far.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Moves left in the current turn.
    pub fn remaining_moves_this_turn(&self) -> u32 {
        self.remaining_moves
    }

    /// Has a winner been decided?
    pub fn game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// The winner, once decided.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Is the rabbit chasing the carrot?
    pub fn rabbit_enraged(&self) -> bool {
        self.rabbit_enraged
    }

    /// Seed the hazard RNG started from.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Accepted actions in order.
    pub fn action_log(&self) -> &[(PlayerAction, TilePos)] {
        &self.action_log
    }

    /// Cells `player` may act on now.
    pub fn valid_root_growth_tiles(&self, player: PlayerId) -> BTreeSet<TilePos> {
        valid_root_growth_tiles(&self.board, player, self.params.rabbit_enabled)
    }

    /// Cells `player` can see.
    pub fn seen_tiles(&self, player: PlayerId) -> BTreeSet<TilePos> {
        seen_tiles(&self.board, player)
    }

    /// Cells hidden from `player`. Empty when fog of war is off.
    pub fn fog_positions(&self, player: PlayerId) -> BTreeSet<TilePos> {
        fog_positions(&self.board, player, self.params.fog_of_war_enabled)
    }

    /// Everything a seat's client needs to redraw.
    pub fn player_view(&self, player: PlayerId) -> PlayerView {
        let is_my_turn = self.current_player == player && !self.game_over();
        PlayerView {
            player,
            is_my_turn,
            remaining_moves: self.remaining_moves,
            growth_tiles: if is_my_turn {
                self.valid_root_growth_tiles(player)
            } else {
                BTreeSet::new()
            },
            fog: self.fog_positions(player),
            winner: self.winner,
        }
    }

    /// Drain events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Digest of the full engine state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.turn_number, self.rng_seed, |hasher| {
            hasher.update_bytes(self.params.map_name.as_bytes());
            hasher.update_u8(self.current_player.0);
            hasher.update_u32(self.remaining_moves);
            hasher.update_i8(PlayerId::to_wire(self.winner));
            hasher.update_bool(self.rabbit_enraged);
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);

            for player in &self.players {
                hasher.update_u8(player.id.0);
                hasher.update_u32(player.tiles_controlled);
                hasher.update_u32(player.num_moves);
            }

            hasher.update_i32(self.board.width());
            hasher.update_i32(self.board.height());
            hasher.update_bool(self.board.zero_is_odd_column());
            for (_, tile) in self.board.iter() {
                hasher.update_i8(PlayerId::to_wire(tile.owner));
                hasher.update_u8(tile.ground as u8);
                hasher.update_u8(tile.above as u8);
            }
        })
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Apply one action for the current player.
    ///
    /// On `Err(InvalidMove)` or `Err(GameOver)` nothing changed. Once a
    /// winner exists the turn no longer advances.
    pub fn do_action(&mut self, action: PlayerAction, pos: TilePos) -> Result<ActionOutcome, ActionError> {
        if self.game_over() {
            warn!("Action {:?} at {} rejected: game is over", action, pos);
            return Err(ActionError::GameOver);
        }

        let player = self.current_player;
        let outcome = match action {
            PlayerAction::GrowRoot => self.grow_root(player, pos)?,
        };
        self.action_log.push((action, pos));

        self.refresh_tile_counts();
        self.update_victory();

        self.remaining_moves = self.remaining_moves.saturating_sub(1);
        if self.remaining_moves == 0 && !self.game_over() {
            self.next_turn()?;
        }

        Ok(outcome)
    }

    /// A seat disconnected: its tree is removed.
    ///
    /// Remaining roots die when the seat's next turn would begin. If the
    /// seat holds the turn, the turn passes at once.
    pub fn player_left(&mut self, player: PlayerId) -> Result<(), ActionError> {
        if player.index() >= self.players.len() {
            return Err(ActionError::PlayerOutOfRange(player));
        }

        if let Some(tree) = self.board.tree_position(player) {
            let ground = self.board.get(tree).map(|t| t.ground).unwrap_or_default();
            if let Some(tile) = self.board.get_mut(tree) {
                tile.clear();
            }
            self.remove_resource(player, ground);
        }
        info!("{} left the match", player);
        self.push_event(GameEventData::PlayerLeft { player });

        self.refresh_tile_counts();
        self.update_victory();

        if self.current_player == player && !self.game_over() {
            self.next_turn()?;
        }
        Ok(())
    }

    fn grow_root(&mut self, player: PlayerId, pos: TilePos) -> Result<ActionOutcome, ActionError> {
        if !self.valid_root_growth_tiles(player).contains(&pos) {
            debug!("{} cannot grow into {}", player, pos);
            return Err(ActionError::InvalidMove(pos));
        }
        let tile = *self.board.get(pos).ok_or(ActionError::InvalidMove(pos))?;

        if tile.owner.is_none() && tile.above != AboveType::TreeRootsDead {
            self.add_resource(player, tile.ground);
            if let Some(cell) = self.board.get_mut(pos) {
                cell.owner = Some(player);
                cell.above = AboveType::TreeRoots;
            }
            debug!("{} grew into {}", player, pos);
            self.push_event(GameEventData::RootGrown { player, pos });
            return Ok(ActionOutcome::Grown);
        }

        if tile.owner == Some(player) {
            return Ok(ActionOutcome::Unchanged);
        }

        if let Some(cell) = self.board.get_mut(pos) {
            cell.clear();
        }
        match tile.owner {
            Some(victim) => {
                self.remove_resource(victim, tile.ground);
                debug!("{} cut {}'s {:?} at {}", player, victim, tile.above, pos);
                self.push_event(GameEventData::RootCut { player, victim, pos });
                Ok(ActionOutcome::Cut { victim })
            }
            None => {
                debug!("{} cleared {}", player, pos);
                self.push_event(GameEventData::DeadRootCleared { player, pos });
                Ok(ActionOutcome::Cleared)
            }
        }
    }

    // =========================================================================
    // TURN FLOW
    // =========================================================================

    /// Hand the turn to the next seat that still has a tree.
    fn next_turn(&mut self) -> Result<(), ActionError> {
        self.turn_number += 1;
        self.current_player = self.seat_after(self.current_player);

        if self.params.rabbit_enabled {
            self.move_rabbit();
        }

        for _ in 0..self.players.len() {
            let player = self.current_player;
            let tree = self.board.tree_position(player);

            let connected = match tree {
                Some(pos) => connected_roots(&self.board, pos, player),
                None => BTreeSet::new(),
            };
            self.prune_roots(player, &connected);

            if tree.is_some() {
                self.remaining_moves = self.player(player).map_or(0, |p| p.num_moves);
                info!(
                    "Turn {}: {} to move ({} moves)",
                    self.turn_number, player, self.remaining_moves
                );
                self.push_event(GameEventData::TurnStarted {
                    turn_number: self.turn_number,
                    player,
                    moves: self.remaining_moves,
                });
                return Ok(());
            }

            warn!("{} has no tree, skipping turn", player);
            self.push_event(GameEventData::TurnSkipped { player });
            self.current_player = self.seat_after(player);
        }

        self.remaining_moves = 0;
        Err(ActionError::NoPlayersRemaining)
    }

    fn seat_after(&self, player: PlayerId) -> PlayerId {
        let next = player.0 as usize + 1;
        if next >= self.players.len() {
            PlayerId(0)
        } else {
            PlayerId(next as u8)
        }
    }

    /// Kill `player`'s cells outside `connected` and take back their bonuses.
    fn prune_roots(&mut self, player: PlayerId, connected: &BTreeSet<TilePos>) {
        let killed = kill_roots(&mut self.board, connected, player);
        if killed.is_empty() {
            return;
        }

        for (_, ground) in &killed {
            self.remove_resource(player, *ground);
        }
        debug!("{} lost {} disconnected roots", player, killed.len());
        self.push_event(GameEventData::RootsDied {
            player,
            positions: killed.into_iter().map(|(pos, _)| pos).collect(),
        });
        self.refresh_tile_counts();
    }

    fn move_rabbit(&mut self) {
        let Some(rabbit) = self.board.find_above(AboveType::Rabbit) else {
            return;
        };

        let step = if self.rabbit_enraged {
            let carrot = self
                .board
                .iter()
                .filter(|(_, t)| t.ground == GroundType::Carrot)
                .map(|(pos, _)| pos)
                .min_by_key(|pos| pos.distance_squared(rabbit));
            match carrot {
                Some(carrot) => step_enraged(&mut self.board, rabbit, carrot),
                None => {
                    self.set_rabbit_enraged(false);
                    step_calm(&mut self.board, rabbit, &mut self.rng)
                }
            }
        } else {
            step_calm(&mut self.board, rabbit, &mut self.rng)
        };

        let Some(step) = step else {
            debug!("Rabbit stays at {}", rabbit);
            return;
        };

        debug!("Rabbit hops {} -> {}", step.from, step.to);
        self.push_event(GameEventData::RabbitMoved {
            from: step.from,
            to: step.to,
        });

        if let Some((owner, ground)) = step.trampled {
            self.remove_resource(owner, ground);
        }
        if step.carrot_eaten {
            info!("Rabbit ate the carrot at {}", step.to);
            self.push_event(GameEventData::CarrotEaten { pos: step.to });
            self.set_rabbit_enraged(false);
        }
        self.refresh_tile_counts();
    }

    // =========================================================================
    // RESOURCES AND VICTORY
    // =========================================================================

    fn add_resource(&mut self, player: PlayerId, ground: GroundType) {
        if !ground.grants_move() {
            return;
        }
        if let Some(p) = self.players.get_mut(player.index()) {
            p.num_moves += 1;
            let num_moves = p.num_moves;
            self.push_event(GameEventData::MovesChanged { player, num_moves });
        }
        if ground == GroundType::Carrot {
            self.set_rabbit_enraged(true);
        }
    }

    fn remove_resource(&mut self, owner: PlayerId, ground: GroundType) {
        if !ground.grants_move() {
            return;
        }
        if let Some(p) = self.players.get_mut(owner.index()) {
            p.num_moves = p.num_moves.saturating_sub(1);
            let num_moves = p.num_moves;
            self.push_event(GameEventData::MovesChanged { player: owner, num_moves });
        }
        if ground == GroundType::Carrot {
            self.set_rabbit_enraged(false);
        }
    }

    fn set_rabbit_enraged(&mut self, enraged: bool) {
        if self.rabbit_enraged != enraged && self.params.rabbit_enabled {
            self.rabbit_enraged = enraged;
            debug!("Rabbit enraged: {}", enraged);
            self.push_event(GameEventData::RabbitEnraged { enraged });
        }
    }

    fn refresh_tile_counts(&mut self) {
        for player in &mut self.players {
            player.tiles_controlled = self.board.owned_count(player.id);
        }
    }

    /// Winner by territory, else by being the last tree standing.
    ///
    /// A `tiles_for_victory` of 0 disables the territory rule.
    pub fn check_victory(&self) -> Option<PlayerId> {
        let threshold = self.params.tiles_for_victory;
        let by_territory = self
            .players
            .iter()
            .filter(|p| threshold > 0 && p.tiles_controlled >= threshold)
            .map(|p| p.id)
            .last();
        if by_territory.is_some() {
            return by_territory;
        }

        let standing: Vec<PlayerId> = self
            .players
            .iter()
            .map(|p| p.id)
            .filter(|id| self.board.tree_position(*id).is_some())
            .collect();
        match standing.as_slice() {
            [last] => Some(*last),
            _ => None,
        }
    }

    fn update_victory(&mut self) {
        if self.winner.is_some() {
            return;
        }
        if let Some(winner) = self.check_victory() {
            info!("{} wins on turn {}", winner, self.turn_number);
            self.winner = Some(winner);
            self.push_event(GameEventData::GameWon { winner });
        }
    }

    fn push_event(&mut self, data: GameEventData) {
        self.pending_events.push(GameEvent::new(self.turn_number, data));
    }
}

/// Rebuild a match from an ordered action log.
///
/// Refused actions are skipped exactly as the live engine skipped them.
/// Replay stops at the first action after the game ended.
pub fn replay_actions(
    params: GameParameters,
    board: Board,
    rng_seed: u64,
    actions: &[(PlayerAction, TilePos)],
) -> Result<(GameLogic, Vec<GameEvent>), ActionError> {
    let mut game = GameLogic::with_seed(params, board, rng_seed)?;
    let mut events = game.take_events();

    for (action, pos) in actions {
        match game.do_action(*action, *pos) {
            Ok(_) | Err(ActionError::InvalidMove(_)) => {}
            Err(ActionError::GameOver) => break,
            Err(e) => return Err(e),
        }
        events.extend(game.take_events());
    }

    Ok((game, events))
}

// =============================================================================
// TESTS
// =============================================================================
