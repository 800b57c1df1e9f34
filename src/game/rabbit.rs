//! Rabbit Hazard
//!
//! A single rabbit wanders the board between turns. Calm, it hops to a
//! random free neighbour. Once a player takes the carrot it turns
//! enraged and makes straight for the carrot, trampling roots on the way.
//!
//! This module only moves the rabbit on the board and reports what it
//! stepped on. Move bonuses are settled by the engine.

use crate::core::hex::TilePos;
use crate::core::rng::RandomSource;
use crate::game::board::Board;
use crate::game::tile::{AboveType, GroundType, PlayerId};

/// Result of one rabbit move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RabbitStep {
    /// Cell the rabbit left
    pub from: TilePos,
    /// Cell the rabbit entered
    pub to: TilePos,
    /// Owner and ground of the cell it trampled, if that cell was owned
    pub trampled: Option<(PlayerId, GroundType)>,
    /// The rabbit ate the carrot on `to`
    pub carrot_eaten: bool,
}

/// Free cells a calm rabbit may hop to.
///
/// On the board, nothing standing on it, not a mountain or void.
pub fn calm_moves(board: &Board, rabbit: TilePos) -> Vec<TilePos> {
    board
        .neighbors_in_bounds(rabbit)
        .filter(|pos| {
            board
                .get(*pos)
                .is_some_and(|t| t.above == AboveType::None && t.ground.is_traversable())
        })
        .collect()
}

/// Hop to a uniformly chosen free neighbour. Stays put when boxed in.
pub fn step_calm<R: RandomSource>(board: &mut Board, rabbit: TilePos, rng: &mut R) -> Option<RabbitStep> {
    let moves = calm_moves(board, rabbit);
    if moves.is_empty() {
        return None;
    }
    let idx = rng.next_int(moves.len() as u32) as usize;
    let to = *moves.get(idx)?;
    Some(relocate(board, rabbit, to))
}

/// Take the first neighbour strictly closer to the carrot.
///
/// Neighbours are tried in adjacency order. Off-board, impassable and tree
/// cells are never entered. Stays put when no neighbour is closer.
pub fn step_enraged(board: &mut Board, rabbit: TilePos, carrot: TilePos) -> Option<RabbitStep> {
    let current = rabbit.distance_squared(carrot);
    let to = board.neighbors_in_bounds(rabbit).find(|pos| {
        pos.distance_squared(carrot) < current
            && board.get(*pos).is_some_and(|t| {
                t.ground.is_traversable() && !matches!(t.above, AboveType::Tree | AboveType::Rabbit)
            })
    })?;
    Some(relocate(board, rabbit, to))
}

/// Move the rabbit from `from` to `to`, clearing whatever was at `to`.
fn relocate(board: &mut Board, from: TilePos, to: TilePos) -> RabbitStep {
    if let Some(old) = board.get_mut(from) {
        old.above = AboveType::None;
    }

    let mut trampled = None;
    let mut carrot_eaten = false;
    if let Some(cell) = board.get_mut(to) {
        trampled = cell.owner.map(|owner| (owner, cell.ground));
        if cell.ground == GroundType::Carrot {
            cell.ground = GroundType::Grass;
            carrot_eaten = true;
        }
        cell.owner = None;
        cell.above = AboveType::Rabbit;
    }

    RabbitStep {
        from,
        to,
        trampled,
        carrot_eaten,
    }
}

/// Replace carrots with grass and remove the rabbit.
///
/// Used when a match is configured without the hazard.
pub fn strip_rabbit_and_carrots(board: &mut Board) {
    let positions: Vec<TilePos> = board.positions().collect();
    for pos in positions {
        if let Some(tile) = board.get_mut(pos) {
            if tile.ground == GroundType::Carrot {
                tile.ground = GroundType::Grass;
            }
            if tile.above == AboveType::Rabbit {
                tile.above = AboveType::None;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::Tile;

    /// Replays a fixed list of picks.
    struct ScriptedRng(Vec<u32>);

    impl RandomSource for ScriptedRng {
        fn next_int(&mut self, max: u32) -> u32 {
            let v = if self.0.is_empty() { 0 } else { self.0.remove(0) };
            v.min(max.saturating_sub(1))
        }
    }

    fn board_with_rabbit(at: TilePos) -> Board {
        let mut board = Board::new(7, 7, false, Tile::bare(GroundType::Grass));
        board.set(at, Tile {
            above: AboveType::Rabbit,
            ..Tile::bare(GroundType::Grass)
        });
        board
    }

    #[test]
    fn test_calm_moves_skip_occupied_and_blocked() {
        let at = TilePos::new(3, 3);
        let mut board = board_with_rabbit(at);
        board.set(TilePos::new(3, 4), Tile::bare(GroundType::Mountain));
        board.set(TilePos::new(3, 2), Tile::roots(GroundType::Grass, PlayerId(0)));

        let moves = calm_moves(&board, at);
        assert_eq!(moves.len(), 4);
        assert!(!moves.contains(&TilePos::new(3, 4)));
        assert!(!moves.contains(&TilePos::new(3, 2)));
    }

    #[test]
    fn test_step_calm_uses_rng_pick() {
        let at = TilePos::new(3, 3);
        let mut board = board_with_rabbit(at);
        let expected = calm_moves(&board, at)[2];

        let step = step_calm(&mut board, at, &mut ScriptedRng(vec![2])).unwrap();
        assert_eq!(step.to, expected);
        assert_eq!(board.get(at).unwrap().above, AboveType::None);
        assert_eq!(board.get(expected).unwrap().above, AboveType::Rabbit);
        assert_eq!(board.find_above(AboveType::Rabbit), Some(expected));
    }

    #[test]
    fn test_step_calm_boxed_in_stays() {
        let mut board = Board::new(1, 1, false, Tile::bare(GroundType::Grass));
        let at = TilePos::new(0, 0);
        board.set(at, Tile { above: AboveType::Rabbit, ..Tile::bare(GroundType::Grass) });

        assert!(step_calm(&mut board, at, &mut ScriptedRng(vec![])).is_none());
        assert_eq!(board.get(at).unwrap().above, AboveType::Rabbit);
    }

    #[test]
    fn test_step_enraged_closes_distance() {
        let at = TilePos::new(0, 0);
        let carrot = TilePos::new(0, 4);
        let mut board = board_with_rabbit(at);
        board.set(carrot, Tile::bare(GroundType::Carrot));

        let mut pos = at;
        let mut steps = 0;
        while let Some(step) = step_enraged(&mut board, pos, carrot) {
            assert!(step.to.distance_squared(carrot) < pos.distance_squared(carrot));
            pos = step.to;
            steps += 1;
            if step.carrot_eaten {
                break;
            }
        }
        assert_eq!(pos, carrot);
        assert_eq!(steps, 4);
        assert_eq!(board.get(carrot).unwrap().ground, GroundType::Grass);
    }

    #[test]
    fn test_step_enraged_tramples_roots() {
        let at = TilePos::new(0, 0);
        let carrot = TilePos::new(0, 2);
        let mut board = board_with_rabbit(at);
        board.set(carrot, Tile::roots(GroundType::Carrot, PlayerId(1)));
        board.set(TilePos::new(0, 1), Tile::roots(GroundType::Water, PlayerId(0)));

        let step = step_enraged(&mut board, at, carrot).unwrap();
        assert_eq!(step.to, TilePos::new(0, 1));
        assert_eq!(step.trampled, Some((PlayerId(0), GroundType::Water)));
        assert!(!step.carrot_eaten);
        assert_eq!(board.get(step.to).unwrap().owner, None);

        let step = step_enraged(&mut board, step.to, carrot).unwrap();
        assert_eq!(step.to, carrot);
        assert_eq!(step.trampled, Some((PlayerId(1), GroundType::Carrot)));
        assert!(step.carrot_eaten);
    }

    #[test]
    fn test_step_enraged_never_enters_tree() {
        let at = TilePos::new(0, 0);
        let carrot = TilePos::new(0, 2);
        let mut board = board_with_rabbit(at);
        board.set(carrot, Tile::bare(GroundType::Carrot));
        board.set(TilePos::new(0, 1), Tile::tree(GroundType::Grass, PlayerId(0)));
        board.set(TilePos::new(1, 0), Tile::bare(GroundType::Mountain));

        // (0,1) is a tree and (1,0) is not closer, so the rabbit waits
        assert!(step_enraged(&mut board, at, carrot).is_none());
        assert_eq!(board.get(TilePos::new(0, 1)).unwrap().above, AboveType::Tree);
    }

    #[test]
    fn test_strip_rabbit_and_carrots() {
        let mut board = board_with_rabbit(TilePos::new(1, 1));
        board.set(TilePos::new(2, 2), Tile::bare(GroundType::Carrot));

        strip_rabbit_and_carrots(&mut board);
        assert!(board.find_above(AboveType::Rabbit).is_none());
        assert!(board.iter().all(|(_, t)| t.ground != GroundType::Carrot));
    }
}
