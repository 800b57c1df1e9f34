//! Connectivity and Visibility
//!
//! Graph queries over the board: the growth frontier of a player, which
//! roots still reach their tree, pruning of cut-off roots, and the fog
//! of war projection.
//!
//! Results are `BTreeSet`s so iteration order is deterministic.

use std::collections::BTreeSet;

use crate::core::hex::TilePos;
use crate::game::board::Board;
use crate::game::tile::{AboveType, GroundType, PlayerId};

/// Cells `player` may grow into this move.
///
/// Union of the in-bounds neighbours of every owned cell, minus cells the
/// player already owns, untraversable ground, and (when the hazard is
/// active) the rabbit's cell.
pub fn valid_root_growth_tiles(board: &Board, player: PlayerId, rabbit_blocks: bool) -> BTreeSet<TilePos> {
    let mut frontier = BTreeSet::new();
    for (pos, tile) in board.iter() {
        if tile.is_owned_by(player) {
            frontier.extend(board.neighbors_in_bounds(pos));
        }
    }

    frontier.retain(|pos| {
        board.get(*pos).is_some_and(|tile| {
            !tile.is_owned_by(player)
                && tile.ground.is_traversable()
                && !(rabbit_blocks && tile.above == AboveType::Rabbit)
        })
    });

    frontier
}

/// Cells owned by `player` reachable from `origin` through owned cells.
///
/// `origin` is normally the player's tree and is always part of the
/// result when on the board. Iterative depth-first search, so large maps
/// cannot exhaust the call stack.
pub fn connected_roots(board: &Board, origin: TilePos, player: PlayerId) -> BTreeSet<TilePos> {
    let mut connected = BTreeSet::new();
    if !board.contains(origin) {
        return connected;
    }

    let mut stack = vec![origin];
    while let Some(pos) = stack.pop() {
        if !connected.insert(pos) {
            continue;
        }
        for next in board.neighbors_in_bounds(pos) {
            if connected.contains(&next) {
                continue;
            }
            if board.get(next).is_some_and(|t| t.is_owned_by(player)) {
                stack.push(next);
            }
        }
    }

    connected
}

/// Turn every cell of `player` missing from `connected` into a dead root.
///
/// Returns the cells that died along with their ground, so the caller can
/// take back the move bonuses they were granting.
pub fn kill_roots(
    board: &mut Board,
    connected: &BTreeSet<TilePos>,
    player: PlayerId,
) -> Vec<(TilePos, GroundType)> {
    let doomed: Vec<TilePos> = board
        .iter()
        .filter(|(pos, tile)| tile.is_owned_by(player) && !connected.contains(pos))
        .map(|(pos, _)| pos)
        .collect();

    let mut killed = Vec::with_capacity(doomed.len());
    for pos in doomed {
        if let Some(tile) = board.get_mut(pos) {
            killed.push((pos, tile.ground));
            tile.owner = None;
            tile.above = AboveType::TreeRootsDead;
        }
    }
    killed
}

/// Cells `player` can see: owned cells plus everything within two hex
/// steps of them.
///
/// The second step expands from first-step cells even when those lie off
/// the board.
pub fn seen_tiles(board: &Board, player: PlayerId) -> BTreeSet<TilePos> {
    let mut seen = BTreeSet::new();
    for (pos, tile) in board.iter() {
        if !tile.is_owned_by(player) {
            continue;
        }
        seen.insert(pos);
        for near in board.neighbors(pos) {
            if board.contains(near) {
                seen.insert(near);
            }
            seen.extend(board.neighbors_in_bounds(near));
        }
    }
    seen
}

/// Cells hidden from `player`.
///
/// Empty when fog is disabled. Trees and off-map (`None` ground) cells are
/// never fogged.
pub fn fog_positions(board: &Board, player: PlayerId, fog_enabled: bool) -> BTreeSet<TilePos> {
    if !fog_enabled {
        return BTreeSet::new();
    }

    let seen = seen_tiles(board, player);
    board
        .iter()
        .filter(|(pos, tile)| {
            !seen.contains(pos)
                && tile.above != AboveType::Tree
                && tile.ground != GroundType::None
        })
        .map(|(pos, _)| pos)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::Tile;
    use proptest::prelude::*;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn grass(w: i32, h: i32) -> Board {
        Board::new(w, h, false, Tile::bare(GroundType::Grass))
    }

    fn set_root(board: &mut Board, x: i32, y: i32, p: PlayerId) {
        board.set(TilePos::new(x, y), Tile::roots(GroundType::Grass, p));
    }

    #[test]
    fn test_single_tile_frontier_is_six_neighbors() {
        let mut board = grass(7, 7);
        let center = TilePos::new(3, 3);
        board.set(center, Tile::tree(GroundType::Grass, P0));

        let frontier = valid_root_growth_tiles(&board, P0, true);
        let expected: BTreeSet<_> = board.neighbors(center).into_iter().collect();
        assert_eq!(frontier, expected);
    }

    #[test]
    fn test_frontier_excludes_blocked_cells() {
        let mut board = grass(7, 7);
        let center = TilePos::new(3, 3);
        board.set(center, Tile::tree(GroundType::Grass, P0));
        board.set(TilePos::new(3, 4), Tile::bare(GroundType::Mountain));
        board.set(TilePos::new(3, 2), Tile::bare(GroundType::None));
        board.set(TilePos::new(2, 3), Tile {
            above: AboveType::Rabbit,
            ..Tile::bare(GroundType::Grass)
        });

        let frontier = valid_root_growth_tiles(&board, P0, true);
        assert_eq!(frontier.len(), 3);
        assert!(!frontier.contains(&TilePos::new(3, 4)));
        assert!(!frontier.contains(&TilePos::new(3, 2)));
        assert!(!frontier.contains(&TilePos::new(2, 3)));

        // Rabbit only blocks when the hazard is active
        let frontier = valid_root_growth_tiles(&board, P0, false);
        assert!(frontier.contains(&TilePos::new(2, 3)));
    }

    #[test]
    fn test_frontier_includes_enemy_cells_and_dead_roots() {
        let mut board = grass(5, 5);
        board.set(TilePos::new(0, 0), Tile::tree(GroundType::Grass, P0));
        set_root(&mut board, 0, 1, P1);
        board.set(TilePos::new(1, 0), Tile {
            above: AboveType::TreeRootsDead,
            ..Tile::bare(GroundType::Grass)
        });

        let frontier = valid_root_growth_tiles(&board, P0, true);
        assert!(frontier.contains(&TilePos::new(0, 1)));
        assert!(frontier.contains(&TilePos::new(1, 0)));
    }

    #[test]
    fn test_frontier_clipped_at_corner() {
        let mut board = grass(5, 5);
        board.set(TilePos::new(0, 0), Tile::tree(GroundType::Grass, P0));
        let frontier = valid_root_growth_tiles(&board, P0, true);
        let expected: BTreeSet<_> = [TilePos::new(0, 1), TilePos::new(1, 0)].into_iter().collect();
        assert_eq!(frontier, expected);
    }

    #[test]
    fn test_connected_roots_follow_chain() {
        let mut board = grass(6, 6);
        board.set(TilePos::new(0, 0), Tile::tree(GroundType::Grass, P0));
        set_root(&mut board, 0, 1, P0);
        set_root(&mut board, 0, 2, P0);
        // Island
        set_root(&mut board, 4, 4, P0);
        // Rival root touching the chain
        set_root(&mut board, 1, 2, P1);

        let connected = connected_roots(&board, TilePos::new(0, 0), P0);
        let expected: BTreeSet<_> = [
            TilePos::new(0, 0),
            TilePos::new(0, 1),
            TilePos::new(0, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(connected, expected);
    }

    #[test]
    fn test_connected_roots_off_board_origin() {
        let board = grass(3, 3);
        assert!(connected_roots(&board, TilePos::new(-1, 0), P0).is_empty());
    }

    #[test]
    fn test_connected_roots_long_snake() {
        // Deep chain; recursion would be the risk here
        let mut board = grass(1, 5000);
        board.set(TilePos::new(0, 0), Tile::tree(GroundType::Grass, P0));
        for y in 1..5000 {
            set_root(&mut board, 0, y, P0);
        }
        assert_eq!(connected_roots(&board, TilePos::new(0, 0), P0).len(), 5000);
    }

    #[test]
    fn test_kill_roots_marks_dead_and_reports_ground() {
        let mut board = grass(6, 6);
        board.set(TilePos::new(0, 0), Tile::tree(GroundType::Grass, P0));
        set_root(&mut board, 0, 1, P0);
        board.set(TilePos::new(4, 4), Tile::roots(GroundType::Water, P0));
        set_root(&mut board, 5, 5, P1);

        let connected = connected_roots(&board, TilePos::new(0, 0), P0);
        let killed = kill_roots(&mut board, &connected, P0);

        assert_eq!(killed, vec![(TilePos::new(4, 4), GroundType::Water)]);
        let dead = board.get(TilePos::new(4, 4)).copied().unwrap();
        assert_eq!(dead.owner, None);
        assert_eq!(dead.above, AboveType::TreeRootsDead);
        // Others untouched
        assert!(board.get(TilePos::new(0, 1)).unwrap().is_owned_by(P0));
        assert!(board.get(TilePos::new(5, 5)).unwrap().is_owned_by(P1));
    }

    #[test]
    fn test_seen_tiles_two_steps() {
        let mut board = grass(9, 9);
        let center = TilePos::new(4, 4);
        board.set(center, Tile::tree(GroundType::Grass, P0));

        let seen = seen_tiles(&board, P0);
        // Center + 6 ring-1 + 12 ring-2
        assert_eq!(seen.len(), 19);
        assert!(seen.contains(&center));
        assert!(!seen.contains(&TilePos::new(4, 7)));
        assert!(seen.contains(&TilePos::new(4, 6)));
    }

    #[test]
    fn test_fog_disabled_is_empty() {
        let mut board = grass(9, 9);
        board.set(TilePos::new(0, 0), Tile::tree(GroundType::Grass, P0));
        assert!(fog_positions(&board, P0, false).is_empty());
        assert!(fog_positions(&board, P1, false).is_empty());
    }

    #[test]
    fn test_fog_skips_trees_and_void() {
        let mut board = grass(9, 9);
        board.set(TilePos::new(0, 0), Tile::tree(GroundType::Grass, P0));
        board.set(TilePos::new(8, 8), Tile::tree(GroundType::Grass, P1));
        board.set(TilePos::new(8, 0), Tile::bare(GroundType::None));

        let fog = fog_positions(&board, P0, true);
        assert!(!fog.contains(&TilePos::new(8, 8)));
        assert!(!fog.contains(&TilePos::new(8, 0)));
        assert!(!fog.contains(&TilePos::new(0, 0)));
        assert!(!fog.contains(&TilePos::new(0, 1)));
        assert!(fog.contains(&TilePos::new(5, 5)));

        let seen = seen_tiles(&board, P0);
        for pos in &fog {
            assert!(!seen.contains(pos));
        }
    }

    proptest! {
        #[test]
        fn prop_frontier_is_adjacent_and_unowned(
            roots in proptest::collection::vec((0i32..8, 0i32..8), 1..12),
            zero_is_odd in any::<bool>(),
        ) {
            let mut board = Board::new(8, 8, zero_is_odd, Tile::bare(GroundType::Grass));
            for (x, y) in &roots {
                board.set(TilePos::new(*x, *y), Tile::roots(GroundType::Grass, P0));
            }

            let frontier = valid_root_growth_tiles(&board, P0, true);
            for pos in &frontier {
                prop_assert!(board.contains(*pos));
                prop_assert!(!board.get(*pos).unwrap().is_owned_by(P0));
                let touches_owned = board
                    .neighbors_in_bounds(*pos)
                    .any(|n| board.get(n).unwrap().is_owned_by(P0));
                prop_assert!(touches_owned);
            }
        }
    }
}
