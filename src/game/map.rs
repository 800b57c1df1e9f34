//! Map Loading
//!
//! Boards come from a small text format, from the built-in map table, or
//! from the random generator.
//!
//! ## Text format
//!
//! One line per row (line index is `y`), whitespace-separated tokens per
//! column. A token is a ground code, an optional occupant code, then an
//! owner seat number where the occupant needs one:
//!
//! ```text
//! # two seats, a pond and a carrot
//! GT0 G  W  G
//! G   Gr0 C G
//! G   G  GB GT1
//! ```
//!
//! Ground: `_` void, `D` desert, `G` grass, `K` dark mesa, `L` light mesa,
//! `M` mountain, `R` rich soil, `W` water, `C` carrot.
//! Occupant: `T` tree, `r` roots, `x` dead roots, `B` rabbit.

use crate::core::hex::TilePos;
use crate::core::rng::RandomSource;
use crate::game::board::Board;
use crate::game::error::MapError;
use crate::game::tile::{AboveType, GroundType, PlayerId, Tile};

/// Built-in map table: name, polarity, text.
const BUILTIN_MAPS: [(&str, bool, &str); 2] = [
    ("Map1", false, MAP1),
    ("Map2", true, MAP2),
];

const MAP1: &str = "
# Two seats, corner to corner
GT0 G   G   W   G   D   D   M   G   G
G   G   R   G   G   D   M   G   G   G
G   W   G   G   C   G   G   G   R   G
G   G   G   M   G   GB  G   W   G   G
G   G   D   M   G   G   R   G   G   G
_   G   G   G   D   D   G   G   W   GT1
";

const MAP2: &str = "
# Three seats around a central lake
_   _   G   GT0 G   G   _   _   _
_   G   K   G   R   G   G   _   _
G   G   K   M   G   L   G   G   _
G   W   G   W   W   L   GB  G   G
GT2 G   R   W   C   W   G   R   GT1
G   L   G   W   W   G   G   K   G
_   G   G   M   G   K   D   G   _
_   _   D   G   R   G   D   _   _
_   _   _   G   D   G   _   _   _
";

/// Parse a board from map text.
pub fn parse_board(text: &str, zero_is_odd_column: bool) -> Result<Board, MapError> {
    let rows: Vec<Vec<&str>> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.split_whitespace().collect())
        .collect();

    let width = rows.first().map(Vec::len).ok_or(MapError::Empty)?;
    if width == 0 {
        return Err(MapError::Empty);
    }
    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != width {
            return Err(MapError::RaggedRow {
                row,
                found: cells.len(),
                expected: width,
            });
        }
    }

    let mut board = Board::new(width as i32, rows.len() as i32, zero_is_odd_column, Tile::default());
    for (y, cells) in rows.iter().enumerate() {
        for (x, token) in cells.iter().enumerate() {
            let pos = TilePos::new(x as i32, y as i32);
            board.set(pos, parse_token(token, pos)?);
        }
    }

    Ok(board)
}

fn parse_token(token: &str, pos: TilePos) -> Result<Tile, MapError> {
    let bad = || MapError::BadToken {
        token: token.to_string(),
        pos,
    };

    let mut chars = token.chars();
    let ground = chars.next().and_then(GroundType::from_code).ok_or_else(bad)?;
    let rest = chars.as_str();

    let (above, owner_text) = match rest.chars().next().and_then(AboveType::from_code) {
        Some(above) => (above, &rest[1..]),
        None => (AboveType::None, rest),
    };

    let owner = if owner_text.is_empty() {
        None
    } else {
        Some(PlayerId(owner_text.parse::<u8>().map_err(|_| bad())?))
    };

    match (above, owner) {
        (AboveType::Tree | AboveType::TreeRoots, None) => Err(MapError::MissingOwner(pos)),
        (AboveType::None | AboveType::TreeRootsDead | AboveType::Rabbit, Some(_)) => Err(bad()),
        _ if ground == GroundType::None && above != AboveType::None => Err(bad()),
        _ => Ok(Tile { owner, ground, above }),
    }
}

/// Render a board back into map text.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for y in 0..board.height() {
        let tokens: Vec<String> = (0..board.width())
            .map(|x| {
                let tile = board.get(TilePos::new(x, y)).copied().unwrap_or_default();
                let mut token = String::new();
                token.push(tile.ground.code());
                if let Some(c) = tile.above.code() {
                    token.push(c);
                }
                if let Some(owner) = tile.owner {
                    token.push_str(&owner.0.to_string());
                }
                token
            })
            .collect();
        out.push_str(&tokens.join(" "));
        out.push('\n');
    }
    out
}

/// Names of the built-in maps.
pub fn builtin_map_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_MAPS.iter().map(|(name, _, _)| *name)
}

/// Load a built-in map by name.
pub fn builtin_map(name: &str) -> Result<Board, MapError> {
    let (_, zero_is_odd_column, text) = BUILTIN_MAPS
        .iter()
        .find(|(map_name, _, _)| *map_name == name)
        .ok_or_else(|| MapError::UnknownMap(name.to_string()))?;
    parse_board(text, *zero_is_odd_column)
}

/// Ground kinds the generator draws from, weighted by repetition.
const GENERATED_GROUND: [GroundType; 10] = [
    GroundType::Grass,
    GroundType::Grass,
    GroundType::Grass,
    GroundType::Desert,
    GroundType::MesaDark,
    GroundType::MesaLight,
    GroundType::Mountain,
    GroundType::RichSoil,
    GroundType::Water,
    GroundType::Grass,
];

/// Random board with player `i`'s tree on grass at `starts[i]`.
pub fn generate_board<R: RandomSource>(
    width: i32,
    height: i32,
    zero_is_odd_column: bool,
    starts: &[TilePos],
    rng: &mut R,
) -> Result<Board, MapError> {
    let mut board = Board::new(width, height, zero_is_odd_column, Tile::default());
    let positions: Vec<TilePos> = board.positions().collect();
    for pos in positions {
        let idx = rng.next_int(GENERATED_GROUND.len() as u32) as usize;
        let ground = GENERATED_GROUND.get(idx).copied().unwrap_or(GroundType::Grass);
        board.set(pos, Tile::bare(ground));
    }

    for (seat, start) in starts.iter().enumerate() {
        if !board.contains(*start) {
            return Err(MapError::StartOffBoard(*start));
        }
        board.set(*start, Tile::tree(GroundType::Grass, PlayerId(seat as u8)));
    }

    Ok(board)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;

    #[test]
    fn test_parse_small_map() {
        let board = parse_board("GT0 W\nGr0 C\nGB Mx", false).unwrap();
        assert_eq!(board.width(), 2);
        assert_eq!(board.height(), 3);

        assert!(board.get(TilePos::new(0, 0)).unwrap().is_tree_of(PlayerId(0)));
        assert_eq!(board.get(TilePos::new(1, 0)).unwrap().ground, GroundType::Water);
        assert_eq!(*board.get(TilePos::new(0, 1)).unwrap(), Tile::roots(GroundType::Grass, PlayerId(0)));
        assert_eq!(board.get(TilePos::new(0, 2)).unwrap().above, AboveType::Rabbit);

        let dead = board.get(TilePos::new(1, 2)).unwrap();
        assert_eq!(dead.above, AboveType::TreeRootsDead);
        assert_eq!(dead.owner, None);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let board = parse_board("\n# header\nG G\n\nG G\n", true).unwrap();
        assert_eq!(board.height(), 2);
        assert!(board.zero_is_odd_column());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_board("", false), Err(MapError::Empty));
        assert!(matches!(
            parse_board("G G\nG", false),
            Err(MapError::RaggedRow { row: 1, found: 1, expected: 2 })
        ));
        assert!(matches!(parse_board("Q", false), Err(MapError::BadToken { .. })));
        assert_eq!(parse_board("GT", false), Err(MapError::MissingOwner(TilePos::new(0, 0))));
        assert!(matches!(parse_board("G0", false), Err(MapError::BadToken { .. })));
        assert!(matches!(parse_board("Gx1", false), Err(MapError::BadToken { .. })));
        assert!(matches!(parse_board("_T0", false), Err(MapError::BadToken { .. })));
        assert!(matches!(parse_board("GTz", false), Err(MapError::BadToken { .. })));
    }

    #[test]
    fn test_render_parse_round_trip() {
        let board = builtin_map("Map1").unwrap();
        let text = render_board(&board);
        assert_eq!(parse_board(&text, board.zero_is_odd_column()).unwrap(), board);
    }

    #[test]
    fn test_builtin_maps_load() {
        for name in builtin_map_names() {
            let board = builtin_map(name).unwrap();
            assert!(board.tree_position(PlayerId(0)).is_some(), "{name} lacks tree 0");
            assert!(board.tree_position(PlayerId(1)).is_some(), "{name} lacks tree 1");
            assert!(board.find_above(AboveType::Rabbit).is_some());
        }
        assert!(builtin_map("Map2").unwrap().tree_position(PlayerId(2)).is_some());
        assert_eq!(builtin_map("Nope"), Err(MapError::UnknownMap("Nope".to_string())));
    }

    #[test]
    fn test_generate_board() {
        let starts = [TilePos::new(0, 0), TilePos::new(9, 9)];
        let a = generate_board(10, 10, false, &starts, &mut DeterministicRng::new(4)).unwrap();
        let b = generate_board(10, 10, false, &starts, &mut DeterministicRng::new(4)).unwrap();
        assert_eq!(a, b);
        assert!(a.get(TilePos::new(9, 9)).unwrap().is_tree_of(PlayerId(1)));
        assert!(a.iter().all(|(_, t)| t.ground != GroundType::None));

        let off = generate_board(4, 4, false, &[TilePos::new(4, 0)], &mut DeterministicRng::new(1));
        assert_eq!(off, Err(MapError::StartOffBoard(TilePos::new(4, 0))));
    }
}
