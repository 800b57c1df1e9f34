//! Root Wars Demo Runner
//!
//! Plays a seeded self-play match on the engine and then replays the
//! action log to check that the final state hash is reproduced.
//!
//! Usage: `root-wars [params.json] [map.txt]`
//!
//! `RUST_LOG` controls log output, `ROOT_WARS_SEED` overrides the seed.

use std::{env, fs};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use root_wars::{
    DEMO_TURN_LIMIT, VERSION,
    core::rng::{DeterministicRng, seed_from_label},
    game::{
        board::Board,
        engine::{DEFAULT_RNG_SEED, GameLogic, PlayerAction, replay_actions},
        events::GameEventData,
        map::{builtin_map, parse_board},
        params::GameParameters,
    },
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("Root Wars v{}", VERSION);

    let args: Vec<String> = env::args().skip(1).collect();
    let params = load_params(args.first())?;
    let board = load_board(&params, args.get(1))?;
    let seed = load_seed();

    demo_match(params, board, seed)
}

fn load_params(path: Option<&String>) -> Result<GameParameters> {
    let Some(path) = path else {
        return Ok(GameParameters::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading parameters from {path}"))?;
    let params = GameParameters::from_json(&json).with_context(|| format!("parsing {path}"))?;
    Ok(params)
}

fn load_board(params: &GameParameters, path: Option<&String>) -> Result<Board> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading map from {path}"))?;
            Ok(parse_board(&text, false).with_context(|| format!("parsing map {path}"))?)
        }
        None => builtin_map(&params.map_name).with_context(|| format!("loading map '{}'", params.map_name)),
    }
}

/// Numeric seeds are used as-is, anything else is hashed.
fn load_seed() -> u64 {
    match env::var("ROOT_WARS_SEED") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| seed_from_label(&raw)),
        Err(_) => DEFAULT_RNG_SEED,
    }
}

/// Self-play with seeded picks from each player's frontier.
fn demo_match(params: GameParameters, board: Board, seed: u64) -> Result<()> {
    info!("=== Starting Demo Match ===");
    info!("Map: {}, seed: {}", params.map_name, seed);
    info!("Parameters:\n{}", params.to_json()?);

    let mut game = GameLogic::with_seed(params.clone(), board.clone(), seed)?;
    let mut picker = DeterministicRng::new(seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut total_events = 0;

    while !game.game_over() && game.turn_number() < DEMO_TURN_LIMIT {
        let player = game.current_turn();
        let frontier: Vec<_> = game.valid_root_growth_tiles(player).into_iter().collect();
        let Some(&target) = picker.choose(&frontier) else {
            warn!("{} has nowhere to grow, stopping", player);
            break;
        };
        game.do_action(PlayerAction::GrowRoot, target)?;

        for event in game.take_events() {
            total_events += 1;
            match &event.data {
                GameEventData::RootCut { player, victim, pos } => {
                    info!("{} cut {} at {}", player, victim, pos);
                }
                GameEventData::RootsDied { player, positions } => {
                    info!("{} lost {} roots", player, positions.len());
                }
                GameEventData::CarrotEaten { pos } => {
                    info!("Carrot at {} eaten", pos);
                }
                GameEventData::GameWon { winner } => {
                    info!("Match ended! Winner: {}", winner);
                }
                _ => {}
            }
        }
    }

    // Print final results
    info!("=== Match Results ===");
    for player in game.players() {
        info!(
            "{}: {} tiles, {} moves per turn",
            player.id, player.tiles_controlled, player.num_moves
        );
    }
    if game.winner().is_none() {
        info!("No winner after {} turns", game.turn_number());
    }
    let hash = game.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}", total_events);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_actions(params, board, seed, game.action_log())?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }
    Ok(())
}
