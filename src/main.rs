//! Nebula Invaders entry point
//!
//! Headless native runner: a fixed-tick loop with frame pacing, a small
//! autopilot standing in for real input, and a best-effort wallet flush
//! when the run ends. Rendering is a separate concern and not part of this
//! crate.

use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

use rand::Rng;

use nebula_invaders::consts::*;
use nebula_invaders::economy::{EconomySession, HttpWalletClient};
use nebula_invaders::identity;
use nebula_invaders::sim::{GamePhase, GameState, TickInput, tick};

fn run_seed() -> u64 {
    env::var("GAME_SEED")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| rand::rng().random())
}

/// Optional tick cap so the headless runner terminates in CI
fn max_ticks() -> Option<u64> {
    env::var("GAME_MAX_TICKS").ok().and_then(|v| v.parse().ok())
}

/// Drive the ship toward whatever matters most this frame: keys first,
/// then unlockable chests, otherwise the nearest enemy column.
fn autopilot(state: &GameState) -> TickInput {
    let ship = state.player.rect.center();

    let target_x = state
        .keys
        .first()
        .map(|key| key.rect.center().x)
        .or_else(|| {
            state
                .chests
                .first()
                .filter(|_| state.player.has_key)
                .map(|chest| chest.rect.center().x)
        })
        .or_else(|| {
            state
                .enemies
                .iter()
                .map(|e| e.rect.center())
                .min_by(|a, b| {
                    (a.x - ship.x)
                        .abs()
                        .partial_cmp(&(b.x - ship.x).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|center| center.x)
        });

    let move_x = match target_x {
        Some(x) if (x - ship.x).abs() > 8.0 => (x - ship.x).signum(),
        _ => 0.0,
    };

    // Chests sit near the top of the screen; climb when one is claimable
    let move_y = if state.player.has_key {
        state
            .chests
            .first()
            .map(|chest| (chest.rect.center().y - ship.y).signum())
            .unwrap_or(0.0)
    } else if ship.y < SCREEN_HEIGHT - PLAYER_HEIGHT {
        1.0
    } else {
        0.0
    };

    TickInput {
        move_x,
        move_y,
        fire: true,
        pause: false,
    }
}

fn main() {
    env_logger::init();

    let player_id = identity::load_or_create(Path::new(identity::PLAYER_ID_FILE));
    log::info!("player {player_id}");

    let wallet = match HttpWalletClient::from_env() {
        Ok(client) => client,
        Err(err) => {
            log::error!("could not build wallet client: {err}");
            return;
        }
    };
    let mut economy = EconomySession::new(&wallet, player_id);

    let seed = run_seed();
    let mut state = GameState::new(seed);
    log::info!("starting run with seed {seed}");

    let frame = Duration::from_secs_f32(SIM_DT);
    let tick_cap = max_ticks();
    let mut next_frame = Instant::now();

    loop {
        let input = autopilot(&state);
        tick(&mut state, &mut economy, &input, SIM_DT);

        match state.phase {
            GamePhase::GameOver => {
                log::info!("run over: score {}", economy.score);
                break;
            }
            GamePhase::AllLevelsComplete => {
                log::info!("victory: score {}", economy.score);
                break;
            }
            _ => {}
        }
        if tick_cap.is_some_and(|cap| state.time_ticks >= cap) {
            log::info!("tick cap reached, stopping");
            break;
        }

        // Frame governor: sleep off the remainder of the fixed tick
        next_frame += frame;
        match next_frame.checked_duration_since(Instant::now()) {
            Some(wait) => std::thread::sleep(wait),
            None => next_frame = Instant::now(),
        }
    }

    // Flush whatever the session earned; losing this on failure is
    // acceptable and only logged
    match economy.save_session_coins() {
        Ok(saved) => log::info!("flushed {saved} coins to the wallet"),
        Err(err) => log::warn!("coin flush skipped: {err}"),
    }

    let summary = economy.summary();
    log::info!(
        "session summary: score {}, health {}, lives {}, wallet {} coins / {} packs",
        summary.score,
        summary.health,
        summary.lives,
        summary.wallet.gold_coins,
        summary.wallet.health_packs
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_autopilot_chases_the_nearest_column_and_fires() {
        let state = GameState::new(21);
        let input = autopilot(&state);
        assert!(input.fire);
        assert!(input.move_x.abs() <= 1.0);
    }

    #[test]
    fn test_autopilot_prefers_keys_over_enemies() {
        let mut state = GameState::new(21);
        state
            .keys
            .push(nebula_invaders::sim::KeyPickup::spawn(Vec2::new(50.0, 60.0)));
        let input = autopilot(&state);
        // Key is far to the left of the ship's start position
        assert_eq!(input.move_x, -1.0);
    }
}
