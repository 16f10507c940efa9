//! Level table and enemy spawning
//!
//! One config record per level. Difficulty is non-decreasing across the
//! table by convention; the tests pin that down rather than the runtime.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, GameState};
use crate::consts::*;

/// Highest configured level index
pub const MAX_LEVEL_INDEX: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub rows: u32,
    pub cols: u32,
    /// Base horizontal speed in px/s, shared by the formation and specials
    pub speed: f32,
    pub diagonal_count: u32,
    pub diver_count: u32,
}

/// Config for a level index. Unknown indices fall back to the level 0
/// layout instead of failing.
pub fn config_for(level: u32) -> LevelConfig {
    match level {
        0 => LevelConfig { rows: 3, cols: 8, speed: 60.0, diagonal_count: 0, diver_count: 0 },
        1 => LevelConfig { rows: 4, cols: 8, speed: 120.0, diagonal_count: 4, diver_count: 0 },
        2 => LevelConfig { rows: 4, cols: 9, speed: 120.0, diagonal_count: 6, diver_count: 3 },
        3 => LevelConfig { rows: 5, cols: 9, speed: 180.0, diagonal_count: 8, diver_count: 5 },
        4 => LevelConfig { rows: 5, cols: 10, speed: 180.0, diagonal_count: 10, diver_count: 7 },
        5 => LevelConfig { rows: 6, cols: 10, speed: 240.0, diagonal_count: 12, diver_count: 10 },
        unknown => {
            log::warn!("no config for level {unknown}, using the level 0 layout");
            config_for(0)
        }
    }
}

/// Diver descent speed for a level, fixed at spawn time for the wave
pub fn diver_speed(base_speed: f32, level: u32) -> f32 {
    base_speed * (1.0 + level as f32 * DIVER_LEVEL_SCALE)
}

/// Coins granted when a level is cleared, doubling each level
pub fn completion_bonus(level: u32) -> u64 {
    LEVEL_BONUS_BASE << level
}

/// Re-seed all three enemy groups for a level
pub fn seed_level(state: &mut GameState, level: u32) {
    let cfg = config_for(level);
    let mut rng = state.event_rng(u64::from(level));
    state.enemies.clear();

    // Standard formation grid
    for row in 0..cfg.rows {
        for col in 0..cfg.cols {
            let x = col as f32 * FORMATION_X_SPACING + FORMATION_X_OFFSET;
            let y = row as f32 * FORMATION_Y_SPACING + FORMATION_Y_OFFSET;
            state.enemies.push(Enemy::formation(x, y, cfg.speed));
        }
    }

    // Diagonals spread across the width, alternating entry direction,
    // staggered in from above the screen
    for i in 0..cfg.diagonal_count {
        let x = if cfg.diagonal_count > 1 {
            50.0 + (i as f32 * (SCREEN_WIDTH - 100.0)) / (cfg.diagonal_count - 1) as f32
        } else {
            SCREEN_WIDTH / 2.0
        };
        let y = -30.0 - i as f32 * 40.0;
        let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
        state.enemies.push(Enemy::diagonal(x, y, cfg.speed, direction));
    }

    // Divers get one screen section each, jittered within it
    for i in 0..cfg.diver_count {
        let section = (SCREEN_WIDTH - 100.0) / cfg.diver_count as f32;
        let jitter = rng.random_range(0.0..=(section / 2.0).max(1.0));
        let x = 50.0 + i as f32 * section + jitter;
        let y = -60.0 - i as f32 * 50.0;
        state
            .enemies
            .push(Enemy::diver(x, y, diver_speed(cfg.speed, level)));
    }

    log::info!(
        "level {level} seeded: {} formation, {} diagonal, {} diver",
        cfg.rows * cfg.cols,
        cfg.diagonal_count,
        cfg.diver_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_falls_back_to_level_zero() {
        assert_eq!(config_for(42), config_for(0));
    }

    #[test]
    fn test_difficulty_never_decreases() {
        for level in 0..MAX_LEVEL_INDEX {
            let current = config_for(level);
            let next = config_for(level + 1);
            assert!(next.speed >= current.speed);
            assert!(next.rows * next.cols >= current.rows * current.cols);
            assert!(next.diagonal_count >= current.diagonal_count);
            assert!(next.diver_count >= current.diver_count);
        }
    }

    #[test]
    fn test_diver_speed_strictly_increases_with_level() {
        let base = 120.0;
        assert!(diver_speed(base, 2) > diver_speed(base, 1));
        assert!(diver_speed(base, 1) > diver_speed(base, 0));
        assert_eq!(diver_speed(base, 0), base);
    }

    #[test]
    fn test_completion_bonus_doubles_per_level() {
        assert_eq!(completion_bonus(0), 50);
        assert_eq!(completion_bonus(1), 100);
        assert_eq!(completion_bonus(2), 200);
        assert_eq!(completion_bonus(5), 1600);
    }

    #[test]
    fn test_seed_level_matches_config_counts() {
        let mut state = GameState::new(11);
        for level in 0..=MAX_LEVEL_INDEX {
            let cfg = config_for(level);
            seed_level(&mut state, level);
            assert_eq!(state.formation_count() as u32, cfg.rows * cfg.cols);
            assert_eq!(state.diagonal_count() as u32, cfg.diagonal_count);
            assert_eq!(state.diver_count() as u32, cfg.diver_count);
        }
    }

    #[test]
    fn test_seeding_is_deterministic_for_a_seed() {
        let mut a = GameState::new(1234);
        let mut b = GameState::new(1234);
        seed_level(&mut a, 3);
        seed_level(&mut b, 3);
        for (x, y) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(x.rect.pos, y.rect.pos);
        }
    }
}
