//! Game state and core simulation types
//!
//! All state that must be persisted for pause/determinism lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::formation::FormationController;
use super::level;
use super::rect::Rect;
use super::session::SessionState;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// All enemy groups cleared; celebration window before the next level
    LevelComplete { ticks_remaining: u32 },
    /// The maximum configured level was cleared (terminal)
    AllLevelsComplete,
    /// Player health reached zero (terminal)
    GameOver,
}

/// Which side fired a laser. Enemy lasers exist in the data model but no
/// current level fires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaserSide {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub rect: Rect,
    pub velocity_y: f32,
    pub side: LaserSide,
}

impl Laser {
    /// A player shot fired upward from the ship's center
    pub fn player_shot(origin: Vec2) -> Self {
        Self {
            rect: Rect::from_center(origin, LASER_WIDTH, LASER_HEIGHT),
            velocity_y: -LASER_SPEED,
            side: LaserSide::Player,
        }
    }

    pub fn is_offscreen(&self) -> bool {
        self.rect.bottom() < -LASER_CULL_MARGIN
            || self.rect.top() > SCREEN_HEIGHT + LASER_CULL_MARGIN
    }
}

/// Movement rule attached to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyMotion {
    /// Moves in lockstep with the formation's shared direction
    Formation,
    /// Bounces between the side edges while slowly descending
    Diagonal { direction: f32 },
    /// Dives straight down at a level-scaled speed fixed at spawn
    Diver { dive_speed: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub speed: f32,
    pub value: u32,
    pub motion: EnemyMotion,
}

impl Enemy {
    pub fn formation(x: f32, y: f32, speed: f32) -> Self {
        Self {
            rect: Rect::new(x, y, ALIEN_WIDTH, ALIEN_HEIGHT),
            speed,
            value: FORMATION_VALUE,
            motion: EnemyMotion::Formation,
        }
    }

    pub fn diagonal(x: f32, y: f32, speed: f32, direction: f32) -> Self {
        Self {
            rect: Rect::new(x, y, ALIEN_WIDTH, ALIEN_HEIGHT),
            speed,
            value: DIAGONAL_VALUE,
            motion: EnemyMotion::Diagonal { direction },
        }
    }

    pub fn diver(x: f32, y: f32, dive_speed: f32) -> Self {
        Self {
            rect: Rect::new(x, y, ALIEN_WIDTH, ALIEN_HEIGHT),
            speed: dive_speed,
            value: DIVER_VALUE,
            motion: EnemyMotion::Diver { dive_speed },
        }
    }

    pub fn is_formation(&self) -> bool {
        matches!(self.motion, EnemyMotion::Formation)
    }
}

/// Bounty carrier that crosses the screen once and takes three hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MysteryShip {
    pub rect: Rect,
    pub health: i32,
    pub speed: f32,
    pub direction: f32,
    pub value: u32,
}

impl MysteryShip {
    pub fn spawn(from_left: bool) -> Self {
        let (x, direction) = if from_left {
            (-MYSTERY_SPAWN_MARGIN - MYSTERY_WIDTH, 1.0)
        } else {
            (SCREEN_WIDTH + MYSTERY_SPAWN_MARGIN, -1.0)
        };
        Self {
            rect: Rect::new(x, MYSTERY_SPAWN_Y, MYSTERY_WIDTH, MYSTERY_HEIGHT),
            health: MYSTERY_HEALTH,
            speed: MYSTERY_SPEED,
            direction,
            value: MYSTERY_VALUE,
        }
    }

    /// Apply damage; returns true when the ship is destroyed. Health never
    /// goes negative.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        self.health == 0
    }
}

/// Falling key dropped by a destroyed mystery ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPickup {
    pub rect: Rect,
    pub ttl_ticks: u32,
}

impl KeyPickup {
    pub fn spawn(center: Vec2) -> Self {
        Self {
            rect: Rect::from_center(center, KEY_WIDTH, KEY_HEIGHT),
            ttl_ticks: KEY_TTL_TICKS,
        }
    }
}

/// Locked chest with rewards rolled at spawn time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasureChest {
    pub rect: Rect,
    pub locked: bool,
    pub value: u32,
    pub health_packs: u32,
}

impl TreasureChest {
    pub fn spawn(center: Vec2, rng: &mut impl Rng) -> Self {
        let health_packs = if rng.random_bool(TREASURE_HEALTH_PACK_CHANCE) {
            rng.random_range(TREASURE_MIN_PACKS..=TREASURE_MAX_PACKS)
        } else {
            0
        };
        Self {
            rect: Rect::from_center(center, CHEST_WIDTH, CHEST_HEIGHT),
            locked: true,
            value: rng.random_range(TREASURE_MIN_COINS..=TREASURE_MAX_COINS),
            health_packs,
        }
    }
}

/// Indestructible shield block; lasers die on contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub rect: Rect,
    pub speed: f32,
    pub health: i32,
    pub cooldown_ticks: u32,
    pub has_key: bool,
}

impl PlayerShip {
    pub fn new() -> Self {
        Self {
            rect: Rect::from_center(
                Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - PLAYER_HEIGHT),
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            cooldown_ticks: 0,
            has_key: false,
        }
    }
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self::new()
    }
}

const OBSTACLE_SHAPE: [&str; 7] = [
    "xxxxxxx",
    " xxxxxxxxx",
    "xxxxxxxxxxx",
    "xxxxxxxxxxx",
    "xxxxxxxxxxx",
    "xxx     xxx",
    "xx       xx",
];

/// Build the four shield clusters from the shape mask
pub fn build_obstacles() -> Vec<Obstacle> {
    let mut blocks = Vec::new();
    let x_start = SCREEN_WIDTH / 15.0;
    for cluster in 0..OBSTACLE_COUNT {
        let offset_x = cluster as f32 * (SCREEN_WIDTH / OBSTACLE_COUNT as f32);
        for (row, line) in OBSTACLE_SHAPE.iter().enumerate() {
            for (col, cell) in line.chars().enumerate() {
                if cell == 'x' {
                    blocks.push(Obstacle {
                        rect: Rect::new(
                            x_start + offset_x + col as f32 * OBSTACLE_CELL,
                            OBSTACLE_Y + row as f32 * OBSTACLE_CELL,
                            OBSTACLE_CELL,
                            OBSTACLE_CELL,
                        ),
                    });
                }
            }
        }
    }
    blocks
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub level_index: u32,
    pub phase: GamePhase,
    /// Guards the once-per-transition level completion bonus
    pub bonus_granted: bool,
    pub session: SessionState,
    pub formation: FormationController,
    pub player: PlayerShip,
    pub lasers: Vec<Laser>,
    pub enemies: Vec<Enemy>,
    pub mystery: Option<MysteryShip>,
    pub mystery_spawn_ticks: u32,
    pub keys: Vec<KeyPickup>,
    pub chests: Vec<TreasureChest>,
    pub obstacles: Vec<Obstacle>,
}

impl GameState {
    /// Create a new run with the given seed, seeded at level 0
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = Self {
            seed,
            time_ticks: 0,
            level_index: 0,
            phase: GamePhase::Playing,
            bonus_granted: false,
            session: SessionState::default(),
            formation: FormationController::default(),
            player: PlayerShip::new(),
            lasers: Vec::new(),
            enemies: Vec::new(),
            mystery: None,
            mystery_spawn_ticks: rng.random_range(MYSTERY_FIRST_SPAWN.0..=MYSTERY_FIRST_SPAWN.1),
            keys: Vec::new(),
            chests: Vec::new(),
            obstacles: build_obstacles(),
        };
        level::seed_level(&mut state, 0);
        state
    }

    /// Derive a deterministic RNG for an in-frame random event
    pub fn event_rng(&self, salt: u64) -> Pcg32 {
        Pcg32::seed_from_u64(
            self.seed ^ self.time_ticks.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ salt,
        )
    }

    pub fn formation_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_formation()).count()
    }

    pub fn diagonal_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| matches!(e.motion, EnemyMotion::Diagonal { .. }))
            .count()
    }

    pub fn diver_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| matches!(e.motion, EnemyMotion::Diver { .. }))
            .count()
    }

    /// True when every enemy group is empty at once
    pub fn all_enemies_cleared(&self) -> bool {
        self.enemies.is_empty()
    }
}
