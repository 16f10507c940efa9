//! Nebula Invaders - a Space Invaders style arcade game with a wallet economy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, formations, collisions, levels, pause)
//! - `economy`: Session score/coin bookkeeping and the wallet collaborator client
//! - `identity`: Persistent player id

pub mod economy;
pub mod identity;
pub mod sim;

pub use economy::{EconomySession, WalletBalance};
pub use sim::{GamePhase, GameState, TickInput};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions, origin top-left, +y down
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Health lost per hostile contact; simultaneous contacts stack
    pub const PLAYER_COLLISION_DAMAGE: i32 = 25;
    pub const INITIAL_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 3;

    /// Lasers
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 20.0;
    pub const LASER_SPEED: f32 = 480.0;
    /// Ticks between player shots (600 ms at 60 Hz)
    pub const LASER_COOLDOWN_TICKS: u32 = 36;
    /// Lasers are culled this far past the vertical bounds
    pub const LASER_CULL_MARGIN: f32 = 50.0;

    /// Alien sprites and formation layout
    pub const ALIEN_WIDTH: f32 = 40.0;
    pub const ALIEN_HEIGHT: f32 = 32.0;
    pub const FORMATION_X_SPACING: f32 = 60.0;
    pub const FORMATION_Y_SPACING: f32 = 48.0;
    pub const FORMATION_X_OFFSET: f32 = 70.0;
    pub const FORMATION_Y_OFFSET: f32 = 100.0;
    /// One-frame drop applied to the whole formation on edge contact
    pub const FORMATION_DESCENT_STEP: f32 = 20.0;

    /// Score values per enemy kind
    pub const FORMATION_VALUE: u32 = 10;
    pub const DIAGONAL_VALUE: u32 = 20;
    pub const DIVER_VALUE: u32 = 30;
    /// Per-level multiplier step applied to diver descent speed
    pub const DIVER_LEVEL_SCALE: f32 = 0.3;

    /// Mystery ship
    pub const MYSTERY_WIDTH: f32 = 60.0;
    pub const MYSTERY_HEIGHT: f32 = 30.0;
    pub const MYSTERY_SPEED: f32 = 180.0;
    pub const MYSTERY_HEALTH: i32 = 150;
    pub const MYSTERY_HIT_DAMAGE: i32 = 50;
    pub const MYSTERY_VALUE: u32 = 100;
    pub const MYSTERY_SPAWN_Y: f32 = 50.0;
    /// Spawn/despawn margin past the horizontal edges
    pub const MYSTERY_SPAWN_MARGIN: f32 = 50.0;
    /// First spawn window in ticks, then the respawn window after each crossing
    pub const MYSTERY_FIRST_SPAWN: (u32, u32) = (400, 800);
    pub const MYSTERY_RESPAWN: (u32, u32) = (600, 1200);

    /// Keys and treasure chests
    pub const KEY_WIDTH: f32 = 20.0;
    pub const KEY_HEIGHT: f32 = 30.0;
    pub const KEY_FALL_SPEED: f32 = 120.0;
    /// Uncollected keys self-destruct after 3 seconds
    pub const KEY_TTL_TICKS: u32 = 180;
    pub const CHEST_WIDTH: f32 = 40.0;
    pub const CHEST_HEIGHT: f32 = 40.0;
    pub const TREASURE_MIN_COINS: u32 = 1_000;
    pub const TREASURE_MAX_COINS: u32 = 50_000;
    pub const TREASURE_HEALTH_PACK_CHANCE: f64 = 0.3;
    pub const TREASURE_MIN_PACKS: u32 = 1;
    pub const TREASURE_MAX_PACKS: u32 = 5;
    /// Health restored per pack found in a chest
    pub const HEAL_PER_PACK: u32 = 10;
    /// Health restored when a wallet health pack is spent
    pub const HEALTH_PACK_HEAL: i32 = 25;

    /// Level progression
    pub const LEVEL_BONUS_BASE: u64 = 50;
    pub const LEVEL_CELEBRATION_TICKS: u32 = 180;
    pub const LEVEL_HEALTH_RESTORE: i32 = 25;

    /// Obstacle field
    pub const OBSTACLE_CELL: f32 = 6.0;
    pub const OBSTACLE_COUNT: u32 = 4;
    pub const OBSTACLE_Y: f32 = 480.0;
}
