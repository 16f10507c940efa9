//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Every entity collection owned exclusively by the game loop
//! - No rendering or platform dependencies

pub mod collision;
pub mod formation;
pub mod level;
pub mod movement;
pub mod rect;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, resolve};
pub use formation::FormationController;
pub use level::{LevelConfig, MAX_LEVEL_INDEX, completion_bonus, config_for, seed_level};
pub use rect::Rect;
pub use session::{PauseSnapshot, SessionError, SessionState};
pub use state::{
    Enemy, EnemyMotion, GamePhase, GameState, KeyPickup, Laser, LaserSide, MysteryShip,
    Obstacle, PlayerShip, TreasureChest,
};
pub use tick::{TickInput, tick};
