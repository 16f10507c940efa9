//! Formation controller
//!
//! Owns the shared horizontal direction of the alien grid. Individual
//! members never self-detect edges; only the controller sees the whole
//! formation. A frame where any member touches the edge the formation is
//! heading toward becomes a descent pulse: the direction flips exactly
//! once and every surviving member drops by the descent step, with no
//! horizontal motion that frame. The pulse does not persist; the next
//! frame is a normal horizontal step again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::movement;
use super::state::Enemy;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationController {
    /// Shared horizontal direction, +1 right or -1 left
    pub direction: f32,
}

impl Default for FormationController {
    fn default() -> Self {
        Self { direction: 1.0 }
    }
}

impl FormationController {
    /// Step every formation member one frame. Returns true when this frame
    /// was a descent pulse.
    pub fn step(&mut self, enemies: &mut [Enemy], dt: f32) -> bool {
        let heading_right = self.direction > 0.0;
        let edge_contact = enemies.iter().filter(|e| e.is_formation()).any(|e| {
            if heading_right {
                e.rect.right() >= SCREEN_WIDTH
            } else {
                e.rect.left() <= 0.0
            }
        });

        if edge_contact {
            self.direction = -self.direction;
            for enemy in enemies.iter_mut().filter(|e| e.is_formation()) {
                enemy.rect.translate(Vec2::new(0.0, FORMATION_DESCENT_STEP));
            }
            log::debug!("formation descent, now heading {}", self.direction);
            return true;
        }

        for enemy in enemies.iter_mut().filter(|e| e.is_formation()) {
            movement::formation_step(&mut enemy.rect, self.direction, enemy.speed, dt);
        }
        false
    }
}
