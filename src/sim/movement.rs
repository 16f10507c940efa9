//! Per-entity movement rules
//!
//! Every rule updates only its own entity's position (plus the bounce
//! direction a diagonal enemy owns). Formation members are stepped by the
//! formation controller, which is the only place that can see the whole
//! grid; an entity exactly on a boundary counts as touching it.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Enemy, EnemyMotion, KeyPickup, Laser, MysteryShip};
use crate::consts::*;

/// Lockstep horizontal step for one formation member
pub fn formation_step(rect: &mut Rect, direction: f32, speed: f32, dt: f32) {
    rect.translate(Vec2::new(direction * speed * dt, 0.0));
}

/// Advance a diagonal or diver enemy. Formation members are not touched
/// here; the formation controller owns their movement.
pub fn advance_enemy(enemy: &mut Enemy, dt: f32) {
    match &mut enemy.motion {
        EnemyMotion::Formation => {}
        EnemyMotion::Diagonal { direction } => {
            enemy
                .rect
                .translate(Vec2::new(*direction * enemy.speed * dt, enemy.speed * 0.5 * dt));
            if enemy.rect.left() <= 0.0 {
                enemy.rect.set_left(0.0);
                *direction = 1.0;
            } else if enemy.rect.right() >= SCREEN_WIDTH {
                enemy.rect.set_right(SCREEN_WIDTH);
                *direction = -1.0;
            }
        }
        EnemyMotion::Diver { dive_speed } => {
            enemy.rect.translate(Vec2::new(0.0, *dive_speed * dt));
        }
    }
}

pub fn advance_laser(laser: &mut Laser, dt: f32) {
    laser.rect.translate(Vec2::new(0.0, laser.velocity_y * dt));
}

pub fn advance_mystery(ship: &mut MysteryShip, dt: f32) {
    ship.rect
        .translate(Vec2::new(ship.direction * ship.speed * dt, 0.0));
}

/// True once the ship is fully past either horizontal edge
pub fn mystery_offscreen(ship: &MysteryShip) -> bool {
    ship.rect.right() < -MYSTERY_SPAWN_MARGIN
        || ship.rect.left() > SCREEN_WIDTH + MYSTERY_SPAWN_MARGIN
}

/// Keys fall and burn down their collection window
pub fn advance_key(key: &mut KeyPickup, dt: f32) {
    key.rect.translate(Vec2::new(0.0, KEY_FALL_SPEED * dt));
    key.ttl_ticks = key.ttl_ticks.saturating_sub(1);
}

/// Enemies that drifted below the screen were survived, not killed
pub fn below_screen(rect: &Rect) -> bool {
    rect.top() > SCREEN_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_diagonal_reflects_exactly_off_left_edge() {
        let mut enemy = Enemy::diagonal(2.0, 100.0, 120.0, -1.0);
        advance_enemy(&mut enemy, SIM_DT);

        assert_eq!(enemy.rect.left(), 0.0);
        assert_eq!(enemy.motion, EnemyMotion::Diagonal { direction: 1.0 });
    }

    #[test]
    fn test_diagonal_reflects_exactly_off_right_edge() {
        let mut enemy = Enemy::diagonal(SCREEN_WIDTH - ALIEN_WIDTH - 1.0, 100.0, 120.0, 1.0);
        advance_enemy(&mut enemy, SIM_DT);

        assert_eq!(enemy.rect.right(), SCREEN_WIDTH);
        assert_eq!(enemy.motion, EnemyMotion::Diagonal { direction: -1.0 });
    }

    #[test]
    fn test_diagonal_descends_at_half_horizontal_speed() {
        let mut enemy = Enemy::diagonal(400.0, 100.0, 120.0, 1.0);
        let before = enemy.rect.pos;
        advance_enemy(&mut enemy, 1.0);

        assert_eq!(enemy.rect.pos.x - before.x, 120.0);
        assert_eq!(enemy.rect.pos.y - before.y, 60.0);
    }

    #[test]
    fn test_diver_moves_straight_down() {
        let mut enemy = Enemy::diver(300.0, -60.0, 90.0);
        let before = enemy.rect.pos;
        advance_enemy(&mut enemy, 1.0);

        assert_eq!(enemy.rect.pos.x, before.x);
        assert_eq!(enemy.rect.pos.y - before.y, 90.0);
    }

    #[test]
    fn test_player_laser_travels_up_and_culls() {
        let mut laser = Laser::player_shot(Vec2::new(640.0, 600.0));
        let top_before = laser.rect.top();
        advance_laser(&mut laser, 1.0);
        assert!(laser.rect.top() < top_before);
        assert!(!laser.is_offscreen());

        laser.rect.set_bottom(-LASER_CULL_MARGIN - 1.0);
        assert!(laser.is_offscreen());
    }

    #[test]
    fn test_mystery_crosses_and_despawns_past_far_edge() {
        let mut ship = MysteryShip::spawn(true);
        assert!(!mystery_offscreen(&ship));

        // Drive it across the whole playfield
        for _ in 0..((SCREEN_WIDTH as u32 / 3) + 60) {
            advance_mystery(&mut ship, SIM_DT);
        }
        assert!(ship.rect.left() > 0.0);

        ship.rect.set_left(SCREEN_WIDTH + MYSTERY_SPAWN_MARGIN + 1.0);
        assert!(mystery_offscreen(&ship));
    }

    #[test]
    fn test_key_ttl_burns_down() {
        let mut key = KeyPickup::spawn(Vec2::new(200.0, 80.0));
        assert_eq!(key.ttl_ticks, KEY_TTL_TICKS);
        for _ in 0..KEY_TTL_TICKS {
            advance_key(&mut key, SIM_DT);
        }
        assert_eq!(key.ttl_ticks, 0);
    }
}
