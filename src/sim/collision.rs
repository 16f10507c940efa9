//! Collision resolution
//!
//! One pass per frame over every pairwise interaction, in a fixed order so
//! outcomes stay deterministic. Every hit applies exactly once and is
//! final; nothing is retried or rolled back.

use glam::Vec2;

use super::state::{GameState, KeyPickup, LaserSide, MysteryShip, TreasureChest};
use crate::consts::*;
use crate::economy::EconomySession;

/// Salt for the treasure reward rolls
const TREASURE_SALT: u64 = 0xC4E5;

/// What the frame's collision pass decided beyond direct state mutation
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionOutcome {
    /// Player health reached zero; the caller ends the run
    pub game_over: bool,
    pub mystery_destroyed: bool,
}

/// Resolve every interaction for the current frame.
///
/// Order of checks: lasers against obstacles, then enemies, then the
/// mystery ship (each laser is consumed by its first hit); then the player
/// against keys, chests, and finally enemies.
pub fn resolve(state: &mut GameState, economy: &mut EconomySession<'_>) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let mut rng = state.event_rng(TREASURE_SALT);

    // Player lasers. Each laser dies on its first hit and checks nothing
    // further that frame.
    let mut surviving = Vec::with_capacity(state.lasers.len());
    for laser in state.lasers.drain(..) {
        if laser.side == LaserSide::Enemy {
            surviving.push(laser);
            continue;
        }

        // Obstacles are indestructible laser sinks
        if state
            .obstacles
            .iter()
            .any(|o| o.rect.intersects(&laser.rect))
        {
            continue;
        }

        // At most one enemy dies per laser; earlier spawns win ties
        if let Some(idx) = state
            .enemies
            .iter()
            .position(|e| e.rect.intersects(&laser.rect))
        {
            let enemy = state.enemies.remove(idx);
            economy.add_score(u64::from(enemy.value));
            economy.earn_coins(u64::from(enemy.value));
            log::debug!("enemy down, +{} score", enemy.value);
            continue;
        }

        // Mystery ship soaks fixed damage per hit instead of dying outright
        let mut consumed = false;
        let mut ship_down = false;
        if let Some(ship) = state.mystery.as_mut() {
            if ship.rect.intersects(&laser.rect) {
                consumed = true;
                ship_down = ship.take_damage(MYSTERY_HIT_DAMAGE);
            }
        }
        let destroyed: Option<MysteryShip> = if ship_down {
            state.mystery.take()
        } else {
            None
        };
        if let Some(ship) = destroyed {
            outcome.mystery_destroyed = true;
            economy.add_score(u64::from(ship.value));
            // Mystery kills convert to coins at double rate
            economy.earn_coins(u64::from(ship.value) * 2);
            let center = ship.rect.center();
            state
                .keys
                .push(KeyPickup::spawn(center + Vec2::new(50.0, 0.0)));
            state.chests.push(TreasureChest::spawn(center, &mut rng));
            log::info!("mystery ship destroyed, bounty dropped");
        }
        if consumed {
            continue;
        }

        surviving.push(laser);
    }
    state.lasers = surviving;

    // Player picks up keys
    let player_rect = state.player.rect;
    let mut collected = false;
    state.keys.retain(|key| {
        if key.rect.intersects(&player_rect) {
            collected = true;
            false
        } else {
            true
        }
    });
    if collected {
        state.player.has_key = true;
        log::info!("key collected");
    }

    // Player opens chests; one key unlocks exactly one chest
    let mut idx = 0;
    while idx < state.chests.len() {
        let unlockable = state.chests[idx].locked
            && state.player.has_key
            && state.chests[idx].rect.intersects(&state.player.rect);
        if !unlockable {
            idx += 1;
            continue;
        }

        let chest = state.chests.remove(idx);
        state.player.has_key = false;
        economy.add_score(u64::from(chest.value));
        economy.earn_coins(u64::from(chest.value));
        // Chest payouts persist to the wallet right away
        if let Err(err) = economy.save_session_coins() {
            log::warn!("chest payout kept in session, wallet save failed: {err}");
        }
        if chest.health_packs > 0 {
            let heal = (chest.health_packs * HEAL_PER_PACK) as i32;
            state.player.health = (state.player.health + heal).min(PLAYER_MAX_HEALTH);
            economy.update_health(state.player.health);
        }
        log::info!(
            "chest unlocked: +{} coins, {} health packs",
            chest.value,
            chest.health_packs
        );
    }

    // Hostile contact. Every enemy touching the player dies and costs a
    // fixed slice of health; simultaneous contacts stack.
    let before = state.enemies.len();
    state.enemies.retain(|e| !e.rect.intersects(&player_rect));
    let contacts = before - state.enemies.len();
    if contacts > 0 {
        let damage = contacts as i32 * PLAYER_COLLISION_DAMAGE;
        state.player.health = (state.player.health - damage).max(0);
        economy.update_health(state.player.health);
        log::info!(
            "{contacts} hostile contact(s), health now {}",
            state.player.health
        );
        if state.player.health <= 0 {
            outcome.game_over = true;
        }
    }

    outcome
}
