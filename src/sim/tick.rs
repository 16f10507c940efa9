//! Fixed timestep simulation tick
//!
//! Advances the whole game by one frame: player input, movement, the
//! formation controller, collision resolution, then level progression.
//! The pause machine gates everything else in the frame.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::level;
use super::movement;
use super::session::PauseSnapshot;
use super::state::{GamePhase, GameState, Laser, MysteryShip};
use crate::consts::*;
use crate::economy::EconomySession;

/// Salt for mystery ship spawn rolls
const MYSTERY_SALT: u64 = 0x3157;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal steering, -1 to 1
    pub move_x: f32,
    /// Vertical steering, -1 to 1
    pub move_y: f32,
    pub fire: bool,
    /// Toggle pause/resume
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(
    state: &mut GameState,
    economy: &mut EconomySession<'_>,
    input: &TickInput,
    dt: f32,
) {
    if input.pause {
        toggle_pause(state, economy);
    }
    if state.session.is_paused() {
        return;
    }
    match state.phase {
        GamePhase::GameOver | GamePhase::AllLevelsComplete => return,
        _ => {}
    }

    state.time_ticks += 1;

    update_player(state, input, dt);

    for laser in &mut state.lasers {
        movement::advance_laser(laser, dt);
    }
    state.lasers.retain(|laser| !laser.is_offscreen());

    state.formation.step(&mut state.enemies, dt);
    for enemy in &mut state.enemies {
        movement::advance_enemy(enemy, dt);
    }
    // Enemies that slipped past the player are survived, not fought
    state.enemies.retain(|e| !movement::below_screen(&e.rect));

    update_mystery(state, dt);

    for key in &mut state.keys {
        movement::advance_key(key, dt);
    }
    state
        .keys
        .retain(|key| key.ttl_ticks > 0 && !movement::below_screen(&key.rect));

    let outcome = collision::resolve(state, economy);
    if outcome.game_over {
        state.phase = GamePhase::GameOver;
        log::info!("game over at level {}", state.level_index);
        return;
    }

    advance_progression(state, economy);
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let axis = Vec2::new(
        input.move_x.clamp(-1.0, 1.0),
        input.move_y.clamp(-1.0, 1.0),
    );
    state.player.rect.translate(axis * state.player.speed * dt);

    let rect = &mut state.player.rect;
    if rect.left() < 0.0 {
        rect.set_left(0.0);
    }
    if rect.right() > SCREEN_WIDTH {
        rect.set_right(SCREEN_WIDTH);
    }
    if rect.top() < 0.0 {
        rect.set_top(0.0);
    }
    if rect.bottom() > SCREEN_HEIGHT {
        rect.set_bottom(SCREEN_HEIGHT);
    }

    state.player.cooldown_ticks = state.player.cooldown_ticks.saturating_sub(1);
    if input.fire && state.player.cooldown_ticks == 0 {
        state
            .lasers
            .push(Laser::player_shot(state.player.rect.center()));
        state.player.cooldown_ticks = LASER_COOLDOWN_TICKS;
    }
}

fn update_mystery(state: &mut GameState, dt: f32) {
    if let Some(ship) = state.mystery.as_mut() {
        movement::advance_mystery(ship, dt);
    }
    if state.mystery.as_ref().is_some_and(movement::mystery_offscreen) {
        log::debug!("mystery ship escaped");
        state.mystery = None;
    }
    if state.mystery.is_none() {
        state.mystery_spawn_ticks = state.mystery_spawn_ticks.saturating_sub(1);
        if state.mystery_spawn_ticks == 0 {
            let mut rng = state.event_rng(MYSTERY_SALT);
            let from_left = rng.random_bool(0.5);
            state.mystery = Some(MysteryShip::spawn(from_left));
            state.mystery_spawn_ticks =
                rng.random_range(MYSTERY_RESPAWN.0..=MYSTERY_RESPAWN.1);
            log::info!(
                "mystery ship inbound from the {}",
                if from_left { "left" } else { "right" }
            );
        }
    }
}

fn advance_progression(state: &mut GameState, economy: &mut EconomySession<'_>) {
    match state.phase {
        GamePhase::Playing => {
            if !state.all_enemies_cleared() {
                return;
            }
            award_completion_bonus(state, economy);
            if state.level_index >= level::MAX_LEVEL_INDEX {
                state.phase = GamePhase::AllLevelsComplete;
                log::info!("all levels complete");
            } else {
                state.phase = GamePhase::LevelComplete {
                    ticks_remaining: LEVEL_CELEBRATION_TICKS,
                };
            }
        }
        GamePhase::LevelComplete { ticks_remaining } => {
            let remaining = ticks_remaining.saturating_sub(1);
            if remaining == 0 {
                let next = state.level_index + 1;
                state.level_index = next;
                state.bonus_granted = false;
                level::seed_level(state, next);
                state.phase = GamePhase::Playing;
            } else {
                state.phase = GamePhase::LevelComplete {
                    ticks_remaining: remaining,
                };
            }
        }
        _ => {}
    }
}

/// Level completion rewards, issued exactly once per transition
fn award_completion_bonus(state: &mut GameState, economy: &mut EconomySession<'_>) {
    if state.bonus_granted {
        return;
    }
    state.bonus_granted = true;

    let bonus = level::completion_bonus(state.level_index);
    economy.earn_coins(bonus);
    state.player.health = (state.player.health + LEVEL_HEALTH_RESTORE).min(PLAYER_MAX_HEALTH);
    economy.update_health(state.player.health);
    economy.grant_life();
    if let Err(err) = economy.save_session_coins() {
        log::warn!("level bonus kept in session, wallet save failed: {err}");
    }
    log::info!("level {} cleared, +{bonus} coin bonus", state.level_index);
}

fn toggle_pause(state: &mut GameState, economy: &EconomySession<'_>) {
    if state.session.is_paused() {
        match state.session.resume() {
            Ok(snapshot) => {
                log::info!("resumed, was paused since tick {}", snapshot.at_tick)
            }
            Err(err) => log::warn!("resume refused: {err}"),
        }
        return;
    }

    let blob = serde_json::json!({
        "enemies": state.enemies.len(),
        "player": [state.player.rect.pos.x, state.player.rect.pos.y],
        "level": state.level_index,
    })
    .to_string();
    state.session.pause(PauseSnapshot {
        score: economy.score,
        health: economy.health,
        session_coins: economy.session_coins,
        state_blob: blob,
        at_tick: state.time_ticks,
    });
}
