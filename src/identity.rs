//! Persistent player identity
//!
//! Each install carries a UUID stored next to the game. The wallet backend
//! keys balances by this id, so a lost or corrupted file simply provisions
//! a fresh wallet rather than failing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default location of the identity file
pub const PLAYER_ID_FILE: &str = "player_id.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    player_id: String,
}

/// Load the persisted player id, or mint and persist a new one.
pub fn load_or_create(path: &Path) -> String {
    if let Ok(raw) = fs::read_to_string(path) {
        match serde_json::from_str::<StoredIdentity>(&raw) {
            Ok(stored) if !stored.player_id.is_empty() => return stored.player_id,
            _ => log::warn!("player id file unreadable, provisioning a new id"),
        }
    }

    let player_id = Uuid::new_v4().to_string();
    match serde_json::to_string(&StoredIdentity {
        player_id: player_id.clone(),
    }) {
        Ok(raw) => {
            if let Err(err) = fs::write(path, raw) {
                log::warn!("could not persist player id: {err}");
            }
        }
        Err(err) => log::warn!("could not encode player id: {err}"),
    }
    player_id
}
