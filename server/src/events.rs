use bevy::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use common::protocol::{ClientCommand, PlayerId, Team};

// ============================================================================
// Host Events
// ============================================================================
//
// The game server dispatches these; each plugin subscribes to the subset it
// cares about. The simulation and the tests emit them directly.

/// Event fired when the bomb is planted.
#[derive(Event)]
pub struct BombPlanted;

/// Event fired when the bomb is defused.
#[derive(Event)]
pub struct BombDefused;

/// Event fired when the bomb detonates.
#[derive(Event)]
pub struct BombExploded;

/// Event fired when a new round begins.
#[derive(Event)]
pub struct RoundStart;

/// Event fired when the round resolves.
#[derive(Event)]
pub struct RoundEnd {
    /// Winning team; `Team::None` for a draw.
    pub winner: Team,
    /// Engine reason code, carried through for logging.
    pub reason: i32,
}

/// Event fired when a player connects.
#[derive(Event)]
pub struct PlayerJoined {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub bot: bool,
    pub channel: UnboundedSender<ClientCommand>,
}

/// Event fired when a player disconnects.
#[derive(Event)]
pub struct PlayerLeft {
    pub id: PlayerId,
}
