use bevy::prelude::*;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;

use common::config::{CountdownConfig, RoundEndSoundConfig};
use common::countdown::CountdownController;
use common::protocol::{ClientCommand, PlayerId, Team};

// ============================================================================
// Bevy Resources
// ============================================================================

// Player information (server-side)
pub struct PlayerInfo {
    pub name: String,
    pub team: Team,
    pub bot: bool,
    pub channel: UnboundedSender<ClientCommand>,
}

// Map of all connected players (server-side source of truth)
#[derive(Resource, Default)]
pub struct PlayerRoster(pub HashMap<PlayerId, PlayerInfo>);

// Countdown state machine, one per server.
#[derive(Resource)]
pub struct Countdown(pub CountdownController);

// Presentation settings consulted on every countdown announcement.
#[derive(Resource)]
pub struct CountdownSettings(pub CountdownConfig);

// Settings for the round end sound plugin.
#[derive(Resource)]
pub struct RoundEndSettings(pub RoundEndSoundConfig);

// Who a scheduled sound goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundTarget {
    AllHumans,
    TeamOnly(Team),
}

// One delayed sound. Fires when the timer finishes, against the roster as it
// is at fire time.
pub struct ScheduledSound {
    pub delay: Timer,
    pub target: SoundTarget,
    pub path: String,
    pub volume: f32,
}

// Sounds waiting out their delay.
#[derive(Resource, Default)]
pub struct PendingSounds(pub Vec<ScheduledSound>);
