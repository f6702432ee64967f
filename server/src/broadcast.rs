use tracing::debug;

use crate::resources::{PlayerInfo, PlayerRoster};
use common::protocol::{ClientCommand, PlayerId, Team};

// ============================================================================
// Broadcasting Helpers
// ============================================================================
//
// The roster is walked fresh on every call, so players who joined or left
// after an announcement was decided are handled against the current state.
// A closed channel means the player is mid-disconnect; the command is
// dropped and logged.

// Send a chat line to every connected human player.
pub fn chat_to_humans(players: &PlayerRoster, text: &str) {
    for (id, info) in &players.0 {
        if info.bot {
            continue;
        }
        if info.channel.send(ClientCommand::Chat(text.to_string())).is_err() {
            debug!(player = id.0, "dropping chat for disconnecting player");
        }
    }
}

// Instruct every connected human player to play a sound.
pub fn play_sound_to_humans(players: &PlayerRoster, path: &str, volume: f32) {
    for (id, info) in &players.0 {
        if info.bot {
            continue;
        }
        send_sound(*id, info, path, volume);
    }
}

// Instruct every connected human player on `team` to play a sound.
pub fn play_sound_to_team(players: &PlayerRoster, team: Team, path: &str, volume: f32) {
    for (id, info) in &players.0 {
        if info.bot || info.team != team {
            continue;
        }
        send_sound(*id, info, path, volume);
    }
}

fn send_sound(id: PlayerId, info: &PlayerInfo, path: &str, volume: f32) {
    let command = ClientCommand::PlaySound {
        path: path.to_string(),
        volume,
    };
    if info.channel.send(command).is_err() {
        debug!(player = id.0, "dropping sound for disconnecting player");
    }
}
