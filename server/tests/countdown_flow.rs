//! End-to-end countdown behavior through the bevy schedule
//!
//! Assembles an app with the countdown plugin, fake players on channels, and
//! a manually advanced clock, then asserts on the commands each client
//! receives.

use std::time::Duration;

use bevy::prelude::*;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use common::config::CountdownConfig;
use common::protocol::{ClientCommand, PlayerId, Team};
use server::events::{BombDefused, BombPlanted, RoundEnd, RoundStart};
use server::plugins::BombCountdownPlugin;
use server::resources::{PlayerInfo, PlayerRoster};

// ============================================================================
// Test Helpers
// ============================================================================

/// App with the countdown plugin and a manually advanced clock.
fn make_app(config: CountdownConfig) -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(BombCountdownPlugin { config });
    app
}

/// Config with a short countdown the tests can walk through quickly.
fn short_config(start: i32, announce: &[i32]) -> CountdownConfig {
    CountdownConfig {
        start_from_second: start,
        announce_seconds: announce.to_vec(),
        ..CountdownConfig::default()
    }
}

/// Register a fake player and keep the receiving end of their channel.
fn join_player(app: &mut App, id: u32, team: Team, bot: bool) -> UnboundedReceiver<ClientCommand> {
    let (tx, rx) = unbounded_channel();
    let mut roster = app.world_mut().resource_mut::<PlayerRoster>();
    roster.0.insert(
        PlayerId(id),
        PlayerInfo {
            name: format!("player-{id}"),
            team,
            bot,
            channel: tx,
        },
    );
    rx
}

/// Advance the clock and run one frame.
fn advance(app: &mut App, delta: Duration) {
    app.world_mut().resource_mut::<Time>().advance_by(delta);
    app.update();
}

/// Run one frame without advancing the clock, so queued events get
/// processed before any tick fires.
fn process(app: &mut App) {
    advance(app, Duration::ZERO);
}

/// Advance the clock by whole seconds, one frame per second.
fn advance_secs(app: &mut App, seconds: u64) {
    for _ in 0..seconds {
        advance(app, Duration::from_secs(1));
    }
}

fn drain(rx: &mut UnboundedReceiver<ClientCommand>) -> Vec<ClientCommand> {
    let mut received = Vec::new();
    while let Ok(command) = rx.try_recv() {
        received.push(command);
    }
    received
}

fn chat_lines(commands: &[ClientCommand]) -> Vec<&str> {
    commands
        .iter()
        .filter_map(|command| match command {
            ClientCommand::Chat(text) => Some(text.as_str()),
            ClientCommand::PlaySound { .. } => None,
        })
        .collect()
}

fn sound_paths(commands: &[ClientCommand]) -> Vec<&str> {
    commands
        .iter()
        .filter_map(|command| match command {
            ClientCommand::PlaySound { path, .. } => Some(path.as_str()),
            ClientCommand::Chat(_) => None,
        })
        .collect()
}

// ============================================================================
// Countdown Flow
// ============================================================================

#[test]
fn test_announces_in_order_then_goes_quiet() {
    let mut app = make_app(short_config(3, &[3, 2, 1]));
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 3);

    let commands = drain(&mut rx);
    assert_eq!(
        chat_lines(&commands),
        vec![
            "{red}До взрыва: 3 секунды",
            "{red}До взрыва: 2 секунды",
            "{red}До взрыва: 1 секунда",
        ]
    );
    assert_eq!(
        sound_paths(&commands),
        vec![
            "sounds/bombcountdown/3.vsnd_c",
            "sounds/bombcountdown/2.vsnd_c",
            "sounds/bombcountdown/1.vsnd_c",
        ]
    );

    // The countdown expired; further time produces nothing.
    advance_secs(&mut app, 3);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_announces_only_configured_seconds() {
    let mut app = make_app(short_config(5, &[5, 2]));
    let mut rx = join_player(&mut app, 1, Team::Terrorist, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 5);

    let commands = drain(&mut rx);
    assert_eq!(
        chat_lines(&commands),
        vec!["{red}До взрыва: 5", "{red}До взрыва: 2 секунды"]
    );
}

#[test]
fn test_bots_receive_nothing() {
    let mut app = make_app(short_config(2, &[2, 1]));
    let mut human_rx = join_player(&mut app, 1, Team::Ct, false);
    let mut bot_rx = join_player(&mut app, 2, Team::Terrorist, true);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 2);

    assert!(!drain(&mut human_rx).is_empty());
    assert!(drain(&mut bot_rx).is_empty());
}

#[test]
fn test_text_switch_suppresses_chat() {
    let mut config = short_config(1, &[1]);
    config.show_text_countdown = false;
    let mut app = make_app(config);
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 1);

    let commands = drain(&mut rx);
    assert!(chat_lines(&commands).is_empty());
    assert_eq!(sound_paths(&commands), vec!["sounds/bombcountdown/1.vsnd_c"]);
}

#[test]
fn test_sound_switch_suppresses_sounds() {
    let mut config = short_config(1, &[1]);
    config.play_sound_countdown = false;
    let mut app = make_app(config);
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 1);

    let commands = drain(&mut rx);
    assert_eq!(chat_lines(&commands), vec!["{red}До взрыва: 1 секунда"]);
    assert!(sound_paths(&commands).is_empty());
}

#[test]
fn test_defuse_halts_announcements() {
    let mut app = make_app(short_config(5, &[5, 4, 3, 2, 1]));
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 2);

    app.world_mut().send_event(BombDefused);
    process(&mut app);
    advance_secs(&mut app, 3);

    let commands = drain(&mut rx);
    assert_eq!(
        chat_lines(&commands),
        vec!["{red}До взрыва: 5", "{red}До взрыва: 4 секунды"]
    );
}

#[test]
fn test_round_end_halts_announcements() {
    let mut app = make_app(short_config(5, &[5, 4, 3, 2, 1]));
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 1);

    app.world_mut().send_event(RoundEnd {
        winner: Team::Ct,
        reason: 7,
    });
    process(&mut app);
    advance_secs(&mut app, 4);

    assert_eq!(chat_lines(&drain(&mut rx)), vec!["{red}До взрыва: 5"]);
}

#[test]
fn test_replant_restarts_sequence() {
    let mut app = make_app(short_config(3, &[3, 2, 1]));
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 1);

    // Second plant supersedes the countdown already in flight.
    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 3);

    let commands = drain(&mut rx);
    assert_eq!(
        chat_lines(&commands),
        vec![
            "{red}До взрыва: 3 секунды",
            "{red}До взрыва: 3 секунды",
            "{red}До взрыва: 2 секунды",
            "{red}До взрыва: 1 секунда",
        ]
    );
}

#[test]
fn test_same_frame_round_start_and_plant_arms_fresh_countdown() {
    let mut app = make_app(short_config(2, &[2, 1]));
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    // Both land within one frame; the stop is processed first.
    app.world_mut().send_event(RoundStart);
    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 1);

    assert_eq!(chat_lines(&drain(&mut rx)), vec!["{red}До взрыва: 2 секунды"]);
}

#[test]
fn test_same_frame_defuse_and_replant_arms_fresh_countdown() {
    let mut app = make_app(short_config(3, &[3, 2, 1]));
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 1);

    // Defuse and replant land within one frame; the defuse is processed
    // first, so the countdown restarts from the top.
    app.world_mut().send_event(BombDefused);
    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 1);

    let commands = drain(&mut rx);
    assert_eq!(
        chat_lines(&commands),
        vec!["{red}До взрыва: 3 секунды", "{red}До взрыва: 3 секунды"]
    );
}

#[test]
fn test_disabled_plugin_stays_silent() {
    let mut config = short_config(3, &[3, 2, 1]);
    config.enabled = false;
    let mut app = make_app(config);
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombPlanted);
    process(&mut app);
    advance_secs(&mut app, 5);

    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_stop_without_plant_is_harmless() {
    let mut app = make_app(short_config(3, &[3, 2, 1]));
    let mut rx = join_player(&mut app, 1, Team::Ct, false);

    app.world_mut().send_event(BombDefused);
    process(&mut app);
    advance_secs(&mut app, 2);

    assert!(drain(&mut rx).is_empty());
}
