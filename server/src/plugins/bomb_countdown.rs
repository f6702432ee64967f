use bevy::prelude::*;
use tracing::{debug, info};

use common::announce::{RussianPhrasing, countdown_line, countdown_sound_path};
use common::config::CountdownConfig;
use common::countdown::{CountdownController, RoundSignal, TickOutcome, Transition};

use crate::broadcast;
use crate::events::{BombDefused, BombExploded, BombPlanted, RoundEnd, RoundStart};
use crate::resources::{Countdown, CountdownSettings, PlayerRoster};

// ============================================================================
// Bomb Countdown Plugin
// ============================================================================
//
// Mirrors the round lifecycle into the countdown state machine and, once per
// second while the bomb is planted, announces the remaining time in chat
// and/or as a per-player sound.

pub struct BombCountdownPlugin {
    pub config: CountdownConfig,
}

impl Plugin for BombCountdownPlugin {
    fn build(&self, app: &mut App) {
        let mut config = self.config.clone();
        config.normalize();
        info!(
            enabled = config.enabled,
            start_from = config.start_from_second,
            "bomb countdown plugin loaded"
        );
        app.add_event::<BombPlanted>()
            .add_event::<BombDefused>()
            .add_event::<BombExploded>()
            .add_event::<RoundStart>()
            .add_event::<RoundEnd>()
            .init_resource::<PlayerRoster>()
            .insert_resource(Countdown(CountdownController::new(&config)))
            .insert_resource(CountdownSettings(config))
            .add_systems(Update, (countdown_signal_system, countdown_tick_system).chain());
    }
}

// Map the round lifecycle events onto state machine signals. Stops are
// processed before plants, so a round that ends and replants within one
// frame is left with the fresh countdown, not a stale one.
pub fn countdown_signal_system(
    mut countdown: ResMut<Countdown>,
    mut round_start: EventReader<RoundStart>,
    mut round_end: EventReader<RoundEnd>,
    mut defused: EventReader<BombDefused>,
    mut exploded: EventReader<BombExploded>,
    mut planted: EventReader<BombPlanted>,
) {
    for _ in round_start.read() {
        apply_signal(&mut countdown, RoundSignal::RoundStart);
    }
    for _ in round_end.read() {
        apply_signal(&mut countdown, RoundSignal::RoundEnd);
    }
    for _ in defused.read() {
        apply_signal(&mut countdown, RoundSignal::BombDefused);
    }
    for _ in exploded.read() {
        apply_signal(&mut countdown, RoundSignal::BombExploded);
    }
    for _ in planted.read() {
        apply_signal(&mut countdown, RoundSignal::BombPlanted);
    }
}

fn apply_signal(countdown: &mut Countdown, signal: RoundSignal) {
    match countdown.0.apply(signal) {
        Transition::Started { seconds } => info!(seconds, "bomb planted, countdown started"),
        Transition::Stopped => debug!(?signal, "countdown disarmed"),
        Transition::Ignored => debug!(?signal, "countdown disabled, plant ignored"),
    }
}

// Drive the repeating tick and deliver any announcements it produces.
pub fn countdown_tick_system(
    time: Res<Time>,
    mut countdown: ResMut<Countdown>,
    settings: Res<CountdownSettings>,
    players: Res<PlayerRoster>,
) {
    for outcome in countdown.0.advance(time.delta()) {
        let announce = match outcome {
            TickOutcome::Stale => {
                debug!("stale countdown tick ignored");
                None
            }
            TickOutcome::Counting { announce } => announce,
            TickOutcome::Expired { announce } => {
                debug!("countdown expired");
                announce
            }
        };
        if let Some(seconds) = announce {
            announce_seconds(&settings.0, &players, seconds);
        }
    }
}

fn announce_seconds(config: &CountdownConfig, players: &PlayerRoster, seconds: i32) {
    if config.show_text_countdown {
        let line = countdown_line(&config.text_color, seconds, &RussianPhrasing);
        broadcast::chat_to_humans(players, &line);
    }
    if config.play_sound_countdown {
        let path = countdown_sound_path(&config.sound_path, seconds);
        broadcast::play_sound_to_humans(players, &path, 1.0);
    }
}
