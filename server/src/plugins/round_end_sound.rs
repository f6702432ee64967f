use bevy::prelude::*;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use common::config::RoundEndSoundConfig;
use common::protocol::Team;

use crate::broadcast;
use crate::events::RoundEnd;
use crate::resources::{PendingSounds, PlayerRoster, RoundEndSettings, ScheduledSound, SoundTarget};

// ============================================================================
// Round End Sound Plugin
// ============================================================================
//
// When a round resolves: wait the configured delay, play the round end sound
// to everyone, then half a second later play the winner's sound (or the draw
// sound). Random pools can stand in for the fixed paths.

// Gap between the round end sound and the win sound.
const WIN_SOUND_OFFSET_SECS: f32 = 0.5;

pub struct RoundEndSoundPlugin {
    pub config: RoundEndSoundConfig,
}

impl Plugin for RoundEndSoundPlugin {
    fn build(&self, app: &mut App) {
        let mut config = self.config.clone();
        config.normalize();
        info!(enabled = config.enabled, "round end sound plugin loaded");
        app.add_event::<RoundEnd>()
            .init_resource::<PlayerRoster>()
            .init_resource::<PendingSounds>()
            .insert_resource(RoundEndSettings(config))
            .add_systems(Update, (round_end_system, pending_sound_system).chain());
    }
}

// Pick from `pool` when random selection is on and the pool has entries,
// otherwise the fixed path.
fn pick_sound<'a>(config: &'a RoundEndSoundConfig, fixed: &'a str, pool: &'a [String]) -> &'a str {
    if config.random_sounds {
        if let Some(path) = pool.choose(&mut rand::thread_rng()) {
            return path;
        }
    }
    fixed
}

// Queue the delayed sounds for a finished round.
pub fn round_end_system(
    mut round_end: EventReader<RoundEnd>,
    settings: Res<RoundEndSettings>,
    mut pending: ResMut<PendingSounds>,
) {
    for event in round_end.read() {
        let config = &settings.0;
        if !config.enabled {
            continue;
        }
        if config.debug {
            info!(winner = ?event.winner, reason = event.reason, "round ended, queueing sounds");
        } else {
            debug!(winner = ?event.winner, reason = event.reason, "round ended, queueing sounds");
        }

        let round_end_path = pick_sound(config, &config.sounds.round_end, &config.sounds.round_end_sounds);
        queue_sound(
            &mut pending,
            config,
            round_end_path.to_string(),
            SoundTarget::AllHumans,
            config.delay_before_sound,
        );

        let (fixed, pool): (&str, &[String]) = match event.winner {
            Team::Ct => (&config.sounds.ct_win, &config.sounds.ct_win_sounds),
            Team::Terrorist => (&config.sounds.t_win, &config.sounds.t_win_sounds),
            // No winner: the draw sound, which has no random pool.
            Team::None | Team::Spectator => (&config.sounds.draw, &[]),
        };
        let target = match event.winner {
            Team::Ct | Team::Terrorist if config.play_for_winning_team_only => SoundTarget::TeamOnly(event.winner),
            _ => SoundTarget::AllHumans,
        };
        let win_path = pick_sound(config, fixed, pool);
        queue_sound(
            &mut pending,
            config,
            win_path.to_string(),
            target,
            config.delay_before_sound + WIN_SOUND_OFFSET_SECS,
        );
    }
}

fn queue_sound(
    pending: &mut PendingSounds,
    config: &RoundEndSoundConfig,
    path: String,
    target: SoundTarget,
    delay_secs: f32,
) {
    // An empty path means that sound slot is switched off in the config.
    if path.is_empty() {
        return;
    }
    if config.debug {
        info!(%path, ?target, delay_secs, "sound queued");
    }
    pending.0.push(ScheduledSound {
        delay: Timer::from_seconds(delay_secs, TimerMode::Once),
        target,
        path,
        volume: config.volume,
    });
}

// Fire queued sounds whose delay has elapsed.
pub fn pending_sound_system(
    time: Res<Time>,
    mut pending: ResMut<PendingSounds>,
    settings: Res<RoundEndSettings>,
    players: Res<PlayerRoster>,
) {
    let delta = time.delta();
    pending.0.retain_mut(|sound| {
        if !sound.delay.tick(delta).just_finished() {
            return true;
        }
        if settings.0.debug {
            info!(path = %sound.path, target = ?sound.target, "playing round end sound");
        }
        match sound.target {
            SoundTarget::AllHumans => broadcast::play_sound_to_humans(&players, &sound.path, sound.volume),
            SoundTarget::TeamOnly(team) => broadcast::play_sound_to_team(&players, team, &sound.path, sound.volume),
        }
        false
    });
}
