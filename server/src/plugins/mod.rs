mod bomb_countdown;
mod round_end_sound;

pub use bomb_countdown::{BombCountdownPlugin, countdown_signal_system, countdown_tick_system};
pub use round_end_sound::{RoundEndSoundPlugin, pending_sound_system, round_end_system};
