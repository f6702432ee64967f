use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Plugin Configuration
// ============================================================================
//
// Both plugins read their settings from JSON files with PascalCase keys and
// every key optional. Missing keys take the defaults below; `normalize`
// repairs values the plugins cannot run with before any state is built from
// them.

const fn default_true() -> bool {
    true
}

const fn default_start_from_second() -> i32 {
    40
}

fn default_announce_seconds() -> Vec<i32> {
    vec![40, 35, 30, 25, 20, 15, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]
}

fn default_countdown_sound_path() -> String {
    "sounds/bombcountdown".to_string()
}

fn default_text_color() -> String {
    "{red}".to_string()
}

// Settings for the bomb countdown plugin (BombCountdown.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CountdownConfig {
    // Master switch; when off, bomb plants are ignored entirely.
    #[serde(default = "default_true")]
    pub enabled: bool,
    // Seconds on the clock when the bomb is planted.
    #[serde(default = "default_start_from_second")]
    pub start_from_second: i32,
    // Seconds values that get announced.
    #[serde(default = "default_announce_seconds")]
    pub announce_seconds: Vec<i32>,
    // Base path of the per-second sound resources.
    #[serde(default = "default_countdown_sound_path")]
    pub sound_path: String,
    #[serde(default = "default_true")]
    pub show_text_countdown: bool,
    #[serde(default = "default_true")]
    pub play_sound_countdown: bool,
    // Chat color token, passed through to the client verbatim.
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_from_second: default_start_from_second(),
            announce_seconds: default_announce_seconds(),
            sound_path: default_countdown_sound_path(),
            show_text_countdown: true,
            play_sound_countdown: true,
            text_color: default_text_color(),
        }
    }
}

impl CountdownConfig {
    // Repair values the countdown cannot run with: an empty announce list
    // falls back to the default list, a non-positive start to the default
    // start.
    pub fn normalize(&mut self) {
        if self.announce_seconds.is_empty() {
            self.announce_seconds = default_announce_seconds();
        }
        if self.start_from_second <= 0 {
            self.start_from_second = default_start_from_second();
        }
    }

    // Membership set consulted on every countdown tick.
    #[must_use]
    pub fn announce_set(&self) -> HashSet<i32> {
        self.announce_seconds.iter().copied().collect()
    }
}

// ============================================================================
// Round End Sounds
// ============================================================================

fn default_ct_win_sound() -> String {
    "sounds/roundend/ct_win.vsnd_c".to_string()
}

fn default_t_win_sound() -> String {
    "sounds/roundend/t_win.vsnd_c".to_string()
}

fn default_draw_sound() -> String {
    "sounds/roundend/draw.vsnd_c".to_string()
}

fn default_round_end_sound() -> String {
    "sounds/roundend/round_end.vsnd_c".to_string()
}

const fn default_volume() -> f32 {
    1.0
}

const fn default_delay_before_sound() -> f32 {
    1.0
}

// Fixed sound slots plus the optional random pools that can replace them.
// An empty path disables that slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundBank {
    #[serde(rename = "CTWin", default = "default_ct_win_sound")]
    pub ct_win: String,
    #[serde(rename = "TWin", default = "default_t_win_sound")]
    pub t_win: String,
    #[serde(rename = "Draw", default = "default_draw_sound")]
    pub draw: String,
    #[serde(rename = "RoundEnd", default = "default_round_end_sound")]
    pub round_end: String,
    #[serde(rename = "CTWinSounds", default)]
    pub ct_win_sounds: Vec<String>,
    #[serde(rename = "TWinSounds", default)]
    pub t_win_sounds: Vec<String>,
    #[serde(rename = "RoundEndSounds", default)]
    pub round_end_sounds: Vec<String>,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self {
            ct_win: default_ct_win_sound(),
            t_win: default_t_win_sound(),
            draw: default_draw_sound(),
            round_end: default_round_end_sound(),
            ct_win_sounds: Vec::new(),
            t_win_sounds: Vec::new(),
            round_end_sounds: Vec::new(),
        }
    }
}

// Settings for the round end sound plugin (RoundEndSound.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoundEndSoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub sounds: SoundBank,
    #[serde(default = "default_volume")]
    pub volume: f32,
    // Seconds between the round ending and the first sound.
    #[serde(default = "default_delay_before_sound")]
    pub delay_before_sound: f32,
    // Pick from the pools instead of the fixed slots when a pool is
    // non-empty.
    #[serde(default)]
    pub random_sounds: bool,
    // Restrict the win sound to the winning team's players.
    #[serde(default)]
    pub play_for_winning_team_only: bool,
    // Raise the plugin's decision logs to info level.
    #[serde(default)]
    pub debug: bool,
}

impl Default for RoundEndSoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sounds: SoundBank::default(),
            volume: default_volume(),
            delay_before_sound: default_delay_before_sound(),
            random_sounds: false,
            play_for_winning_team_only: false,
            debug: false,
        }
    }
}

impl RoundEndSoundConfig {
    // A negative delay cannot be scheduled; treat it as "immediately".
    pub fn normalize(&mut self) {
        if self.delay_before_sound < 0.0 {
            self.delay_before_sound = 0.0;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
