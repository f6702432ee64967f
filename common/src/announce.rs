// ============================================================================
// Countdown Announcement Formatting
// ============================================================================

// File extension of the game's compiled sound resources.
const SOUND_EXTENSION: &str = ".vsnd_c";

// Chat label preceding the seconds value.
const COUNTDOWN_LABEL: &str = "До взрыва:";

/// Grammatical suffix for a seconds value. Other locales plug in here; the
/// countdown never inspects the seconds beyond this call.
pub trait SecondsPhrasing {
    fn suffix(&self, seconds: i32) -> &'static str;
}

/// The stock Russian phrasing: 1 takes the singular, 2 through 4 the
/// few-form, and every other value (including 0 and 5+) no word at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct RussianPhrasing;

impl SecondsPhrasing for RussianPhrasing {
    fn suffix(&self, seconds: i32) -> &'static str {
        match seconds {
            1 => "секунда",
            2..=4 => "секунды",
            _ => "",
        }
    }
}

/// Chat line announcing `seconds` left, prefixed with the configured color
/// token (interpreted by the game client, passed through verbatim here).
#[must_use]
pub fn countdown_line(color: &str, seconds: i32, phrasing: &impl SecondsPhrasing) -> String {
    let suffix = phrasing.suffix(seconds);
    if suffix.is_empty() {
        format!("{color}{COUNTDOWN_LABEL} {seconds}")
    } else {
        format!("{color}{COUNTDOWN_LABEL} {seconds} {suffix}")
    }
}

/// Sound resource for `seconds`: one file per announced value under the
/// configured base path.
#[must_use]
pub fn countdown_sound_path(base: &str, seconds: i32) -> String {
    format!("{}/{seconds}{SOUND_EXTENSION}", base.trim_end_matches('/'))
}

// ============================================================================
// Tests
// ============================================================================
