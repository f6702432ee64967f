use std::collections::HashSet;
use std::time::Duration;

use bevy_time::{Timer, TimerMode};

use crate::config::CountdownConfig;

// ============================================================================
// Bomb Countdown State Machine
// ============================================================================
//
// Round lifecycle signals drive a single transition entry point; while the
// bomb is planted, a repeating one-second timer owned by the controller
// counts down from the configured start value. Announcements are decided on
// the pre-decrement value so the chat line matches the seconds actually
// left when the tick fires.

const TICK_PERIOD_SECS: f32 = 1.0;

/// Round lifecycle signals the countdown reacts to. Everything except
/// `BombPlanted` disarms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundSignal {
    BombPlanted,
    BombDefused,
    BombExploded,
    RoundStart,
    RoundEnd,
}

/// What [`CountdownController::apply`] did with a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Countdown (re)started from this many seconds.
    Started { seconds: i32 },
    /// Countdown stopped (also returned when there was nothing to stop).
    Stopped,
    /// Plant arrived while the plugin is disabled; state untouched.
    Ignored,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick was already in flight when a stop landed; state untouched.
    Stale,
    /// Countdown continues. `announce` carries the pre-decrement seconds
    /// value when it is in the announce set.
    Counting { announce: Option<i32> },
    /// Countdown reached zero and deactivated.
    Expired { announce: Option<i32> },
}

/// Coarse view of the state for logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No bomb planted.
    Idle,
    /// Bomb planted, countdown running.
    Counting,
    /// Countdown ran out; waiting for the round to resolve.
    Expired,
}

pub struct CountdownController {
    enabled: bool,
    start_from: i32,
    announce_set: HashSet<i32>,
    planted: bool,
    active: bool,
    remaining: i32,
    ticker: Option<Timer>,
}

impl CountdownController {
    /// Build a controller from a normalized config. Only the master switch,
    /// the start value, and the announce set are consumed here; how an
    /// announcement is presented stays with the caller.
    #[must_use]
    pub fn new(config: &CountdownConfig) -> Self {
        Self {
            enabled: config.enabled,
            start_from: config.start_from_second,
            announce_set: config.announce_set(),
            planted: false,
            active: false,
            remaining: 0,
            ticker: None,
        }
    }

    /// Feed one round lifecycle signal through the state machine.
    pub fn apply(&mut self, signal: RoundSignal) -> Transition {
        match signal {
            RoundSignal::BombPlanted => {
                if !self.enabled {
                    return Transition::Ignored;
                }
                self.start(self.start_from);
                Transition::Started { seconds: self.start_from }
            }
            RoundSignal::BombDefused
            | RoundSignal::BombExploded
            | RoundSignal::RoundStart
            | RoundSignal::RoundEnd => {
                self.stop();
                Transition::Stopped
            }
        }
    }

    /// Arm the countdown at `start_seconds`, replacing any countdown already
    /// in flight with a fresh tick schedule. A non-positive start has
    /// nowhere to count, so it disarms instead.
    pub fn start(&mut self, start_seconds: i32) {
        if start_seconds <= 0 {
            self.stop();
            return;
        }
        self.planted = true;
        self.active = true;
        self.remaining = start_seconds;
        self.ticker = Some(Timer::from_seconds(TICK_PERIOD_SECS, TimerMode::Repeating));
    }

    /// Disarm back to the initial idle state: flags cleared, counter zeroed.
    /// Safe to call in any state; the tick handle is released before this
    /// returns, so no new tick can fire afterwards.
    pub fn stop(&mut self) {
        self.planted = false;
        self.active = false;
        self.remaining = 0;
        self.ticker = None;
    }

    /// One countdown tick. Hosts with their own repeating timer call this
    /// directly; delta-time hosts go through [`advance`](Self::advance).
    ///
    /// A tick that was already in flight when `stop` ran is answered with
    /// [`TickOutcome::Stale`] and leaves the counter untouched.
    pub fn on_tick(&mut self) -> TickOutcome {
        if !self.planted || !self.active {
            self.ticker = None;
            return TickOutcome::Stale;
        }
        let announce = self
            .announce_set
            .contains(&self.remaining)
            .then_some(self.remaining);
        self.remaining -= 1;
        if self.remaining <= 0 {
            self.active = false;
            self.ticker = None;
            return TickOutcome::Expired { announce };
        }
        TickOutcome::Counting { announce }
    }

    /// Advance the owned tick schedule by `delta`, running [`on_tick`]
    /// once per elapsed second. A stalled frame catches up with one tick per
    /// missed second; expiry cuts the catch-up short.
    ///
    /// [`on_tick`]: Self::on_tick
    pub fn advance(&mut self, delta: Duration) -> Vec<TickOutcome> {
        let fired = match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick(delta);
                ticker.times_finished_this_tick()
            }
            None => 0,
        };

        let mut outcomes = Vec::new();
        for _ in 0..fired {
            let outcome = self.on_tick();
            let done = !matches!(outcome, TickOutcome::Counting { .. });
            outcomes.push(outcome);
            if done {
                break;
            }
        }
        outcomes
    }

    #[must_use]
    pub const fn is_planted(&self) -> bool {
        self.planted
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> i32 {
        self.remaining
    }

    /// Whether a repeating tick is currently scheduled. Holds exactly while
    /// the countdown is active.
    #[must_use]
    pub const fn has_scheduled_tick(&self) -> bool {
        self.ticker.is_some()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        if !self.planted {
            Phase::Idle
        } else if self.active {
            Phase::Counting
        } else {
            Phase::Expired
        }
    }
}
