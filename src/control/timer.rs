//! Countdown timer with a single-fire completion signal.
//!
//! Every controller owns one or more of these. Time is passed in explicitly
//! as monotonic milliseconds so the controllers stay pure and testable; the
//! main loop reads the clock once per cycle and hands the same `now_ms` to
//! everybody.
//!
//! ```text
//!            start()                 elapsed >= duration
//!   Idle ─────────────▶ Running ───────────────────────▶ JustFinished
//!    ▲                     ▲                                  │
//!    │ stop()              │ start()          just_finished() │
//!    └─────────────────────┴─────────────── Finished ◀────────┘
//! ```
//!
//! `JustFinished` is only left through [`Timer::just_finished`], which
//! acknowledges the completion. Callers therefore see `true` exactly once per
//! `start`, however often or rarely they poll.

use core::time::Duration;

/// Observable timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Never started, or explicitly stopped.
    Idle,
    /// Elapsed time is still below the duration.
    Running,
    /// Duration reached and not yet acknowledged.
    JustFinished,
    /// Duration reached and already acknowledged.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    duration: Duration,
    started_at_ms: u64,
    armed: bool,
    acknowledged: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// A timer in the `Idle` state.
    pub const fn new() -> Self {
        Self {
            duration: Duration::ZERO,
            started_at_ms: 0,
            armed: false,
            acknowledged: false,
        }
    }

    /// (Re)start the countdown from `now_ms` and clear any pending
    /// acknowledgement.
    pub fn start(&mut self, now_ms: u64, duration: Duration) {
        self.duration = duration;
        self.started_at_ms = now_ms;
        self.armed = true;
        self.acknowledged = false;
    }

    /// Return to `Idle` without firing.
    pub fn stop(&mut self) {
        self.armed = false;
        self.acknowledged = false;
    }

    /// Non-consuming view of the current state.
    pub fn state(&self, now_ms: u64) -> TimerState {
        if !self.armed {
            TimerState::Idle
        } else if self.elapsed_ms(now_ms) < self.duration_ms() {
            TimerState::Running
        } else if self.acknowledged {
            TimerState::Finished
        } else {
            TimerState::JustFinished
        }
    }

    pub fn is_running(&self, now_ms: u64) -> bool {
        self.state(now_ms) == TimerState::Running
    }

    /// `true` exactly once after the duration elapses; acknowledges the
    /// completion so later polls return `false` until the next `start`.
    pub fn just_finished(&mut self, now_ms: u64) -> bool {
        if self.state(now_ms) == TimerState::JustFinished {
            self.acknowledged = true;
            true
        } else {
            false
        }
    }

    /// Time left before completion; zero when idle or finished.
    pub fn remaining(&self, now_ms: u64) -> Duration {
        if !self.armed {
            return Duration::ZERO;
        }
        let left = self.duration_ms().saturating_sub(self.elapsed_ms(now_ms));
        Duration::from_millis(left)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}
