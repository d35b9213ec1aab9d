//! Pause-aware game clock
//!
//! Time only moves when the host advances it; nothing here reads a wall clock.
//! Pauses shift the start forward on resume so paused time never counts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    /// Host time in seconds, advanced every frame (including while paused)
    now: f64,
    started_at: Option<f64>,
    /// Set only while a challenge holds the session paused
    pause_started_at: Option<f64>,
    /// Written once when the session is won
    finished_elapsed: Option<f64>,
    penalty: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance host time; negative or non-finite steps are ignored
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }

    /// Begin a fresh run at the current instant
    pub fn start(&mut self) {
        self.started_at = Some(self.now);
        self.pause_started_at = None;
        self.finished_elapsed = None;
        self.penalty = 0.0;
    }

    /// Back to "never started"
    pub fn reset(&mut self) {
        self.started_at = None;
        self.pause_started_at = None;
        self.finished_elapsed = None;
        self.penalty = 0.0;
    }

    pub fn pause(&mut self) {
        if self.started_at.is_some() && self.pause_started_at.is_none() {
            self.pause_started_at = Some(self.now);
        }
    }

    /// Drop the paused span from the clock
    pub fn resume(&mut self) {
        if let Some(paused_at) = self.pause_started_at.take() {
            if let Some(start) = self.started_at.as_mut() {
                *start += self.now - paused_at;
            }
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.pause_started_at.is_some()
    }

    pub fn add_penalty(&mut self, seconds: f64) {
        self.penalty += seconds;
    }

    /// Freeze the displayed time; later calls keep the first value
    pub fn finish(&mut self) -> f64 {
        if let Some(done) = self.finished_elapsed {
            return done;
        }
        let done = self.elapsed();
        self.finished_elapsed = Some(done);
        done
    }

    /// Seconds since start, minus pauses, plus penalties
    pub fn elapsed(&self) -> f64 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        if let Some(done) = self.finished_elapsed {
            return done;
        }
        let t = self.pause_started_at.unwrap_or(self.now);
        (t - start) + self.penalty
    }
}
