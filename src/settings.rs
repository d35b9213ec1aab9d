//! Game settings
//!
//! The built-in tuning constants in one serde-backed value. Defaults are the
//! shipped feel; the host may override them from JSON.

use serde::{Deserialize, Serialize};

/// Tuning values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Motion ===
    /// Global speed multiplier applied uniformly to target/min/max bands
    pub speed_mod: f32,
    /// Per-frame velocity damping on normal screens
    pub damping: f32,
    /// Per-frame velocity damping when the smaller dimension is below `small_screen_dim`
    pub damping_small: f32,
    /// Smaller-dimension threshold (pixels) for the small-screen damping
    pub small_screen_dim: f32,
    /// Restitution for ball/ball and ball/bumper collisions
    pub restitution: f32,

    // === Clicks ===
    /// Prime click tolerance, as a multiple of the ball's current radius
    pub prime_halo: f32,
    /// Seconds added to the clock per wrong click
    pub wrong_click_penalty: f64,

    // === Hint ===
    /// Seconds added to the clock per hint
    pub hint_penalty: f64,
    /// Seconds the hint highlight lasts
    pub hint_duration: f64,

    // === Entrance animation ===
    /// Starting scale of a newly revealed ball
    pub spawn_scale: f32,
    /// Seconds for the entrance scale to settle at 1.0
    pub grow_duration: f64,
    /// Random jitter on spawn speed (fraction of target, each side)
    pub spawn_speed_jitter: f32,

    // === Win arrangement ===
    /// Fraction of the remaining distance left after 60 frames of smoothing
    pub win_smoothing_base: f32,

    // === Feedback ===
    /// Seconds a spiral click effect lives
    pub spiral_duration: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_mod: 0.5,
            damping: 0.996,
            damping_small: 0.993,
            small_screen_dim: 550.0,
            restitution: 0.92,

            prime_halo: 2.5,
            wrong_click_penalty: 2.0,

            hint_penalty: 5.0,
            hint_duration: 5.0,

            spawn_scale: 3.0,
            grow_duration: 6.0,
            spawn_speed_jitter: 0.05,

            win_smoothing_base: 0.0005,

            spiral_duration: 4.0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings overrides");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Damping factor for a viewport whose (floored) smaller dimension is `min_dim`
    pub fn damping_for(&self, min_dim: f32) -> f32 {
        if min_dim < self.small_screen_dim {
            self.damping_small
        } else {
            self.damping
        }
    }

    /// Per-tick smoothing step toward win targets for `frame_units` frames
    pub fn win_step(&self, frame_units: f32) -> f32 {
        let per_frame = 1.0 - self.win_smoothing_base.powf(1.0 / 60.0);
        1.0 - (1.0 - per_frame).powf(frame_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{"speed_mod": 0.8}"#).unwrap();
        assert_eq!(s.speed_mod, 0.8);
        assert_eq!(s.restitution, 0.92);
        assert_eq!(s.prime_halo, 2.5);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let s = Settings::from_json_or_default("{not json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings::default();
        let back = Settings::from_json(&s.to_json()).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn test_damping_threshold() {
        let s = Settings::default();
        assert_eq!(s.damping_for(375.0), 0.993);
        assert_eq!(s.damping_for(800.0), 0.996);
    }

    #[test]
    fn test_win_step_single_frame() {
        let s = Settings::default();
        let one = s.win_step(1.0);
        let expected = 1.0 - 0.0005f32.powf(1.0 / 60.0);
        assert!((one - expected).abs() < 1e-6);
        // Two single frames equal one double frame
        let two = s.win_step(2.0);
        assert!((two - (1.0 - (1.0 - one) * (1.0 - one))).abs() < 1e-5);
    }
}
