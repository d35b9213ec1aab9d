//! Motion integration
//!
//! Velocities are pixels per frame at a 60 Hz baseline. Hosts running at other
//! rates pass `frame_units = dt * 60` and everything scales accordingly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Viewport};
use crate::consts::*;
use crate::settings::Settings;

/// Soft speed envelope and damping for the current viewport (per-frame units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBands {
    pub target: f32,
    pub min: f32,
    pub max: f32,
    pub damping: f32,
}

impl SpeedBands {
    /// Bands grow with the smaller viewport dimension, then the global speed modifier scales all three
    pub fn for_viewport(viewport: &Viewport, settings: &Settings) -> Self {
        let min_dim = viewport.min_dim().max(SPEED_FLOOR_DIM);

        let base_target = (min_dim * SPEED_TARGET_RATIO).round();
        let base_min = (base_target * SPEED_MIN_RATIO).round();
        let base_max = (base_target * SPEED_MAX_RATIO).round();

        let m = settings.speed_mod;
        let target_pps = (base_target * m).round().max(10.0);
        let min_pps = (base_min * m).round().max(1.0);
        let max_pps = (base_max * m).round().max(min_pps + 1.0);

        Self {
            target: target_pps / BASELINE_FPS,
            min: min_pps / BASELINE_FPS,
            max: max_pps / BASELINE_FPS,
            damping: settings.damping_for(min_dim),
        }
    }

    /// Keep speed inside `[min, max]`; a dead or NaN velocity restarts along +x
    pub fn soft_clamp(&self, vel: &mut Vec2) {
        let speed = vel.length();
        if !speed.is_finite() || speed == 0.0 {
            *vel = Vec2::new(self.target, 0.0);
            return;
        }
        if speed > self.max {
            *vel *= self.max / speed;
        } else if speed < self.min {
            *vel *= self.min / speed;
        }
    }
}

/// Bounce off the four walls (the top wall sits under the header).
/// Position is clamped and the offending component points back inward.
pub fn bounce_walls(ball: &mut Ball, radius: f32, viewport: &Viewport) {
    let min_y = viewport.header_h;

    if ball.pos.x < radius {
        ball.pos.x = radius;
        ball.vel.x = ball.vel.x.abs();
    }
    if ball.pos.x > viewport.width - radius {
        ball.pos.x = viewport.width - radius;
        ball.vel.x = -ball.vel.x.abs();
    }
    if ball.pos.y < min_y + radius {
        ball.pos.y = min_y + radius;
        ball.vel.y = ball.vel.y.abs();
    }
    if ball.pos.y > viewport.height - radius {
        ball.pos.y = viewport.height - radius;
        ball.vel.y = -ball.vel.y.abs();
    }
}

/// Advance every movable ball by `frame_units` frames
pub fn integrate(
    balls: &mut [Ball],
    viewport: &Viewport,
    bands: &SpeedBands,
    now: f64,
    frame_units: f32,
) {
    let damping = bands.damping.powf(frame_units);
    for ball in balls.iter_mut().filter(|b| !b.hit) {
        ball.pos += ball.vel * frame_units;

        let r = ball.scaled_radius(now);
        bounce_walls(ball, r, viewport);

        ball.vel *= damping;
        bands.soft_clamp(&mut ball.vel);
    }
}

/// Re-apply the speed envelope after collisions have changed velocities
pub fn clamp_speeds(balls: &mut [Ball], bands: &SpeedBands) {
    for ball in balls.iter_mut().filter(|b| !b.hit) {
        bands.soft_clamp(&mut ball.vel);
    }
}
