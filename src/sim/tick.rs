//! Session flow and the per-frame tick
//!
//! Phase transitions (start, clicks, frontier growth, win) and the update
//! step that gates physics on the current phase.

use glam::Vec2;

use super::collision;
use super::layout::{assign_targets, compute_layout, converge};
use super::motion::{SpeedBands, clamp_speeds, integrate};
use super::state::{Ball, ClickOutcome, GameEvent, GamePhase, Session, SpiralEffect, Viewport};
use crate::consts::*;
use crate::next_prime_above;

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickTarget {
    /// Topmost free ball under the exact point
    pub exact: Option<usize>,
    /// Prime that wins the click (exact prime first, else nearest haloed prime)
    pub prime: Option<usize>,
}

/// Resolve a click against the free balls.
///
/// Primes accept clicks within `halo` times their current radius; a directly
/// clicked prime beats any other prime whose halo also covers the point.
pub fn resolve_click(
    balls: &[Ball],
    point: Vec2,
    now: f64,
    halo: f32,
) -> ClickTarget {
    let mut exact = None;
    let mut nearest_prime = None;
    let mut best_dist_sq = f32::INFINITY;

    // Later balls draw on top
    for (i, ball) in balls.iter().enumerate().rev() {
        if ball.hit {
            continue;
        }
        let r = ball.scaled_radius(now);
        let d2 = point.distance_squared(ball.pos);

        if exact.is_none() && d2 <= r * r {
            exact = Some(i);
        }
        if ball.is_prime() {
            let halo_r = r * halo;
            if d2 <= halo_r * halo_r && d2 < best_dist_sq {
                best_dist_sq = d2;
                nearest_prime = Some(i);
            }
        }
    }

    let prime = match exact {
        Some(i) if balls[i].is_prime() => Some(i),
        _ => nearest_prime,
    };
    ClickTarget { exact, prime }
}

impl Session {
    /// Fresh round: counters cleared, balls 2..=10 rebuilt, clock started
    pub fn start(&mut self) {
        self.clock.start();
        self.wrong_clicks = 0;
        self.challenge = None;
        self.effects.clear();
        self.grid = None;
        self.hint_until = None;
        self.build_initial_balls();
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::SessionStarted);
        log::info!("Session started (seed {})", self.seed);
    }

    /// Back to the Start screen with a fresh ball set
    pub fn reset(&mut self) {
        self.clock.reset();
        self.wrong_clicks = 0;
        self.challenge = None;
        self.effects.clear();
        self.grid = None;
        self.hint_until = None;
        self.build_initial_balls();
        self.phase = GamePhase::Idle;
    }

    /// New viewport: speed bands follow it, and an in-progress win grid is recomputed
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.bands = SpeedBands::for_viewport(&self.viewport, &self.settings);
        if self.phase == GamePhase::WinArranging {
            self.layout_win_grid();
        }
    }

    /// Route a click at playfield-local `point`
    pub fn register_click(&mut self, point: Vec2) -> ClickOutcome {
        if self.phase != GamePhase::Running {
            return ClickOutcome::None;
        }
        let now = self.clock.now();
        let target = resolve_click(&self.balls, point, now, self.settings.prime_halo);

        if let Some(index) = target.prime {
            return self.hit_prime(index);
        }

        match target.exact {
            Some(index) => {
                let value = self.balls[index].value;
                self.clock.add_penalty(self.settings.wrong_click_penalty);
                self.wrong_clicks += 1;
                self.events.push(GameEvent::WrongClick { value });
                log::debug!("Wrong click on {} ({} total)", value, self.wrong_clicks);
                ClickOutcome::WrongClick { value }
            }
            None => ClickOutcome::None,
        }
    }

    fn hit_prime(&mut self, index: usize) -> ClickOutcome {
        let now = self.clock.now();
        let ball = &mut self.balls[index];
        let (value, pos, r) = (ball.value, ball.pos, ball.scaled_radius(now));
        ball.hit = true;
        ball.vel = Vec2::ZERO;

        self.effects.push(SpiralEffect {
            pos,
            started_at: now,
            duration: self.settings.spiral_duration,
            start_radius: r * SPIRAL_RADIUS_SCALE,
            turns: SPIRAL_TURNS,
        });

        self.expand_frontier();

        let any_left = self.balls.iter().any(|b| b.is_prime() && !b.hit);
        self.events.push(GameEvent::PrimeHit {
            value,
            final_prime: !any_left,
        });
        if !any_left {
            self.enter_win();
        }
        ClickOutcome::PrimeHit { value }
    }

    /// Reveal every value up to the next prime above the frontier (capped)
    fn expand_frontier(&mut self) {
        if self.frontier >= MAX_VALUE {
            return;
        }
        let from = self.frontier;
        let cap = next_prime_above(from).min(MAX_VALUE);
        for value in (from + 1)..=cap {
            self.add_ball(value, true);
        }
        self.frontier = cap;
        self.events.push(GameEvent::FrontierExpanded { from, to: cap });
        log::debug!("Frontier {} -> {}", from, cap);
    }

    fn enter_win(&mut self) {
        let elapsed = self.clock.finish();
        self.phase = GamePhase::WinArranging;
        for ball in &mut self.balls {
            ball.settle();
            ball.vel = Vec2::ZERO;
        }
        self.layout_win_grid();
        self.events.push(GameEvent::Won { elapsed });
        log::info!(
            "All primes found in {:.1}s ({} wrong clicks)",
            elapsed,
            self.wrong_clicks
        );
    }

    fn layout_win_grid(&mut self) {
        let layout = compute_layout(&self.balls, &self.viewport);
        assign_targets(&mut self.balls, &layout, self.viewport.win_radius());
        self.grid = Some(layout.grid);
    }

    /// "2, 3" hint: light up multiples of 2 and 3 for a while, at a time cost
    pub fn request_hint(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.hint_until = Some(self.clock.now() + self.settings.hint_duration);
        self.clock.add_penalty(self.settings.hint_penalty);
        self.events.push(GameEvent::HintShown);
        true
    }

    /// Advance by `dt` seconds of host time (`dt * 60` frames of motion).
    ///
    /// Time always moves; physics only while Running, grid easing only while
    /// WinArranging, nothing at all while Paused or Idle.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.clock.advance(f64::from(dt));
        let now = self.clock.now();
        let frame_units = dt * BASELINE_FPS;

        match self.phase {
            GamePhase::Running => {
                integrate(
                    &mut self.balls,
                    &self.viewport,
                    &self.bands,
                    now,
                    frame_units,
                );
                collision::resolve(&mut self.balls, now, self.settings.restitution);
                clamp_speeds(&mut self.balls, &self.bands);
            }
            GamePhase::WinArranging => {
                let step = self.settings.win_step(frame_units);
                converge(&mut self.balls, step);
            }
            GamePhase::Idle | GamePhase::Paused => {}
        }

        self.effects.retain(|fx| !fx.expired(now));
        if self.hint_until.is_some_and(|until| now >= until) {
            self.hint_until = None;
        }
    }
}
