//! Collision detection and response between balls
//!
//! Two passes per frame: free balls against each other (equal masses, both
//! move), then free balls against bumpers (clicked primes, which act as fixed
//! round walls).

use glam::Vec2;

use super::state::Ball;
use crate::consts::COINCIDENT_EPSILON;

/// Result of a circle overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Unit normal from the first circle's center toward the second
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between circle `a` and circle `b`.
///
/// Coincident centers fall back to the +x axis so callers always get a usable normal.
pub fn circle_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let reach = a_radius + b_radius;
    let delta = b_pos - a_pos;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let (normal, dist) = if dist.is_finite() && dist > 0.0 {
        (delta / dist, dist)
    } else {
        (Vec2::X, COINCIDENT_EPSILON)
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Reflect velocity off a surface with restitution `e`
///
/// v' = v - (1 + e)(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}

/// Equal-mass response for two free balls: symmetric separation, then an
/// impulse unless they are already moving apart.
fn resolve_pair(a: &mut Ball, b: &mut Ball, contact: &CollisionResult, restitution: f32) {
    let n = contact.normal;
    let push = contact.penetration * 0.5;
    a.pos -= n * push;
    b.pos += n * push;

    // Velocity of b relative to a along the normal; >= 0 means separating
    let vel_n = (b.vel - a.vel).dot(n);
    if vel_n >= 0.0 {
        return;
    }
    let j = -(1.0 + restitution) * vel_n / 2.0;
    a.vel -= n * j;
    b.vel += n * j;
}

/// Free ball against free ball, every unordered pair
pub fn resolve_moving_pairs(balls: &mut [Ball], now: f64, restitution: f32) {
    let radii: Vec<f32> = balls.iter().map(|b| b.scaled_radius(now)).collect();
    let n = balls.len();

    for i in 0..n {
        if balls[i].hit {
            continue;
        }
        for j in (i + 1)..n {
            if balls[j].hit {
                continue;
            }
            let contact = circle_overlap(balls[i].pos, radii[i], balls[j].pos, radii[j]);
            if !contact.hit {
                continue;
            }
            let (left, right) = balls.split_at_mut(j);
            resolve_pair(&mut left[i], &mut right[0], &contact, restitution);
        }
    }
}

/// Free ball against bumpers: the bumper never moves
pub fn resolve_bumpers(balls: &mut [Ball], now: f64, restitution: f32) {
    let bumpers: Vec<(Vec2, f32)> = balls
        .iter()
        .filter(|b| b.is_bumper())
        .map(|b| (b.pos, b.scaled_radius(now)))
        .collect();
    if bumpers.is_empty() {
        return;
    }

    for ball in balls.iter_mut().filter(|b| !b.hit) {
        let r = ball.scaled_radius(now);
        for &(bumper_pos, bumper_r) in &bumpers {
            let contact = circle_overlap(bumper_pos, bumper_r, ball.pos, r);
            if !contact.hit {
                continue;
            }
            // Normal points from the bumper out through the moving ball
            ball.pos += contact.normal * contact.penetration;
            if ball.vel.dot(contact.normal) < 0.0 {
                ball.vel = reflect_velocity(ball.vel, contact.normal, restitution);
            }
        }
    }
}

/// Both passes, in order
pub fn resolve(balls: &mut [Ball], now: f64, restitution: f32) {
    resolve_moving_pairs(balls, now, restitution);
    resolve_bumpers(balls, now, restitution);
}
