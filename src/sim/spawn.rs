//! Spawn placement
//!
//! Rejection sampling for a spot that does not overlap any ball already in
//! play, with a centered fallback once the attempt budget runs out.

use glam::Vec2;
use rand::Rng;

use super::state::Viewport;
use crate::consts::SPAWN_ATTEMPTS;

/// Uniform sample in `[lo, hi)`, or the midpoint when the range is empty
fn sample_axis<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) * 0.5
    }
}

/// Clamp that tolerates `lo > hi` (tiny viewports); `lo` wins
#[inline]
fn clamp_inward(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Find a center for a ball of `radius` (already entrance-scaled).
///
/// `occupied` holds `(center, current scaled radius)` for every ball in play.
/// Candidates stay `radius` away from the walls and below the header strip.
pub fn place<R: Rng>(
    occupied: &[(Vec2, f32)],
    radius: f32,
    bounds: &Viewport,
    rng: &mut R,
) -> Vec2 {
    let min_y = bounds.header_h;

    for _ in 0..SPAWN_ATTEMPTS {
        let candidate = Vec2::new(
            sample_axis(rng, radius, bounds.width - radius),
            sample_axis(rng, min_y + radius, bounds.height - radius),
        );
        let clear = occupied.iter().all(|&(center, r)| {
            let reach = radius + r;
            candidate.distance_squared(center) >= reach * reach
        });
        if clear {
            return candidate;
        }
    }

    log::debug!(
        "No free spawn spot after {} attempts, using center",
        SPAWN_ATTEMPTS
    );
    Vec2::new(
        clamp_inward(bounds.width / 2.0, radius, bounds.width - radius),
        clamp_inward(
            (bounds.height + min_y) / 2.0,
            min_y + radius,
            bounds.height - radius,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn place_all(values: usize, radius: f32, vp: &Viewport, seed: u64) -> Vec<Vec2> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut occupied: Vec<(Vec2, f32)> = Vec::new();
        for _ in 0..values {
            let p = place(&occupied, radius, vp, &mut rng);
            occupied.push((p, radius));
        }
        occupied.into_iter().map(|(p, _)| p).collect()
    }

    #[test]
    fn test_nine_balls_never_overlap_on_phone() {
        let vp = Viewport::new(375.0, 667.0);
        let points = place_all(9, 14.0, &vp, 12345);
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                assert!(
                    points[i].distance(points[j]) >= 28.0,
                    "balls {i} and {j} overlap"
                );
            }
        }
    }

    #[test]
    fn test_candidates_respect_walls_and_header() {
        let vp = Viewport::new(375.0, 667.0);
        for p in place_all(9, 14.0, &vp, 3) {
            assert!(p.x >= 14.0 && p.x <= 375.0 - 14.0);
            assert!(p.y >= vp.header_h + 14.0 && p.y <= 667.0 - 14.0);
        }
    }

    #[test]
    fn test_fallback_to_center_when_full() {
        let vp = Viewport::new(200.0, 200.0);
        // One giant ball covering the whole field
        let occupied = vec![(Vec2::new(100.0, 100.0), 1000.0)];
        let mut rng = Pcg32::seed_from_u64(1);
        let p = place(&occupied, 10.0, &vp, &mut rng);
        assert_eq!(p.x, 100.0);
        assert!((p.y - (200.0 + vp.header_h) / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let vp = Viewport::new(10.0, 10.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let p = place(&[], 14.0, &vp, &mut rng);
        assert!(p.is_finite());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let vp = Viewport::new(375.0, 667.0);
        assert_eq!(place_all(9, 14.0, &vp, 42), place_all(9, 14.0, &vp, 42));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn placed_balls_are_disjoint(seed in any::<u64>(), w in 320.0f32..1600.0, h in 480.0f32..1200.0) {
                let vp = Viewport::new(w, h);
                let points = place_all(9, 14.0, &vp, seed);
                for i in 0..points.len() {
                    for j in i + 1..points.len() {
                        prop_assert!(points[i].distance_squared(points[j]) >= 28.0 * 28.0 - 1e-3);
                    }
                }
            }
        }
    }
}
