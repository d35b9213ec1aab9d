//! Prime Pop - click the primes before they bounce away
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state, GCF challenge)
//! - `settings`: Built-in tuning constants, serde-backed
//! - `web`: wasm-bindgen facade for the browser UI layer

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Frames per second the per-frame velocities are tuned for
    pub const BASELINE_FPS: f32 = 60.0;

    /// Values in play
    pub const FIRST_VALUE: u32 = 2;
    pub const INITIAL_FRONTIER: u32 = 10;
    pub const MAX_VALUE: u32 = 60;

    /// Rejection-sampling budget for spawn placement
    pub const SPAWN_ATTEMPTS: usize = 300;

    /// Base ball radius bounds (pixels)
    pub const MIN_BALL_RADIUS: f32 = 14.0;
    pub const MAX_BALL_RADIUS: f32 = 26.0;
    /// Base ball radius as a fraction of the smaller viewport dimension
    pub const BALL_RADIUS_RATIO: f32 = 0.022;

    /// Speed bands, relative to the smaller viewport dimension
    pub const SPEED_FLOOR_DIM: f32 = 320.0;
    pub const SPEED_TARGET_RATIO: f32 = 0.42;
    pub const SPEED_MIN_RATIO: f32 = 0.55;
    pub const SPEED_MAX_RATIO: f32 = 1.60;

    /// Win grid
    pub const GRID_COLUMNS: usize = 10;
    pub const GRID_CELL_MIN_RADII: f32 = 2.6;
    pub const WIN_RADIUS_MIN: f32 = 8.0;
    pub const WIN_RADIUS_DIVISOR: f32 = 32.0;

    /// Spiral feedback
    pub const SPIRAL_RADIUS_SCALE: f32 = 6.0;
    pub const SPIRAL_TURNS: f32 = 9.0;

    /// Minimum separation used when two centers coincide
    pub const COINCIDENT_EPSILON: f32 = 1e-6;
}

/// Trial division; fine for the 2..=60 range used in play
#[inline]
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut i = 3;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Smallest prime strictly greater than `n`
pub fn next_prime_above(n: u32) -> u32 {
    let mut x = n + 1;
    while !is_prime(x) {
        x += 1;
    }
    x
}

/// Greatest common divisor (Euclid)
#[inline]
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes_up_to_sixty() {
        let primes: Vec<u32> = (0..=60).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59]
        );
    }

    #[test]
    fn test_next_prime_above() {
        assert_eq!(next_prime_above(10), 11);
        assert_eq!(next_prime_above(11), 13);
        assert_eq!(next_prime_above(53), 59);
        assert_eq!(next_prime_above(59), 61);
    }

    #[test]
    fn test_gcd_known_values() {
        assert_eq!(gcd(8, 12), 4);
        assert_eq!(gcd(17, 5), 1);
        assert_eq!(gcd(9, 6), 3);
        assert_eq!(gcd(0, 7), 7);
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    mod props {
        use super::super::gcd;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn gcd_divides_both(a in 1u32..1000, b in 1u32..1000) {
                let g = gcd(a, b);
                prop_assert_eq!(a % g, 0);
                prop_assert_eq!(b % g, 0);
                prop_assert_eq!(g, gcd(b, a));
            }
        }
    }
}
