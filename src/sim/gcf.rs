//! Greatest-common-factor challenge
//!
//! The player pauses the round, types the GCF of two composite balls, and on
//! success both balls lock into the grid early. They take their final cells
//! once the round is won.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::layout::compute_layout;
use super::state::{Ball, GameEvent, GamePhase, Session};
use crate::gcd;

/// An open challenge: the two values and their precomputed GCF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcfChallenge {
    pub a: u32,
    pub b: u32,
    pub g: u32,
}

impl GcfChallenge {
    /// Largest answer that could possibly be right
    pub fn max_possible(&self) -> u32 {
        self.a.min(self.b)
    }

    /// Sentence read aloud once solved
    pub fn message(&self) -> String {
        format!(
            "{} is the greatest common factor of {} and {}.",
            self.g, self.a, self.b
        )
    }
}

/// Outcome of checking an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GcfVerdict {
    pub correct: bool,
    /// The challenge finished and the pair is now locked
    pub completes: bool,
    /// Finite answer larger than the smaller value
    pub too_big: bool,
}

impl GcfVerdict {
    /// Blank or unreadable input: nothing changes
    pub fn inconclusive() -> Self {
        Self::default()
    }
}

/// Pick a composite pair, preferring pairs that share a factor.
///
/// Returns `None` when fewer than two unclicked composites remain.
pub fn choose<R: Rng>(balls: &[Ball], rng: &mut R) -> Option<GcfChallenge> {
    let pool: Vec<u32> = balls
        .iter()
        .filter(|b| b.is_composite_candidate())
        .map(|b| b.value)
        .collect();
    if pool.len() < 2 {
        return None;
    }

    let mut all_pairs = Vec::new();
    let mut with_common = Vec::new();
    for (i, &a) in pool.iter().enumerate() {
        for &b in &pool[i + 1..] {
            let pair = GcfChallenge { a, b, g: gcd(a, b) };
            all_pairs.push(pair);
            if pair.g > 1 {
                with_common.push(pair);
            }
        }
    }

    let candidates = if with_common.is_empty() {
        &all_pairs
    } else {
        &with_common
    };
    Some(candidates[rng.random_range(0..candidates.len())])
}

/// Check a numeric answer. Non-finite input is inconclusive.
pub fn validate(answer: f64, challenge: &GcfChallenge) -> GcfVerdict {
    if !answer.is_finite() {
        return GcfVerdict::inconclusive();
    }
    let correct = answer == f64::from(challenge.g);
    GcfVerdict {
        correct,
        completes: false,
        too_big: answer > f64::from(challenge.max_possible()),
    }
}

/// Read the leading integer out of typed text ("12", " 12 ", "12abc").
/// Blank or digit-less input yields `None`.
pub fn parse_answer(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<f64>().ok().map(|v| sign * v)
}

impl Session {
    /// Pause the round and open a challenge.
    ///
    /// `None` if a challenge is already open, the session is not running, or
    /// fewer than two composites are left.
    pub fn request_gcf_challenge(&mut self) -> Option<GcfChallenge> {
        if self.challenge.is_some() || self.phase != GamePhase::Running {
            return None;
        }
        let challenge = choose(&self.balls, &mut self.rng)?;

        self.challenge = Some(challenge);
        self.clock.pause();
        self.phase = GamePhase::Paused;
        self.events.push(GameEvent::GcfOpened {
            a: challenge.a,
            b: challenge.b,
        });
        log::info!("GCF challenge opened: ({}, {})", challenge.a, challenge.b);
        Some(challenge)
    }

    /// Submit typed text; unreadable input is inconclusive
    pub fn submit_gcf_answer(&mut self, raw: &str) -> GcfVerdict {
        match parse_answer(raw) {
            Some(value) => self.submit_gcf_value(value),
            None => GcfVerdict::inconclusive(),
        }
    }

    /// Submit a numeric answer. A correct one locks the pair and resumes play.
    pub fn submit_gcf_value(&mut self, value: f64) -> GcfVerdict {
        let Some(challenge) = self.challenge else {
            return GcfVerdict::inconclusive();
        };
        let mut verdict = validate(value, &challenge);
        if verdict.correct {
            self.lock_pair(&challenge);
            self.close_challenge();
            self.events.push(GameEvent::GcfSolved {
                a: challenge.a,
                b: challenge.b,
                g: challenge.g,
            });
            log::info!("GCF solved: {}", challenge.message());
            verdict.completes = true;
        }
        verdict
    }

    /// Close the challenge without an answer
    pub fn cancel_gcf_challenge(&mut self) {
        if self.challenge.is_none() {
            return;
        }
        self.close_challenge();
        self.events.push(GameEvent::GcfCancelled);
        log::info!("GCF challenge cancelled");
    }

    fn close_challenge(&mut self) {
        self.challenge = None;
        self.clock.resume();
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    /// Freeze both balls at their cells in the grid for the current ball set, at win size
    fn lock_pair(&mut self, challenge: &GcfChallenge) {
        let layout = compute_layout(&self.balls, &self.viewport);
        let win_radius = self.viewport.win_radius();

        for value in [challenge.a, challenge.b] {
            let Some(index) = self.ball_index(value) else {
                continue;
            };
            let target = layout.target_for(index);
            let ball = &mut self.balls[index];
            ball.settle();
            ball.vel = glam::Vec2::ZERO;
            ball.hit = true;
            ball.locked = true;
            if let Some(target) = target {
                ball.pos = target;
                ball.target = Some(target);
            }
            ball.radius = win_radius;
            ball.target_radius = Some(win_radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn balls(values: &[u32]) -> Vec<Ball> {
        values
            .iter()
            .map(|&v| Ball::new(v, Vec2::new(v as f32 * 10.0, 200.0), Vec2::new(1.0, 0.0), 14.0))
            .collect()
    }

    /// Running session whose balls are exactly `values`
    fn running_with(values: &[u32]) -> Session {
        let mut session = Session::new(Viewport::new(800.0, 600.0), 5);
        session.start();
        session.balls = balls(values);
        session
    }

    #[test]
    fn test_choose_needs_two_composites() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(choose(&balls(&[2, 3, 5, 4]), &mut rng).is_none());
        assert!(choose(&balls(&[4, 6]), &mut rng).is_some());
    }

    #[test]
    fn test_choose_prefers_common_factor() {
        // 25/49 share nothing; 8/12 share 4
        let pool = balls(&[25, 49, 8, 12, 7]);
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let c = choose(&pool, &mut rng).unwrap();
            assert!(c.g > 1, "seed {seed} picked coprime pair {c:?}");
        }
    }

    #[test]
    fn test_choose_falls_back_to_coprime_pair() {
        let mut rng = Pcg32::seed_from_u64(9);
        let c = choose(&balls(&[25, 49]), &mut rng).unwrap();
        assert_eq!(c.g, 1);
        assert_eq!((c.a, c.b), (25, 49));
    }

    #[test]
    fn test_choose_skips_hit_balls() {
        let mut pool = balls(&[4, 6, 9]);
        pool[0].hit = true;
        let mut rng = Pcg32::seed_from_u64(2);
        let c = choose(&pool, &mut rng).unwrap();
        assert_eq!((c.a, c.b, c.g), (6, 9, 3));
    }

    #[test]
    fn test_validate_and_parse() {
        let c = GcfChallenge { a: 8, b: 12, g: 4 };
        assert!(validate(4.0, &c).correct);
        assert!(!validate(2.0, &c).correct);
        assert!(validate(9.0, &c).too_big);
        assert_eq!(validate(f64::NAN, &c), GcfVerdict::inconclusive());
        assert_eq!(validate(f64::INFINITY, &c), GcfVerdict::inconclusive());

        assert_eq!(parse_answer(" 4 "), Some(4.0));
        assert_eq!(parse_answer("12abc"), Some(12.0));
        assert_eq!(parse_answer("-3"), Some(-3.0));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("   "), None);
        assert_eq!(parse_answer("abc"), None);
    }

    #[test]
    fn test_message() {
        let c = GcfChallenge { a: 8, b: 12, g: 4 };
        assert_eq!(c.message(), "4 is the greatest common factor of 8 and 12.");
    }

    #[test]
    fn test_correct_answer_locks_pair() {
        let mut session = running_with(&[8, 12, 7]);
        let challenge = session.request_gcf_challenge().unwrap();
        assert_eq!((challenge.a, challenge.b, challenge.g), (8, 12, 4));
        assert_eq!(session.phase, GamePhase::Paused);

        let verdict = session.submit_gcf_answer("4");
        assert!(verdict.correct && verdict.completes);
        assert_eq!(session.phase, GamePhase::Running);
        assert!(session.challenge.is_none());

        let win_r = session.viewport.win_radius();
        for value in [8, 12] {
            let b = session.ball(value).unwrap();
            assert!(b.locked && b.hit);
            assert_eq!(b.vel, Vec2::ZERO);
            assert_eq!(b.radius, win_r);
            assert_eq!(Some(b.pos), b.target);
        }
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::GcfSolved { a: 8, b: 12, g: 4 }));
    }

    #[test]
    fn test_wrong_and_blank_answers_keep_challenge() {
        let mut session = running_with(&[8, 12]);
        session.request_gcf_challenge().unwrap();

        let wrong = session.submit_gcf_answer("2");
        assert!(!wrong.correct && !wrong.completes);
        assert_eq!(session.submit_gcf_answer(""), GcfVerdict::inconclusive());
        assert_eq!(session.submit_gcf_value(f64::NAN), GcfVerdict::inconclusive());
        assert_eq!(session.phase, GamePhase::Paused);
        assert!(session.challenge.is_some());
        assert!(!session.ball(8).unwrap().hit);
    }

    #[test]
    fn test_request_rejected_when_not_allowed() {
        let mut idle = Session::new(Viewport::new(800.0, 600.0), 5);
        assert!(idle.request_gcf_challenge().is_none());

        let mut session = running_with(&[8, 12, 9]);
        let first = session.request_gcf_challenge();
        assert!(first.is_some());
        assert!(session.request_gcf_challenge().is_none());
        assert_eq!(session.challenge, first);

        let mut primes_only = running_with(&[2, 3, 4]);
        assert!(primes_only.request_gcf_challenge().is_none());
        assert_eq!(primes_only.phase, GamePhase::Running);
    }

    #[test]
    fn test_cancel_resumes_without_locking() {
        let mut session = running_with(&[8, 12]);
        session.request_gcf_challenge().unwrap();
        session.cancel_gcf_challenge();
        assert_eq!(session.phase, GamePhase::Running);
        assert!(session.challenge.is_none());
        assert!(session.balls.iter().all(|b| !b.hit && !b.locked));
        assert!(session.drain_events().contains(&GameEvent::GcfCancelled));
    }
}
