//! Game state and core simulation types
//!
//! Everything a frame needs lives in one `Session` owned by the host.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::gcf::GcfChallenge;
use super::layout::GridMetrics;
use super::motion::SpeedBands;
use super::spawn;
use crate::consts::*;
use crate::settings::Settings;
use crate::{ease_out_cubic, is_prime};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Balls built, waiting for the Start button
    Idle,
    /// Active gameplay
    Running,
    /// Frozen while a GCF challenge is open
    Paused,
    /// All revealed primes clicked; balls gliding into the sorted grid
    WinArranging,
}

/// Playfield dimensions (CSS pixels) plus the header strip derived from them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Reserved strip at the top; balls never enter it
    pub header_h: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let font_size = (width.min(height) * 0.024).max(14.0);
        Self {
            width,
            height,
            header_h: font_size * 2.2 + 8.0,
        }
    }

    #[inline]
    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Base radius for balls created at this size
    pub fn base_ball_radius(&self) -> f32 {
        (self.min_dim() * BALL_RADIUS_RATIO)
            .floor()
            .clamp(MIN_BALL_RADIUS, MAX_BALL_RADIUS)
    }

    /// Radius every ball grows to during the win arrangement
    pub fn win_radius(&self) -> f32 {
        (self.width / WIN_RADIUS_DIVISOR).floor().max(WIN_RADIUS_MIN)
    }
}

/// Entrance scale for a ball `elapsed` seconds after it was revealed
pub fn growth_scale(spawn_scale: f32, elapsed: f64, duration: f64) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    let t = (elapsed / duration).clamp(0.0, 1.0) as f32;
    spawn_scale - (spawn_scale - 1.0) * ease_out_cubic(t)
}

/// One number in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub value: u32,
    pub pos: Vec2,
    /// Pixels per frame at the 60 Hz baseline
    pub vel: Vec2,
    /// Base radius (before entrance scaling)
    pub radius: f32,
    /// Session time the entrance animation started (None = not animating)
    pub born_at: Option<f64>,
    pub spawn_scale: f32,
    pub grow_duration: f64,
    /// Correctly clicked (primes) or solved in a GCF challenge; immobile
    pub hit: bool,
    /// Solved in a GCF challenge; already sitting at its grid cell
    pub locked: bool,
    /// Win-grid target center
    pub target: Option<Vec2>,
    pub target_radius: Option<f32>,
}

impl Ball {
    pub fn new(value: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            value,
            pos,
            vel,
            radius,
            born_at: None,
            spawn_scale: 1.0,
            grow_duration: 0.0,
            hit: false,
            locked: false,
            target: None,
            target_radius: None,
        }
    }

    /// Current entrance multiplier on the base radius
    pub fn growth_scale(&self, now: f64) -> f32 {
        match self.born_at {
            Some(born) => growth_scale(self.spawn_scale, now - born, self.grow_duration),
            None => 1.0,
        }
    }

    /// Radius used for collisions, spawning, hit tests and drawing
    #[inline]
    pub fn scaled_radius(&self, now: f64) -> f32 {
        self.radius * self.growth_scale(now)
    }

    #[inline]
    pub fn is_prime(&self) -> bool {
        is_prime(self.value)
    }

    /// Clicked primes stay put and deflect everything else
    #[inline]
    pub fn is_bumper(&self) -> bool {
        self.hit && self.is_prime()
    }

    /// Candidate for the GCF challenge
    #[inline]
    pub fn is_composite_candidate(&self) -> bool {
        !self.hit && self.value > 1 && !self.is_prime()
    }

    /// Stop the entrance animation at full size
    pub fn settle(&mut self) {
        self.born_at = None;
        self.spawn_scale = 1.0;
    }
}

/// Spiral shown where a prime was clicked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiralEffect {
    pub pos: Vec2,
    pub started_at: f64,
    pub duration: f64,
    pub start_radius: f32,
    pub turns: f32,
}

impl SpiralEffect {
    /// 0 at creation, 1 once expired
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn expired(&self, now: f64) -> bool {
        now - self.started_at >= self.duration
    }
}

/// Notifications for the UI layer (sound, speech, modal open/close)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    SessionStarted,
    /// `final_prime` is set on the click that wins; the win sound replaces the prime sound
    PrimeHit { value: u32, final_prime: bool },
    WrongClick { value: u32 },
    FrontierExpanded { from: u32, to: u32 },
    Won { elapsed: f64 },
    GcfOpened { a: u32, b: u32 },
    GcfSolved { a: u32, b: u32, g: u32 },
    GcfCancelled,
    HintShown,
}

/// Result of routing a click through the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// Empty space, or the session was not accepting clicks
    None,
    WrongClick { value: u32 },
    PrimeHit { value: u32 },
}

/// Which hint colour a ball takes; evens win over multiples of three
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HintKind {
    MultipleOfTwo,
    MultipleOfThree,
}

impl HintKind {
    pub fn for_value(value: u32) -> Option<Self> {
        if value % 2 == 0 {
            Some(Self::MultipleOfTwo)
        } else if value % 3 == 0 {
            Some(Self::MultipleOfThree)
        } else {
            None
        }
    }
}

/// Ball as seen by the renderer
#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub value: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub hit: bool,
    pub locked: bool,
    pub prime: bool,
    /// Set while the hint is showing
    pub highlight: Option<HintKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub x: f32,
    pub y: f32,
    /// Current outer radius (shrinks to zero)
    pub radius: f32,
    pub turns: f32,
    pub progress: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub clicked_primes: usize,
    pub total_primes: usize,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub balls: Vec<BallView>,
    pub effects: Vec<EffectView>,
    pub frontier: u32,
    pub wrong_clicks: u32,
    pub elapsed: f64,
    pub progress: Progress,
    pub grid: Option<GridMetrics>,
    pub challenge: Option<GcfChallenge>,
    pub hint_active: bool,
    pub won: bool,
}

/// Complete game session (single owner, driven by the host frame loop)
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    pub viewport: Viewport,
    pub bands: SpeedBands,
    pub phase: GamePhase,
    /// Creation order; later balls draw on top
    pub balls: Vec<Ball>,
    /// Highest value revealed so far
    pub frontier: u32,
    pub clock: Clock,
    pub wrong_clicks: u32,
    pub challenge: Option<GcfChallenge>,
    pub effects: Vec<SpiralEffect>,
    pub grid: Option<GridMetrics>,
    pub hint_until: Option<f64>,
    /// Grows until the host calls `drain_events`, once per frame
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    /// Create an idle session with the default tuning
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self::with_settings(viewport, seed, Settings::default())
    }

    pub fn with_settings(viewport: Viewport, seed: u64, settings: Settings) -> Self {
        let bands = SpeedBands::for_viewport(&viewport, &settings);
        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            viewport,
            bands,
            phase: GamePhase::Idle,
            balls: Vec::new(),
            frontier: INITIAL_FRONTIER,
            clock: Clock::new(),
            wrong_clicks: 0,
            challenge: None,
            effects: Vec::new(),
            grid: None,
            hint_until: None,
            events: Vec::new(),
        };
        session.build_initial_balls();
        session
    }

    /// Replace the ball set with the unanimated starting values
    pub(crate) fn build_initial_balls(&mut self) {
        self.balls.clear();
        self.frontier = INITIAL_FRONTIER;
        for value in FIRST_VALUE..=INITIAL_FRONTIER {
            self.add_ball(value, false);
        }
    }

    /// Spawn `value` at a free spot with a random heading near target speed
    pub(crate) fn add_ball(&mut self, value: u32, animate: bool) {
        let now = self.clock.now();
        let base_r = self.viewport.base_ball_radius();
        let spawn_scale = if animate { self.settings.spawn_scale } else { 1.0 };
        let r_eff = base_r * spawn_scale;

        let occupied: Vec<(Vec2, f32)> = self
            .balls
            .iter()
            .map(|b| (b.pos, b.scaled_radius(now)))
            .collect();
        let pos = spawn::place(&occupied, r_eff, &self.viewport, &mut self.rng);

        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let jitter = self.settings.spawn_speed_jitter;
        let speed = if jitter > 0.0 {
            self.bands.target * self.rng.random_range(1.0 - jitter..1.0 + jitter)
        } else {
            self.bands.target
        };
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;

        let mut ball = Ball::new(value, pos, vel, base_r);
        if animate {
            ball.born_at = Some(now);
            ball.spawn_scale = spawn_scale;
            ball.grow_duration = self.settings.grow_duration;
        }
        self.balls.push(ball);
    }

    pub fn ball(&self, value: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.value == value)
    }

    pub(crate) fn ball_index(&self, value: u32) -> Option<usize> {
        self.balls.iter().position(|b| b.value == value)
    }

    /// Seconds on the player's clock: pause-aware, penalties included, frozen once won
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn progress(&self) -> Progress {
        let total_primes = self.balls.iter().filter(|b| b.is_prime()).count();
        let clicked_primes = self.balls.iter().filter(|b| b.is_bumper()).count();
        Progress {
            clicked_primes,
            total_primes,
        }
    }

    /// True while the "2, 3" highlight is showing
    pub fn hint_active(&self) -> bool {
        self.hint_until.is_some_and(|until| self.clock.now() < until)
    }

    /// Take all notifications raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        let hint = self.hint_active();
        let balls = self
            .balls
            .iter()
            .map(|b| BallView {
                value: b.value,
                x: b.pos.x,
                y: b.pos.y,
                radius: b.scaled_radius(now),
                hit: b.hit,
                locked: b.locked,
                prime: b.is_prime(),
                highlight: if hint && !b.locked {
                    HintKind::for_value(b.value)
                } else {
                    None
                },
            })
            .collect();
        let effects = self
            .effects
            .iter()
            .map(|fx| {
                let p = fx.progress(now);
                EffectView {
                    x: fx.pos.x,
                    y: fx.pos.y,
                    radius: fx.start_radius * (1.0 - p),
                    turns: fx.turns,
                    progress: p,
                }
            })
            .collect();

        Snapshot {
            phase: self.phase,
            balls,
            effects,
            frontier: self.frontier,
            wrong_clicks: self.wrong_clicks,
            elapsed: self.elapsed(),
            progress: self.progress(),
            grid: self.grid,
            challenge: self.challenge,
            hint_active: hint,
            won: self.phase == GamePhase::WinArranging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle_with_two_to_ten() {
        let session = Session::new(Viewport::new(800.0, 600.0), 7);
        assert_eq!(session.phase, GamePhase::Idle);
        assert_eq!(session.frontier, 10);
        let values: Vec<u32> = session.balls.iter().map(|b| b.value).collect();
        assert_eq!(values, (2..=10).collect::<Vec<_>>());
        assert!(session.balls.iter().all(|b| b.radius > 0.0 && !b.hit));
        assert_eq!(session.elapsed(), 0.0);
    }

    #[test]
    fn test_viewport_metrics() {
        let vp = Viewport::new(375.0, 667.0);
        // font = max(14, 9.0) = 14 -> header = 38.8
        assert!((vp.header_h - 38.8).abs() < 1e-4);
        assert_eq!(vp.base_ball_radius(), 14.0);
        assert_eq!(vp.win_radius(), 11.0);

        let big = Viewport::new(1920.0, 1080.0);
        assert_eq!(big.base_ball_radius(), 23.0);
        assert_eq!(big.win_radius(), 60.0);
    }

    #[test]
    fn test_growth_scale_decays_to_one() {
        assert_eq!(growth_scale(3.0, 0.0, 6.0), 3.0);
        assert_eq!(growth_scale(3.0, 6.0, 6.0), 1.0);
        assert_eq!(growth_scale(3.0, 60.0, 6.0), 1.0);
        let mid = growth_scale(3.0, 3.0, 6.0);
        assert!(mid > 1.0 && mid < 2.0, "ease-out should be past halfway: {mid}");
    }

    #[test]
    fn test_bumper_requires_hit_prime() {
        let mut ball = Ball::new(7, Vec2::ZERO, Vec2::ZERO, 14.0);
        assert!(!ball.is_bumper());
        ball.hit = true;
        assert!(ball.is_bumper());

        let mut composite = Ball::new(8, Vec2::ZERO, Vec2::ZERO, 14.0);
        assert!(composite.is_composite_candidate());
        composite.hit = true;
        assert!(!composite.is_bumper());
        assert!(!composite.is_composite_candidate());
    }

    #[test]
    fn test_snapshot_progress_counts_revealed_primes() {
        let mut session = Session::new(Viewport::new(800.0, 600.0), 1);
        session.balls[0].hit = true; // value 2
        let snap = session.snapshot();
        assert_eq!(snap.progress.total_primes, 4);
        assert_eq!(snap.progress.clicked_primes, 1);
        assert!(!snap.won);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Session::new(Viewport::new(800.0, 600.0), 99999);
        let b = Session::new(Viewport::new(800.0, 600.0), 99999);
        for (x, y) in a.balls.iter().zip(&b.balls) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
    }
}
