//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied time only (no wall clock reads)
//! - Seeded RNG only
//! - Stable iteration order (ball creation order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod gcf;
pub mod layout;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use collision::{CollisionResult, circle_overlap, reflect_velocity};
pub use gcf::{GcfChallenge, GcfVerdict};
pub use layout::{GridMetrics, Layout, compute_layout};
pub use motion::SpeedBands;
pub use state::{
    Ball, BallView, ClickOutcome, EffectView, GameEvent, GamePhase, HintKind, Progress, Session,
    Snapshot, SpiralEffect, Viewport,
};
pub use tick::{ClickTarget, resolve_click};
