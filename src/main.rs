//! Prime Pop entry point
//!
//! On the web, installs logging and hands control to the JavaScript UI layer.
//! Natively, plays one headless round and prints the final snapshot as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Prime Pop starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Prime Pop (native) starting...");
    log::info!("Native mode runs a headless demo - serve the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let snapshot = demo::play(seed);
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use prime_pop::sim::{GameEvent, GamePhase, Session, Snapshot, Viewport};

    const FRAME: f32 = 1.0 / 60.0;
    /// Frames between simulated clicks
    const CLICK_EVERY: usize = 20;
    const MAX_FRAMES: usize = 60 * 60 * 5;

    /// Autoplay: click a prime every few frames, solve one GCF challenge
    /// along the way, then let the win grid settle.
    pub fn play(seed: u64) -> Snapshot {
        let mut session = Session::new(Viewport::new(1280.0, 800.0), seed);
        session.start();
        let mut solved_gcf = false;

        for frame in 0..MAX_FRAMES {
            session.update(FRAME);

            if session.phase == GamePhase::Running && frame % CLICK_EVERY == 0 {
                if !solved_gcf && session.frontier >= 20 {
                    if let Some(challenge) = session.request_gcf_challenge() {
                        let verdict = session.submit_gcf_answer(&challenge.g.to_string());
                        solved_gcf = verdict.completes;
                    }
                }
                if let Some(target) = next_prime(&session) {
                    session.register_click(target);
                }
            }

            for event in session.drain_events() {
                match event {
                    GameEvent::Won { elapsed } => log::info!("Won in {:.1}s", elapsed),
                    GameEvent::GcfSolved { a, b, g } => {
                        log::info!("{} is the greatest common factor of {} and {}.", g, a, b)
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            if session.phase == GamePhase::WinArranging && frame % 60 == 0 {
                let settled = session.balls.iter().all(|b| {
                    b.target.is_none_or(|t| b.pos.distance(t) < 0.5)
                });
                if settled {
                    break;
                }
            }
        }

        session.snapshot()
    }

    fn next_prime(session: &Session) -> Option<Vec2> {
        session
            .balls
            .iter()
            .filter(|b| b.is_prime() && !b.hit)
            .min_by_key(|b| b.value)
            .map(|b| b.pos)
    }
}
