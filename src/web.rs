//! Browser bindings
//!
//! Thin wasm-bindgen wrapper so the JavaScript UI layer (canvas drawing, the
//! GCF modal, audio) can drive a `Session` and read JSON snapshots back.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{ClickOutcome, Session, Viewport};

#[wasm_bindgen]
pub struct PrimePop {
    session: Session,
}

#[wasm_bindgen]
impl PrimePop {
    /// `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, settings_json: &str) -> PrimePop {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json_or_default(settings_json)
        };
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        log::info!("Prime Pop session created with seed {}", seed);
        PrimePop {
            session: Session::with_settings(Viewport::new(width, height), seed, settings),
        }
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(Viewport::new(width, height));
    }

    /// Returns "none", "wrong" or "prime"
    pub fn click(&mut self, x: f32, y: f32) -> String {
        match self.session.register_click(Vec2::new(x, y)) {
            ClickOutcome::None => "none",
            ClickOutcome::WrongClick { .. } => "wrong",
            ClickOutcome::PrimeHit { .. } => "prime",
        }
        .to_string()
    }

    /// `dt` in seconds since the previous frame
    pub fn update(&mut self, dt: f32) {
        self.session.update(dt);
    }

    /// Challenge as JSON, or empty string when none could be opened
    pub fn request_gcf(&mut self) -> String {
        self.session
            .request_gcf_challenge()
            .and_then(|c| serde_json::to_string(&c).ok())
            .unwrap_or_default()
    }

    /// Verdict as JSON (`correct`, `completes`, `too_big`)
    pub fn submit_gcf(&mut self, raw: &str) -> String {
        let verdict = self.session.submit_gcf_answer(raw);
        serde_json::to_string(&verdict).unwrap_or_default()
    }

    pub fn cancel_gcf(&mut self) {
        self.session.cancel_gcf_challenge();
    }

    pub fn hint(&mut self) -> bool {
        self.session.request_hint()
    }

    pub fn elapsed(&self) -> f64 {
        self.session.elapsed()
    }

    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
    }

    /// Pending notifications as a JSON array
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_default()
    }
}
