//! Boba Shop entry point
//!
//! On the web this exposes a `WebGame` handle that the page drives once per
//! animation frame. Natively it runs a headless attract-mode session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use boba_shop::Settings;
    use boba_shop::audio::AudioManager;
    use boba_shop::input::{self, ControlLayout};
    use boba_shop::sim::{Autopilot, EventOutbox, GameState, Intent, Snapshot, apply_intent, tick};

    /// Longest frame we simulate; longer gaps (tab switches) are clamped
    const MAX_FRAME_MS: f32 = 100.0;

    /// Game instance owned by the page
    #[wasm_bindgen]
    pub struct WebGame {
        state: GameState,
        layout: ControlLayout,
        settings: Settings,
        audio: AudioManager,
        attract: Option<Autopilot>,
        outbox: EventOutbox,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(width: f32, height: f32) -> WebGame {
            let seed = js_sys::Date::now() as u64;
            let settings = Settings::load();
            let audio = AudioManager::new(&settings);
            log::info!("Boba Shop {}x{} seed {}", width, height, seed);
            WebGame {
                state: GameState::new(seed, width, height),
                layout: ControlLayout::from_viewport(width, height),
                settings,
                audio,
                attract: None,
                outbox: EventOutbox::default(),
            }
        }

        /// Advance one animation frame
        pub fn frame(&mut self, dt_ms: f32) {
            let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_MS);
            if let Some(pilot) = &mut self.attract {
                let snap = Snapshot::capture(&self.state);
                for intent in pilot.decide(&snap) {
                    apply_intent(&mut self.state, intent);
                }
            }
            tick(&mut self.state, dt_ms);

            self.flush_events();
        }

        pub fn pointer_down(&mut self, x: f32, y: f32) {
            // First gesture unlocks audio
            self.audio.resume();
            if let Some(intent) = self.layout.pointer_down(self.state.phase, Vec2::new(x, y)) {
                self.apply(intent);
            }
        }

        pub fn pointer_up(&mut self) {
            for intent in input::pointer_up() {
                self.apply(intent);
            }
        }

        pub fn key_down(&mut self, code: &str) {
            if let Some(intent) = input::key_down(self.state.phase, code) {
                self.apply(intent);
            }
        }

        pub fn key_up(&mut self, code: &str) {
            if let Some(intent) = input::key_up(code) {
                self.apply(intent);
            }
        }

        /// Current frame as JSON for the renderer
        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&Snapshot::capture(&self.state)).unwrap_or_default()
        }

        /// Events since the last call (frames and input), as JSON; drains
        pub fn take_events_json(&mut self) -> String {
            serde_json::to_string(&self.outbox.take()).unwrap_or_default()
        }

        pub fn set_attract_mode(&mut self, on: bool) {
            self.attract = on.then(Autopilot::new);
            log::info!("Attract mode: {}", on);
        }

        pub fn reload(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state.reload(seed);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.audio.set_muted(muted);
        }

        /// Window focus changed; mutes on blur when the player asked for it
        pub fn set_focused(&mut self, focused: bool) {
            if self.settings.mute_on_blur {
                self.audio.set_muted(!focused);
            }
        }

        pub fn settings_json(&self) -> String {
            serde_json::to_string(&self.settings).unwrap_or_default()
        }

        /// Replace settings from JSON and persist them
        pub fn update_settings(&mut self, json: &str) {
            self.settings = Settings::from_json(json);
            self.settings.save();
            self.audio.apply_settings(&self.settings);
        }
    }

    impl WebGame {
        fn apply(&mut self, intent: Intent) {
            if apply_intent(&mut self.state, intent) {
                // Input-driven cues play right away, not on the next frame
                self.flush_events();
            }
        }

        fn flush_events(&mut self) {
            for cue in self.outbox.collect(&mut self.state) {
                self.audio.play(cue);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Boba Shop (web) starting...");
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use boba_shop::Tuning;
    use boba_shop::consts::FRAME_MS;
    use boba_shop::sim::{
        Autopilot, GamePhase, GameState, RapierWorld, Snapshot, Stage, apply_intent, rating, tick,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Boba Shop (native) starting headless attract-mode session...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xB0BA);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let mut state = GameState::with_physics(
        seed,
        Stage::from_viewport(1280.0, 800.0),
        tuning,
        RapierWorld::new(),
    );
    let mut pilot = Autopilot::new();

    // Ten simulated minutes is far longer than any session needs
    let limit = (600_000.0 / FRAME_MS) as u64;
    while state.phase != GamePhase::GameEnd && state.time_ticks < limit {
        let snap = Snapshot::capture(&state);
        for intent in pilot.decide(&snap) {
            apply_intent(&mut state, intent);
        }
        tick(&mut state, FRAME_MS);
        state.drain_events();
    }

    if state.phase != GamePhase::GameEnd {
        log::warn!("Session did not finish within {} ticks", limit);
    }
    println!(
        "Served {} customers in {:.1}s: score {}, money ${} - {}",
        state.customers_served,
        state.time_ticks as f32 * FRAME_MS / 1000.0,
        state.ledger.total_score,
        state.ledger.money,
        rating(state.ledger.total_score)
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
