//! Boba Shop - A cozy boba tea shop arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, fill model, scoring, physics)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `input`: Pointer/key translation into simulation intents
//! - `audio`: Web Audio playback of sound cues (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Baseline frame duration the per-tick rates are tuned for (60 Hz)
    pub const FRAME_MS: f32 = 16.67;
    /// Physics timestep, one step per rendered frame
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Downward gravity in pixels/s² (screen coordinates, +y is down)
    pub const GRAVITY: f32 = 1000.0;
    /// Pixels per physics length unit
    pub const PIXELS_PER_UNIT: f32 = 100.0;

    /// Session length
    pub const MAX_CUSTOMERS: u32 = 5;
    /// Hard cap on items inside the cup
    pub const MAX_ITEMS: usize = 35;

    /// Cup geometry (regular layout)
    pub const CUP_WIDTH: f32 = 200.0;
    pub const CUP_HEIGHT: f32 = 350.0;
    /// Cup geometry (compact layout, viewport narrower than the breakpoint)
    pub const CUP_WIDTH_COMPACT: f32 = 160.0;
    pub const CUP_HEIGHT_COMPACT: f32 = 280.0;
    pub const COMPACT_BREAKPOINT: f32 = 768.0;
    /// Wall thickness of the static cup bodies
    pub const WALL_THICKNESS: f32 = 20.0;
    /// Liquid headroom: fill levels stop this far below the rim
    pub const LIQUID_HEADROOM: f32 = 20.0;
    /// Horizontal inset for the in-cup test
    pub const CUP_INSET: f32 = 10.0;

    /// Fill rate per tick while a pour is held
    pub const POUR_RATE: f32 = 0.3;
    /// Straw insertion progress per tick
    pub const STRAW_RATE: f32 = 0.02;
    /// Mixing progress per tick
    pub const MIX_RATE: f32 = 0.015;
    /// Serve hand-off animation progress per tick
    pub const SERVE_RATE: f32 = 0.008;

    /// Delay between scoring and the serving animation (wall clock)
    pub const VERDICT_DELAY_MS: f32 = 1500.0;
    /// How long the verdict banner stays up
    pub const FEEDBACK_TICKS: u32 = 120;
    /// Opening screen gate before the start button accepts input
    pub const START_GATE_MS: f32 = 2000.0;
    /// Customer walk-in duration
    pub const ENTRY_MS: f32 = 2000.0;
    /// Opening walk-in duration for the barista
    pub const OPENING_WALK_MS: f32 = 3000.0;
    /// Tea/milk match tolerance in percentage points
    pub const TOLERANCE_PERCENT: f32 = 5.0;

    /// Boba pearl
    pub const BOBA_RADIUS: f32 = 12.0;
    /// Ice cube edge length
    pub const ICE_SIZE: f32 = 20.0;
    /// Items spawn this far above the rim
    pub const DROP_HEIGHT: f32 = 50.0;
    /// Horizontal drop jitter (either side of the cup centre)
    pub const DROP_JITTER: f32 = 50.0;
}

/// Easing curves for the scripted animations (input and output in 0..=1)
pub mod easing {
    #[inline]
    pub fn ease_in_out(t: f32) -> f32 {
        if t < 0.5 {
            2.0 * t * t
        } else {
            -1.0 + (4.0 - 2.0 * t) * t
        }
    }

    #[inline]
    pub fn ease_out(t: f32) -> f32 {
        t * (2.0 - t)
    }

    #[inline]
    pub fn ease_in(t: f32) -> f32 {
        t * t
    }

    /// Overshooting spring used for the verdict banner pop
    #[inline]
    pub fn elastic(t: f32) -> f32 {
        if t <= 0.0 || t >= 1.0 {
            return t.clamp(0.0, 1.0);
        }
        2f32.powf(-10.0 * t) * ((t - 0.1) * 5.0 * std::f32::consts::PI).sin() + 1.0
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_curves_hit_endpoints() {
            for f in [ease_in_out, ease_out, ease_in, elastic] {
                assert!(f(0.0).abs() < 1e-6);
                assert!((f(1.0) - 1.0).abs() < 1e-6);
            }
        }

        #[test]
        fn test_ease_out_is_ahead_of_linear() {
            assert!(ease_out(0.25) > 0.25);
            assert!(ease_in(0.25) < 0.25);
        }
    }
}
