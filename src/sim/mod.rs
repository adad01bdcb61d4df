//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed physics step, one per frame
//! - Timers driven by the frame clock, never the wall clock
//! - No rendering or platform dependencies

pub mod animator;
pub mod autopilot;
pub mod customer;
pub mod drink;
pub mod physics;
pub mod recipe;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use animator::{Behavior, CharacterAnimator, Expression};
pub use autopilot::Autopilot;
pub use customer::{CustomerKind, CustomerQueue};
pub use drink::{Drink, Item, ItemKind, ServeStage};
pub use physics::{BodyId, BodyMaterial, BodyShape, PhysicsBackend, RapierWorld};
pub use recipe::{
    DrinkMeasure, Ledger, Meter, MeterStatus, Recipe, Tier, Verdict, rating, score_drink,
};
pub use schedule::{Deferred, Scheduler};
pub use snapshot::{CharacterView, ItemView, Meters, Snapshot};
pub use state::{
    EventOutbox, Feedback, GameEvent, GamePhase, GameState, ServeAnimation, ServePhase, SoundCue,
    Stage,
};
pub use tick::{Intent, apply_intent, check_drink, order_lines_revealed, tick};
