//! Game state and core simulation types
//!
//! One [`GameState`] is one shop session: the phase machine, the ledger, the
//! drink on the counter, both characters and the physics world.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animator::{Behavior, CharacterAnimator, Expression};
use super::customer::{CustomerKind, CustomerQueue};
use super::drink::Drink;
use super::physics::{PhysicsBackend, RapierWorld};
use super::recipe::{Ledger, Recipe, Tier, Verdict};
use super::schedule::Scheduler;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, barista walks in
    Opening,
    /// Customer walks up to the counter
    CustomerEnter,
    /// Customer places the order
    Ordering,
    /// Player builds the drink
    MakingDrink,
    /// Drink is handed over and the customer leaves
    ServingCustomer,
    /// Cup-only presentation; nothing transitions here
    ServeDrink,
    /// Shop closed
    GameEnd,
}

/// Sounds the adapter should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    BobaDrop,
    IceDrop,
    Serve,
    Verdict(Tier),
    SessionEnd,
    TeaPourStart,
    TeaPourStop,
    MilkPourStart,
    MilkPourStop,
}

/// Discrete things that happened during a tick or intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    CustomerArrived { customer: CustomerKind, recipe: Recipe },
    Scored { verdict: Verdict, earned: u32 },
    Sound(SoundCue),
}

/// Events waiting for the page to read them
///
/// Every tick and accepted intent is collected here; sound cues are handed
/// back for immediate playback, and the full list is kept until taken.
#[derive(Debug, Clone, Default)]
pub struct EventOutbox {
    pending: Vec<GameEvent>,
}

impl EventOutbox {
    /// Move the session's new events in and return the sound cues among them
    pub fn collect<P: PhysicsBackend>(&mut self, state: &mut GameState<P>) -> Vec<SoundCue> {
        let events = state.drain_events();
        let cues = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Sound(cue) => Some(*cue),
                _ => None,
            })
            .collect();
        self.pending.extend(events);
        cues
    }

    pub fn pending(&self) -> &[GameEvent] {
        &self.pending
    }

    /// Hand over everything collected since the last take
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Screen-space layout derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub viewport: Vec2,
    /// Narrow (phone) layout
    pub compact: bool,
    pub cup_center: Vec2,
    pub cup_width: f32,
    pub cup_height: f32,
    /// Where the customer stands at the counter
    pub customer_spot: Vec2,
}

impl Stage {
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let compact = width < COMPACT_BREAKPOINT;
        let (cup_width, cup_height, cup_drop) = if compact {
            (CUP_WIDTH_COMPACT, CUP_HEIGHT_COMPACT, 20.0)
        } else {
            (CUP_WIDTH, CUP_HEIGHT, 50.0)
        };
        let customer_spot = if compact {
            Vec2::new(width - 100.0, height - 60.0)
        } else {
            Vec2::new(width - 200.0, 280.0)
        };
        Self {
            viewport: Vec2::new(width, height),
            compact,
            cup_center: Vec2::new(width / 2.0, height / 2.0 + cup_drop),
            cup_width,
            cup_height,
            customer_spot,
        }
    }

    pub fn cup_top(&self) -> f32 {
        self.cup_center.y - self.cup_height / 2.0
    }

    pub fn cup_bottom(&self) -> f32 {
        self.cup_center.y + self.cup_height / 2.0
    }

    pub fn cup_left(&self) -> f32 {
        self.cup_center.x - self.cup_width / 2.0
    }

    pub fn cup_right(&self) -> f32 {
        self.cup_center.x + self.cup_width / 2.0
    }

    /// Strictly inside the cup: inset from the walls, between rim and floor
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x > self.cup_left() + CUP_INSET
            && pos.x < self.cup_right() - CUP_INSET
            && pos.y > self.cup_top()
            && pos.y < self.cup_bottom()
    }

    /// Highest tea/milk level
    pub fn liquid_max(&self) -> f32 {
        self.cup_height - LIQUID_HEADROOM
    }

    /// Customers appear here, off-screen right
    pub fn customer_start_x(&self) -> f32 {
        self.viewport.x + 100.0
    }

    /// Customers leave to here
    pub fn customer_exit_x(&self) -> f32 {
        self.viewport.x + 150.0
    }
}

/// Verdict banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub tier: Tier,
    pub text: String,
    pub ticks_left: u32,
}

/// Which leg of the hand-off animation is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServePhase {
    /// Drink shrinks and slides to the customer
    Handoff,
    /// Customer takes the drink
    Pickup,
    /// Customer walks off with it
    WalkOff,
    Complete,
}

/// Drink hand-off animation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServeAnimation {
    pub progress: f32,
    pub drink_pos: Vec2,
    pub drink_scale: f32,
    pub customer_x: f32,
}

impl ServeAnimation {
    pub fn start(stage: &Stage) -> Self {
        Self {
            progress: 0.0,
            drink_pos: stage.cup_center,
            drink_scale: 1.0,
            customer_x: stage.customer_spot.x,
        }
    }

    pub fn phase(&self) -> ServePhase {
        match self.progress {
            p if p < 0.3 => ServePhase::Handoff,
            p if p < 0.5 => ServePhase::Pickup,
            p if p < 1.0 => ServePhase::WalkOff,
            _ => ServePhase::Complete,
        }
    }
}

/// Complete session state
pub struct GameState<P: PhysicsBackend = RapierWorld> {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub stage: Stage,
    /// Current phase
    pub phase: GamePhase,
    /// Time in the current phase
    pub state_timer_ms: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ledger: Ledger,
    pub customers_served: u32,
    pub customer: CustomerKind,
    pub recipe: Recipe,
    /// Customer x during entry and exit
    pub customer_x: f32,
    pub drink: Drink,
    pub barista: CharacterAnimator,
    pub customer_animator: CharacterAnimator,
    pub serve_animation: ServeAnimation,
    pub feedback: Option<Feedback>,
    pub scheduler: Scheduler,
    pub(crate) queue: CustomerQueue,
    pub(crate) physics: P,
    events: Vec<GameEvent>,
}

impl GameState<RapierWorld> {
    /// Create a session for a viewport with default tuning
    pub fn new(seed: u64, viewport_width: f32, viewport_height: f32) -> Self {
        Self::with_physics(
            seed,
            Stage::from_viewport(viewport_width, viewport_height),
            Tuning::default(),
            RapierWorld::new(),
        )
    }
}

impl<P: PhysicsBackend> GameState<P> {
    pub fn with_physics(seed: u64, stage: Stage, tuning: Tuning, mut physics: P) -> Self {
        physics.build_cup(&stage);
        let mut rng = Pcg32::seed_from_u64(seed);
        let barista = CharacterAnimator::new(&mut rng);
        let customer_animator = CharacterAnimator::new(&mut rng);

        let mut state = Self {
            seed,
            rng,
            tuning,
            stage,
            phase: GamePhase::Opening,
            state_timer_ms: 0.0,
            time_ticks: 0,
            ledger: Ledger::default(),
            customers_served: 0,
            customer: CustomerKind::Cat,
            recipe: Recipe::default(),
            customer_x: stage.customer_start_x(),
            drink: Drink::default(),
            barista,
            customer_animator,
            serve_animation: ServeAnimation::start(&stage),
            feedback: None,
            scheduler: Scheduler::new(),
            queue: CustomerQueue::new(),
            physics,
            events: Vec::new(),
        };
        state.enter_phase(GamePhase::Opening);
        log::info!("Session started with seed {}", seed);
        state
    }

    /// Read access to the physics backend
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Queue an event for the adapter
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move to another phase. Always restarts the phase timer.
    pub fn change_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.state_timer_ms = 0.0;
        self.emit(GameEvent::PhaseChanged { from, to });
        self.enter_phase(to);
    }

    fn enter_phase(&mut self, phase: GamePhase) {
        match phase {
            GamePhase::Opening => {
                self.barista.set_state(Behavior::Walk, Expression::Happy);
            }
            GamePhase::CustomerEnter => {
                self.customer = self.queue.pop_next(&mut self.rng);
                self.recipe = Recipe::generate(&mut self.rng);
                self.customer_x = self.stage.customer_start_x();
                self.customer_animator
                    .set_state(Behavior::Walk, Expression::Neutral);
                log::info!(
                    "Customer {} wants {} boba, {}% tea, {}% milk",
                    self.customer.as_str(),
                    self.recipe.boba_target,
                    self.recipe.tea_percent_target,
                    self.recipe.milk_percent_target
                );
                self.emit(GameEvent::CustomerArrived {
                    customer: self.customer,
                    recipe: self.recipe,
                });
            }
            GamePhase::MakingDrink => {
                self.barista.set_state(Behavior::Idle, Expression::Neutral);
                self.customer_animator
                    .set_state(Behavior::Waiting, Expression::Neutral);
            }
            GamePhase::ServingCustomer => {
                self.serve_animation = ServeAnimation::start(&self.stage);
            }
            GamePhase::GameEnd => {
                log::info!(
                    "Shop closed: {} served, score {}, money ${}",
                    self.customers_served,
                    self.ledger.total_score,
                    self.ledger.money
                );
                self.emit(GameEvent::Sound(SoundCue::SessionEnd));
            }
            GamePhase::Ordering | GamePhase::ServeDrink => {}
        }
    }

    /// Equivalent of reloading the page: a fresh session on the same stage.
    /// Timers scheduled by the old session are invalidated.
    pub fn reload(&mut self, seed: u64) {
        self.drink.reset(&mut self.physics);
        self.scheduler.advance_epoch();
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.barista = CharacterAnimator::new(&mut self.rng);
        self.customer_animator = CharacterAnimator::new(&mut self.rng);
        self.ledger = Ledger::default();
        self.customers_served = 0;
        self.recipe = Recipe::default();
        self.queue = CustomerQueue::new();
        self.customer_x = self.stage.customer_start_x();
        self.serve_animation = ServeAnimation::start(&self.stage);
        self.feedback = None;
        self.time_ticks = 0;
        self.events.clear();
        self.change_phase(GamePhase::Opening);
        log::info!("Session reloaded with seed {}", seed);
    }

    /// Whether the session has served everyone
    pub fn is_finished(&self) -> bool {
        self.customers_served >= self.tuning.max_customers
    }
}
