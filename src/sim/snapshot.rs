//! Read-only view of a session for renderers and bots
//!
//! A [`Snapshot`] is captured after each tick and owns all of its data, so a
//! renderer (or the autopilot) never holds a borrow of the live state.

use glam::Vec2;
use serde::Serialize;

use super::animator::{Behavior, CharacterAnimator, Expression};
use super::customer::CustomerKind;
use super::drink::{ItemKind, ServeStage};
use super::physics::PhysicsBackend;
use super::recipe::{Meter, Recipe, rating};
use super::state::{Feedback, GamePhase, GameState, ServePhase};
use super::tick::{SERVE_TRANSITION, order_lines_revealed};
use crate::consts::OPENING_WALK_MS;
use crate::easing;

/// Ticks the verdict banner takes to pop in
const BANNER_POP_TICKS: f32 = 20.0;

/// Everything a renderer needs to draw one character
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CharacterView {
    pub behavior: Behavior,
    pub expression: Expression,
    pub state_ticks: f32,
    pub idle_offset: Vec2,
    pub breathe_scale: f32,
    pub blinking: bool,
    pub ear_rotation: f32,
    pub bounce_y: f32,
    pub squash: Vec2,
}

impl CharacterView {
    fn of(anim: &CharacterAnimator) -> Self {
        Self {
            behavior: anim.behavior(),
            expression: anim.expression(),
            state_ticks: anim.state_ticks(),
            idle_offset: anim.idle_offset(),
            breathe_scale: anim.breathe_scale(),
            blinking: anim.is_blinking(),
            ear_rotation: anim.ear_rotation(),
            bounce_y: anim.bounce_y(),
            squash: anim.squash(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemView {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub in_cup: bool,
}

/// Progress meters shown beside the cup
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Meters {
    pub items: Meter,
    pub tea: Meter,
    pub milk: Meter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub state_timer_ms: f32,
    pub time_ticks: u64,

    pub money: u32,
    pub combo_streak: u32,
    pub customers_served: u32,
    pub max_customers: u32,
    pub total_score: u32,

    pub cup_center: Vec2,
    pub cup_width: f32,
    pub cup_height: f32,
    pub fill_height: f32,
    pub milk_height: f32,
    pub tea_percent: f32,
    pub milk_percent: f32,
    pub pouring_tea: bool,
    pub pouring_milk: bool,
    pub items: Vec<ItemView>,
    pub items_in_cup: u32,

    pub serve_stage: ServeStage,
    pub straw_progress: f32,
    pub mix_progress: f32,
    /// Scored and waiting for the hand-off
    pub verdict_pending: bool,

    pub customer: CustomerKind,
    pub customer_x: f32,
    pub recipe: Recipe,
    pub meters: Meters,
    /// Lines of the order bubble currently shown (0..=3)
    pub order_lines: usize,

    /// Barista walk-in, 0..=1
    pub opening_progress: f32,
    pub start_available: bool,

    pub barista: CharacterView,
    pub customer_view: CharacterView,

    pub feedback: Option<Feedback>,
    /// Banner pop-in scale, springs from 0 to 1 over the first ticks
    pub feedback_scale: f32,

    pub serve_phase: ServePhase,
    pub serve_progress: f32,
    pub serve_drink_pos: Vec2,
    pub serve_drink_scale: f32,

    /// End-of-session rating, only once the shop has closed
    pub rating: Option<&'static str>,
}

impl Snapshot {
    pub fn capture<P: PhysicsBackend>(state: &GameState<P>) -> Self {
        let stage = &state.stage;
        let drink = &state.drink;
        let measure = drink.measure(stage);
        let recipe = state.recipe;

        let items = drink
            .items
            .iter()
            .map(|item| ItemView {
                kind: item.kind,
                pos: item.pos,
                in_cup: stage.contains(item.pos),
            })
            .collect();

        Self {
            phase: state.phase,
            state_timer_ms: state.state_timer_ms,
            time_ticks: state.time_ticks,

            money: state.ledger.money,
            combo_streak: state.ledger.combo_streak,
            customers_served: state.customers_served,
            max_customers: state.tuning.max_customers,
            total_score: state.ledger.total_score,

            cup_center: stage.cup_center,
            cup_width: stage.cup_width,
            cup_height: stage.cup_height,
            fill_height: drink.fill_height,
            milk_height: drink.milk_height,
            tea_percent: measure.tea_percent,
            milk_percent: measure.milk_percent,
            pouring_tea: drink.pouring_tea,
            pouring_milk: drink.pouring_milk,
            items,
            items_in_cup: measure.boba_count,

            serve_stage: drink.serve_stage,
            straw_progress: drink.straw_progress,
            mix_progress: drink.mix_progress,
            verdict_pending: state.scheduler.is_pending(SERVE_TRANSITION),

            customer: state.customer,
            customer_x: state.customer_x,
            recipe,
            meters: Meters {
                items: Meter::new(measure.boba_count, recipe.boba_target),
                tea: Meter::new(measure.tea_percent.floor() as u32, recipe.tea_percent_target),
                milk: Meter::new(
                    measure.milk_percent.floor() as u32,
                    recipe.milk_percent_target,
                ),
            },
            order_lines: if state.phase == GamePhase::Ordering {
                order_lines_revealed(state.state_timer_ms)
            } else {
                0
            },

            opening_progress: (state.state_timer_ms / OPENING_WALK_MS).min(1.0),
            start_available: state.phase == GamePhase::Opening
                && state.state_timer_ms > state.tuning.start_gate_ms,

            barista: CharacterView::of(&state.barista),
            customer_view: CharacterView::of(&state.customer_animator),

            feedback: state.feedback.clone(),
            feedback_scale: state.feedback.as_ref().map_or(0.0, |f| {
                let shown = state.tuning.feedback_ticks.saturating_sub(f.ticks_left);
                easing::elastic((shown as f32 / BANNER_POP_TICKS).min(1.0))
            }),

            serve_phase: state.serve_animation.phase(),
            serve_progress: state.serve_animation.progress,
            serve_drink_pos: state.serve_animation.drink_pos,
            serve_drink_scale: state.serve_animation.drink_scale,

            rating: (state.phase == GamePhase::GameEnd).then(|| rating(state.ledger.total_score)),
        }
    }

    /// The serve sequence is running or already scored
    pub fn serve_busy(&self) -> bool {
        self.serve_stage != ServeStage::Idle || self.verdict_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::SettlingWorld;
    use crate::sim::recipe::MeterStatus;
    use crate::sim::state::Stage;
    use crate::sim::tick::{Intent, apply_intent, tick};
    use crate::tuning::Tuning;

    fn session() -> GameState<SettlingWorld> {
        GameState::with_physics(
            21,
            Stage::from_viewport(1280.0, 800.0),
            Tuning::default(),
            SettlingWorld::default(),
        )
    }

    #[test]
    fn test_opening_snapshot() {
        let mut state = session();
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Opening);
        assert_eq!(snap.opening_progress, 0.0);
        assert!(!snap.start_available);
        assert!(snap.rating.is_none());
        assert_eq!(snap.feedback_scale, 0.0);

        for _ in 0..200 {
            tick(&mut state, 16.67);
        }
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.opening_progress, 1.0);
        assert!(snap.start_available);
        assert_eq!(snap.barista.behavior, Behavior::Walk);
    }

    #[test]
    fn test_meters_follow_the_drink() {
        let mut state = session();
        state.phase = GamePhase::MakingDrink;
        state.recipe = Recipe {
            boba_target: 3,
            tea_percent_target: 40,
            milk_percent_target: 20,
        };
        for _ in 0..4 {
            apply_intent(&mut state, Intent::DropBoba);
        }
        tick(&mut state, 16.67);
        state.drink.fill_height = 131.25;

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.items_in_cup, 4);
        assert_eq!(snap.items.len(), 4);
        assert!(snap.items.iter().all(|i| i.in_cup));
        assert_eq!(snap.meters.items.status, MeterStatus::Over);
        assert_eq!(snap.meters.tea.value, 37);
        assert_eq!(snap.meters.tea.status, MeterStatus::OnTarget);
        assert_eq!(snap.meters.milk.status, MeterStatus::Under);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let state = session();
        let json = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Opening\""));
        assert!(json.contains("\"customer_view\""));
    }
}
