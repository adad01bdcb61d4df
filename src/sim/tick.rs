//! Per-frame simulation tick and intent handling
//!
//! Intents mutate the state immediately; `tick` advances everything that
//! moves with time, in a fixed order: physics, animators, deferred timers,
//! drink building, phase choreography, banner.

use glam::Vec2;

use super::animator::{Behavior, Expression};
use super::drink::ItemKind;
use super::physics::PhysicsBackend;
use super::recipe::{Tier, score_drink};
use super::schedule::Deferred;
use super::state::{Feedback, GameEvent, GamePhase, GameState, ServePhase, SoundCue};
use crate::consts::*;
use crate::easing;

/// Player intents, already translated from pointer/key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start button on the opening screen
    Start,
    /// Tap while the customer is ordering
    SubmitOrder,
    BeginTeaPour,
    EndTeaPour,
    BeginMilkPour,
    EndMilkPour,
    DropBoba,
    DropIce,
    Serve,
    Reset,
}

/// The deferred hand-off after a verdict
pub const SERVE_TRANSITION: Deferred = Deferred::Transition {
    from: GamePhase::MakingDrink,
    to: GamePhase::ServingCustomer,
};

/// Order lines reveal at these phase times (ms)
const ORDER_LINE_TIMES: [f32; 3] = [300.0, 600.0, 900.0];
/// First part of ordering where the barista greets
const GREETING_MS: f32 = 400.0;

/// Apply one intent. Returns whether it was accepted; rejected intents leave
/// the state untouched.
pub fn apply_intent<P: PhysicsBackend>(state: &mut GameState<P>, intent: Intent) -> bool {
    // Releasing a pour is always honoured, whatever the phase
    match intent {
        Intent::EndTeaPour => {
            let was = state.drink.end_tea();
            if was {
                state.emit(GameEvent::Sound(SoundCue::TeaPourStop));
            }
            return was;
        }
        Intent::EndMilkPour => {
            let was = state.drink.end_milk();
            if was {
                state.emit(GameEvent::Sound(SoundCue::MilkPourStop));
            }
            return was;
        }
        _ => {}
    }

    match (state.phase, intent) {
        (GamePhase::Opening, Intent::Start) => {
            if state.state_timer_ms > state.tuning.start_gate_ms {
                state.change_phase(GamePhase::CustomerEnter);
                true
            } else {
                log::debug!("Start ignored: opening still playing");
                false
            }
        }
        (GamePhase::Ordering, Intent::SubmitOrder) => {
            state.change_phase(GamePhase::MakingDrink);
            true
        }
        (GamePhase::MakingDrink, Intent::BeginTeaPour) => {
            let started = state.drink.begin_tea();
            if started {
                state.emit(GameEvent::Sound(SoundCue::TeaPourStart));
            }
            started
        }
        (GamePhase::MakingDrink, Intent::BeginMilkPour) => {
            let started = state.drink.begin_milk();
            if started {
                state.emit(GameEvent::Sound(SoundCue::MilkPourStart));
            }
            started
        }
        (GamePhase::MakingDrink, Intent::DropBoba) => drop_item(state, ItemKind::Boba),
        (GamePhase::MakingDrink, Intent::DropIce) => drop_item(state, ItemKind::Ice),
        (GamePhase::MakingDrink, Intent::Serve) => {
            if state.scheduler.is_pending(SERVE_TRANSITION) || !state.drink.start_serve() {
                log::debug!("Serve ignored: already serving");
                return false;
            }
            state.emit(GameEvent::Sound(SoundCue::Serve));
            true
        }
        (GamePhase::MakingDrink, Intent::Reset) => {
            state.drink.reset(&mut state.physics);
            state.barista.trigger_squash(0.95, 1.05);
            true
        }
        (phase, intent) => {
            log::debug!("{:?} ignored during {:?}", intent, phase);
            false
        }
    }
}

fn drop_item<P: PhysicsBackend>(state: &mut GameState<P>, kind: ItemKind) -> bool {
    let dropped = state
        .drink
        .drop_item(
            kind,
            &mut state.physics,
            &state.stage,
            &mut state.rng,
            state.tuning.max_items,
        )
        .is_some();
    if dropped {
        let cue = match kind {
            ItemKind::Boba => SoundCue::BobaDrop,
            ItemKind::Ice => SoundCue::IceDrop,
        };
        state.emit(GameEvent::Sound(cue));
        state.barista.trigger_squash(1.05, 0.95);
    }
    dropped
}

/// Advance the session by one frame of `dt_ms` milliseconds
pub fn tick<P: PhysicsBackend>(state: &mut GameState<P>, dt_ms: f32) {
    state.time_ticks += 1;

    // Physics first so every reader below sees this frame's positions
    state.physics.step(PHYSICS_DT);
    state.drink.sync_positions(&state.physics);

    let delta = dt_ms / FRAME_MS;
    state.barista.update(delta, &mut state.rng);
    state.customer_animator.update(delta, &mut state.rng);

    for action in state.scheduler.advance(dt_ms) {
        match action {
            Deferred::Transition { from, to } => {
                if state.phase == from {
                    state.change_phase(to);
                } else {
                    log::debug!("Skipping {:?} -> {:?}: now in {:?}", from, to, state.phase);
                }
            }
        }
    }

    if state.phase == GamePhase::MakingDrink {
        update_drink(state);
    }

    state.state_timer_ms += dt_ms;

    match state.phase {
        GamePhase::CustomerEnter => update_customer_enter(state),
        GamePhase::Ordering => update_ordering(state),
        GamePhase::ServingCustomer => update_serving(state),
        GamePhase::Opening
        | GamePhase::MakingDrink
        | GamePhase::ServeDrink
        | GamePhase::GameEnd => {}
    }

    if let Some(feedback) = &mut state.feedback {
        feedback.ticks_left = feedback.ticks_left.saturating_sub(1);
        if feedback.ticks_left == 0 {
            state.feedback = None;
        }
    }
}

fn update_drink<P: PhysicsBackend>(state: &mut GameState<P>) {
    if state
        .drink
        .advance_serve(state.tuning.straw_rate, state.tuning.mix_rate)
    {
        check_drink(state);
    }

    if state.drink.is_pouring() {
        let max = state.stage.liquid_max();
        state.drink.pour_tick(state.tuning.pour_rate, max);
        state.barista.set_state(Behavior::Pouring, Expression::Neutral);
    } else if state.barista.behavior() == Behavior::Pouring {
        state.barista.set_state(Behavior::Idle, Expression::Neutral);
    }
}

/// Score the drink on the counter and book the result
pub fn check_drink<P: PhysicsBackend>(state: &mut GameState<P>) {
    let measure = state.drink.measure(&state.stage);
    let verdict = score_drink(&measure, &state.recipe, state.tuning.tolerance_percent);
    let earned = state.ledger.settle(verdict.tier);

    let (barista, customer) = (&mut state.barista, &mut state.customer_animator);
    match verdict.tier {
        Tier::Perfect => {
            barista.set_state(Behavior::Celebrating, Expression::Excited);
            barista.trigger_bounce(15.0);
            barista.trigger_squash(1.2, 0.8);
            customer.set_state(Behavior::Happy, Expression::Excited);
            customer.trigger_bounce(12.0);
            customer.trigger_squash(1.15, 0.85);
        }
        Tier::Good => {
            barista.set_state(Behavior::Idle, Expression::Happy);
            barista.trigger_bounce(8.0);
            customer.set_state(Behavior::Satisfied, Expression::Happy);
            customer.trigger_squash(1.1, 0.9);
        }
        Tier::Okay => {
            barista.set_state(Behavior::Idle, Expression::Neutral);
            // No dedicated "neutral" behaviour; idle is the unremarkable pose
            customer.set_state(Behavior::Idle, Expression::Neutral);
        }
        Tier::TryAgain => {
            barista.set_state(Behavior::Disappointed, Expression::Sad);
            barista.trigger_squash(0.9, 1.1);
            customer.set_state(Behavior::Upset, Expression::Sad);
            customer.trigger_squash(0.85, 1.15);
        }
    }

    state.feedback = Some(Feedback {
        tier: verdict.tier,
        text: verdict.tier.label().to_string(),
        ticks_left: state.tuning.feedback_ticks,
    });
    state.customers_served += 1;

    log::info!(
        "Verdict {:?}: {} boba (want {}), tea {:.1}% (want {}), milk {:.1}% (want {}), +${}",
        verdict.tier,
        measure.boba_count,
        state.recipe.boba_target,
        measure.tea_percent,
        state.recipe.tea_percent_target,
        measure.milk_percent,
        state.recipe.milk_percent_target,
        earned
    );
    state.emit(GameEvent::Scored { verdict, earned });
    state.emit(GameEvent::Sound(SoundCue::Verdict(verdict.tier)));

    let delay = state.tuning.verdict_delay_ms;
    state.scheduler.schedule(delay, SERVE_TRANSITION);
}

fn update_customer_enter<P: PhysicsBackend>(state: &mut GameState<P>) {
    let progress = (state.state_timer_ms / state.tuning.entry_ms).min(1.0);
    let eased = easing::ease_out(progress);
    let start = state.stage.customer_start_x();
    let target = state.stage.customer_spot.x;
    state.customer_x = start - eased * (start - target);

    state
        .customer_animator
        .set_state(Behavior::Walk, Expression::Neutral);
    state.barista.set_state(Behavior::Idle, Expression::Happy);

    if progress >= 1.0 {
        state.customer_animator.trigger_bounce(6.0);
        state.change_phase(GamePhase::Ordering);
    }
}

fn update_ordering<P: PhysicsBackend>(state: &mut GameState<P>) {
    if state.state_timer_ms < GREETING_MS {
        state.barista.set_state(Behavior::Talking, Expression::Happy);
        state
            .customer_animator
            .set_state(Behavior::Listening, Expression::Neutral);
    } else {
        state
            .barista
            .set_state(Behavior::Listening, Expression::Neutral);
        state
            .customer_animator
            .set_state(Behavior::Talking, Expression::Neutral);
    }
}

/// How many order lines the speech bubble shows
pub fn order_lines_revealed(state_timer_ms: f32) -> usize {
    ORDER_LINE_TIMES
        .iter()
        .filter(|&&t| state_timer_ms > t)
        .count()
}

fn update_serving<P: PhysicsBackend>(state: &mut GameState<P>) {
    let stage = state.stage;
    let spot = stage.customer_spot;
    let handoff = spot - Vec2::new(40.0, 40.0);

    let anim = &mut state.serve_animation;
    anim.progress += state.tuning.serve_rate;

    match anim.phase() {
        ServePhase::Handoff => {
            let eased = easing::ease_in_out(anim.progress / 0.3);
            anim.drink_scale = 1.0 - 0.7 * eased;
            anim.drink_pos = stage.cup_center + (handoff - stage.cup_center) * eased;
            anim.customer_x = spot.x;
            state
                .barista
                .set_state(Behavior::Celebrating, Expression::Happy);
            state
                .customer_animator
                .set_state(Behavior::Idle, Expression::Happy);
        }
        ServePhase::Pickup => {
            anim.drink_scale = 0.3;
            anim.drink_pos = handoff;
            anim.customer_x = spot.x;
            state
                .barista
                .set_state(Behavior::Celebrating, Expression::Happy);
            state
                .customer_animator
                .set_state(Behavior::Happy, Expression::Excited);
            state.customer_animator.trigger_bounce(5.0);
        }
        ServePhase::WalkOff => {
            let eased = easing::ease_in((anim.progress - 0.5) / 0.5);
            let x = spot.x + (stage.customer_exit_x() - spot.x) * eased;
            anim.customer_x = x;
            anim.drink_pos = Vec2::new(x - 40.0, spot.y - 40.0);
            state
                .customer_animator
                .set_state(Behavior::Walk, Expression::Happy);
        }
        ServePhase::Complete => {
            state.serve_animation.progress = 0.0;
            state.drink.reset(&mut state.physics);
            state.barista.trigger_squash(0.95, 1.05);
            if state.is_finished() {
                state.change_phase(GamePhase::GameEnd);
            } else {
                state.change_phase(GamePhase::CustomerEnter);
            }
            return;
        }
    }
    state.customer_x = state.serve_animation.customer_x;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::drink::ServeStage;
    use crate::sim::physics::SettlingWorld;
    use crate::sim::state::Stage;
    use crate::tuning::Tuning;
    use std::collections::HashSet;

    const DT: f32 = FRAME_MS;

    fn session(seed: u64) -> GameState<SettlingWorld> {
        GameState::with_physics(
            seed,
            Stage::from_viewport(1280.0, 800.0),
            Tuning::default(),
            SettlingWorld::default(),
        )
    }

    fn run(state: &mut GameState<SettlingWorld>, ticks: usize) {
        for _ in 0..ticks {
            tick(state, DT);
        }
    }

    fn run_until(state: &mut GameState<SettlingWorld>, phase: GamePhase, limit: usize) {
        for _ in 0..limit {
            if state.phase == phase {
                return;
            }
            tick(state, DT);
        }
        assert_eq!(state.phase, phase, "phase not reached within {limit} ticks");
    }

    /// Opening -> making drink for the next customer
    fn to_making_drink(state: &mut GameState<SettlingWorld>) {
        if state.phase == GamePhase::Opening {
            run(state, 130);
            assert!(apply_intent(state, Intent::Start));
        }
        run_until(state, GamePhase::Ordering, 600);
        assert!(apply_intent(state, Intent::SubmitOrder));
        assert_eq!(state.phase, GamePhase::MakingDrink);
    }

    /// Hold a pour for exactly enough ticks to hit `percent`
    fn pour_to(state: &mut GameState<SettlingWorld>, begin: Intent, end: Intent, percent: u32) {
        let height = percent as f32 / 100.0 * state.stage.cup_height;
        let ticks = (height / POUR_RATE).round() as usize;
        assert!(apply_intent(state, begin));
        run(state, ticks);
        assert!(apply_intent(state, end));
    }

    /// Build a drink that matches the order exactly
    fn make_perfect_drink(state: &mut GameState<SettlingWorld>) {
        let recipe = state.recipe;
        for _ in 0..recipe.boba_target {
            assert!(apply_intent(state, Intent::DropBoba));
        }
        pour_to(
            state,
            Intent::BeginTeaPour,
            Intent::EndTeaPour,
            recipe.tea_percent_target,
        );
        pour_to(
            state,
            Intent::BeginMilkPour,
            Intent::EndMilkPour,
            recipe.milk_percent_target,
        );
    }

    fn serve_and_score(state: &mut GameState<SettlingWorld>) {
        assert!(apply_intent(state, Intent::Serve));
        run_until(state, GamePhase::ServingCustomer, 400);
    }

    #[test]
    fn test_start_is_gated() {
        let mut state = session(1);
        run(&mut state, 60);
        assert!(!apply_intent(&mut state, Intent::Start));
        assert_eq!(state.phase, GamePhase::Opening);

        run(&mut state, 70);
        assert!(apply_intent(&mut state, Intent::Start));
        assert_eq!(state.phase, GamePhase::CustomerEnter);
        assert_eq!(state.state_timer_ms, 0.0);
    }

    #[test]
    fn test_customer_walks_in_then_orders() {
        let mut state = session(2);
        run(&mut state, 130);
        apply_intent(&mut state, Intent::Start);
        let start_x = state.customer_x;

        run(&mut state, 30);
        assert_eq!(state.phase, GamePhase::CustomerEnter);
        assert!(state.customer_x < start_x);

        run_until(&mut state, GamePhase::Ordering, 200);
        assert_eq!(state.customer_x, state.stage.customer_spot.x);
        assert!(state.customer_animator.bounce_y() > 0.0);
    }

    #[test]
    fn test_ordering_choreography() {
        let mut state = session(3);
        run(&mut state, 130);
        apply_intent(&mut state, Intent::Start);
        run_until(&mut state, GamePhase::Ordering, 200);

        tick(&mut state, DT);
        assert_eq!(state.barista.behavior(), Behavior::Talking);
        assert_eq!(state.customer_animator.behavior(), Behavior::Listening);
        run(&mut state, 30);
        assert_eq!(state.barista.behavior(), Behavior::Listening);
        assert_eq!(state.customer_animator.behavior(), Behavior::Talking);

        assert_eq!(order_lines_revealed(0.0), 0);
        assert_eq!(order_lines_revealed(650.0), 2);
        assert_eq!(order_lines_revealed(5000.0), 3);
    }

    #[test]
    fn test_intents_outside_making_drink_are_ignored() {
        let mut state = session(4);
        assert!(!apply_intent(&mut state, Intent::DropBoba));
        assert!(!apply_intent(&mut state, Intent::BeginTeaPour));
        assert!(!apply_intent(&mut state, Intent::Serve));
        assert!(state.drink.items.is_empty());
        assert!(!state.drink.pouring_tea);
    }

    #[test]
    fn test_pour_only_while_held() {
        let mut state = session(5);
        to_making_drink(&mut state);
        state.drain_events();

        assert!(apply_intent(&mut state, Intent::BeginTeaPour));
        run(&mut state, 10);
        assert!((state.drink.fill_height - 3.0).abs() < 1e-4);
        assert_eq!(state.barista.behavior(), Behavior::Pouring);

        assert!(apply_intent(&mut state, Intent::EndTeaPour));
        run(&mut state, 10);
        assert!((state.drink.fill_height - 3.0).abs() < 1e-4);
        assert_eq!(state.barista.behavior(), Behavior::Idle);

        let sounds: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Sound(cue) => Some(cue),
                _ => None,
            })
            .collect();
        assert_eq!(sounds, vec![SoundCue::TeaPourStart, SoundCue::TeaPourStop]);
    }

    #[test]
    fn test_pour_clamps_at_rim() {
        let mut state = session(6);
        to_making_drink(&mut state);
        apply_intent(&mut state, Intent::BeginMilkPour);
        run(&mut state, 2000);
        assert_eq!(state.drink.milk_height, state.stage.liquid_max());
    }

    #[test]
    fn test_drop_cap_in_game() {
        let mut state = session(7);
        to_making_drink(&mut state);
        for _ in 0..35 {
            assert!(apply_intent(&mut state, Intent::DropBoba));
            tick(&mut state, DT);
        }
        assert!(!apply_intent(&mut state, Intent::DropBoba));
        assert!(!apply_intent(&mut state, Intent::DropIce));
        assert_eq!(state.drink.items.len(), 35);
        assert_eq!(state.physics().body_count(), 35);
    }

    #[test]
    fn test_drop_burst_between_ticks_is_capped() {
        let mut state = session(13);
        to_making_drink(&mut state);
        let accepted = (0..60)
            .filter(|_| apply_intent(&mut state, Intent::DropBoba))
            .count();
        assert_eq!(accepted, 35);
        assert_eq!(state.drink.items.len(), 35);
        assert_eq!(state.physics().body_count(), 35);

        tick(&mut state, DT);
        assert!(!apply_intent(&mut state, Intent::DropIce));
        assert_eq!(state.drink.items.len(), 35);
    }

    #[test]
    fn test_holding_both_pours_fills_tea_only() {
        let mut state = session(14);
        to_making_drink(&mut state);
        assert!(apply_intent(&mut state, Intent::BeginTeaPour));
        assert!(apply_intent(&mut state, Intent::BeginMilkPour));
        run(&mut state, 10);
        assert!((state.drink.fill_height - 3.0).abs() < 1e-4);
        assert_eq!(state.drink.milk_height, 0.0);

        // Milk flows once tea is released, without pressing it again
        assert!(apply_intent(&mut state, Intent::EndTeaPour));
        run(&mut state, 10);
        assert!((state.drink.fill_height - 3.0).abs() < 1e-4);
        assert!((state.drink.milk_height - 3.0).abs() < 1e-4);
        assert_eq!(state.barista.behavior(), Behavior::Pouring);
    }

    #[test]
    fn test_serve_then_transition_after_delay() {
        let mut state = session(8);
        to_making_drink(&mut state);
        make_perfect_drink(&mut state);
        run(&mut state, 1);

        assert!(apply_intent(&mut state, Intent::Serve));
        assert!(!apply_intent(&mut state, Intent::Serve));

        // Straw (50 ticks) + mixing (67 ticks)
        let mut scored_at = None;
        for t in 0..200 {
            tick(&mut state, DT);
            if state.customers_served == 1 {
                scored_at = Some(t);
                break;
            }
        }
        assert!(scored_at.is_some());
        assert_eq!(state.drink.serve_stage, ServeStage::Done);
        assert_eq!(state.feedback.as_ref().map(|f| f.tier), Some(Tier::Perfect));
        assert_eq!(state.ledger.money, 23);

        // Verdict pending: a reset followed by a serve must not score twice
        assert!(apply_intent(&mut state, Intent::Reset));
        assert!(!apply_intent(&mut state, Intent::Serve));

        // Still making the drink for ~1.5 s
        run(&mut state, 80);
        assert_eq!(state.phase, GamePhase::MakingDrink);
        run(&mut state, 15);
        assert_eq!(state.phase, GamePhase::ServingCustomer);
        assert_eq!(state.customers_served, 1);
    }

    #[test]
    fn test_serving_animation_returns_to_next_customer() {
        let mut state = session(9);
        to_making_drink(&mut state);
        make_perfect_drink(&mut state);
        serve_and_score(&mut state);

        run(&mut state, 10);
        assert!(state.serve_animation.drink_scale < 1.0);
        run_until(&mut state, GamePhase::CustomerEnter, 200);
        assert!(state.drink.items.is_empty());
        assert_eq!(state.drink.fill_height, 0.0);
        assert_eq!(state.physics().body_count(), 0);
    }

    #[test]
    fn test_combo_resets_on_miss() {
        let mut state = session(10);

        to_making_drink(&mut state);
        make_perfect_drink(&mut state);
        serve_and_score(&mut state);
        assert_eq!(state.ledger.money, 23);

        to_making_drink(&mut state);
        make_perfect_drink(&mut state);
        serve_and_score(&mut state);
        assert_eq!(state.ledger.money, 23 + 26);
        assert_eq!(state.ledger.combo_streak, 2);

        // Empty cup: Try Again
        to_making_drink(&mut state);
        serve_and_score(&mut state);
        assert_eq!(state.ledger.combo_streak, 0);
        assert_eq!(state.ledger.money, 49);

        to_making_drink(&mut state);
        make_perfect_drink(&mut state);
        serve_and_score(&mut state);
        assert_eq!(state.ledger.money, 49 + 23);
    }

    #[test]
    fn test_okay_drink_leaves_customer_idle() {
        let mut state = session(12);
        to_making_drink(&mut state);

        // Right boba count, nothing poured: one of three criteria
        for _ in 0..state.recipe.boba_target {
            assert!(apply_intent(&mut state, Intent::DropBoba));
        }
        tick(&mut state, DT);
        check_drink(&mut state);

        assert_eq!(state.feedback.as_ref().map(|f| f.tier), Some(Tier::Okay));
        assert_eq!(state.customer_animator.behavior(), Behavior::Idle);
        assert_eq!(state.customer_animator.expression(), Expression::Neutral);
        assert_eq!(state.barista.behavior(), Behavior::Idle);
    }

    #[test]
    fn test_full_session_of_perfect_drinks() {
        let mut state = session(11);
        let mut customers = HashSet::new();

        for _ in 0..5 {
            to_making_drink(&mut state);
            customers.insert(state.customer);
            make_perfect_drink(&mut state);
            serve_and_score(&mut state);
        }
        run_until(&mut state, GamePhase::GameEnd, 200);

        assert_eq!(state.customers_served, 5);
        assert_eq!(state.ledger.total_score, 500);
        assert_eq!(state.ledger.money, 23 + 26 + 29 + 32 + 35);
        assert_eq!(customers.len(), 5);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::SessionEnd)));

        // Terminal: nothing moves on
        run(&mut state, 500);
        assert_eq!(state.phase, GamePhase::GameEnd);
        assert!(!apply_intent(&mut state, Intent::Start));
    }

    #[test]
    fn test_reload_discards_pending_transition() {
        let mut state = session(12);
        to_making_drink(&mut state);
        apply_intent(&mut state, Intent::Serve);
        run(&mut state, 130);
        assert_eq!(state.customers_served, 1);
        assert_eq!(state.scheduler.pending(), 1);

        state.reload(99);
        assert_eq!(state.phase, GamePhase::Opening);
        assert_eq!(state.customers_served, 0);
        run(&mut state, 200);
        assert_eq!(state.phase, GamePhase::Opening);
        assert_eq!(state.scheduler.pending(), 0);
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = session(77);
        let mut b = session(77);
        for s in [&mut a, &mut b] {
            to_making_drink(s);
            for _ in 0..3 {
                apply_intent(s, Intent::DropBoba);
            }
            run(s, 20);
        }
        assert_eq!(a.recipe, b.recipe);
        assert_eq!(a.customer, b.customer);
        assert_eq!(a.barista.is_blinking(), b.barista.is_blinking());
        let pa: Vec<_> = a.drink.items.iter().map(|i| i.pos).collect();
        let pb: Vec<_> = b.drink.items.iter().map(|i| i.pos).collect();
        assert_eq!(pa, pb);
    }
}
