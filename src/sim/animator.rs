//! Per-character continuous animation state
//!
//! Each character (barista, customer) owns one animator. The game loop calls
//! [`CharacterAnimator::update`] every frame; the state machine and scoring
//! poke it through `set_state`, `trigger_bounce` and `trigger_squash`. The
//! renderer reads only the derived queries.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Blink length in ticks
pub const BLINK_TICKS: f32 = 8.0;
/// Wait between blinks, in ticks
pub const BLINK_WAIT_MIN: f32 = 60.0;
pub const BLINK_WAIT_MAX: f32 = 240.0;
/// Per-tick chance of an ear wiggle
pub const EAR_WIGGLE_CHANCE: f64 = 0.05;
/// Ear wiggle starting angle and per-tick decay
pub const EAR_WIGGLE_START: f32 = 10.0;
pub const EAR_WIGGLE_DECAY: f32 = 0.5;
/// Bounce decay factor per tick and snap threshold
pub const BOUNCE_DECAY: f32 = 0.9;
pub const BOUNCE_SNAP: f32 = 0.1;
/// Squash/stretch relaxation per tick
pub const SQUASH_RELAX: f32 = 0.15;

/// What the character is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    #[default]
    Idle,
    Walk,
    Talking,
    Listening,
    Waiting,
    Pouring,
    Celebrating,
    Disappointed,
    Happy,
    Satisfied,
    Upset,
}

/// Facial expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Expression {
    #[default]
    Neutral,
    Happy,
    Sad,
    Excited,
}

impl Expression {
    /// Smiling mouth and closed-arc eyes
    pub fn is_cheerful(&self) -> bool {
        matches!(self, Expression::Happy | Expression::Excited)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterAnimator {
    behavior: Behavior,
    expression: Expression,
    /// Ticks since the behaviour last changed
    state_ticks: f32,
    /// Ticks until the next blink starts
    blink_countdown: f32,
    /// Ticks left in the current blink
    blink_remaining: f32,
    breathe_phase: f32,
    idle_phase: f32,
    ear_wiggle: f32,
    bounce_y: f32,
    squash: Vec2,
}

impl CharacterAnimator {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            behavior: Behavior::Idle,
            expression: Expression::Neutral,
            state_ticks: 0.0,
            blink_countdown: rng.random_range(BLINK_WAIT_MIN..=BLINK_WAIT_MAX),
            blink_remaining: 0.0,
            breathe_phase: 0.0,
            idle_phase: 0.0,
            ear_wiggle: 0.0,
            bounce_y: 0.0,
            squash: Vec2::ONE,
        }
    }

    /// Advance by `delta` ticks (elapsed ms / 16.67)
    pub fn update(&mut self, delta: f32, rng: &mut impl Rng) {
        self.state_ticks += delta;
        self.breathe_phase += 0.02 * delta;
        self.idle_phase += 0.015 * delta;

        // Blink
        if self.blink_remaining > 0.0 {
            self.blink_remaining = (self.blink_remaining - delta).max(0.0);
        }
        self.blink_countdown -= delta;
        if self.blink_countdown <= 0.0 {
            self.blink_remaining = BLINK_TICKS;
            self.blink_countdown = rng.random_range(BLINK_WAIT_MIN..=BLINK_WAIT_MAX);
        }

        // Ear wiggle
        if rng.random_bool(EAR_WIGGLE_CHANCE) {
            self.ear_wiggle = EAR_WIGGLE_START;
        }
        if self.ear_wiggle > 0.0 {
            self.ear_wiggle = (self.ear_wiggle - EAR_WIGGLE_DECAY * delta).max(0.0);
        }

        // Bounce decay
        if self.bounce_y > 0.0 {
            self.bounce_y *= BOUNCE_DECAY.powf(delta);
            if self.bounce_y < BOUNCE_SNAP {
                self.bounce_y = 0.0;
            }
        }

        // Squash/stretch back toward (1, 1)
        let relax = 1.0 - (1.0 - SQUASH_RELAX).powf(delta);
        self.squash += (Vec2::ONE - self.squash) * relax;
    }

    /// Change behaviour; the state clock restarts only on an actual change
    pub fn set_state(&mut self, behavior: Behavior, expression: Expression) {
        if self.behavior != behavior {
            self.behavior = behavior;
            self.state_ticks = 0.0;
        }
        self.expression = expression;
    }

    pub fn trigger_bounce(&mut self, strength: f32) {
        self.bounce_y = strength;
    }

    pub fn trigger_squash(&mut self, sx: f32, sy: f32) {
        self.squash = Vec2::new(sx, sy);
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn expression(&self) -> Expression {
        self.expression
    }

    pub fn state_ticks(&self) -> f32 {
        self.state_ticks
    }

    pub fn bounce_y(&self) -> f32 {
        self.bounce_y
    }

    pub fn squash(&self) -> Vec2 {
        self.squash
    }

    /// Gentle sway
    pub fn idle_offset(&self) -> Vec2 {
        Vec2::new(
            self.idle_phase.sin() * 2.0,
            (self.idle_phase * 1.5).sin() * 3.0,
        )
    }

    pub fn breathe_scale(&self) -> f32 {
        1.0 + self.breathe_phase.sin() * 0.03
    }

    pub fn is_blinking(&self) -> bool {
        self.blink_remaining > 0.0
    }

    /// Ear rotation in radians
    pub fn ear_rotation(&self) -> f32 {
        (self.ear_wiggle * 0.5).sin() * 0.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn animator() -> (CharacterAnimator, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        (CharacterAnimator::new(&mut rng), rng)
    }

    #[test]
    fn test_set_state_resets_clock_only_on_change() {
        let (mut anim, mut rng) = animator();
        for _ in 0..10 {
            anim.update(1.0, &mut rng);
        }
        anim.set_state(Behavior::Idle, Expression::Happy);
        assert_eq!(anim.state_ticks(), 10.0);
        assert_eq!(anim.expression(), Expression::Happy);

        anim.set_state(Behavior::Pouring, Expression::Neutral);
        assert_eq!(anim.state_ticks(), 0.0);
        assert_eq!(anim.behavior(), Behavior::Pouring);
        assert_eq!(anim.expression(), Expression::Neutral);
    }

    #[test]
    fn test_bounce_decays_and_snaps() {
        let (mut anim, mut rng) = animator();
        anim.trigger_bounce(15.0);
        anim.update(1.0, &mut rng);
        assert!((anim.bounce_y() - 13.5).abs() < 1e-4);

        for _ in 0..100 {
            anim.update(1.0, &mut rng);
        }
        assert_eq!(anim.bounce_y(), 0.0);
    }

    #[test]
    fn test_squash_relaxes_toward_one() {
        let (mut anim, mut rng) = animator();
        anim.trigger_squash(1.2, 0.8);
        anim.update(1.0, &mut rng);
        let s = anim.squash();
        assert!((s.x - 1.17).abs() < 1e-4);
        assert!((s.y - 0.83).abs() < 1e-4);

        for _ in 0..200 {
            anim.update(1.0, &mut rng);
        }
        assert!((anim.squash() - Vec2::ONE).length() < 1e-3);
    }

    #[test]
    fn test_blinks_happen_and_end() {
        let (mut anim, mut rng) = animator();
        let mut blink_ticks = 0;
        for _ in 0..600 {
            anim.update(1.0, &mut rng);
            if anim.is_blinking() {
                blink_ticks += 1;
            }
        }
        // At least two blinks fit in 600 ticks, each 8 ticks long
        assert!(blink_ticks >= 16, "only {blink_ticks} blinking ticks");
        assert!(blink_ticks < 600);
    }

    #[test]
    fn test_derived_queries_stay_small() {
        let (mut anim, mut rng) = animator();
        for _ in 0..1000 {
            anim.update(1.0, &mut rng);
            let offset = anim.idle_offset();
            assert!(offset.x.abs() <= 2.0 && offset.y.abs() <= 3.0);
            assert!((anim.breathe_scale() - 1.0).abs() <= 0.03 + 1e-6);
            assert!(anim.ear_rotation().abs() <= 0.3 + 1e-6);
        }
    }
}
