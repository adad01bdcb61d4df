//! The drink on the counter
//!
//! Continuous tea/milk levels, the dropped items and the serve sub-sequence
//! (straw insertion, then mixing). Items are bodies in the physics world; the
//! drink keeps only their handles plus the positions read back after each
//! physics step.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::{BodyId, BodyMaterial, BodyShape, PhysicsBackend};
use super::recipe::DrinkMeasure;
use super::state::Stage;
use crate::consts::*;

/// What can be dropped into the cup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Boba,
    Ice,
}

impl ItemKind {
    pub fn shape(&self) -> BodyShape {
        match self {
            ItemKind::Boba => BodyShape::Circle {
                radius: BOBA_RADIUS,
            },
            ItemKind::Ice => BodyShape::Rect {
                width: ICE_SIZE,
                height: ICE_SIZE,
            },
        }
    }

    pub fn material(&self) -> BodyMaterial {
        match self {
            ItemKind::Boba => BodyMaterial {
                restitution: 0.5,
                friction: 0.3,
                density: Some(0.002),
            },
            ItemKind::Ice => BodyMaterial {
                restitution: 0.3,
                friction: 0.1,
                density: None,
            },
        }
    }
}

/// A dropped item, as last reported by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip)]
    pub body: Option<BodyId>,
    pub kind: ItemKind,
    pub pos: Vec2,
}

/// Serve sub-sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServeStage {
    /// Nothing in flight
    #[default]
    Idle,
    InsertingStraw,
    Mixing,
    /// Straw in and mixed; scored, waiting for the hand-off or a reset
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct Drink {
    pub fill_height: f32,
    pub milk_height: f32,
    pub pouring_tea: bool,
    pub pouring_milk: bool,
    pub items: Vec<Item>,
    pub serve_stage: ServeStage,
    /// 0..=1, stays at 1 once the straw is in
    pub straw_progress: f32,
    /// 0..=1 while mixing, back to 0 when done
    pub mix_progress: f32,
}

impl Drink {
    /// Start holding the tea pour. Returns false if already pouring.
    pub fn begin_tea(&mut self) -> bool {
        !std::mem::replace(&mut self.pouring_tea, true)
    }

    /// Release the tea pour. Returns false if it was not pouring.
    pub fn end_tea(&mut self) -> bool {
        std::mem::replace(&mut self.pouring_tea, false)
    }

    pub fn begin_milk(&mut self) -> bool {
        !std::mem::replace(&mut self.pouring_milk, true)
    }

    pub fn end_milk(&mut self) -> bool {
        std::mem::replace(&mut self.pouring_milk, false)
    }

    pub fn is_pouring(&self) -> bool {
        self.pouring_tea || self.pouring_milk
    }

    /// Grow the held pour by `rate`, clamped at `max`. Both may be held, but
    /// tea takes the tap: milk only flows while tea is released.
    pub fn pour_tick(&mut self, rate: f32, max: f32) {
        if self.pouring_tea {
            self.fill_height = (self.fill_height + rate).min(max);
        } else if self.pouring_milk {
            self.milk_height = (self.milk_height + rate).min(max);
        }
    }

    /// Items whose last known position is inside the cup
    pub fn items_in_cup(&self, stage: &Stage) -> u32 {
        self.items.iter().filter(|i| stage.contains(i.pos)).count() as u32
    }

    /// Drop an item above the cup. Rejected once `max_items` have been dropped
    /// (falling or settled) or the cup already holds that many.
    pub fn drop_item(
        &mut self,
        kind: ItemKind,
        physics: &mut impl PhysicsBackend,
        stage: &Stage,
        rng: &mut impl Rng,
        max_items: usize,
    ) -> Option<BodyId> {
        if self.items.len() >= max_items || self.items_in_cup(stage) as usize >= max_items {
            log::debug!("Drop rejected: cup is full ({} items)", max_items);
            return None;
        }

        let pos = Vec2::new(
            stage.cup_center.x + rng.random_range(-DROP_JITTER..DROP_JITTER),
            stage.cup_top() - DROP_HEIGHT,
        );
        let body = physics.add_body(kind.shape(), kind.material(), pos);
        self.items.push(Item {
            body: Some(body),
            kind,
            pos,
        });
        log::debug!("Dropped {:?} as {:?} at ({:.1}, {:.1})", kind, body, pos.x, pos.y);
        Some(body)
    }

    /// Read item positions back from the physics world
    pub fn sync_positions(&mut self, physics: &impl PhysicsBackend) {
        for item in &mut self.items {
            if let Some(pos) = item.body.and_then(|b| physics.position(b)) {
                item.pos = pos;
            }
        }
    }

    pub fn serve_in_progress(&self) -> bool {
        self.serve_stage != ServeStage::Idle || self.straw_progress > 0.0
    }

    /// Begin straw insertion. Returns false if a serve is already underway.
    pub fn start_serve(&mut self) -> bool {
        if self.serve_in_progress() {
            return false;
        }
        self.serve_stage = ServeStage::InsertingStraw;
        self.straw_progress = 0.0;
        true
    }

    /// Advance straw/mixing by one tick. Returns true exactly once per serve,
    /// on the tick mixing completes.
    pub fn advance_serve(&mut self, straw_rate: f32, mix_rate: f32) -> bool {
        match self.serve_stage {
            ServeStage::InsertingStraw => {
                self.straw_progress += straw_rate;
                if self.straw_progress >= 1.0 {
                    self.straw_progress = 1.0;
                    self.serve_stage = ServeStage::Mixing;
                    self.mix_progress = 0.0;
                }
                false
            }
            ServeStage::Mixing => {
                self.mix_progress += mix_rate;
                if self.mix_progress >= 1.0 {
                    self.mix_progress = 0.0;
                    self.serve_stage = ServeStage::Done;
                    true
                } else {
                    false
                }
            }
            ServeStage::Idle | ServeStage::Done => false,
        }
    }

    /// Measure the drink for scoring
    pub fn measure(&self, stage: &Stage) -> DrinkMeasure {
        DrinkMeasure {
            boba_count: self.items_in_cup(stage),
            tea_percent: self.fill_height / stage.cup_height * 100.0,
            milk_percent: self.milk_height / stage.cup_height * 100.0,
        }
    }

    /// Empty the cup: levels to zero, serve cancelled, items removed from the
    /// world. Held pours stay held.
    pub fn reset(&mut self, physics: &mut impl PhysicsBackend) {
        self.fill_height = 0.0;
        self.milk_height = 0.0;
        self.serve_stage = ServeStage::Idle;
        self.straw_progress = 0.0;
        self.mix_progress = 0.0;
        for item in self.items.drain(..) {
            if let Some(body) = item.body {
                physics.remove_body(body);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::SettlingWorld;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Drink, SettlingWorld, Stage, Pcg32) {
        let stage = Stage::from_viewport(1280.0, 800.0);
        let mut world = SettlingWorld::default();
        world.build_cup(&stage);
        (Drink::default(), world, stage, Pcg32::seed_from_u64(3))
    }

    #[test]
    fn test_drop_cap() {
        let (mut drink, mut world, stage, mut rng) = setup();
        for _ in 0..MAX_ITEMS {
            assert!(
                drink
                    .drop_item(ItemKind::Boba, &mut world, &stage, &mut rng, MAX_ITEMS)
                    .is_some()
            );
            world.step(PHYSICS_DT);
            drink.sync_positions(&world);
        }
        assert_eq!(drink.items_in_cup(&stage), 35);

        let rejected = drink.drop_item(ItemKind::Ice, &mut world, &stage, &mut rng, MAX_ITEMS);
        assert!(rejected.is_none());
        assert_eq!(drink.items.len(), 35);
        assert_eq!(world.body_count(), 35);
    }

    #[test]
    fn test_items_in_flight_are_not_counted() {
        let (mut drink, mut world, stage, mut rng) = setup();
        drink.drop_item(ItemKind::Boba, &mut world, &stage, &mut rng, MAX_ITEMS);
        assert_eq!(drink.items_in_cup(&stage), 0);
        world.step(PHYSICS_DT);
        drink.sync_positions(&world);
        assert_eq!(drink.items_in_cup(&stage), 1);
    }

    #[test]
    fn test_serve_sequence_scores_once() {
        let mut drink = Drink::default();
        assert!(drink.start_serve());
        assert!(!drink.start_serve());

        let mut completions = 0;
        let mut ticks = 0;
        while ticks < 1000 {
            if drink.advance_serve(STRAW_RATE, MIX_RATE) {
                completions += 1;
            }
            ticks += 1;
        }
        assert_eq!(completions, 1);
        assert_eq!(drink.serve_stage, ServeStage::Done);
        assert_eq!(drink.straw_progress, 1.0);
        assert_eq!(drink.mix_progress, 0.0);
        // Straw is still in, so no second serve until reset
        assert!(!drink.start_serve());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut drink, mut world, stage, mut rng) = setup();
        drink.fill_height = 100.0;
        drink.milk_height = 40.0;
        drink.start_serve();
        drink.advance_serve(STRAW_RATE, MIX_RATE);
        for _ in 0..5 {
            drink.drop_item(ItemKind::Boba, &mut world, &stage, &mut rng, MAX_ITEMS);
        }

        drink.reset(&mut world);
        let once = (drink.fill_height, drink.milk_height, drink.items.len(), drink.serve_stage);
        drink.reset(&mut world);
        let twice = (drink.fill_height, drink.milk_height, drink.items.len(), drink.serve_stage);

        assert_eq!(once, (0.0, 0.0, 0, ServeStage::Idle));
        assert_eq!(once, twice);
        assert_eq!(drink.straw_progress, 0.0);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_tea_takes_the_tap_when_both_held() {
        let mut drink = Drink::default();
        assert!(drink.begin_tea());
        assert!(!drink.begin_tea());
        assert!(drink.begin_milk());
        drink.pour_tick(POUR_RATE, 330.0);
        assert!((drink.fill_height - 0.3).abs() < 1e-6);
        assert_eq!(drink.milk_height, 0.0);
        assert!(drink.pouring_milk);

        assert!(drink.end_tea());
        assert!(!drink.end_tea());
        drink.pour_tick(POUR_RATE, 330.0);
        assert!((drink.fill_height - 0.3).abs() < 1e-6);
        assert!((drink.milk_height - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_falling_items_count_toward_cap() {
        let (mut drink, mut world, stage, mut rng) = setup();
        for _ in 0..MAX_ITEMS {
            assert!(
                drink
                    .drop_item(ItemKind::Boba, &mut world, &stage, &mut rng, MAX_ITEMS)
                    .is_some()
            );
        }
        // Nothing has landed yet
        assert_eq!(drink.items_in_cup(&stage), 0);
        assert!(
            drink
                .drop_item(ItemKind::Ice, &mut world, &stage, &mut rng, MAX_ITEMS)
                .is_none()
        );
        assert_eq!(drink.items.len(), MAX_ITEMS);
        assert_eq!(world.body_count(), MAX_ITEMS);
    }

    proptest! {
        #[test]
        fn prop_pour_is_clamped_and_monotone(ticks in 0usize..1500) {
            let stage = Stage::from_viewport(1280.0, 800.0);
            let mut drink = Drink::default();
            drink.begin_tea();
            let mut last = 0.0f32;
            for _ in 0..ticks {
                drink.pour_tick(POUR_RATE, stage.liquid_max());
                prop_assert!(drink.fill_height >= last);
                last = drink.fill_height;
            }
            let expected = (ticks as f32 * POUR_RATE).min(stage.liquid_max());
            prop_assert!((drink.fill_height - expected).abs() < 0.05);
            prop_assert!(drink.fill_height <= stage.liquid_max());
        }
    }
}
