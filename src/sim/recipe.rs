//! Recipes, drink measurement and tiered scoring

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Target boba count range (inclusive)
pub const BOBA_TARGET_RANGE: std::ops::RangeInclusive<u32> = 20..=30;
/// Target tea percentage range (inclusive)
pub const TEA_TARGET_RANGE: std::ops::RangeInclusive<u32> = 20..=79;
/// Target milk percentage range (inclusive)
pub const MILK_TARGET_RANGE: std::ops::RangeInclusive<u32> = 10..=69;

/// What the current customer ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub boba_target: u32,
    pub tea_percent_target: u32,
    pub milk_percent_target: u32,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            boba_target: 25,
            tea_percent_target: 40,
            milk_percent_target: 20,
        }
    }
}

impl Recipe {
    /// Draw each target independently and uniformly
    pub fn generate(rng: &mut impl Rng) -> Self {
        Self {
            boba_target: rng.random_range(BOBA_TARGET_RANGE),
            tea_percent_target: rng.random_range(TEA_TARGET_RANGE),
            milk_percent_target: rng.random_range(MILK_TARGET_RANGE),
        }
    }
}

/// The drink as the customer will judge it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrinkMeasure {
    pub boba_count: u32,
    pub tea_percent: f32,
    pub milk_percent: f32,
}

/// Scoring outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Perfect,
    Good,
    Okay,
    TryAgain,
}

impl Tier {
    pub fn from_points(points: u8) -> Self {
        match points {
            3.. => Tier::Perfect,
            2 => Tier::Good,
            1 => Tier::Okay,
            0 => Tier::TryAgain,
        }
    }

    /// Banner text
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Perfect => "⭐⭐⭐ Perfect!",
            Tier::Good => "⭐⭐ Good!",
            Tier::Okay => "⭐ Okay",
            Tier::TryAgain => "❌ Try Again!",
        }
    }

    pub fn score_award(&self) -> u32 {
        match self {
            Tier::Perfect => 100,
            Tier::Good => 50,
            Tier::Okay => 20,
            Tier::TryAgain => 0,
        }
    }
}

/// Per-axis match result and total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub boba_ok: bool,
    pub tea_ok: bool,
    pub milk_ok: bool,
    pub tier: Tier,
}

impl Verdict {
    pub fn points(&self) -> u8 {
        self.boba_ok as u8 + self.tea_ok as u8 + self.milk_ok as u8
    }
}

/// Compare a measured drink against the order
///
/// Boba must match exactly; tea and milk pass within `tolerance` percentage
/// points, inclusive.
pub fn score_drink(measure: &DrinkMeasure, recipe: &Recipe, tolerance: f32) -> Verdict {
    let boba_ok = measure.boba_count == recipe.boba_target;
    let tea_ok = (measure.tea_percent - recipe.tea_percent_target as f32).abs() <= tolerance;
    let milk_ok = (measure.milk_percent - recipe.milk_percent_target as f32).abs() <= tolerance;
    let points = boba_ok as u8 + tea_ok as u8 + milk_ok as u8;
    Verdict {
        boba_ok,
        tea_ok,
        milk_ok,
        tier: Tier::from_points(points),
    }
}

/// Money, score and combo bookkeeping for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub money: u32,
    pub combo_streak: u32,
    pub total_score: u32,
}

impl Ledger {
    /// Book a verdict and return the money earned
    pub fn settle(&mut self, tier: Tier) -> u32 {
        let earned = match tier {
            Tier::Perfect => {
                self.combo_streak += 1;
                20 + self.combo_streak * 3
            }
            Tier::Good => 10,
            Tier::Okay => 5,
            Tier::TryAgain => 0,
        };
        if tier != Tier::Perfect {
            self.combo_streak = 0;
        }
        self.money += earned;
        self.total_score += tier.score_award();
        earned
    }
}

/// Colour band of a progress meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeterStatus {
    Under,
    OnTarget,
    Over,
}

/// One progress meter: current value against the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    pub value: u32,
    pub target: u32,
    pub status: MeterStatus,
}

impl Meter {
    pub fn new(value: u32, target: u32) -> Self {
        let status = if value > target {
            MeterStatus::Over
        } else if value + 5 >= target {
            MeterStatus::OnTarget
        } else {
            MeterStatus::Under
        };
        Self {
            value,
            target,
            status,
        }
    }
}

/// End-of-session rating by total score
pub fn rating(total_score: u32) -> &'static str {
    match total_score {
        450.. => "🏆 Master Chef!",
        350.. => "🌟 Top Barista!",
        250.. => "👍 Keep Improving!",
        150.. => "😊 Practice Makes Perfect!",
        _ => "💪 Keep Practicing!",
    }
}
