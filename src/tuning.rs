//! Data-driven game balance
//!
//! Every rate, delay and cap the simulation uses. Defaults come from
//! [`crate::consts`]; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },
    #[error("{field} must allow at least one entry")]
    ZeroCapacity { field: &'static str },
    #[error("tolerance must be within 0..=100 percentage points")]
    InvalidTolerance,
}

/// Balance constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fill added per tick while a pour is held
    pub pour_rate: f32,
    /// Straw insertion progress per tick
    pub straw_rate: f32,
    /// Mixing progress per tick
    pub mix_rate: f32,
    /// Serve animation progress per tick
    pub serve_rate: f32,
    /// Delay from verdict to the serving animation
    pub verdict_delay_ms: f32,
    /// Verdict banner lifetime
    pub feedback_ticks: u32,
    /// Item cap inside the cup
    pub max_items: usize,
    /// Customers per session
    pub max_customers: u32,
    /// Opening gate before Start is accepted
    pub start_gate_ms: f32,
    /// Customer walk-in duration
    pub entry_ms: f32,
    /// Tea/milk tolerance in percentage points (inclusive)
    pub tolerance_percent: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pour_rate: POUR_RATE,
            straw_rate: STRAW_RATE,
            mix_rate: MIX_RATE,
            serve_rate: SERVE_RATE,
            verdict_delay_ms: VERDICT_DELAY_MS,
            feedback_ticks: FEEDBACK_TICKS,
            max_items: MAX_ITEMS,
            max_customers: MAX_CUSTOMERS,
            start_gate_ms: START_GATE_MS,
            entry_ms: ENTRY_MS,
            tolerance_percent: TOLERANCE_PERCENT,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()
    }

    /// Reject values that would stall or break the state machine
    pub fn validate(self) -> Result<Self, TuningError> {
        let rates = [
            ("pour_rate", self.pour_rate),
            ("straw_rate", self.straw_rate),
            ("mix_rate", self.mix_rate),
            ("serve_rate", self.serve_rate),
            ("entry_ms", self.entry_ms),
        ];
        for (field, value) in rates {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field });
            }
        }
        if !(self.verdict_delay_ms >= 0.0) {
            return Err(TuningError::NonPositive {
                field: "verdict_delay_ms",
            });
        }
        if self.max_items == 0 {
            return Err(TuningError::ZeroCapacity { field: "max_items" });
        }
        if self.max_customers == 0 {
            return Err(TuningError::ZeroCapacity {
                field: "max_customers",
            });
        }
        if !(0.0..=100.0).contains(&self.tolerance_percent) {
            return Err(TuningError::InvalidTolerance);
        }
        Ok(self)
    }
}
