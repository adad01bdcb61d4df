//! Customers and the exhaust-once arrival queue

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Who walks up to the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerKind {
    Cat,
    Dog,
    Crab,
    Snake,
    Pig,
}

impl CustomerKind {
    pub const ALL: [CustomerKind; 5] = [
        CustomerKind::Cat,
        CustomerKind::Dog,
        CustomerKind::Crab,
        CustomerKind::Snake,
        CustomerKind::Pig,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerKind::Cat => "cat",
            CustomerKind::Dog => "dog",
            CustomerKind::Crab => "crab",
            CustomerKind::Snake => "snake",
            CustomerKind::Pig => "pig",
        }
    }
}

/// Shuffled queue: every kind appears once before any repeats
#[derive(Debug, Clone, Default)]
pub struct CustomerQueue {
    pending: VecDeque<CustomerKind>,
}

impl CustomerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the next customer, refilling and reshuffling only when empty
    pub fn pop_next(&mut self, rng: &mut impl Rng) -> CustomerKind {
        if self.pending.is_empty() {
            let mut kinds = CustomerKind::ALL;
            kinds.shuffle(rng);
            self.pending.extend(kinds);
            log::debug!("Customer queue refilled: {:?}", self.pending);
        }
        // Just refilled if it was empty
        self.pending.pop_front().unwrap_or(CustomerKind::Cat)
    }

    /// Customers left before the next reshuffle
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}
