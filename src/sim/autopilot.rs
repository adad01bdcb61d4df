//! Attract-mode bot
//!
//! Plays a session from snapshots alone, issuing the same intents a player
//! would. Used by the headless runner and as the title-screen demo.

use super::snapshot::Snapshot;
use super::state::GamePhase;
use super::tick::Intent;

/// Ticks between boba drops
const DROP_INTERVAL: u64 = 4;
/// Ticks to wait for a missing item before dropping a replacement
const REDROP_TICKS: u64 = 90;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    last_drop_tick: Option<u64>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents for this frame, given the latest snapshot
    pub fn decide(&mut self, snap: &Snapshot) -> Vec<Intent> {
        let mut intents = Vec::new();
        match snap.phase {
            GamePhase::Opening => {
                if snap.start_available {
                    intents.push(Intent::Start);
                }
            }
            GamePhase::Ordering => {
                // Let the bubble finish before answering
                if snap.order_lines == 3 {
                    intents.push(Intent::SubmitOrder);
                }
            }
            GamePhase::MakingDrink => self.make_drink(snap, &mut intents),
            GamePhase::CustomerEnter => self.last_drop_tick = None,
            GamePhase::ServingCustomer | GamePhase::ServeDrink | GamePhase::GameEnd => {}
        }
        intents
    }

    fn make_drink(&mut self, snap: &Snapshot, intents: &mut Vec<Intent>) {
        if snap.serve_busy() {
            return;
        }
        let recipe = snap.recipe;
        let now = snap.time_ticks;

        // Tea first; milk only flows while tea is released, so it waits
        let tea_done = snap.tea_percent >= recipe.tea_percent_target as f32;
        match (snap.pouring_tea, tea_done) {
            (false, false) => intents.push(Intent::BeginTeaPour),
            (true, true) => intents.push(Intent::EndTeaPour),
            _ => {}
        }
        let milk_done = snap.milk_percent >= recipe.milk_percent_target as f32;
        match (snap.pouring_milk, milk_done) {
            (false, false) if tea_done => intents.push(Intent::BeginMilkPour),
            (true, true) => intents.push(Intent::EndMilkPour),
            _ => {}
        }

        let since_drop = self.last_drop_tick.map_or(u64::MAX, |t| now.saturating_sub(t));
        let dropped = snap.items.len() as u32;
        let want_more = dropped < recipe.boba_target && since_drop >= DROP_INTERVAL;
        // Something bounced out; replace it once the rest had time to settle
        let replace_lost = dropped >= recipe.boba_target
            && snap.items_in_cup < recipe.boba_target
            && since_drop >= REDROP_TICKS;
        if want_more || replace_lost {
            intents.push(Intent::DropBoba);
            self.last_drop_tick = Some(now);
            return;
        }

        let settled = snap.items_in_cup as usize == snap.items.len();
        if tea_done && milk_done && settled && snap.items_in_cup >= recipe.boba_target {
            intents.push(Intent::Serve);
        }
    }
}
