//! Match plans
//!
//! A plan is the read-only result of walking the opposite side: which
//! resting orders would trade, at what price, for how much. Nothing is
//! committed until the engine charges the book, so feasibility checks
//! (fill-or-kill, all-or-none) can inspect the plan first.

use types::ids::OrderId;
use types::numeric::{Price, Quantity};

/// One resting order an aggressor would trade against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    pub order_id: OrderId,
    /// Level price, which is also the prospective fill price
    pub price: Price,
    /// The resting order's full open quantity
    pub available: Quantity,
    /// Matchable quantity, capped at what the aggressor still wants
    pub quantity: Quantity,
}

/// Candidates in matching order: best price first, FIFO within a price.
#[derive(Debug, Clone, Default)]
pub struct MatchPlan {
    candidates: Vec<MatchCandidate>,
}

impl MatchPlan {
    pub fn new(candidates: Vec<MatchCandidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[MatchCandidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Total matchable quantity across all candidates.
    pub fn total(&self) -> Quantity {
        self.candidates.iter().map(|c| c.quantity).sum()
    }

    /// Largest open quantity any single candidate offers.
    pub fn largest_available(&self) -> Quantity {
        self.candidates
            .iter()
            .map(|c| c.available)
            .max()
            .unwrap_or(Quantity::ZERO)
    }

    /// Per-level slices in matching order: (price, planned quantity).
    pub fn levels(&self) -> Vec<(Price, Quantity)> {
        let mut levels: Vec<(Price, Quantity)> = Vec::new();
        for candidate in &self.candidates {
            match levels.last_mut() {
                Some((price, quantity)) if *price == candidate.price => {
                    *quantity += candidate.quantity;
                }
                _ => levels.push((candidate.price, candidate.quantity)),
            }
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64, price: i64, qty: u64) -> MatchCandidate {
        MatchCandidate {
            order_id: OrderId::new(id),
            price: Price::from_ticks(price),
            available: Quantity::new(qty),
            quantity: Quantity::new(qty),
        }
    }

    #[test]
    fn test_totals() {
        let plan = MatchPlan::new(vec![
            candidate(1, 14950, 50),
            candidate(2, 15000, 30),
        ]);
        assert_eq!(plan.total(), Quantity::new(80));
        assert_eq!(plan.largest_available(), Quantity::new(50));
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_available_is_not_capped() {
        let mut uncapped = candidate(1, 15000, 100);
        uncapped.quantity = Quantity::new(40);

        let plan = MatchPlan::new(vec![uncapped]);
        assert_eq!(plan.total(), Quantity::new(40));
        assert_eq!(plan.largest_available(), Quantity::new(100));
    }

    #[test]
    fn test_levels_groups_adjacent_candidates() {
        let plan = MatchPlan::new(vec![
            candidate(1, 14950, 20),
            candidate(2, 14950, 30),
            candidate(3, 15000, 10),
        ]);

        assert_eq!(
            plan.levels(),
            vec![
                (Price::from_ticks(14950), Quantity::new(50)),
                (Price::from_ticks(15000), Quantity::new(10)),
            ]
        );
    }

    #[test]
    fn test_empty_plan() {
        let plan = MatchPlan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.total(), Quantity::ZERO);
        assert_eq!(plan.largest_available(), Quantity::ZERO);
        assert!(plan.levels().is_empty());
    }
}
