//! Core domain types for the matching engine: orders and trades.

use common::Side;
use serde::{Deserialize, Serialize};

/// A resident or in-flight limit order.
///
/// `id` is supplied by the caller and is never interpreted by the engine
/// beyond echoing it back in trades. `sequence` is assigned by the engine's
/// ingestion worker and is used only to break ties between orders resting
/// at the same price (earliest arrival wins); it is not part of the order's
/// public identity.
///
/// `heap_index` is bookkeeping owned by whichever [`PriorityBook`] the order
/// currently resides in: it mirrors the order's position in that book's
/// backing array so the book can relocate the order in `O(log n)` without a
/// linear scan. It is `-1` whenever the order is not resident in a book
/// (freshly submitted, popped during a match, or fully filled).
///
/// [`PriorityBook`]: crate::book::PriorityBook
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub side: Side,
    pub price: f64,
    pub amount: u64,
    pub sequence: u64,
    #[serde(default = "Order::absent_index")]
    pub heap_index: i64,
}

impl Order {
    /// Sentinel value for `heap_index` when the order is not resident in a
    /// book's backing array.
    pub const ABSENT: i64 = -1;

    fn absent_index() -> i64 {
        Self::ABSENT
    }

    /// Build a freshly submitted order. `sequence` and `heap_index` are
    /// assigned by the engine, not the caller, so they start at their
    /// not-yet-meaningful defaults.
    pub fn new(id: i64, side: Side, price: f64, amount: u64) -> Self {
        Self {
            id,
            side,
            price,
            amount,
            sequence: 0,
            heap_index: Self::ABSENT,
        }
    }

    /// Basic sanity check applied before an order is allowed onto the
    /// ingress channel: finite positive price, positive amount.
    pub fn is_well_formed(&self) -> bool {
        self.price.is_finite() && self.price > 0.0 && self.amount > 0
    }
}

/// A completed trade between a resting order and its counterparty. Derived,
/// not stored by the core; the engine hands each one to a
/// [`TradeSink`](crate::sink::TradeSink) and otherwise forgets it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub buy_id: i64,
    pub sell_id: i64,
    pub price: f64,
    pub quantity: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_rejects_bad_price_and_amount() {
        assert!(Order::new(1, Side::Buy, 100.0, 5).is_well_formed());
        assert!(!Order::new(1, Side::Buy, 0.0, 5).is_well_formed());
        assert!(!Order::new(1, Side::Buy, -5.0, 5).is_well_formed());
        assert!(!Order::new(1, Side::Buy, f64::INFINITY, 5).is_well_formed());
        assert!(!Order::new(1, Side::Buy, 100.0, 0).is_well_formed());
    }

    #[test]
    fn new_order_starts_with_absent_heap_index() {
        let order = Order::new(7, Side::Sell, 50.0, 3);
        assert_eq!(order.heap_index, Order::ABSENT);
    }
}
