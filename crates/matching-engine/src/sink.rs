//! Trade sinks: the side-effecting consumer of completed trades.
//!
//! The matcher does not know or care what happens to a [`Trade`] once it is
//! produced; it hands each one to a `TradeSink` and moves on. This mirrors
//! the matching engine decoupling its own logic from any particular
//! downstream consumer via a narrow trait rather than a direct call.

use tracing::info;

use crate::domain::Trade;

/// Receives trades as the matcher produces them, in emission order.
///
/// Implementations must not block the matcher for long: `on_trade` is
/// called synchronously from inside the matching sweep, with no book lock
/// held.
pub trait TradeSink: Send + Sync {
    fn on_trade(&self, trade: &Trade);
}

/// Default sink: logs every trade at `info` level and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTradeSink;

impl TradeSink for LoggingTradeSink {
    fn on_trade(&self, trade: &Trade) {
        info!(
            buy_id = trade.buy_id,
            sell_id = trade.sell_id,
            price = trade.price,
            quantity = trade.quantity,
            "trade executed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        trades: Mutex<Vec<Trade>>,
    }

    impl TradeSink for RecordingSink {
        fn on_trade(&self, trade: &Trade) {
            self.trades.lock().unwrap().push(*trade);
        }
    }

    #[test]
    fn sink_receives_trade() {
        let sink = RecordingSink::default();
        let trade = Trade {
            buy_id: 1,
            sell_id: 2,
            price: 100.0,
            quantity: 5,
        };
        sink.on_trade(&trade);
        assert_eq!(sink.trades.lock().unwrap().as_slice(), &[trade]);
    }

    #[test]
    fn logging_sink_does_not_panic() {
        let sink = LoggingTradeSink;
        sink.on_trade(&Trade {
            buy_id: 1,
            sell_id: 2,
            price: 100.0,
            quantity: 1,
        });
    }
}
