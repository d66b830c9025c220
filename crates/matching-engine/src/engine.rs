//! The matching engine: two price-priority books, an ingress channel with a
//! single insertion worker, and a matcher that sweeps crossed orders.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::Side;
use config::MatchingConfig;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::book::PriorityBook;
use crate::domain::Order;
use crate::error::MatchingError;
use crate::sink::TradeSink;

/// Either end of the ingress channel, bounded or unbounded depending on
/// `MatchingConfig::ingress_capacity`. A capacity of `0` selects the
/// unbounded variant so `submit` never blocks on backpressure.
enum IngressSender {
    Bounded(mpsc::Sender<Order>),
    Unbounded(mpsc::UnboundedSender<Order>),
}

pub enum IngressReceiver {
    Bounded(mpsc::Receiver<Order>),
    Unbounded(mpsc::UnboundedReceiver<Order>),
}

impl IngressSender {
    async fn send(&self, order: Order) -> Result<(), MatchingError> {
        let sent = match self {
            IngressSender::Bounded(tx) => tx.send(order).await.is_ok(),
            IngressSender::Unbounded(tx) => tx.send(order).is_ok(),
        };
        if sent {
            Ok(())
        } else {
            Err(MatchingError::Internal("ingress channel closed".to_string()))
        }
    }
}

impl IngressReceiver {
    async fn recv(&mut self) -> Option<Order> {
        match self {
            IngressReceiver::Bounded(rx) => rx.recv().await,
            IngressReceiver::Unbounded(rx) => rx.recv().await,
        }
    }
}

/// Owns the two books, the ingress channel's send half, and the matching
/// cadence. Created once at process startup; its two workers
/// ([`Engine::run_ingestion`] and [`Engine::run_matcher`]) run for the
/// lifetime of the process and are only stopped by cancelling the token
/// passed to them.
pub struct Engine {
    buy_book: Mutex<PriorityBook>,
    sell_book: Mutex<PriorityBook>,
    ingress_tx: IngressSender,
    sequence: AtomicU64,
    sink: Arc<dyn TradeSink>,
    sweep_interval: Duration,
}

impl Engine {
    /// Builds the engine and the receive half of its ingress channel. The
    /// caller is responsible for spawning [`Engine::run_ingestion`] and
    /// [`Engine::run_matcher`] as long-lived tasks.
    pub fn new(config: &MatchingConfig, sink: Arc<dyn TradeSink>) -> (Arc<Self>, IngressReceiver) {
        let (ingress_tx, ingress_rx) = if config.ingress_capacity > 0 {
            let (tx, rx) = mpsc::channel(config.ingress_capacity);
            (IngressSender::Bounded(tx), IngressReceiver::Bounded(rx))
        } else {
            let (tx, rx) = mpsc::unbounded_channel();
            (IngressSender::Unbounded(tx), IngressReceiver::Unbounded(rx))
        };

        let engine = Arc::new(Self {
            buy_book: Mutex::new(PriorityBook::new(Side::Buy)),
            sell_book: Mutex::new(PriorityBook::new(Side::Sell)),
            ingress_tx,
            sequence: AtomicU64::new(0),
            sink,
            sweep_interval: Duration::from_millis(config.sweep_interval_ms.max(1)),
        });

        (engine, ingress_rx)
    }

    /// Enqueues an order for insertion. Returns once the order is handed
    /// off to the ingress channel, not once it has been matched or even
    /// inserted into its book. Rejects malformed orders (non-finite or
    /// non-positive price, zero or negative amount) before they ever reach
    /// a book.
    pub async fn submit(&self, mut order: Order) -> Result<(), MatchingError> {
        if !order.is_well_formed() {
            warn!(id = order.id, price = order.price, amount = order.amount, "rejected malformed order");
            return Err(MatchingError::InvalidOrder(format!(
                "order {} has non-positive price or amount",
                order.id
            )));
        }
        order.sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        order.heap_index = Order::ABSENT;
        self.ingress_tx.send(order).await
    }

    /// Drains the ingress channel, pushing each order into its side's book
    /// under that side's lock only. Runs until the channel closes or
    /// `cancel` fires.
    pub async fn run_ingestion(self: Arc<Self>, mut rx: IngressReceiver, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("ingestion worker cancelled");
                    return;
                }
                received = rx.recv() => {
                    match received {
                        Some(order) => {
                            debug!(id = order.id, side = %order.side, price = order.price, amount = order.amount, "accepted order");
                            match order.side {
                                Side::Buy => self.buy_book.lock().push(order),
                                Side::Sell => self.sell_book.lock().push(order),
                            }
                        }
                        None => {
                            debug!("ingress channel closed, ingestion worker exiting");
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Sleeps for the configured sweep interval, then runs a matching
    /// sweep, repeating until `cancel` fires.
    pub async fn run_matcher(self: Arc<Self>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("matcher worker cancelled");
                    return;
                }
                _ = tokio::time::sleep(self.sweep_interval) => {
                    self.sweep();
                }
            }
        }
    }

    /// Runs the matching sweep to exhaustion: repeatedly pops the top of
    /// each book, crosses them if possible, and continues until either
    /// book is empty or the top two no longer cross. Never holds both
    /// book locks at once.
    fn sweep(&self) {
        loop {
            let best_buy = match self.buy_book.lock().pop() {
                Some(order) => order,
                None => return,
            };

            let best_sell = match self.sell_book.lock().pop() {
                Some(order) => order,
                None => {
                    self.buy_book.lock().push(best_buy);
                    return;
                }
            };

            if best_buy.price < best_sell.price {
                self.buy_book.lock().push(best_buy);
                self.sell_book.lock().push(best_sell);
                return;
            }

            let quantity = best_buy.amount.min(best_sell.amount);
            let trade_price = best_sell.price;

            let mut buy_remainder = best_buy;
            let mut sell_remainder = best_sell;
            buy_remainder.amount -= quantity;
            sell_remainder.amount -= quantity;

            self.sink.on_trade(&crate::domain::Trade {
                buy_id: buy_remainder.id,
                sell_id: sell_remainder.id,
                price: trade_price,
                quantity,
            });

            if buy_remainder.amount > 0 {
                self.buy_book.lock().push(buy_remainder);
            }
            if sell_remainder.amount > 0 {
                self.sell_book.lock().push(sell_remainder);
            }

            if self.buy_book.lock().is_empty() || self.sell_book.lock().is_empty() {
                return;
            }
        }
    }

    /// Top of the buy book, by value. `None` if the book is empty.
    pub fn best_buy(&self) -> Option<Order> {
        self.buy_book.lock().peek().copied()
    }

    /// Top of the sell book, by value. `None` if the book is empty.
    pub fn best_sell(&self) -> Option<Order> {
        self.sell_book.lock().peek().copied()
    }

    /// Diagnostic snapshot of both books. Each lock is acquired and
    /// released independently, so the pair is not guaranteed to reflect a
    /// single consistent instant if a sweep runs concurrently: this engine
    /// never holds both book locks at once.
    pub fn book_snapshot(&self) -> (Vec<Order>, Vec<Order>) {
        (self.buy_book.lock().snapshot(), self.sell_book.lock().snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::TradeSink;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingSink {
        trades: StdMutex<Vec<crate::domain::Trade>>,
    }

    impl TradeSink for RecordingSink {
        fn on_trade(&self, trade: &crate::domain::Trade) {
            self.trades.lock().unwrap().push(*trade);
        }
    }

    fn test_config() -> MatchingConfig {
        MatchingConfig {
            ingress_capacity: 64,
            sweep_interval_ms: 50,
            trade_price_rule: "maker".to_string(),
        }
    }

    fn test_engine() -> (Arc<Engine>, IngressReceiver, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let (engine, rx) = Engine::new(&test_config(), sink.clone());
        (engine, rx, sink)
    }

    async fn drain_one(engine: &Arc<Engine>, rx: &mut IngressReceiver, order: Order) {
        engine.submit(order).await.unwrap();
        let received = rx.recv().await.unwrap();
        match received.side {
            Side::Buy => engine.buy_book.lock().push(received),
            Side::Sell => engine.sell_book.lock().push(received),
        }
    }

    #[tokio::test]
    async fn single_trivial_match() {
        let (engine, mut rx, sink) = test_engine();
        drain_one(&engine, &mut rx, Order::new(1, Side::Buy, 100.0, 5)).await;
        drain_one(&engine, &mut rx, Order::new(2, Side::Sell, 100.0, 5)).await;

        engine.sweep();

        let trades = sink.trades.lock().unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buy_id, 1);
        assert_eq!(trades[0].sell_id, 2);
        assert_eq!(trades[0].price, 100.0);
        assert_eq!(trades[0].quantity, 5);
        assert!(engine.best_buy().is_none());
        assert!(engine.best_sell().is_none());
    }

    #[tokio::test]
    async fn partial_fill_on_buy() {
        let (engine, mut rx, sink) = test_engine();
        drain_one(&engine, &mut rx, Order::new(1, Side::Buy, 100.0, 10)).await;
        drain_one(&engine, &mut rx, Order::new(2, Side::Sell, 100.0, 3)).await;

        engine.sweep();

        let trades = sink.trades.lock().unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 3);
        let remaining = engine.best_buy().unwrap();
        assert_eq!(remaining.id, 1);
        assert_eq!(remaining.amount, 7);
        assert!(engine.best_sell().is_none());
    }

    #[tokio::test]
    async fn no_cross_leaves_both_tops_in_place() {
        let (engine, mut rx, sink) = test_engine();
        drain_one(&engine, &mut rx, Order::new(1, Side::Buy, 99.0, 5)).await;
        drain_one(&engine, &mut rx, Order::new(2, Side::Sell, 101.0, 5)).await;

        engine.sweep();

        assert!(sink.trades.lock().unwrap().is_empty());
        assert_eq!(engine.best_buy().unwrap().id, 1);
        assert_eq!(engine.best_sell().unwrap().id, 2);
    }

    #[tokio::test]
    async fn cascaded_matches_drain_multiple_buy_levels() {
        let (engine, mut rx, sink) = test_engine();
        drain_one(&engine, &mut rx, Order::new(1, Side::Buy, 105.0, 4)).await;
        drain_one(&engine, &mut rx, Order::new(2, Side::Buy, 100.0, 2)).await;
        drain_one(&engine, &mut rx, Order::new(3, Side::Sell, 99.0, 5)).await;

        engine.sweep();

        let trades = sink.trades.lock().unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(
            (trades[0].buy_id, trades[0].sell_id, trades[0].price, trades[0].quantity),
            (1, 3, 99.0, 4)
        );
        assert_eq!(
            (trades[1].buy_id, trades[1].sell_id, trades[1].price, trades[1].quantity),
            (2, 3, 99.0, 1)
        );
        assert!(engine.best_sell().is_none());
        let remaining = engine.best_buy().unwrap();
        assert_eq!(remaining.id, 2);
        assert_eq!(remaining.amount, 1);
    }

    #[tokio::test]
    async fn price_priority_wins_over_arrival_order() {
        let (engine, mut rx, sink) = test_engine();
        drain_one(&engine, &mut rx, Order::new(1, Side::Buy, 100.0, 1)).await;
        drain_one(&engine, &mut rx, Order::new(2, Side::Buy, 105.0, 1)).await;
        drain_one(&engine, &mut rx, Order::new(3, Side::Sell, 100.0, 1)).await;

        engine.sweep();

        let trades = sink.trades.lock().unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buy_id, 2);
        assert_eq!(trades[0].sell_id, 3);
        assert_eq!(engine.best_buy().unwrap().id, 1);
    }

    #[tokio::test]
    async fn malformed_order_is_rejected_before_ingress() {
        let (engine, _rx, _sink) = test_engine();
        let result = engine.submit(Order::new(1, Side::Buy, -5.0, 3)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn stress_concurrent_producers_preserve_invariants() {
        let mut fast_config = test_config();
        fast_config.sweep_interval_ms = 1;
        let sink = Arc::new(RecordingSink::default());
        let (engine, rx) = Engine::new(&fast_config, sink.clone());
        let cancel = CancellationToken::new();

        let ingestion = tokio::spawn(engine.clone().run_ingestion(rx, cancel.clone()));
        let matcher = tokio::spawn(engine.clone().run_matcher(cancel.clone()));

        let mut producers = Vec::new();
        for producer_id in 0..8u64 {
            let engine = engine.clone();
            producers.push(tokio::spawn(async move {
                for i in 0..1250u64 {
                    let id = (producer_id * 1250 + i) as i64;
                    let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                    let price = 90.0 + ((id % 21) as f64);
                    engine.submit(Order::new(id, side, price, 1)).await.unwrap();
                }
            }));
        }
        for producer in producers {
            producer.await.unwrap();
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
        let _ = ingestion.await;
        let _ = matcher.await;

        engine.sweep();

        engine.buy_book.lock().check_invariants();
        engine.sell_book.lock().check_invariants();

        let total_quantity: u64 = sink.trades.lock().unwrap().iter().map(|t| t.quantity).sum();
        let (remaining_buys, remaining_sells) = engine.book_snapshot();
        let remaining_quantity: u64 =
            remaining_buys.iter().chain(remaining_sells.iter()).map(|o| o.amount).sum();
        assert_eq!(total_quantity * 2 + remaining_quantity, 10_000);
    }
}
