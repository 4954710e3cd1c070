//! Randomized property checks over the engine's structural invariants.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use matching_engine::{MatchingEngine, OrderListener, TradeListener};
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderConditions, Side, TimeInForce};
use types::trade::Trade;

#[derive(Debug, Clone)]
enum Command {
    Limit {
        side: Side,
        price: i64,
        qty: u64,
        tif: TimeInForce,
    },
    Market {
        side: Side,
        qty: u64,
    },
    Cancel {
        target: u64,
    },
    Replace {
        target: u64,
        price: i64,
        qty: u64,
    },
    SetMarketPrice {
        price: i64,
    },
}

fn command_strategy() -> impl Strategy<Value = Command> {
    let side = prop_oneof![Just(Side::Buy), Just(Side::Sell)];
    let tif = prop_oneof![
        Just(TimeInForce::Gtc),
        Just(TimeInForce::Ioc),
        Just(TimeInForce::Fok),
        Just(TimeInForce::Day),
    ];

    prop_oneof![
        4 => (side.clone(), 14000i64..15000, 1u64..200, tif).prop_map(
            |(side, price, qty, tif)| Command::Limit {
                side,
                price,
                qty,
                tif,
            }
        ),
        1 => (side, 1u64..200).prop_map(|(side, qty)| Command::Market { side, qty }),
        1 => (1u64..300).prop_map(|target| Command::Cancel { target }),
        1 => (1u64..300, 14000i64..15000, 0u64..200).prop_map(|(target, price, qty)| {
            Command::Replace { target, price, qty }
        }),
        1 => (14000i64..15000).prop_map(|price| Command::SetMarketPrice { price }),
    ]
}

fn apply(engine: &mut MatchingEngine, next_id: &mut u64, command: Command) {
    match command {
        Command::Limit {
            side,
            price,
            qty,
            tif,
        } => {
            let order = Order::limit(
                OrderId::new(*next_id),
                Symbol::new("AAPL"),
                side,
                Quantity::new(qty),
                Price::from_ticks(price),
            )
            .with_time_in_force(tif);
            *next_id += 1;
            engine.add_order(order, OrderConditions::NONE);
        }
        Command::Market { side, qty } => {
            let order = Order::market(
                OrderId::new(*next_id),
                Symbol::new("AAPL"),
                side,
                Quantity::new(qty),
            );
            *next_id += 1;
            engine.add_order(order, OrderConditions::NONE);
        }
        Command::Cancel { target } => {
            engine.cancel_order(OrderId::new(target));
        }
        Command::Replace { target, price, qty } => {
            engine.replace_order(
                OrderId::new(target),
                Price::from_ticks(price),
                Quantity::new(qty),
            );
        }
        Command::SetMarketPrice { price } => {
            engine.set_market_price(Price::from_ticks(price));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Aggregates, the location index, the non-crossing settled book, and
    /// the depth mirror hold after every command in a random flow.
    #[test]
    fn book_invariants_hold_under_random_flow(
        commands in prop::collection::vec(command_strategy(), 1..150)
    ) {
        let mut engine = MatchingEngine::new(Symbol::new("AAPL"));
        let mut next_id = 1u64;

        for command in commands {
            apply(&mut engine, &mut next_id, command);

            engine.bid_book().check_integrity().unwrap();
            engine.ask_book().check_integrity().unwrap();
            prop_assert!(!engine.is_crossed(), "settled book must never cross");

            // every depth slot mirrors the books, best first
            for (side_levels, book) in [
                (engine.depth().bid_levels(), engine.bid_book()),
                (engine.depth().ask_levels(), engine.ask_book()),
            ] {
                let expected: Vec<_> = book
                    .levels_best_first()
                    .take(side_levels.len())
                    .map(|level| (level.price(), level.total_quantity(), level.order_count()))
                    .collect();

                for (index, slot) in side_levels.iter().enumerate() {
                    match expected.get(index) {
                        Some(&(price, quantity, count)) => {
                            prop_assert_eq!(slot.price, price);
                            prop_assert_eq!(slot.quantity, quantity);
                            prop_assert_eq!(slot.order_count, count);
                        }
                        None => prop_assert!(slot.is_empty(), "tail slots stay zeroed"),
                    }
                }
            }
        }
    }

    /// A fill-or-kill order either fills in full or produces no fill.
    #[test]
    fn fok_is_atomic(
        resting in prop::collection::vec((14000i64..14100, 1u64..50), 0..10),
        fok_qty in 1u64..200,
    ) {
        let mut engine = MatchingEngine::new(Symbol::new("AAPL"));
        let mut id = 1u64;
        for (price, qty) in resting {
            let order = Order::limit(
                OrderId::new(id),
                Symbol::new("AAPL"),
                Side::Sell,
                Quantity::new(qty),
                Price::from_ticks(price),
            );
            id += 1;
            engine.add_order(order, OrderConditions::NONE);
        }

        let volume_before = engine.stats().volume();
        let fok = Order::limit(
            OrderId::new(id),
            Symbol::new("AAPL"),
            Side::Buy,
            Quantity::new(fok_qty),
            Price::from_ticks(14100),
        )
        .with_time_in_force(TimeInForce::Fok);
        let filled = engine.add_order(fok, OrderConditions::NONE);

        let traded = engine.stats().volume() - volume_before;
        if filled {
            prop_assert_eq!(traded, fok_qty, "fill-or-kill must fill in full");
        } else {
            prop_assert_eq!(traded, 0, "a killed order must leave no fills");
        }
    }
}

/// Per-order accounting over a deterministic pseudo-random session:
/// open + filled + cancelled quantity always equals the original size.
#[test]
fn random_flow_conserves_quantity() {
    #[derive(Default)]
    struct Ledger {
        // order id -> (open at accept, filled, released by cancel/replace)
        entries: Mutex<std::collections::HashMap<u64, (u64, u64, u64)>>,
    }

    impl OrderListener for Ledger {
        fn on_accept(&self, order: &Order) {
            self.entries
                .lock()
                .unwrap()
                .entry(order.id.value())
                .or_insert((order.open_quantity.value(), 0, 0));
        }

        fn on_cancel(&self, order: &Order, cancelled_quantity: Quantity) {
            if let Some(entry) = self.entries.lock().unwrap().get_mut(&order.id.value()) {
                entry.2 += cancelled_quantity.value();
            }
        }

        fn on_replace(&self, old_order: &Order, new_order: &Order) {
            let mut entries = self.entries.lock().unwrap();
            let Some(entry) = entries.get_mut(&old_order.id.value()) else {
                return;
            };
            if old_order.id == new_order.id {
                // in-place size-down releases the difference
                entry.2 += old_order.open_quantity.value() - new_order.open_quantity.value();
            } else {
                // the remainder migrated to the successor id
                entry.2 += old_order.open_quantity.value();
            }
        }
    }

    impl TradeListener for Ledger {
        fn on_trade(
            &self,
            _trade: &Trade,
            inbound: &Order,
            resting: &Order,
            quantity: Quantity,
            _price: Price,
            _inbound_filled: bool,
            _resting_filled: bool,
        ) {
            let mut entries = self.entries.lock().unwrap();
            if let Some(entry) = entries.get_mut(&inbound.id.value()) {
                entry.1 += quantity.value();
            }
            if let Some(entry) = entries.get_mut(&resting.id.value()) {
                entry.1 += quantity.value();
            }
        }
    }

    let mut engine = MatchingEngine::new(Symbol::new("AAPL"));
    let ledger = Arc::new(Ledger::default());
    engine.add_order_listener(ledger.clone());
    engine.add_trade_listener(ledger.clone());

    let mut rng = StdRng::seed_from_u64(7);
    let mut next_id = 1u64;

    for _ in 0..2_000 {
        match rng.gen_range(0u32..10) {
            0..=6 => {
                let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                let price = rng.gen_range(14900i64..15100);
                let qty = rng.gen_range(1u64..100);
                let order = Order::limit(
                    OrderId::new(next_id),
                    Symbol::new("AAPL"),
                    side,
                    Quantity::new(qty),
                    Price::from_ticks(price),
                );
                next_id += 1;
                engine.add_order(order, OrderConditions::NONE);
            }
            7 => {
                let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                let qty = rng.gen_range(1u64..150);
                let order = Order::market(
                    OrderId::new(next_id),
                    Symbol::new("AAPL"),
                    side,
                    Quantity::new(qty),
                );
                next_id += 1;
                engine.add_order(order, OrderConditions::NONE);
            }
            8 => {
                let target = rng.gen_range(1..next_id.max(2));
                engine.cancel_order(OrderId::new(target));
            }
            _ => {
                let target = rng.gen_range(1..next_id.max(2));
                let qty = rng.gen_range(0u64..120);
                engine.replace_order(OrderId::new(target), Price::UNCHANGED, Quantity::new(qty));
            }
        }

        engine.bid_book().check_integrity().unwrap();
        engine.ask_book().check_integrity().unwrap();
        assert!(!engine.is_crossed());
    }

    // every order the engine accepted accounts for its full size: what is
    // still open plus fills plus released quantity equals the open size it
    // was accepted with
    let entries = ledger.entries.lock().unwrap();
    assert!(!entries.is_empty());
    for (&id, &(accepted_open, filled, released)) in entries.iter() {
        let open = engine
            .open_order(&OrderId::new(id))
            .map(|o| o.open_quantity.value())
            .unwrap_or(0);
        assert_eq!(
            open + filled + released,
            accepted_open,
            "order {id} accounts for {} of {accepted_open}",
            open + filled + released
        );
    }
}
