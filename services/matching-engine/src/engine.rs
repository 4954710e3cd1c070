//! Matching engine core
//!
//! One engine instance serves one instrument. It validates inbound
//! commands, crosses aggressive orders against the opposite side under
//! price-time priority, activates stop orders on market price movement,
//! and fans out trade and book-state events to registered listeners.
//!
//! The engine is a single-writer state machine: every mutating operation
//! takes `&mut self`, which makes the borrow checker the serialization
//! authority. Market price, last trade, and the counters are atomics so
//! readers can sample them without coordinating with the writer. Events
//! stage in a buffer during the mutation and dispatch after it settles,
//! giving every listener a consistent post-mutation view.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderConditions, OrderStatus, OrderType, RejectReason, Side, TimeInForce};

use crate::book::{AmendResult, LevelFill, SideBook, StopBook};
use crate::depth::DepthTracker;
use crate::events::{
    DepthListener, Notification, OrderBookListener, OrderListener, TradeListener,
};
use crate::matching::plan::MatchPlan;
use crate::matching::{can_match, crossing, TradeExecutor};
use crate::stats::EngineStats;

/// Price-time priority matching engine for a single instrument.
pub struct MatchingEngine {
    symbol: Symbol,

    bids: SideBook,
    asks: SideBook,
    stop_bids: StopBook,
    stop_asks: StopBook,

    depth: DepthTracker,
    executor: TradeExecutor,
    stats: EngineStats,

    market_price: AtomicI64,
    last_trade_price: AtomicI64,
    last_trade_quantity: AtomicU64,

    order_listeners: Vec<Arc<dyn OrderListener>>,
    trade_listeners: Vec<Arc<dyn TradeListener>>,
    book_listeners: Vec<Arc<dyn OrderBookListener>>,
    depth_listeners: Vec<Arc<dyn DepthListener>>,

    /// Events staged during the current mutation
    staged: Vec<Notification>,
    /// Best bid and ask after the previous mutation
    last_bbo: (Option<Price>, Option<Price>),
    /// Next id handed to replacement orders
    next_order_id: u64,
}

struct SubmitOutcome {
    any_fill: bool,
    /// True when book state changed (a fill, a rest, or a stop entry)
    mutated: bool,
}

impl MatchingEngine {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: SideBook::new(Side::Buy),
            asks: SideBook::new(Side::Sell),
            stop_bids: StopBook::new(Side::Buy),
            stop_asks: StopBook::new(Side::Sell),
            depth: DepthTracker::new(),
            executor: TradeExecutor::new(1),
            stats: EngineStats::new(),
            market_price: AtomicI64::new(0),
            last_trade_price: AtomicI64::new(0),
            last_trade_quantity: AtomicU64::new(0),
            order_listeners: Vec::new(),
            trade_listeners: Vec::new(),
            book_listeners: Vec::new(),
            depth_listeners: Vec::new(),
            staged: Vec::new(),
            last_bbo: (None, None),
            next_order_id: 1,
        }
    }

    // ========== Listener management ==========

    pub fn add_order_listener(&mut self, listener: Arc<dyn OrderListener>) {
        self.order_listeners.push(listener);
    }

    pub fn remove_order_listener(&mut self, listener: &Arc<dyn OrderListener>) {
        self.order_listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn add_trade_listener(&mut self, listener: Arc<dyn TradeListener>) {
        self.trade_listeners.push(listener);
    }

    pub fn remove_trade_listener(&mut self, listener: &Arc<dyn TradeListener>) {
        self.trade_listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn add_book_listener(&mut self, listener: Arc<dyn OrderBookListener>) {
        self.book_listeners.push(listener);
    }

    pub fn remove_book_listener(&mut self, listener: &Arc<dyn OrderBookListener>) {
        self.book_listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn add_depth_listener(&mut self, listener: Arc<dyn DepthListener>) {
        self.depth_listeners.push(listener);
    }

    pub fn remove_depth_listener(&mut self, listener: &Arc<dyn DepthListener>) {
        self.depth_listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    // ========== Order entry ==========

    /// Accept a new order. Returns true when any quantity filled.
    ///
    /// Rejected orders never touch a book. A limit remainder rests unless
    /// its time-in-force forbids it; a market remainder is cancelled.
    pub fn add_order(&mut self, order: Order, conditions: OrderConditions) -> bool {
        let outcome = self.submit(order, conditions, false);
        let stops_fired = self.drain_stops();
        if outcome.mutated || stops_fired {
            self.stage_book_events();
        }
        self.flush();
        outcome.any_fill
    }

    /// Remove a live order. Unknown ids return false with no events.
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        let mut removed = self.bids.remove(&order_id);
        if removed.is_none() {
            removed = self.asks.remove(&order_id);
        }
        if removed.is_none() {
            removed = self.stop_bids.remove(&order_id);
        }
        if removed.is_none() {
            removed = self.stop_asks.remove(&order_id);
        }

        let Some(mut order) = removed else {
            return false;
        };

        let cancelled_qty = order.open_quantity;
        order.status = OrderStatus::Cancelled;
        self.stats.record_cancelled();
        self.staged.push(Notification::Cancelled(order, cancelled_qty));
        self.stage_book_events();
        self.flush();
        true
    }

    /// Replace a live order's price and/or size.
    ///
    /// Pass `Price::UNCHANGED` / `Quantity::UNCHANGED` to keep a field. A
    /// size decrease keeps time priority; a price change or size increase
    /// retires the old id and submits a successor under a fresh id through
    /// the normal entry path. A waiting stop order is always retired and
    /// resubmitted into its trigger book. Unknown ids return false with no
    /// events.
    pub fn replace_order(
        &mut self,
        order_id: OrderId,
        new_price: Price,
        new_quantity: Quantity,
    ) -> bool {
        if let Some(stop) = self
            .stop_bids
            .get(&order_id)
            .or_else(|| self.stop_asks.get(&order_id))
        {
            let stop = stop.clone();
            return self.replace_stop_order(stop, new_price, new_quantity);
        }

        let current = match self
            .bids
            .get(&order_id)
            .or_else(|| self.asks.get(&order_id))
        {
            Some(order) => order.clone(),
            None => return false,
        };

        let price_changed = !new_price.is_unchanged() && new_price != current.price;
        let target_open = if new_quantity.is_unchanged() {
            current.open_quantity
        } else {
            new_quantity
        };

        if target_open.is_zero() {
            return self.cancel_order(order_id);
        }

        let effective_price = if price_changed { new_price } else { current.price };
        if !effective_price.is_limit() {
            self.staged
                .push(Notification::ReplaceRejected(current, RejectReason::InvalidPrice));
            self.flush();
            return false;
        }

        if !price_changed && target_open <= current.open_quantity {
            // size-down amends in place and keeps time priority
            let book = self.same_book_mut(current.side);
            let Some(AmendResult::Amended { order, .. }) =
                book.amend_quantity(&order_id, target_open)
            else {
                return false;
            };

            self.stats.record_replaced();
            self.staged.push(Notification::Replaced {
                old_order: current,
                new_order: order,
            });
            self.stage_book_events();
            self.flush();
            return true;
        }

        // price change or size increase forfeits priority: retire and resubmit
        let Some(mut old_order) = self.same_book_mut(current.side).remove(&order_id) else {
            return false;
        };
        old_order.status = OrderStatus::Replaced;

        let filled = old_order.filled_quantity();
        let new_id = self.allocate_order_id();
        let mut new_order = Order::limit(
            new_id,
            old_order.symbol.clone(),
            old_order.side,
            filled + target_open,
            effective_price,
        )
        .with_time_in_force(old_order.time_in_force);
        new_order.open_quantity = target_open;

        self.stats.record_replaced();
        self.staged.push(Notification::Replaced {
            old_order,
            new_order: new_order.clone(),
        });

        self.submit(new_order, OrderConditions::NONE, false);
        self.drain_stops();
        self.stage_book_events();
        self.flush();
        true
    }

    /// Replace a stop order waiting in its trigger book.
    ///
    /// Stops carry no queue priority worth preserving, so every change
    /// retires the old id and resubmits a successor; submission routes it
    /// back into the trigger book without matching. A price change only
    /// applies to a stop-limit's limit price; a pure stop has none and the
    /// price argument is ignored.
    fn replace_stop_order(
        &mut self,
        current: Order,
        new_price: Price,
        new_quantity: Quantity,
    ) -> bool {
        let target_open = if new_quantity.is_unchanged() {
            current.open_quantity
        } else {
            new_quantity
        };

        if target_open.is_zero() {
            return self.cancel_order(current.id);
        }

        let price_changed = current.order_type == OrderType::StopLimit
            && !new_price.is_unchanged()
            && new_price != current.price;
        let effective_price = if price_changed { new_price } else { current.price };
        if current.order_type == OrderType::StopLimit && !effective_price.is_limit() {
            self.staged
                .push(Notification::ReplaceRejected(current, RejectReason::InvalidPrice));
            self.flush();
            return false;
        }

        let stop_book = match current.side {
            Side::Buy => &mut self.stop_bids,
            Side::Sell => &mut self.stop_asks,
        };
        let Some(mut old_order) = stop_book.remove(&current.id) else {
            return false;
        };
        old_order.status = OrderStatus::Replaced;

        let new_id = self.allocate_order_id();
        let new_order = match old_order.order_type {
            OrderType::StopLimit => Order::stop_limit(
                new_id,
                old_order.symbol.clone(),
                old_order.side,
                target_open,
                effective_price,
                old_order.stop_price,
            ),
            _ => Order::stop(
                new_id,
                old_order.symbol.clone(),
                old_order.side,
                target_open,
                old_order.stop_price,
            ),
        }
        .with_time_in_force(old_order.time_in_force);

        self.stats.record_replaced();
        self.staged.push(Notification::Replaced {
            old_order,
            new_order: new_order.clone(),
        });

        self.submit(new_order, OrderConditions::NONE, false);
        self.drain_stops();
        self.stage_book_events();
        self.flush();
        true
    }

    /// Update the reference market price and drain any stop activations.
    pub fn set_market_price(&mut self, price: Price) {
        self.market_price.store(price.ticks(), Ordering::Relaxed);
        let stops_fired = self.drain_stops();
        if stops_fired {
            self.stage_book_events();
        }
        self.flush();
    }

    /// Cancel every Day order across all four books. Returns the count.
    pub fn cancel_day_orders(&mut self) -> usize {
        let is_day = |order: &Order| order.time_in_force == TimeInForce::Day;

        let mut removed = self.bids.remove_where(is_day);
        removed.extend(self.asks.remove_where(is_day));
        removed.extend(self.stop_bids.remove_where(is_day));
        removed.extend(self.stop_asks.remove_where(is_day));

        let count = removed.len();
        for mut order in removed {
            let cancelled_qty = order.open_quantity;
            order.status = OrderStatus::Cancelled;
            self.stats.record_cancelled();
            self.staged.push(Notification::Cancelled(order, cancelled_qty));
        }

        if count > 0 {
            self.stage_book_events();
        }
        self.flush();
        count
    }

    // ========== Readers ==========

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Reference market price; zero until the first trade or explicit set.
    pub fn market_price(&self) -> Price {
        Price::from_ticks(self.market_price.load(Ordering::Relaxed))
    }

    /// Price and size of the most recent trade.
    pub fn last_trade(&self) -> Option<(Price, Quantity)> {
        let price = Price::from_ticks(self.last_trade_price.load(Ordering::Relaxed));
        price.is_limit().then(|| {
            (
                price,
                Quantity::new(self.last_trade_quantity.load(Ordering::Relaxed)),
            )
        })
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn bid_book(&self) -> &SideBook {
        &self.bids
    }

    pub fn ask_book(&self) -> &SideBook {
        &self.asks
    }

    pub fn depth(&self) -> &DepthTracker {
        &self.depth
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Orders waiting in the stop books.
    pub fn stop_order_count(&self) -> usize {
        self.stop_bids.order_count() + self.stop_asks.order_count()
    }

    /// Find a live order in any of the four books.
    pub fn open_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.bids
            .get(order_id)
            .or_else(|| self.asks.get(order_id))
            .or_else(|| self.stop_bids.get(order_id))
            .or_else(|| self.stop_asks.get(order_id))
    }

    /// True when the resting book crosses itself; never after a settled
    /// mutation.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => can_match(bid, ask),
            _ => false,
        }
    }

    // ========== Submission ==========

    fn submit(
        &mut self,
        mut order: Order,
        conditions: OrderConditions,
        activated: bool,
    ) -> SubmitOutcome {
        if let Err(reason) = self.validate(&order) {
            order.status = OrderStatus::Rejected;
            self.stats.record_rejected();
            tracing::warn!(order_id = %order.id, %reason, "order rejected");
            self.staged.push(Notification::Rejected(order, reason));
            return SubmitOutcome {
                any_fill: false,
                mutated: false,
            };
        }

        self.observe_order_id(order.id);

        // stop orders wait in the trigger book for a market price update
        if order.is_stop() {
            order.status = OrderStatus::Accepted;
            if !activated {
                self.stats.record_added();
            }
            self.staged.push(Notification::Accepted(order.clone()));
            match order.side {
                Side::Buy => self.stop_bids.add(order),
                Side::Sell => self.stop_asks.add(order),
            }
            return SubmitOutcome {
                any_fill: false,
                mutated: true,
            };
        }

        let limit = if order.is_market() {
            None
        } else {
            Some(order.price)
        };

        let plan = self
            .opposite_book(order.side)
            .match_quantity(limit, order.open_quantity);

        // fill-or-kill is checked before acceptance so a kill never
        // follows an accept for the same order, whether requested via
        // time-in-force or the conditions bitmask
        let fill_or_kill =
            order.is_fok() || conditions.contains(OrderConditions::FILL_OR_KILL);
        if fill_or_kill && !fill_or_kill_feasible(&plan, &order, conditions) {
            order.status = OrderStatus::Rejected;
            self.stats.record_rejected();
            tracing::warn!(order_id = %order.id, "fill-or-kill unfillable");
            self.staged
                .push(Notification::Rejected(order, RejectReason::FillOrKillUnfillable));
            return SubmitOutcome {
                any_fill: false,
                mutated: false,
            };
        }

        order.status = OrderStatus::Accepted;
        if !activated {
            self.stats.record_added();
        }
        self.staged.push(Notification::Accepted(order.clone()));

        let any_fill = self.execute_plan(&mut order, &plan, conditions);

        let mut rested = false;
        if !order.open_quantity.is_zero() {
            if self.may_rest(&order, conditions, limit) {
                rested = true;
                let book = self.same_book_mut(order.side);
                if let Err(err) = book.add(order) {
                    tracing::warn!(%err, "failed to rest order");
                    rested = false;
                }
            } else {
                let cancelled_qty = order.open_quantity;
                order.status = OrderStatus::Cancelled;
                self.stats.record_cancelled();
                self.staged.push(Notification::Cancelled(order, cancelled_qty));
            }
        }

        SubmitOutcome {
            any_fill,
            mutated: any_fill || rested,
        }
    }

    fn validate(&self, order: &Order) -> Result<(), RejectReason> {
        if order.symbol != self.symbol {
            return Err(RejectReason::UnknownSymbol);
        }
        if order.quantity.is_zero() || order.open_quantity.is_zero() {
            return Err(RejectReason::InvalidQuantity);
        }
        if order.open_quantity > order.quantity {
            return Err(RejectReason::InvalidOpenQuantity);
        }
        // limit price is required wherever one is honoured
        let needs_limit_price = matches!(order.order_type, OrderType::Limit | OrderType::StopLimit);
        if needs_limit_price && !order.price.is_limit() {
            return Err(RejectReason::InvalidPrice);
        }
        if order.is_stop() && !order.stop_price.is_limit() {
            return Err(RejectReason::InvalidStopPrice);
        }
        if self.bids.contains(&order.id)
            || self.asks.contains(&order.id)
            || self.stop_bids.contains(&order.id)
            || self.stop_asks.contains(&order.id)
        {
            return Err(RejectReason::DuplicateOrderId);
        }
        Ok(())
    }

    /// Commit the planned fills against the opposite side.
    ///
    /// Without all-or-none the plan is consumed level by level in FIFO
    /// order. With it, each candidate commits individually so undersized
    /// resting orders can be skipped without disturbing their level.
    fn execute_plan(
        &mut self,
        inbound: &mut Order,
        plan: &MatchPlan,
        conditions: OrderConditions,
    ) -> bool {
        let mut any_fill = false;

        if conditions.contains(OrderConditions::ALL_OR_NONE) {
            for candidate in plan.candidates() {
                if inbound.open_quantity.is_zero() {
                    break;
                }
                // skip resting orders that cannot satisfy the remainder alone
                if candidate.available < inbound.open_quantity {
                    continue;
                }
                let quantity = candidate.available.min(inbound.open_quantity);
                let side = inbound.side;
                let Some(fill) = self
                    .opposite_book_mut(side)
                    .fill_order(&candidate.order_id, quantity)
                else {
                    continue;
                };
                self.record_fill(inbound, &fill, candidate.price);
                any_fill = true;
            }
        } else {
            for (price, available) in plan.levels() {
                if inbound.open_quantity.is_zero() {
                    break;
                }
                let take = available.min(inbound.open_quantity);
                let side = inbound.side;
                let fills = self.opposite_book_mut(side).fill_at(price, take);
                for fill in &fills {
                    self.record_fill(inbound, fill, price);
                    any_fill = true;
                }
            }
        }

        any_fill
    }

    /// Bookkeeping for one fill: both orders' state, the trade record,
    /// statistics, and the market price.
    fn record_fill(&mut self, inbound: &mut Order, fill: &LevelFill, price: Price) {
        let quantity = fill.quantity;
        inbound.open_quantity -= quantity;
        inbound.status = if inbound.open_quantity.is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };

        let trade = self
            .executor
            .execute(&self.symbol, inbound, &fill.order, quantity, price);
        tracing::debug!(
            sequence = trade.sequence,
            taker = %inbound.id,
            maker = %fill.order.id,
            %quantity,
            %price,
            "trade executed"
        );

        self.stats.record_trade(quantity);
        self.last_trade_price.store(price.ticks(), Ordering::Relaxed);
        self.last_trade_quantity
            .store(quantity.value(), Ordering::Relaxed);
        self.market_price.store(price.ticks(), Ordering::Relaxed);

        self.staged.push(Notification::Traded {
            trade,
            inbound: inbound.clone(),
            resting: fill.order.clone(),
            inbound_filled: inbound.open_quantity.is_zero(),
            resting_filled: fill.completed,
        });
    }

    /// Whether a remainder may rest on its own side.
    ///
    /// Market orders and immediate-or-cancel remainders never rest. A
    /// remainder that would cross the opposite best (possible only after
    /// all-or-none skips) is cancelled so the settled book never crosses.
    fn may_rest(&self, order: &Order, conditions: OrderConditions, limit: Option<Price>) -> bool {
        if !order.is_limit() {
            return false;
        }
        if order.is_ioc()
            || order.is_fok()
            || conditions.contains(OrderConditions::IMMEDIATE_OR_CANCEL)
        {
            return false;
        }

        let opposite = self.opposite_book(order.side);
        let would_cross = opposite
            .best_price()
            .is_some_and(|best| crossing::level_eligible(opposite.side(), best, limit));
        !would_cross
    }

    // ========== Stop activation ==========

    /// Drain stop activations until no further trigger fires.
    ///
    /// Each activation re-enters the normal submission path; its fills move
    /// the market price, which the next loop pass re-examines, so cascades
    /// run to a fixed point before control returns.
    fn drain_stops(&mut self) -> bool {
        let mut any_activated = false;

        loop {
            let market_price = self.market_price();
            if !market_price.is_limit() {
                break;
            }

            let mut triggered = self.stop_bids.take_triggered(market_price);
            triggered.extend(self.stop_asks.take_triggered(market_price));
            if triggered.is_empty() {
                break;
            }

            for mut order in triggered {
                match order.order_type {
                    OrderType::Stop => {
                        order.order_type = OrderType::Market;
                        order.price = Price::MARKET;
                    }
                    OrderType::StopLimit => {
                        order.order_type = OrderType::Limit;
                    }
                    _ => {}
                }
                tracing::debug!(order_id = %order.id, "stop order activated");
                self.submit(order, OrderConditions::NONE, true);
                any_activated = true;
            }
        }

        any_activated
    }

    // ========== Event staging ==========

    /// Stage book-change, BBO, and depth events after a mutation.
    fn stage_book_events(&mut self) {
        self.staged.push(Notification::BookChanged);

        let bbo = (self.bids.best_price(), self.asks.best_price());
        if bbo != self.last_bbo {
            self.last_bbo = bbo;
            self.staged.push(Notification::BboChanged {
                bid: bbo.0,
                ask: bbo.1,
            });
        }

        let changes = self.depth.update_from(&self.bids, &self.asks).to_vec();
        if !changes.is_empty() {
            self.staged.push(Notification::DepthChanged(changes));
        }
    }

    /// Deliver staged events in order, once the mutation has settled.
    fn flush(&mut self) {
        if self.staged.is_empty() {
            return;
        }
        let staged = std::mem::take(&mut self.staged);
        for notification in &staged {
            self.dispatch(notification);
        }
    }

    fn dispatch(&self, notification: &Notification) {
        match notification {
            Notification::Accepted(order) => {
                for listener in &self.order_listeners {
                    listener.on_accept(order);
                }
            }
            Notification::Rejected(order, reason) => {
                for listener in &self.order_listeners {
                    listener.on_reject(order, *reason);
                }
            }
            Notification::Traded {
                trade,
                inbound,
                resting,
                inbound_filled,
                resting_filled,
            } => {
                for listener in &self.trade_listeners {
                    listener.on_trade(
                        trade,
                        inbound,
                        resting,
                        trade.quantity,
                        trade.price,
                        *inbound_filled,
                        *resting_filled,
                    );
                }
                for listener in &self.order_listeners {
                    listener.on_fill(inbound, resting, trade.quantity, trade.price);
                    listener.on_fill(resting, inbound, trade.quantity, trade.price);
                }
            }
            Notification::Cancelled(order, cancelled_qty) => {
                for listener in &self.order_listeners {
                    listener.on_cancel(order, *cancelled_qty);
                }
            }
            Notification::Replaced {
                old_order,
                new_order,
            } => {
                for listener in &self.order_listeners {
                    listener.on_replace(old_order, new_order);
                }
            }
            Notification::ReplaceRejected(order, reason) => {
                for listener in &self.order_listeners {
                    listener.on_replace_reject(order, *reason);
                }
            }
            Notification::BookChanged => {
                for listener in &self.book_listeners {
                    listener.on_order_book_change(self);
                }
            }
            Notification::BboChanged { bid, ask } => {
                for listener in &self.book_listeners {
                    listener.on_bbo_change(self, *bid, *ask);
                }
            }
            Notification::DepthChanged(changes) => {
                for change in changes {
                    for listener in &self.depth_listeners {
                        listener.on_depth_change(
                            self,
                            change.is_bid,
                            change.price,
                            change.new_quantity,
                            change.delta(),
                        );
                    }
                }
            }
        }
    }

    // ========== Helpers ==========

    fn opposite_book(&self, side: Side) -> &SideBook {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    fn opposite_book_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        }
    }

    fn same_book_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn observe_order_id(&mut self, order_id: OrderId) {
        self.next_order_id = self.next_order_id.max(order_id.value() + 1);
    }

    fn allocate_order_id(&mut self) -> OrderId {
        let id = self.next_order_id;
        self.next_order_id += 1;
        OrderId::new(id)
    }
}

/// Feasibility gate for fill-or-kill orders.
///
/// With all-or-none set, only a single candidate at least as large as the
/// order can satisfy it (smaller candidates would be skipped); otherwise
/// the plan total decides.
fn fill_or_kill_feasible(plan: &MatchPlan, order: &Order, conditions: OrderConditions) -> bool {
    if conditions.contains(OrderConditions::ALL_OR_NONE) {
        plan.largest_available() >= order.open_quantity
    } else {
        plan.total() >= order.open_quantity
    }
}
