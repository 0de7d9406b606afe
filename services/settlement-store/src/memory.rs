//! In-memory settlement store
//!
//! All state sits behind one `RwLock`. Reads share the lock; every mutation,
//! including a whole settlement, holds the write lock from first read to
//! last write, so concurrent callers observe either none or all of a
//! settlement's effects.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use types::client::Client;
use types::errors::{ExchangeError, ExchangeResult};
use types::ids::{ClientId, OrderId};
use types::order::{Order, OrderStatus, OrderType};
use types::settlement::{ExecutedPrice, Settlement};

use crate::matching;
use crate::store::SettlementStore;
use crate::transfer;

#[derive(Debug, Default)]
struct StoreState {
    clients: HashMap<ClientId, Client>,
    orders: HashMap<OrderId, Order>,
}

impl StoreState {
    fn client(&self, id: &ClientId) -> ExchangeResult<Client> {
        self.clients
            .get(id)
            .cloned()
            .ok_or_else(|| ExchangeError::client_not_found(id))
    }

    /// Load an order that must still be OPEN with the expected side
    fn open_order(&self, id: &OrderId, side: OrderType) -> ExchangeResult<Order> {
        let order = self
            .orders
            .get(id)
            .cloned()
            .ok_or_else(|| ExchangeError::order_not_found(id))?;

        if order.order_type != side {
            return Err(ExchangeError::invalid_input(format!(
                "order {} is not a {} order",
                id,
                side.name()
            )));
        }
        if !order.is_open() {
            return Err(ExchangeError::StaleOrder {
                order_id: id.to_string(),
            });
        }
        Ok(order)
    }
}

/// Thread-safe in-memory implementation of [`SettlementStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with clients
    pub fn with_clients(clients: impl IntoIterator<Item = Client>) -> Self {
        let store = Self::new();
        for client in clients {
            store.insert_client(client);
        }
        store
    }

    /// Register or replace a client row (seeding collaborator)
    pub fn insert_client(&self, client: Client) {
        self.state.write().clients.insert(client.id, client);
    }

    pub fn order_count(&self) -> usize {
        self.state.read().orders.len()
    }

    fn find_match(&self, incoming_side: OrderType, order: &Order) -> ExchangeResult<Option<Order>> {
        let state = self.state.read();
        let found = matching::best_counter_order(incoming_side, order, state.orders.values()).cloned();

        match &found {
            Some(resting) => debug!(
                incoming = %order.id,
                resting = %resting.id,
                price_fiat = %resting.price_fiat,
                "Counter-order found"
            ),
            None => debug!(incoming = %order.id, side = incoming_side.name(), "No counter-order"),
        }
        Ok(found)
    }

    /// Run one settlement as a single unit of work
    ///
    /// Every check and every balance computation happens before the first
    /// write; the commit step cannot fail.
    fn settle(&self, buy_order: &Order, sell_order: &Order, resting_side: OrderType) -> ExchangeResult<Settlement> {
        if buy_order.id == sell_order.id {
            return Err(ExchangeError::invalid_input("an order cannot settle against itself"));
        }

        let mut state = self.state.write();

        // Re-read both rows under the lock; the caller's copies may be stale.
        let buy = state.open_order(&buy_order.id, OrderType::Buy)?;
        let sell = state.open_order(&sell_order.id, OrderType::Sell)?;

        let executed = match resting_side {
            OrderType::Buy => ExecutedPrice::of(&buy),
            OrderType::Sell => ExecutedPrice::of(&sell),
        };

        let buyer = state.client(&buy.owner_id)?;
        let seller = state.client(&sell.owner_id)?;

        let updated = transfer::apply_transfer(&buyer, &seller, executed).inspect_err(|err| {
            warn!(
                buy_order = %buy.id,
                sell_order = %sell.id,
                error = %err,
                "Settlement rejected"
            );
        })?;

        if let Some(client) = updated.iter().find(|client| !client.check_invariant()) {
            return Err(ExchangeError::Internal(format!(
                "settlement would leave client {} with a negative balance",
                client.id
            )));
        }

        // Commit
        for client in updated {
            state.clients.insert(client.id, client);
        }
        for id in [buy.id, sell.id] {
            if let Some(order) = state.orders.get_mut(&id) {
                order.status = OrderStatus::Done;
            }
        }

        let settlement = Settlement::new(&buy, &sell, executed);
        info!(
            buy_order = %settlement.buy_order_id,
            sell_order = %settlement.sell_order_id,
            fiat = %executed.fiat,
            token = %executed.token,
            self_trade = settlement.is_self_trade(),
            "Settlement committed"
        );
        Ok(settlement)
    }
}

impl SettlementStore for InMemoryStore {
    fn create_order(&self, order: Order) -> ExchangeResult<Order> {
        let mut state = self.state.write();

        if state.orders.contains_key(&order.id) {
            return Err(ExchangeError::database(format!("duplicate key: order {} already exists", order.id)));
        }
        if !state.clients.contains_key(&order.owner_id) {
            return Err(ExchangeError::database(format!(
                "foreign key violation: client {} does not exist",
                order.owner_id
            )));
        }

        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn get_order_by_id(&self, id: &OrderId) -> ExchangeResult<Option<Order>> {
        Ok(self.state.read().orders.get(id).cloned())
    }

    fn get_client_by_id(&self, id: &ClientId) -> ExchangeResult<Option<Client>> {
        Ok(self.state.read().clients.get(id).cloned())
    }

    fn list_orders(&self) -> ExchangeResult<Vec<Order>> {
        let state = self.state.read();
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    fn find_match_order_to_sell(&self, order: &Order) -> ExchangeResult<Option<Order>> {
        self.find_match(OrderType::Sell, order)
    }

    fn find_match_order_to_buy(&self, order: &Order) -> ExchangeResult<Option<Order>> {
        self.find_match(OrderType::Buy, order)
    }

    fn make_transaction_buy(&self, buy_order: &Order, sell_order: &Order) -> ExchangeResult<Settlement> {
        self.settle(buy_order, sell_order, OrderType::Sell)
    }

    fn make_transaction_sell(&self, buy_order: &Order, sell_order: &Order) -> ExchangeResult<Settlement> {
        self.settle(buy_order, sell_order, OrderType::Buy)
    }

    fn update_status_order(&self, expected: OrderStatus, status: OrderStatus, order_id: &OrderId) -> ExchangeResult<Order> {
        let mut state = self.state.write();
        let order = state
            .orders
            .get_mut(order_id)
            .ok_or_else(|| ExchangeError::order_not_found(order_id))?;

        if order.status != expected {
            debug!(
                order_id = %order_id,
                expected = expected.name(),
                actual = order.status.name(),
                "Status changed since read"
            );
            return Err(ExchangeError::StaleOrder {
                order_id: order_id.to_string(),
            });
        }

        order.status = status;
        Ok(order.clone())
    }
}
