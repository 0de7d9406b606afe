//! Settlement store contract
//!
//! The order service only reaches storage through this trait. Implementors
//! check mechanical consistency (existence, balance sufficiency, atomicity)
//! and never business rules.

use types::client::Client;
use types::errors::ExchangeResult;
use types::ids::{ClientId, OrderId};
use types::order::{Order, OrderStatus};
use types::settlement::Settlement;

pub trait SettlementStore: Send + Sync {
    /// Persist a new order.
    ///
    /// Fails with a database error if the id is taken or the owner does not exist.
    fn create_order(&self, order: Order) -> ExchangeResult<Order>;

    fn get_order_by_id(&self, id: &OrderId) -> ExchangeResult<Option<Order>>;

    fn get_client_by_id(&self, id: &ClientId) -> ExchangeResult<Option<Client>>;

    fn list_orders(&self) -> ExchangeResult<Vec<Order>>;

    /// Best OPEN BUY order for an incoming SELL order.
    ///
    /// Same token price, fiat price at or above the seller's, highest fiat
    /// first. `None` when there is no counter-order.
    fn find_match_order_to_sell(&self, order: &Order) -> ExchangeResult<Option<Order>>;

    /// Best OPEN SELL order for an incoming BUY order.
    ///
    /// Same token price, fiat price at or below the buyer's, lowest fiat
    /// first. `None` when there is no counter-order.
    fn find_match_order_to_buy(&self, order: &Order) -> ExchangeResult<Option<Order>>;

    /// Settle an incoming BUY against a resting SELL at the sell order's prices.
    fn make_transaction_buy(&self, buy_order: &Order, sell_order: &Order) -> ExchangeResult<Settlement>;

    /// Settle an incoming SELL against a resting BUY at the buy order's prices.
    fn make_transaction_sell(&self, buy_order: &Order, sell_order: &Order) -> ExchangeResult<Settlement>;

    /// Move an order from `expected` to `status`.
    ///
    /// The check and the write happen atomically. Fails with not-found if the
    /// order is absent, and with `StaleOrder` without writing if its current
    /// status is no longer `expected`.
    fn update_status_order(&self, expected: OrderStatus, status: OrderStatus, order_id: &OrderId) -> ExchangeResult<Order>;
}
