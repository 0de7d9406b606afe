//! Order service
//!
//! Validates incoming orders, assigns identity, persists through the
//! settlement store and runs the matching protocol after each creation.

use rust_decimal::Decimal;
use settlement_store::SettlementStore;
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::client::ClientView;
use types::errors::{ExchangeError, ExchangeResult};
use types::ids::{ClientId, OrderId};
use types::order::{Order, OrderRequest, OrderStatus, OrderType, OrderView};
use types::settlement::Settlement;

use crate::config::MatchingConfig;
use crate::lifecycle::{self, Transition};
use crate::outcome::CreateOrderOutcome;

pub const STATUS_IN_EFFECT: &str = "status in effect for this order";
pub const ERR_INVALID_TYPE_ORDER: &str = "invalid type_order";
pub const ERR_INVALID_STATUS: &str = "invalid status";
pub const ERR_INVALID_PRICE: &str = "It is not allowed to create orders with a price less than or equal to 0";

pub struct OrderService<S> {
    store: Arc<S>,
    config: MatchingConfig,
}

impl<S: SettlementStore> OrderService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, MatchingConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: MatchingConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Validate, persist and try to match a new order.
    ///
    /// Checks run in order and the first failure is returned: owner exists,
    /// type code, status code, both prices positive. Once the order is
    /// persisted the call succeeds; the match stage is reported in the
    /// outcome variant.
    pub fn create_order(&self, request: OrderRequest) -> ExchangeResult<CreateOrderOutcome> {
        let owner = self
            .store
            .get_client_by_id(&request.owner_id)?
            .ok_or_else(|| ExchangeError::client_not_found(request.owner_id))?;

        let order_type = OrderType::from_code(request.type_order)
            .ok_or_else(|| ExchangeError::invalid_input(ERR_INVALID_TYPE_ORDER))?;

        let status = OrderStatus::from_code(request.status)
            .ok_or_else(|| ExchangeError::invalid_input(ERR_INVALID_STATUS))?;

        if request.price_fiat <= Decimal::ZERO || request.price_token <= Decimal::ZERO {
            return Err(ExchangeError::invalid_input(ERR_INVALID_PRICE));
        }

        let order = self.store.create_order(Order::new(
            owner.id,
            order_type,
            status,
            request.price_fiat,
            request.price_token,
        ))?;
        info!(
            order_id = %order.id,
            owner = %order.owner_id,
            side = order.order_type.name(),
            status = order.status.name(),
            price_fiat = %order.price_fiat,
            price_token = %order.price_token,
            "Order created"
        );

        let order_id = order.id;
        let outcome = match self.find_match_order(&order) {
            Ok(None) => CreateOrderOutcome::Created { order_id },
            Ok(Some(settlement)) => CreateOrderOutcome::Settled { order_id, settlement },
            Err(error) => {
                warn!(order_id = %order_id, error = %error, "Match stage failed after creation");
                CreateOrderOutcome::MatchFailed { order_id, error }
            }
        };
        Ok(outcome)
    }

    /// Search a counter-order for `order` and settle against it.
    ///
    /// `Ok(None)` means nothing to match. The executed price is always the
    /// resting order's. If the chosen counter-order is settled by someone
    /// else first, the search is repeated up to `max_attempts` times. If
    /// `order` itself left the book meanwhile (taken as someone else's
    /// counter-order, or moved out of OPEN), this call settles nothing and
    /// returns `Ok(None)`.
    pub fn find_match_order(&self, order: &Order) -> ExchangeResult<Option<Settlement>> {
        if !order.is_open() {
            debug!(order_id = %order.id, status = order.status.name(), "Order not open, skipping match");
            return Ok(None);
        }

        let mut attempt = 1;
        loop {
            let resting = match order.order_type {
                OrderType::Sell => self.store.find_match_order_to_sell(order)?,
                OrderType::Buy => self.store.find_match_order_to_buy(order)?,
            };
            let Some(resting) = resting else {
                debug!(order_id = %order.id, "No counterparty found");
                return Ok(None);
            };

            let result = match order.order_type {
                OrderType::Sell => self.store.make_transaction_sell(&resting, order),
                OrderType::Buy => self.store.make_transaction_buy(order, &resting),
            };

            match result {
                Err(ExchangeError::StaleOrder { order_id })
                    if order_id == resting.id.to_string() && attempt < self.config.max_attempts =>
                {
                    warn!(
                        order_id = %order.id,
                        resting = %resting.id,
                        attempt,
                        "Counter-order taken concurrently, searching again"
                    );
                    attempt += 1;
                }
                Err(ExchangeError::StaleOrder { order_id }) if order_id == order.id.to_string() => {
                    let current = self.store.get_order_by_id(&order.id)?;
                    return match current {
                        Some(current) if !current.is_open() => {
                            info!(
                                order_id = %order.id,
                                status = current.status.name(),
                                "Order left the book concurrently"
                            );
                            Ok(None)
                        }
                        _ => Err(ExchangeError::StaleOrder { order_id }),
                    };
                }
                other => return other.map(Some),
            }
        }
    }

    /// Move an order to `status` following the lifecycle rules.
    ///
    /// Returns a confirmation message, or [`STATUS_IN_EFFECT`] without
    /// writing when the order already has that status. The write only lands
    /// if the status checked is still current; otherwise the order is read
    /// again and the rules re-applied, up to `max_attempts` times.
    pub fn update_status_order(&self, status: i32, order_id: &str) -> ExchangeResult<String> {
        let requested = OrderStatus::from_code(status)
            .ok_or_else(|| ExchangeError::invalid_input(ERR_INVALID_STATUS))?;

        let id: OrderId = order_id
            .parse()
            .map_err(|_| ExchangeError::order_not_found(order_id))?;

        let mut attempt = 1;
        loop {
            let order = self
                .store
                .get_order_by_id(&id)?
                .ok_or_else(|| ExchangeError::order_not_found(id))?;

            let next = match lifecycle::check_transition(order.status, requested)? {
                Transition::AlreadyInEffect => return Ok(STATUS_IN_EFFECT.to_string()),
                Transition::Apply(next) => next,
            };

            match self.store.update_status_order(order.status, next, &id) {
                Ok(_) => {
                    info!(order_id = %id, from = order.status.name(), to = next.name(), "Order status updated");
                    return Ok(format!("order {} updated", id));
                }
                Err(ExchangeError::StaleOrder { .. }) if attempt < self.config.max_attempts => {
                    warn!(order_id = %id, attempt, "Order status changed concurrently, checking again");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn list_orders(&self) -> ExchangeResult<Vec<OrderView>> {
        let orders = self.store.list_orders()?;
        Ok(orders.iter().map(OrderView::from).collect())
    }

    pub fn get_client_by_id(&self, id: &str) -> ExchangeResult<ClientView> {
        let client_id: ClientId = id.parse().map_err(|_| ExchangeError::client_not_found(id))?;
        let client = self
            .store
            .get_client_by_id(&client_id)?
            .ok_or_else(|| ExchangeError::client_not_found(client_id))?;
        Ok(ClientView::from(&client))
    }
}
