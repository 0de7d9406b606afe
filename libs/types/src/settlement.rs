//! Settlement record
//!
//! Describes one committed two-party transfer. The executed amounts are
//! always the resting order's prices.

use crate::ids::{ClientId, OrderId};
use crate::order::Order;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The (fiat, token) pair actually applied during settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedPrice {
    pub fiat: Decimal,
    pub token: Decimal,
}

impl ExecutedPrice {
    /// Executed price taken from the order that was resting
    pub fn of(order: &Order) -> Self {
        Self {
            fiat: order.price_fiat,
            token: order.price_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer_id: ClientId,
    pub seller_id: ClientId,
    pub executed: ExecutedPrice,
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    pub fn new(buy_order: &Order, sell_order: &Order, executed: ExecutedPrice) -> Self {
        Self {
            buy_order_id: buy_order.id,
            sell_order_id: sell_order.id,
            buyer_id: buy_order.owner_id,
            seller_id: sell_order.owner_id,
            executed,
            settled_at: Utc::now(),
        }
    }

    pub fn is_self_trade(&self) -> bool {
        self.buyer_id == self.seller_id
    }
}
