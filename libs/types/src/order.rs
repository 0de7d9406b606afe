//! Order lifecycle types
//!
//! Order type and status keep the numeric codes used on the wire
//! (BUY=1, SELL=2; OPEN=1, WAITING=2, DONE=3, CANCEL=4).

use crate::ids::{ClientId, OrderId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(OrderType::Buy),
            2 => Some(OrderType::Sell),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            OrderType::Buy => 1,
            OrderType::Sell => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderType::Buy => "BUY",
            OrderType::Sell => "SELL",
        }
    }

    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            OrderType::Buy => OrderType::Sell,
            OrderType::Sell => OrderType::Buy,
        }
    }
}

/// Order status
///
/// DONE and CANCEL are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Resting and available for matching
    Open,
    /// Held back from matching until reopened or cancelled
    Waiting,
    /// Settled (terminal)
    Done,
    /// Cancelled (terminal)
    Cancel,
}

impl OrderStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(OrderStatus::Open),
            2 => Some(OrderStatus::Waiting),
            3 => Some(OrderStatus::Done),
            4 => Some(OrderStatus::Cancel),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            OrderStatus::Open => 1,
            OrderStatus::Waiting => 2,
            OrderStatus::Done => 3,
            OrderStatus::Cancel => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Waiting => "WAITING",
            OrderStatus::Done => "DONE",
            OrderStatus::Cancel => "CANCEL",
        }
    }

    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Done | OrderStatus::Cancel)
    }
}

/// Order as submitted by a caller
///
/// Codes stay raw integers so that out-of-range values reach validation
/// instead of failing at decode time. Any `id` supplied is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    pub owner_id: ClientId,
    pub price_fiat: Decimal,
    pub price_token: Decimal,
    pub type_order: i32,
    pub status: i32,
}

/// Persisted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner_id: ClientId,
    pub price_fiat: Decimal,
    pub price_token: Decimal,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order with a fresh id
    pub fn new(
        owner_id: ClientId,
        order_type: OrderType,
        status: OrderStatus,
        price_fiat: Decimal,
        price_token: Decimal,
    ) -> Self {
        Self {
            id: OrderId::new(),
            owner_id,
            price_fiat,
            price_token,
            order_type,
            status,
            created_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    pub fn is_buy(&self) -> bool {
        self.order_type == OrderType::Buy
    }
}

/// Output projection of an order with codes rendered by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: OrderId,
    pub owner_id: ClientId,
    pub price_fiat: Decimal,
    pub price_token: Decimal,
    pub type_order: String,
    pub status: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            owner_id: order.owner_id,
            price_fiat: order.price_fiat,
            price_token: order.price_token,
            type_order: order.order_type.name().to_string(),
            status: order.status.name().to_string(),
        }
    }
}
