//! Result of order creation
//!
//! Creation and matching are separate stages. A persisted order is always
//! reported with its id; what happened in the match stage is carried in the
//! variant instead of being folded into success or failure.

use std::fmt;
use types::errors::ExchangeError;
use types::ids::OrderId;
use types::settlement::Settlement;

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOrderOutcome {
    /// Persisted; this call settled nothing. Either no counter-order was
    /// available or the order was taken by a concurrent taker first.
    Created { order_id: OrderId },
    /// Persisted, matched and settled
    Settled { order_id: OrderId, settlement: Settlement },
    /// Persisted, but the match stage failed
    MatchFailed { order_id: OrderId, error: ExchangeError },
}

impl CreateOrderOutcome {
    pub fn order_id(&self) -> OrderId {
        match self {
            CreateOrderOutcome::Created { order_id }
            | CreateOrderOutcome::Settled { order_id, .. }
            | CreateOrderOutcome::MatchFailed { order_id, .. } => *order_id,
        }
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            CreateOrderOutcome::Settled { settlement, .. } => Some(settlement),
            _ => None,
        }
    }

    pub fn match_error(&self) -> Option<&ExchangeError> {
        match self {
            CreateOrderOutcome::MatchFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, CreateOrderOutcome::Settled { .. })
    }
}

impl fmt::Display for CreateOrderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.order_id())
    }
}
