//! Order status state machine
//!
//! ```text
//! DONE    -> *               rejected (terminal)
//! CANCEL  -> *               rejected (terminal)
//! X       -> X               no-op
//! WAITING -> OPEN | CANCEL   allowed
//! WAITING -> DONE            rejected
//! OPEN    -> *               allowed
//! ```

use types::errors::{ExchangeError, ExchangeResult};
use types::order::OrderStatus;

pub const ERR_ORDER_DONE: &str = "invalid update, this order was done";
pub const ERR_ORDER_CANCELLED: &str = "invalid update, this order was cancel";
pub const ERR_ORDER_WAITING: &str = "invalid update, an order waiting only change status to OPEN or CANCEL";

/// Result of checking a requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Persist the new status
    Apply(OrderStatus),
    /// Requested status is already current; nothing to write
    AlreadyInEffect,
}

/// Check a transition from `current` to `requested`
///
/// Terminal checks run before the same-status check, so a DONE order asked
/// to become DONE is still rejected.
pub fn check_transition(current: OrderStatus, requested: OrderStatus) -> ExchangeResult<Transition> {
    match current {
        OrderStatus::Done => return Err(ExchangeError::invalid_input(ERR_ORDER_DONE)),
        OrderStatus::Cancel => return Err(ExchangeError::invalid_input(ERR_ORDER_CANCELLED)),
        _ => {}
    }

    if current == requested {
        return Ok(Transition::AlreadyInEffect);
    }

    if current == OrderStatus::Waiting && !matches!(requested, OrderStatus::Open | OrderStatus::Cancel) {
        return Err(ExchangeError::invalid_input(ERR_ORDER_WAITING));
    }

    Ok(Transition::Apply(requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 4] = [
        OrderStatus::Open,
        OrderStatus::Waiting,
        OrderStatus::Done,
        OrderStatus::Cancel,
    ];

    #[test]
    fn test_terminal_statuses_reject_everything() {
        for requested in ALL {
            assert_eq!(
                check_transition(OrderStatus::Done, requested),
                Err(ExchangeError::invalid_input(ERR_ORDER_DONE))
            );
            assert_eq!(
                check_transition(OrderStatus::Cancel, requested),
                Err(ExchangeError::invalid_input(ERR_ORDER_CANCELLED))
            );
        }
    }

    #[test]
    fn test_same_status_is_noop() {
        assert_eq!(
            check_transition(OrderStatus::Open, OrderStatus::Open),
            Ok(Transition::AlreadyInEffect)
        );
        assert_eq!(
            check_transition(OrderStatus::Waiting, OrderStatus::Waiting),
            Ok(Transition::AlreadyInEffect)
        );
    }

    #[test]
    fn test_waiting_transitions() {
        assert_eq!(
            check_transition(OrderStatus::Waiting, OrderStatus::Open),
            Ok(Transition::Apply(OrderStatus::Open))
        );
        assert_eq!(
            check_transition(OrderStatus::Waiting, OrderStatus::Cancel),
            Ok(Transition::Apply(OrderStatus::Cancel))
        );
        assert_eq!(
            check_transition(OrderStatus::Waiting, OrderStatus::Done),
            Err(ExchangeError::invalid_input(ERR_ORDER_WAITING))
        );
    }

    #[test]
    fn test_open_moves_anywhere() {
        for requested in [OrderStatus::Waiting, OrderStatus::Done, OrderStatus::Cancel] {
            assert_eq!(
                check_transition(OrderStatus::Open, requested),
                Ok(Transition::Apply(requested))
            );
        }
    }
}
