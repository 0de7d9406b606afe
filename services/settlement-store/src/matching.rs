//! Counter-order search
//!
//! Decides whether a resting order can match an incoming one and which
//! candidate wins. Pure functions so every store implementation ranks the
//! same way.

use std::cmp::Ordering;
use types::order::{Order, OrderType};

/// Check if the incoming fiat price crosses the resting one
///
/// A seller accepts any bid at or above its price, a buyer any ask at or
/// below its price.
pub fn crosses(incoming_side: OrderType, incoming: &Order, resting: &Order) -> bool {
    match incoming_side {
        OrderType::Sell => resting.price_fiat >= incoming.price_fiat,
        OrderType::Buy => resting.price_fiat <= incoming.price_fiat,
    }
}

/// Check if `resting` is an eligible counter-order for `incoming`
pub fn is_counter_order(incoming_side: OrderType, incoming: &Order, resting: &Order) -> bool {
    resting.id != incoming.id
        && resting.is_open()
        && resting.order_type == incoming_side.opposite()
        && resting.price_token == incoming.price_token
        && crosses(incoming_side, incoming, resting)
}

/// Rank two candidates; `Less` means `a` is the better fill
///
/// Best fiat price for the incoming side first, then earliest creation,
/// then lowest id so the choice is deterministic.
pub fn priority(incoming_side: OrderType, a: &Order, b: &Order) -> Ordering {
    let by_price = match incoming_side {
        OrderType::Sell => b.price_fiat.cmp(&a.price_fiat),
        OrderType::Buy => a.price_fiat.cmp(&b.price_fiat),
    };
    by_price
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick the best counter-order among `candidates`
pub fn best_counter_order<'a, I>(incoming_side: OrderType, incoming: &Order, candidates: I) -> Option<&'a Order>
where
    I: IntoIterator<Item = &'a Order>,
{
    candidates
        .into_iter()
        .filter(|resting| is_counter_order(incoming_side, incoming, resting))
        .min_by(|a, b| priority(incoming_side, a, b))
}
