//! Order flow from request to settlement
//!
//! - An unmatched order rests OPEN and touches no balance
//! - A crossing order settles at the resting price and both orders end DONE
//! - A settlement the parties cannot cover is reported, not applied
//! - Racing takers settle a resting order once
//! - Totals are conserved across any order flow

use order_service::lifecycle::{ERR_ORDER_DONE, ERR_ORDER_WAITING};
use order_service::service::{ERR_INVALID_PRICE, STATUS_IN_EFFECT};
use order_service::{CreateOrderOutcome, OrderService};
use proptest::prelude::*;
use rust_decimal::Decimal;
use settlement_store::{InMemoryStore, SettlementStore};
use std::sync::Arc;
use std::thread;
use types::client::Client;
use types::errors::ExchangeError;
use types::ids::OrderId;
use types::order::{OrderRequest, OrderStatus};

const BUY: i32 = 1;
const SELL: i32 = 2;
const OPEN: i32 = 1;

fn client(fiat: i64, token: i64) -> Client {
    Client::new(Decimal::from(fiat), Decimal::from(token), 98)
}

fn service(clients: &[&Client]) -> OrderService<InMemoryStore> {
    let store = InMemoryStore::with_clients(clients.iter().map(|c| (*c).clone()));
    OrderService::new(Arc::new(store))
}

fn place(service: &OrderService<InMemoryStore>, owner: &Client, type_order: i32, fiat: i64, token: i64) -> CreateOrderOutcome {
    service
        .create_order(OrderRequest {
            id: None,
            owner_id: owner.id,
            price_fiat: Decimal::from(fiat),
            price_token: Decimal::from(token),
            type_order,
            status: OPEN,
        })
        .unwrap()
}

fn balances(service: &OrderService<InMemoryStore>, owner: &Client) -> (Decimal, Decimal) {
    let view = service.get_client_by_id(&owner.id.to_string()).unwrap();
    (view.balance_fiat, view.balance_token)
}

fn status(service: &OrderService<InMemoryStore>, id: OrderId) -> OrderStatus {
    service.store().get_order_by_id(&id).unwrap().unwrap().status
}

#[test]
fn test_unmatched_sell_rests_open() {
    let alice = client(12500, 8);
    let service = service(&[&alice]);

    let outcome = place(&service, &alice, SELL, 500, 100);

    assert!(matches!(outcome, CreateOrderOutcome::Created { .. }));
    assert_eq!(status(&service, outcome.order_id()), OrderStatus::Open);
    assert_eq!(balances(&service, &alice), (Decimal::from(12500), Decimal::from(8)));

    let views = service.list_orders().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id, outcome.order_id());
    assert_eq!(views[0].type_order, "SELL");
    assert_eq!(views[0].status, "OPEN");
}

#[test]
fn test_uncovered_settlement_is_reported() {
    // Seller holds 8 tokens and the buyer no fiat; neither covers 600/100.
    let alice = client(12500, 8);
    let bob = client(0, 0);
    let service = service(&[&alice, &bob]);

    let resting = place(&service, &bob, BUY, 600, 100);
    let incoming = place(&service, &alice, SELL, 500, 100);

    assert!(matches!(
        incoming.match_error(),
        Some(ExchangeError::InsufficientBalance { .. })
    ));
    assert_eq!(status(&service, resting.order_id()), OrderStatus::Open);
    assert_eq!(status(&service, incoming.order_id()), OrderStatus::Open);
    assert_eq!(balances(&service, &alice), (Decimal::from(12500), Decimal::from(8)));
    assert_eq!(balances(&service, &bob), (Decimal::ZERO, Decimal::ZERO));
}

#[test]
fn test_sell_settles_at_resting_price() {
    let alice = client(12500, 800);
    let bob = client(2000, 0);
    let service = service(&[&alice, &bob]);

    let resting = place(&service, &bob, BUY, 600, 100);
    let incoming = place(&service, &alice, SELL, 500, 100);

    let settlement = incoming.settlement().expect("should settle");
    assert_eq!(settlement.buy_order_id, resting.order_id());
    assert_eq!(settlement.sell_order_id, incoming.order_id());
    assert_eq!(settlement.executed.fiat, Decimal::from(600));
    assert_eq!(settlement.executed.token, Decimal::from(100));

    assert_eq!(status(&service, resting.order_id()), OrderStatus::Done);
    assert_eq!(status(&service, incoming.order_id()), OrderStatus::Done);
    assert_eq!(balances(&service, &alice), (Decimal::from(13100), Decimal::from(700)));
    assert_eq!(balances(&service, &bob), (Decimal::from(1400), Decimal::from(100)));
}

#[test]
fn test_buy_settles_at_resting_price() {
    let alice = client(0, 300);
    let bob = client(2000, 0);
    let service = service(&[&alice, &bob]);

    let resting = place(&service, &alice, SELL, 450, 100);
    let incoming = place(&service, &bob, BUY, 600, 100);

    let settlement = incoming.settlement().expect("should settle");
    assert_eq!(settlement.sell_order_id, resting.order_id());
    assert_eq!(settlement.executed.fiat, Decimal::from(450));

    assert_eq!(balances(&service, &alice), (Decimal::from(450), Decimal::from(200)));
    assert_eq!(balances(&service, &bob), (Decimal::from(1550), Decimal::from(100)));
}

#[test]
fn test_non_crossing_orders_both_rest() {
    let alice = client(12500, 800);
    let bob = client(2000, 0);
    let service = service(&[&alice, &bob]);

    // Bid below the ask
    let bid = place(&service, &bob, BUY, 400, 100);
    let ask = place(&service, &alice, SELL, 500, 100);
    // Crossing price but a different token amount
    let other = place(&service, &alice, SELL, 300, 50);

    for outcome in [&bid, &ask, &other] {
        assert!(matches!(outcome, CreateOrderOutcome::Created { .. }));
        assert_eq!(status(&service, outcome.order_id()), OrderStatus::Open);
    }
}

#[test]
fn test_earliest_resting_order_wins_ties() {
    let alice = client(0, 1000);
    let bob = client(2000, 0);
    let service = service(&[&alice, &bob]);

    let first = place(&service, &alice, SELL, 500, 100);
    let second = place(&service, &alice, SELL, 500, 100);
    let incoming = place(&service, &bob, BUY, 500, 100);

    assert_eq!(incoming.settlement().unwrap().sell_order_id, first.order_id());
    assert_eq!(status(&service, second.order_id()), OrderStatus::Open);
}

#[test]
fn test_rejected_requests_persist_nothing() {
    let alice = client(12500, 8);
    let service = service(&[&alice]);

    let err = service
        .create_order(OrderRequest {
            id: None,
            owner_id: alice.id,
            price_fiat: Decimal::ZERO,
            price_token: Decimal::from(100),
            type_order: SELL,
            status: OPEN,
        })
        .unwrap_err();

    assert_eq!(err, ExchangeError::invalid_input(ERR_INVALID_PRICE));
    assert_eq!(err.status_code(), 422);
    assert!(service.list_orders().unwrap().is_empty());
}

#[test]
fn test_settled_orders_are_frozen() {
    let alice = client(12500, 800);
    let bob = client(2000, 0);
    let service = service(&[&alice, &bob]);

    let resting = place(&service, &bob, BUY, 600, 100);
    place(&service, &alice, SELL, 500, 100);

    let id = resting.order_id().to_string();
    for requested in 1..=4 {
        let err = service.update_status_order(requested, &id).unwrap_err();
        assert_eq!(err, ExchangeError::invalid_input(ERR_ORDER_DONE));
    }
}

#[test]
fn test_waiting_order_lifecycle() {
    let alice = client(12500, 800);
    let service = service(&[&alice]);
    let id = place(&service, &alice, SELL, 500, 100).order_id().to_string();

    service.update_status_order(2, &id).unwrap();
    assert_eq!(service.update_status_order(2, &id).unwrap(), STATUS_IN_EFFECT);
    assert_eq!(
        service.update_status_order(3, &id).unwrap_err(),
        ExchangeError::invalid_input(ERR_ORDER_WAITING)
    );

    assert_eq!(service.update_status_order(1, &id).unwrap(), format!("order {} updated", id));
    assert_eq!(service.list_orders().unwrap()[0].status, "OPEN");
}

#[test]
fn test_waiting_order_is_not_matched() {
    let alice = client(12500, 800);
    let bob = client(2000, 0);
    let service = service(&[&alice, &bob]);

    let resting = place(&service, &bob, BUY, 600, 100);
    service
        .update_status_order(2, &resting.order_id().to_string())
        .unwrap();

    let incoming = place(&service, &alice, SELL, 500, 100);
    assert!(matches!(incoming, CreateOrderOutcome::Created { .. }));
    assert_eq!(balances(&service, &bob), (Decimal::from(2000), Decimal::ZERO));
}

#[test]
fn test_racing_takers_settle_once() {
    let bob = client(600, 0);
    let sellers: Vec<Client> = (0..8).map(|_| client(0, 100)).collect();

    let mut all: Vec<&Client> = sellers.iter().collect();
    all.push(&bob);
    let service = Arc::new(service(&all));

    let resting = place(&service, &bob, BUY, 600, 100);

    let handles: Vec<_> = sellers
        .iter()
        .cloned()
        .map(|seller| {
            let service = Arc::clone(&service);
            thread::spawn(move || place(&service, &seller, SELL, 500, 100))
        })
        .collect();
    let outcomes: Vec<CreateOrderOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(outcomes.iter().filter(|o| o.is_settled()).count(), 1);
    assert!(outcomes.iter().all(|o| o.match_error().is_none()));
    assert_eq!(status(&service, resting.order_id()), OrderStatus::Done);
    assert_eq!(balances(&service, &bob), (Decimal::ZERO, Decimal::from(100)));

    let total_fiat: Decimal = sellers.iter().map(|s| balances(&service, s).0).sum();
    assert_eq!(total_fiat, Decimal::from(600));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_totals_conserved_and_non_negative(
        funds in prop::collection::vec((0i64..3000, 0i64..300), 3),
        orders in prop::collection::vec((0usize..3, 1i32..=2, 1i64..1000, prop::sample::select(vec![10i64, 20])), 1..30),
    ) {
        let clients: Vec<Client> = funds.iter().map(|&(fiat, token)| client(fiat, token)).collect();
        let service = service(&clients.iter().collect::<Vec<_>>());

        for (owner, type_order, fiat, token) in orders {
            let outcome = place(&service, &clients[owner], type_order, fiat, token);
            if let Some(settlement) = outcome.settlement() {
                prop_assert_eq!(status(&service, settlement.buy_order_id), OrderStatus::Done);
                prop_assert_eq!(status(&service, settlement.sell_order_id), OrderStatus::Done);
            }
        }

        let after: Vec<(Decimal, Decimal)> = clients.iter().map(|c| balances(&service, c)).collect();
        for (fiat, token) in &after {
            prop_assert!(*fiat >= Decimal::ZERO);
            prop_assert!(*token >= Decimal::ZERO);
        }
        let fiat_before: i64 = funds.iter().map(|f| f.0).sum();
        let token_before: i64 = funds.iter().map(|f| f.1).sum();
        prop_assert_eq!(after.iter().map(|b| b.0).sum::<Decimal>(), Decimal::from(fiat_before));
        prop_assert_eq!(after.iter().map(|b| b.1).sum::<Decimal>(), Decimal::from(token_before));
    }
}
