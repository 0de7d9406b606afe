use order_service::telemetry::init_tracing;
use order_service::{CoreConfig, CreateOrderOutcome, OrderService};
use rust_decimal::Decimal;
use settlement_store::InMemoryStore;
use std::sync::Arc;
use types::client::Client;
use types::order::OrderRequest;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::load()?;
    init_tracing(&config.log);

    tracing::info!(max_attempts = config.matching.max_attempts, "Starting order service");

    // Two seeded accounts and one crossing pair of orders
    let seller = Client::new(Decimal::from(12500), Decimal::from(800), 98);
    let buyer = Client::new(Decimal::from(2000), Decimal::from(50), 60);
    let store = Arc::new(InMemoryStore::with_clients([seller.clone(), buyer.clone()]));
    let service = OrderService::with_config(store, config.matching);

    let requests = [
        (buyer.id, 1, Decimal::from(600)),
        (seller.id, 2, Decimal::from(500)),
    ];
    for (owner_id, type_order, price_fiat) in requests {
        let outcome = service.create_order(OrderRequest {
            id: None,
            owner_id,
            price_fiat,
            price_token: Decimal::from(100),
            type_order,
            status: 1,
        })?;
        match &outcome {
            CreateOrderOutcome::Created { order_id } => tracing::info!(%order_id, "Resting"),
            CreateOrderOutcome::Settled { order_id, settlement } => tracing::info!(
                %order_id,
                fiat = %settlement.executed.fiat,
                token = %settlement.executed.token,
                "Settled"
            ),
            CreateOrderOutcome::MatchFailed { order_id, error } => {
                tracing::warn!(%order_id, %error, "Match failed")
            }
        }
    }

    for client in [&seller, &buyer] {
        let view = service.get_client_by_id(&client.id.to_string())?;
        tracing::info!(
            client = %view.id,
            balance_fiat = %view.balance_fiat,
            balance_token = %view.balance_token,
            "Balances"
        );
    }

    Ok(())
}
