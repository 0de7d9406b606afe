//! Two-party balance transfer
//!
//! Computes the post-settlement client rows on copies. Nothing here touches
//! storage, so a failure leaves the caller's state untouched.

use types::client::{Asset, Client};
use types::errors::ExchangeResult;
use types::settlement::ExecutedPrice;

/// Apply the executed price to buyer and seller
///
/// Returns the updated client rows: one row when buyer and seller are the
/// same client, two otherwise. Fails with `InsufficientBalance` if the buyer
/// cannot pay the executed fiat or the seller cannot deliver the executed
/// token.
pub fn apply_transfer(buyer: &Client, seller: &Client, executed: ExecutedPrice) -> ExchangeResult<Vec<Client>> {
    buyer.ensure_available(Asset::Fiat, executed.fiat)?;
    seller.ensure_available(Asset::Token, executed.token)?;

    if buyer.id == seller.id {
        let mut client = buyer.clone();
        client.debit(Asset::Fiat, executed.fiat)?;
        client.credit(Asset::Token, executed.token)?;
        client.credit(Asset::Fiat, executed.fiat)?;
        client.debit(Asset::Token, executed.token)?;
        return Ok(vec![client]);
    }

    let mut buyer = buyer.clone();
    buyer.debit(Asset::Fiat, executed.fiat)?;
    buyer.credit(Asset::Token, executed.token)?;

    let mut seller = seller.clone();
    seller.credit(Asset::Fiat, executed.fiat)?;
    seller.debit(Asset::Token, executed.token)?;

    Ok(vec![buyer, seller])
}
