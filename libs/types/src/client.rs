//! Client and balance types
//!
//! A client holds exactly two balances: fiat and token. Both only move
//! through settlement and must never go negative.

use crate::errors::{ExchangeError, ExchangeResult};
use crate::ids::ClientId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two assets a client can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Fiat,
    Token,
}

impl Asset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Asset::Fiat => "fiat",
            Asset::Token => "token",
        }
    }
}

/// Exchange client
///
/// Created by the registration collaborator, mutated only by settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub balance_fiat: Decimal,
    pub balance_token: Decimal,
    /// Reputation score, informational only
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Create a client with a fresh id
    pub fn new(balance_fiat: Decimal, balance_token: Decimal, score: i32) -> Self {
        Self::with_id(ClientId::new(), balance_fiat, balance_token, score)
    }

    /// Create a client with a known id (fixtures, registration)
    pub fn with_id(id: ClientId, balance_fiat: Decimal, balance_token: Decimal, score: i32) -> Self {
        Self {
            id,
            balance_fiat,
            balance_token,
            score,
            created_at: Utc::now(),
        }
    }

    pub fn balance(&self, asset: Asset) -> Decimal {
        match asset {
            Asset::Fiat => self.balance_fiat,
            Asset::Token => self.balance_token,
        }
    }

    /// Check balance invariant: neither balance is negative
    pub fn check_invariant(&self) -> bool {
        self.balance_fiat >= Decimal::ZERO && self.balance_token >= Decimal::ZERO
    }

    /// Check that `amount` of `asset` can be debited
    pub fn ensure_available(&self, asset: Asset, amount: Decimal) -> ExchangeResult<()> {
        let available = self.balance(asset);
        if available < amount {
            return Err(ExchangeError::InsufficientBalance {
                asset: asset.as_str(),
                required: amount.to_string(),
                available: available.to_string(),
            });
        }
        Ok(())
    }

    /// Debit an asset, refusing to take the balance below zero
    pub fn debit(&mut self, asset: Asset, amount: Decimal) -> ExchangeResult<()> {
        self.ensure_available(asset, amount)?;
        let slot = self.slot_mut(asset);
        *slot = slot
            .checked_sub(amount)
            .ok_or_else(|| ExchangeError::Internal(format!("{} debit overflow", asset.as_str())))?;
        Ok(())
    }

    /// Credit an asset with overflow protection
    pub fn credit(&mut self, asset: Asset, amount: Decimal) -> ExchangeResult<()> {
        let slot = self.slot_mut(asset);
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| ExchangeError::Internal(format!("{} credit overflow", asset.as_str())))?;
        Ok(())
    }

    fn slot_mut(&mut self, asset: Asset) -> &mut Decimal {
        match asset {
            Asset::Fiat => &mut self.balance_fiat,
            Asset::Token => &mut self.balance_token,
        }
    }
}

/// Public projection of a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientView {
    pub id: ClientId,
    pub balance_fiat: Decimal,
    pub balance_token: Decimal,
    pub score: i32,
}

impl From<&Client> for ClientView {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            balance_fiat: client.balance_fiat,
            balance_token: client.balance_token,
            score: client.score,
        }
    }
}
