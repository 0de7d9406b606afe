//! Error types for the exchange core
//!
//! Every error carries a kind and a status-code hint so the request boundary
//! can render it without inspecting messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse error classification handed to the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    InsufficientBalance,
    Conflict,
    #[serde(rename = "DATABASE_ERROR")]
    Database,
    #[serde(rename = "INTERNAL_SERVER_ERROR")]
    Internal,
    BadRequest,
    Forbidden,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::InsufficientBalance => "INSUFFICIENT_BALANCE",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Database => "DATABASE_ERROR",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Forbidden => "FORBIDDEN",
        }
    }

    /// HTTP-style status code the boundary layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidInput | ErrorKind::InsufficientBalance => 422,
            ErrorKind::Conflict => 409,
            ErrorKind::Database | ErrorKind::Internal => 500,
            ErrorKind::BadRequest => 400,
            ErrorKind::Forbidden => 403,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error for the order service and the settlement store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient {asset} balance: required {required}, available {available}")]
    InsufficientBalance {
        asset: &'static str,
        required: String,
        available: String,
    },

    /// The order changed status between search and settlement
    #[error("order {order_id} is no longer open")]
    StaleOrder { order_id: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl ExchangeError {
    pub fn client_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: "client",
            id: id.to_string(),
        }
    }

    pub fn order_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: "order",
            id: id.to_string(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::NotFound { .. } => ErrorKind::NotFound,
            ExchangeError::InvalidInput(_) => ErrorKind::InvalidInput,
            ExchangeError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            ExchangeError::StaleOrder { .. } => ErrorKind::Conflict,
            ExchangeError::Database(_) => ErrorKind::Database,
            ExchangeError::Internal(_) => ErrorKind::Internal,
            ExchangeError::BadRequest(_) => ErrorKind::BadRequest,
            ExchangeError::Forbidden(_) => ErrorKind::Forbidden,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ExchangeError::NotFound { .. })
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
