//! Types library for the exchange core
//!
//! Shared definitions used by the order service and the settlement store.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, ClientId)
//! - `order`: Order type, status codes, requests and views
//! - `client`: Client balances and public view
//! - `settlement`: Executed price and settlement record
//! - `errors`: Error taxonomy with status-code hints

pub mod ids;
pub mod order;
pub mod client;
pub mod settlement;
pub mod errors;

pub const LIB_VERSION: &str = "0.1.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::order::*;
    pub use crate::client::*;
    pub use crate::settlement::*;
    pub use crate::errors::*;
}
