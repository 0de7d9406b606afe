//! Order Service
//!
//! Entry point of the exchange core. Accepts orders, validates them, runs
//! the matching protocol against the settlement store and manages the order
//! status lifecycle.
//!
//! **Key Invariants:**
//! - A rejected order is never persisted
//! - A persisted order is always reported with its id, whatever the match stage did
//! - The executed price is the resting order's price
//! - DONE and CANCEL are terminal

pub mod config;
pub mod lifecycle;
pub mod outcome;
pub mod service;
pub mod telemetry;

pub use config::CoreConfig;
pub use outcome::CreateOrderOutcome;
pub use service::OrderService;
