//! Settlement Store
//!
//! Persistence boundary of the exchange core:
//! - `store`: the contract the order service consumes
//! - `matching`: counter-order eligibility and ranking
//! - `transfer`: two-party balance transfer computed on copies
//! - `memory`: thread-safe in-memory implementation
//!
//! **Key Invariants:**
//! - A settlement is all-or-nothing: balances and both order statuses change together
//! - Client balances never go negative
//! - Only OPEN orders are matched or settled

pub mod store;
pub mod matching;
pub mod transfer;
pub mod memory;

pub use memory::InMemoryStore;
pub use store::SettlementStore;
