//! Minimal bank ledger: accounts with balance/held accounting and a card
//! authorization lifecycle (authorize -> cancel/capture -> refund).
//!
//! [`Bank`] is the programmatic API; the binary wraps it in a CSV-driven
//! command harness.

pub mod bank;
pub mod dlq;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod summary;

pub use bank::Bank;
pub use domain::{
    Account, AccountId, Authorization, AuthorizationId, AuthorizationState, Error, Money,
};
