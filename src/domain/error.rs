use crate::domain::authorization::{AuthorizationId, AuthorizationState};
use crate::domain::card::AccountId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    #[error("insufficient available funds")]
    InsufficientFunds,

    #[error("operation not permitted while authorization is {0}")]
    InvalidState(AuthorizationState),

    #[error("account {0} does not exist")]
    AccountNotFound(AccountId),

    #[error("authorization {0} does not exist")]
    AuthorizationNotFound(AuthorizationId),

    #[error("ledger corruption: {0}")]
    LedgerCorruption(&'static str),

    #[error("ingestion failed with: {0}")]
    Ingestion(String),

    #[error("engine failed with: {0}")]
    Engine(String),
}

impl Error {
    /// Fatal errors indicate a bookkeeping bug and must abort the run
    /// instead of landing in the dead-letter queue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::LedgerCorruption(_))
    }
}
