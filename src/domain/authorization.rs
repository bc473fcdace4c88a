use std::fmt;

use uuid::Uuid;

use crate::domain::card::{self, AccountId};
use crate::domain::{Error, Money};

/// Opaque identifier for a card authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorizationId(Uuid);

impl AuthorizationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AuthorizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle of a card transaction. `Canceled` and `Refunded` are
/// terminal; `Captured` still accepts refunds until fully refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    Authorized,
    Canceled,
    Captured,
    Refunded,
}

impl fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthorizationState::Authorized => "authorized",
            AuthorizationState::Canceled => "canceled",
            AuthorizationState::Captured => "captured",
            AuthorizationState::Refunded => "refunded",
        })
    }
}

/// One card transaction and its transition bookkeeping. The referenced
/// account is identified, never owned; the [`Bank`](crate::Bank) sequences
/// the matching ledger mutations under the account's lock.
#[derive(Debug, Clone)]
pub struct Authorization {
    id: AuthorizationId,
    account_id: AccountId,
    code: String,
    amount: Money,
    state: AuthorizationState,
    captured: Option<Money>,
    refunded: Money,
}

impl Authorization {
    pub(crate) fn new(account_id: AccountId, amount: Money) -> Self {
        Self {
            id: AuthorizationId::new(),
            account_id,
            code: card::random_authorization_code(),
            amount,
            state: AuthorizationState::Authorized,
            captured: None,
            refunded: Money::ZERO,
        }
    }

    pub fn id(&self) -> AuthorizationId {
        self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Six-digit code handed back to the card network.
    pub fn authorization_code(&self) -> &str {
        &self.code
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn state(&self) -> AuthorizationState {
        self.state
    }

    /// Present once captured.
    pub fn captured_amount(&self) -> Option<Money> {
        self.captured
    }

    /// Cumulative refunds, never above the captured amount.
    pub fn refunded_amount(&self) -> Money {
        self.refunded
    }

    pub(crate) fn cancel(&mut self) -> Result<(), Error> {
        match self.state {
            AuthorizationState::Authorized => {
                self.state = AuthorizationState::Canceled;
                Ok(())
            }
            state => Err(Error::InvalidState(state)),
        }
    }

    pub(crate) fn capture(&mut self, amount: Money) -> Result<(), Error> {
        match self.state {
            AuthorizationState::Authorized => {
                if !amount.is_positive() {
                    return Err(Error::InvalidAmount("amount must be positive"));
                }
                if amount > self.amount {
                    return Err(Error::InvalidAmount("capture exceeds authorized amount"));
                }
                self.state = AuthorizationState::Captured;
                self.captured = Some(amount);
                Ok(())
            }
            state => Err(Error::InvalidState(state)),
        }
    }

    pub(crate) fn refund(&mut self, amount: Money) -> Result<(), Error> {
        match self.state {
            AuthorizationState::Captured => {
                let Some(captured) = self.captured else {
                    return Err(Error::LedgerCorruption("captured authorization without amount"));
                };
                if !amount.is_positive() {
                    return Err(Error::InvalidAmount("amount must be positive"));
                }
                if amount > captured - self.refunded {
                    return Err(Error::InvalidAmount("refund exceeds refundable remainder"));
                }
                self.refunded += amount;
                if self.refunded == captured {
                    self.state = AuthorizationState::Refunded;
                }
                Ok(())
            }
            state => Err(Error::InvalidState(state)),
        }
    }
}
