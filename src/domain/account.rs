use crate::domain::{Error, Money};

/// Balance and held-funds accounting for a single account.
///
/// Invariant: `0 <= held <= balance`, so `available()` is never negative.
/// Every mutation checks before touching either field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    balance: Money,
    held: Money,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account opened with a starting balance.
    pub fn with_balance(balance: Money) -> Result<Self, Error> {
        if balance < Money::ZERO {
            return Err(Error::InvalidAmount("initial balance cannot be negative"));
        }
        Ok(Self {
            balance,
            held: Money::ZERO,
        })
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn held(&self) -> Money {
        self.held
    }

    /// Funds not backing an active authorization hold.
    pub fn available(&self) -> Money {
        self.balance - self.held
    }

    /// Returns the updated balance.
    pub fn deposit(&mut self, amount: Money) -> Result<Money, Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount("amount must be positive"));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(Error::InvalidAmount("deposit overflows balance"))?;
        Ok(self.balance)
    }

    /// Returns the updated balance.
    pub fn withdraw(&mut self, amount: Money) -> Result<Money, Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount("amount must be positive"));
        }
        if amount > self.available() {
            return Err(Error::InsufficientFunds);
        }
        self.balance -= amount;
        Ok(self.balance)
    }

    /// Reserves `amount` out of the available funds.
    pub fn place_hold(&mut self, amount: Money) -> Result<(), Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount("amount must be positive"));
        }
        if amount > self.available() {
            return Err(Error::InsufficientFunds);
        }
        self.held += amount;
        Ok(())
    }

    /// Releases a previously placed hold. Releasing more than is currently
    /// held means the bookkeeping is broken; that is never clamped.
    pub fn release_hold(&mut self, amount: Money) -> Result<(), Error> {
        if amount > self.held {
            return Err(Error::LedgerCorruption("released more than held"));
        }
        self.held -= amount;
        Ok(())
    }
}
