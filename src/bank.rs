use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::{Account, AccountId, Authorization, AuthorizationId, Error, Money};

/// An account plus every authorization that references it. Keeping both
/// behind one lock serializes ledger mutations and authorization
/// transitions for the account, so available-funds checks are atomic.
#[derive(Debug)]
struct AccountEntry {
    account: Account,
    authorizations: HashMap<AuthorizationId, Authorization>,
}

/// Top-level ledger service: owns the account store and drives the
/// authorization lifecycle against it. Constructed explicitly at startup;
/// there is no global instance.
///
/// Each account has its own mutex, so operations on different accounts do
/// not contend. The outer maps are only locked to resolve identifiers.
#[derive(Debug, Default)]
pub struct Bank {
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<AccountEntry>>>>,
    // AuthorizationId -> owning account, so callers can reference an
    // authorization without naming the account.
    index: RwLock<HashMap<AuthorizationId, AccountId>>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an account with a zero balance and returns its card number.
    pub fn open_account(&self) -> Result<AccountId, Error> {
        self.open_account_with_balance(Money::ZERO)
    }

    pub fn open_account_with_balance(&self, initial: Money) -> Result<AccountId, Error> {
        let account = Account::with_balance(initial)?;
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| Error::LedgerCorruption("account store poisoned"))?;
        loop {
            let account_id = AccountId::generate();
            if let Entry::Vacant(e) = accounts.entry(account_id.clone()) {
                e.insert(Arc::new(Mutex::new(AccountEntry {
                    account: account.clone(),
                    authorizations: HashMap::new(),
                })));
                tracing::debug!(account = %account_id, %initial, "account opened");
                return Ok(account_id);
            }
            // card number collision: generate another
        }
    }

    /// Returns the updated balance.
    pub fn deposit(&self, account_id: &AccountId, amount: Money) -> Result<Money, Error> {
        let balance = self.with_entry(account_id, |entry| entry.account.deposit(amount))?;
        tracing::debug!(account = %account_id, %amount, %balance, "deposit applied");
        Ok(balance)
    }

    /// Returns the updated balance.
    pub fn withdraw(&self, account_id: &AccountId, amount: Money) -> Result<Money, Error> {
        let balance = self.with_entry(account_id, |entry| entry.account.withdraw(amount))?;
        tracing::debug!(account = %account_id, %amount, %balance, "withdrawal applied");
        Ok(balance)
    }

    pub fn balance(&self, account_id: &AccountId) -> Result<Money, Error> {
        self.with_entry(account_id, |entry| Ok(entry.account.balance()))
    }

    pub fn held(&self, account_id: &AccountId) -> Result<Money, Error> {
        self.with_entry(account_id, |entry| Ok(entry.account.held()))
    }

    pub fn available(&self, account_id: &AccountId) -> Result<Money, Error> {
        self.with_entry(account_id, |entry| Ok(entry.account.available()))
    }

    /// Places a hold for `amount` and records a new authorization against
    /// it. `place_hold` errors propagate untranslated.
    pub fn authorize(&self, account_id: &AccountId, amount: Money) -> Result<AuthorizationId, Error> {
        let auth_id = self.with_entry(account_id, |entry| {
            entry.account.place_hold(amount)?;
            let authorization = Authorization::new(account_id.clone(), amount);
            let auth_id = authorization.id();
            entry.authorizations.insert(auth_id, authorization);
            Ok(auth_id)
        })?;
        self.index
            .write()
            .map_err(|_| Error::LedgerCorruption("authorization index poisoned"))?
            .insert(auth_id, account_id.clone());
        tracing::debug!(account = %account_id, authorization = %auth_id, %amount, "authorization placed");
        Ok(auth_id)
    }

    /// Releases the hold without touching the balance; the funds were only
    /// ever reserved. Returns the updated authorization.
    pub fn cancel(&self, auth_id: AuthorizationId) -> Result<Authorization, Error> {
        let account_id = self.resolve(auth_id)?;
        let authorization = self.with_entry(&account_id, |entry| {
            let authorization = entry
                .authorizations
                .get_mut(&auth_id)
                .ok_or(Error::AuthorizationNotFound(auth_id))?;
            authorization.cancel()?;
            let snapshot = authorization.clone();
            entry.account.release_hold(snapshot.amount())?;
            Ok(snapshot)
        })?;
        tracing::debug!(account = %account_id, authorization = %auth_id, "authorization canceled");
        Ok(authorization)
    }

    /// Releases the full hold and debits the captured amount; any
    /// uncaptured remainder simply becomes available again. Returns the
    /// updated authorization.
    pub fn capture(&self, auth_id: AuthorizationId, amount: Money) -> Result<Authorization, Error> {
        let account_id = self.resolve(auth_id)?;
        let authorization = self.with_entry(&account_id, |entry| {
            let authorization = entry
                .authorizations
                .get_mut(&auth_id)
                .ok_or(Error::AuthorizationNotFound(auth_id))?;
            authorization.capture(amount)?;
            let snapshot = authorization.clone();
            entry.account.release_hold(snapshot.amount())?;
            // The released hold covered at least `amount`, so this cannot
            // fail unless the books are already broken.
            entry
                .account
                .withdraw(amount)
                .map_err(|_| Error::LedgerCorruption("capture debit failed despite hold"))?;
            Ok(snapshot)
        })?;
        tracing::debug!(account = %account_id, authorization = %auth_id, %amount, "authorization captured");
        Ok(authorization)
    }

    /// Credits the refunded amount back to the account. Returns the
    /// updated authorization.
    pub fn refund(&self, auth_id: AuthorizationId, amount: Money) -> Result<Authorization, Error> {
        let account_id = self.resolve(auth_id)?;
        let authorization = self.with_entry(&account_id, |entry| {
            let authorization = entry
                .authorizations
                .get_mut(&auth_id)
                .ok_or(Error::AuthorizationNotFound(auth_id))?;
            authorization.refund(amount)?;
            let snapshot = authorization.clone();
            entry.account.deposit(amount)?;
            Ok(snapshot)
        })?;
        tracing::debug!(account = %account_id, authorization = %auth_id, %amount, "refund applied");
        Ok(authorization)
    }

    /// Snapshot of an authorization's current record.
    pub fn authorization(&self, auth_id: AuthorizationId) -> Result<Authorization, Error> {
        let account_id = self.resolve(auth_id)?;
        self.with_entry(&account_id, |entry| {
            entry
                .authorizations
                .get(&auth_id)
                .cloned()
                .ok_or(Error::AuthorizationNotFound(auth_id))
        })
    }

    fn resolve(&self, auth_id: AuthorizationId) -> Result<AccountId, Error> {
        let index = self
            .index
            .read()
            .map_err(|_| Error::LedgerCorruption("authorization index poisoned"))?;
        index
            .get(&auth_id)
            .cloned()
            .ok_or(Error::AuthorizationNotFound(auth_id))
    }

    fn with_entry<T>(
        &self,
        account_id: &AccountId,
        f: impl FnOnce(&mut AccountEntry) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let entry = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| Error::LedgerCorruption("account store poisoned"))?;
            accounts
                .get(account_id)
                .cloned()
                .ok_or_else(|| Error::AccountNotFound(account_id.clone()))?
        };
        let mut guard = entry
            .lock()
            .map_err(|_| Error::LedgerCorruption("account entry poisoned"))?;
        f(&mut guard)
    }
}
