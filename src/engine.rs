use std::collections::HashMap;

use futures::StreamExt;

use crate::bank::Bank;
use crate::domain::{
    AccountId, AccountSummary, AuthorizationId, Command, CommandKind, Error, Money,
    traits::{CommandStream, DeadLetterQueue, SummaryWriter},
};

/// Drives a stream of ledger commands into the [`Bank`], translating the
/// caller's account/authorization aliases into the identifiers the core
/// mints. Rejected commands go to the dead-letter queue; a fatal error
/// aborts the run.
#[derive(Debug)]
pub struct Engine<I, O, D>
where
    I: CommandStream,
    O: SummaryWriter,
    D: DeadLetterQueue,
{
    ingestion: I,
    summary: O,
    dlq: D,
    bank: Bank,
    accounts: HashMap<u32, AccountId>,
    authorizations: HashMap<u32, AuthorizationId>,
}

impl<I, O, D> Engine<I, O, D>
where
    I: CommandStream,
    O: SummaryWriter,
    D: DeadLetterQueue,
{
    pub fn new(ingestion: I, summary: O, dlq: D) -> Self {
        Self {
            ingestion,
            summary,
            dlq,
            bank: Bank::new(),
            accounts: HashMap::new(),
            authorizations: HashMap::new(),
        }
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut commands = self.ingestion.stream();

        while let Some(cmd) = commands.next().await {
            if let Err(e) = cmd.and_then(|cmd| self.apply_command(cmd)) {
                if e.is_fatal() {
                    return Err(e);
                }
                tracing::warn!(error = %e, "command rejected");
                self.dlq.report(&e);
            }
        }

        Ok(())
    }

    fn apply_command(&mut self, cmd: Command) -> Result<(), Error> {
        tracing::debug!(%cmd, "applying command");

        match cmd.kind {
            CommandKind::Open { initial } => {
                if self.accounts.contains_key(&cmd.account) {
                    return Err(Error::Engine(format!(
                        "account alias {} already open",
                        cmd.account
                    )));
                }
                let account_id = self
                    .bank
                    .open_account_with_balance(initial.unwrap_or(Money::ZERO))?;
                self.accounts.insert(cmd.account, account_id);
                Ok(())
            }
            CommandKind::Deposit { amount } => {
                let account_id = self.account(cmd.account)?;
                self.bank.deposit(&account_id, amount)?;
                Ok(())
            }
            CommandKind::Withdraw { amount } => {
                let account_id = self.account(cmd.account)?;
                self.bank.withdraw(&account_id, amount)?;
                Ok(())
            }
            CommandKind::Authorize { auth, amount } => {
                if self.authorizations.contains_key(&auth) {
                    return Err(Error::Engine(format!(
                        "authorization alias {} already used",
                        auth
                    )));
                }
                let account_id = self.account(cmd.account)?;
                let auth_id = self.bank.authorize(&account_id, amount)?;
                self.authorizations.insert(auth, auth_id);
                Ok(())
            }
            CommandKind::Cancel { auth } => {
                let auth_id = self.authorization(auth)?;
                self.bank.cancel(auth_id)?;
                Ok(())
            }
            CommandKind::Capture { auth, amount } => {
                let auth_id = self.authorization(auth)?;
                self.bank.capture(auth_id, amount)?;
                Ok(())
            }
            CommandKind::Refund { auth, amount } => {
                let auth_id = self.authorization(auth)?;
                self.bank.refund(auth_id, amount)?;
                Ok(())
            }
        }
    }

    fn account(&self, alias: u32) -> Result<AccountId, Error> {
        self.accounts
            .get(&alias)
            .cloned()
            .ok_or_else(|| Error::Engine(format!("unknown account alias {}", alias)))
    }

    fn authorization(&self, alias: u32) -> Result<AuthorizationId, Error> {
        self.authorizations
            .get(&alias)
            .copied()
            .ok_or_else(|| Error::Engine(format!("unknown authorization alias {}", alias)))
    }

    /// Reports the final state of every opened account, in alias order.
    pub fn flush(&mut self) -> Result<(), Error> {
        let mut entries: Vec<(u32, AccountId)> = self
            .accounts
            .iter()
            .map(|(alias, id)| (*alias, id.clone()))
            .collect();
        entries.sort_unstable_by_key(|(alias, _)| *alias);

        let mut summaries = Vec::with_capacity(entries.len());
        for (alias, account_id) in entries {
            summaries.push(AccountSummary {
                account: alias,
                balance: self.bank.balance(&account_id)?,
                held: self.bank.held(&account_id)?,
                available: self.bank.available(&account_id)?,
                card: account_id,
            });
        }

        self.summary.write(&summaries)
    }
}
