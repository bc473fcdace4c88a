use futures::Stream;

use crate::domain::{AccountId, Command, Error, Money};

pub trait CommandStream {
    type CmdStream: Stream<Item = Result<Command, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::CmdStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

/// Final state of one account, keyed by the caller's alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account: u32,
    pub card: AccountId,
    pub balance: Money,
    pub held: Money,
    pub available: Money,
}

pub trait SummaryWriter {
    fn write(&mut self, summaries: &[AccountSummary]) -> Result<(), Error>;
}
