use crate::domain::Money;

/// Ledger operation as submitted by a caller. Account and authorization
/// references are caller-chosen aliases; the engine maps them to the real
/// identifiers minted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Open { initial: Option<Money> },
    Deposit { amount: Money },
    Withdraw { amount: Money },
    Authorize { auth: u32, amount: Money },
    Cancel { auth: u32 },
    Capture { auth: u32, amount: Money },
    Refund { auth: u32, amount: Money },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub account: u32,
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?},account={}", self.kind, self.account)
    }
}
