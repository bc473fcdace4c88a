pub mod account;
pub mod authorization;
pub mod card;
pub mod command;
pub mod error;
pub mod money;
pub mod traits;

pub use account::Account;
pub use authorization::{Authorization, AuthorizationId, AuthorizationState};
pub use card::AccountId;
pub use command::{Command, CommandKind};
pub use error::Error;
pub use money::Money;
pub use traits::{AccountSummary, CommandStream, DeadLetterQueue, SummaryWriter};
