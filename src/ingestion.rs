use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::domain::traits::CommandStream;
use crate::domain::{Command, CommandKind, Error, Money};

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Self { reader: Some(rdr) }
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "type")]
    kind: String,
    account: u32,
    auth: Option<u32>,
    amount: Option<Money>,
}

impl TryFrom<CsvRow> for Command {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let kind = match (row.kind.to_ascii_lowercase().as_str(), row.auth, row.amount) {
            ("open", None, initial) => CommandKind::Open { initial },
            ("deposit", None, Some(amount)) => CommandKind::Deposit { amount },
            ("withdraw", None, Some(amount)) => CommandKind::Withdraw { amount },
            ("authorize", Some(auth), Some(amount)) => CommandKind::Authorize { auth, amount },
            ("cancel", Some(auth), None) => CommandKind::Cancel { auth },
            ("capture", Some(auth), Some(amount)) => CommandKind::Capture { auth, amount },
            ("refund", Some(auth), Some(amount)) => CommandKind::Refund { auth, amount },
            (other, _, _) => {
                return Err(Error::Ingestion(format!("malformed command: {}", other)));
            }
        };

        Ok(Command {
            kind,
            account: row.account,
        })
    }
}

impl<R: Read + Send + 'static> CommandStream for CsvReader<R> {
    type CmdStream = Pin<Box<dyn Stream<Item = Result<Command, Error>> + Send>>;

    fn stream(&mut self) -> Self::CmdStream {
        // Take ownership of the reader so the iterator we build owns all
        // its data and is 'static.
        let reader = match self.reader.take() {
            Some(r) => r,
            None => {
                // Already consumed; return an empty stream.
                return Box::pin(stream::iter(Vec::<Result<Command, Error>>::new()));
            }
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Command::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}
