use std::{env, fs::File, path::Path};

use tracing_subscriber::EnvFilter;

use bank_ledger::dlq::StdErrDlq;
use bank_ledger::engine::Engine;
use bank_ledger::ingestion::CsvReader;
use bank_ledger::summary::StdOutSummary;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args();
    let file_path = args.nth(1).expect("No command file was provided");
    let file = File::open(Path::new(&file_path))?;

    let ingestion = CsvReader::new(file);
    let mut engine = Engine::new(ingestion, StdOutSummary::default(), StdErrDlq::default());

    engine.process().await?;
    engine.flush()?;

    Ok(())
}
