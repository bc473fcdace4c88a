use crate::domain::{AccountSummary, Error, SummaryWriter};

#[derive(Default, Debug)]
pub struct StdOutSummary {}

impl SummaryWriter for StdOutSummary {
    fn write(&mut self, summaries: &[AccountSummary]) -> Result<(), Error> {
        println!("account,card,balance,held,available");
        for summary in summaries {
            println!(
                "{},{},{},{},{}",
                summary.account, summary.card, summary.balance, summary.held, summary.available
            );
        }
        Ok(())
    }
}
