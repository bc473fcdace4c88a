use crate::domain::{DeadLetterQueue, Error};

#[derive(Default, Debug)]
pub struct StdErrDlq {}

impl DeadLetterQueue for StdErrDlq {
    fn report(&self, error: &Error) {
        eprintln!("rejected command: {}", error);
    }
}
