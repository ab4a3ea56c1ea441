use crate::domain::account::Account;
use crate::error::Result;
use std::io::Write;

/// Writes the balance report as CSV (`user,balance`).
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    /// Serializes the accounts in the order given and flushes the output.
    pub fn write_accounts(&mut self, accounts: Vec<Account>) -> Result<()> {
        for account in accounts {
            self.writer.serialize(account)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
