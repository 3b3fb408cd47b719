use std::io::Write;

use derive_more::{Constructor, Deref, DerefMut};
use serde::Serialize;

use super::{output::OutputError, types::Millis};

pub const CSV_HEADER: [&str; 2] = ["timestamp", "latency_ms"];

#[derive(Debug, Clone, PartialEq, Constructor, Serialize)]
pub struct TransactionRow {
    pub timestamp: Millis,
    pub latency_ms: Millis,
}

#[derive(Debug, Default, Clone, PartialEq, Deref, DerefMut)]
pub struct Transactions(pub Vec<TransactionRow>);

impl Transactions {
    /// Stable: rows sharing a timestamp keep their arrival order.
    pub fn sort_by_timestamp(&mut self) {
        self.0.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    }

    pub fn to_csv<W: Write>(&self, wtr: W) -> Result<(), OutputError> {
        let mut wrt = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(wtr);
        wrt.write_record(CSV_HEADER)?;
        for row in &self.0 {
            wrt.serialize(row)?;
        }
        wrt.flush()?;

        Ok(())
    }
}
