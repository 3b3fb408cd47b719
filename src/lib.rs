mod extractor;
mod output;
mod record;
mod stats;
mod transaction;
mod types;

pub use self::{
    extractor::{Extraction, Extractor, ExtractorConfig, Summary},
    output::{write_artifacts, OutputError, ALL_FILE, CREATE_FILE, UPDATE_FILE},
    record::{classify_bytes, classify_line, LogRecord, RecordError, RecordKind},
    stats::{LatencyStats, Report, Sample, Samples, StatsError, ThroughputStats, TypeComparison},
    transaction::{TransactionRow, Transactions, CSV_HEADER},
    types::Millis,
};
