use std::{fmt, io::BufRead};

use derive_getters::Getters;

use super::{
    record::{classify_bytes, RecordError, RecordKind},
    transaction::{TransactionRow, Transactions},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Split rows into create/update subsets on top of the full set.
    pub enable_categorization: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            enable_categorization: true,
        }
    }
}

/// Accumulates rows for a single pass over a log. Nothing is sorted until
/// [`Extractor::finish`].
#[derive(Debug, Default)]
pub struct Extractor {
    config: ExtractorConfig,
    all: Transactions,
    create: Transactions,
    update: Transactions,
    malformed: usize,
    incomplete: usize,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Consume a whole line-oriented stream. Only read failures are returned;
    /// unusable lines, including ones that are not UTF-8, are counted and
    /// skipped.
    pub fn extract<R: BufRead>(
        config: ExtractorConfig,
        mut reader: R,
    ) -> std::io::Result<Extraction> {
        let mut extractor = Self::new(config);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // skipped lines are already tallied by push_bytes
            let _ = extractor.push_bytes(&buf);
        }

        Ok(extractor.finish())
    }

    pub fn push_line(&mut self, line: &str) -> Result<(), RecordError> {
        self.push_bytes(line.as_bytes())
    }

    pub fn push_bytes(&mut self, line: &[u8]) -> Result<(), RecordError> {
        let record = match classify_bytes(line) {
            Ok(record) => record,
            Err(e) => {
                match e {
                    RecordError::Malformed => self.malformed += 1,
                    RecordError::Incomplete => self.incomplete += 1,
                }
                return Err(e);
            }
        };

        let row = TransactionRow::new(record.ts, record.latency);
        if self.config.enable_categorization {
            match record.kind {
                RecordKind::Untyped | RecordKind::Create => self.create.push(row.clone()),
                RecordKind::Update => self.update.push(row.clone()),
                RecordKind::Other => {}
            }
        }
        self.all.push(row);

        Ok(())
    }

    pub fn finish(mut self) -> Extraction {
        self.all.sort_by_timestamp();
        self.create.sort_by_timestamp();
        self.update.sort_by_timestamp();

        Extraction {
            config: self.config,
            all: self.all,
            create: self.create,
            update: self.update,
            malformed: self.malformed,
            incomplete: self.incomplete,
        }
    }
}

/// Sorted output of one extraction run.
#[derive(Debug, Getters)]
pub struct Extraction {
    config: ExtractorConfig,
    all: Transactions,
    create: Transactions,
    update: Transactions,
    malformed: usize,
    incomplete: usize,
}

impl Extraction {
    pub fn summary(&self) -> Summary {
        let categorized = self.config.enable_categorization;
        Summary {
            total: self.all.len(),
            create: categorized.then(|| self.create.len()),
            update: categorized.then(|| self.update.len()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Getters)]
pub struct Summary {
    total: usize,
    create: Option<usize>,
    update: Option<usize>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Processed {} transaction records", self.total)?;
        if let Some(create) = self.create {
            write!(f, "\n - Create operations: {create}")?;
        }
        if let Some(update) = self.update {
            write!(f, "\n - Update operations: {update}")?;
        }

        Ok(())
    }
}
