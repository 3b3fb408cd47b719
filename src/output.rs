use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::{extractor::Extraction, transaction::Transactions};

pub const ALL_FILE: &str = "tps_latency.csv";
pub const CREATE_FILE: &str = "create_ops.csv";
pub const UPDATE_FILE: &str = "update_ops.csv";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("csv error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

fn write_file(path: &Path, transactions: &Transactions) -> Result<(), OutputError> {
    let file = File::create(path)?;
    transactions.to_csv(BufWriter::new(file))
}

/// Writes the full set, plus the create and update subsets when the
/// extraction was categorized. Returns the files written, in that order.
pub fn write_artifacts(dir: &Path, extraction: &Extraction) -> Result<Vec<PathBuf>, OutputError> {
    fs::create_dir_all(dir)?;

    let mut outputs = vec![(ALL_FILE, extraction.all())];
    if extraction.config().enable_categorization {
        outputs.push((CREATE_FILE, extraction.create()));
        outputs.push((UPDATE_FILE, extraction.update()));
    }

    let mut written = Vec::with_capacity(outputs.len());
    for (name, transactions) in outputs {
        let path = dir.join(name);
        write_file(&path, transactions)?;
        written.push(path);
    }

    Ok(written)
}
