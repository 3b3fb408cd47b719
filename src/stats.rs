//! Throughput and latency statistics over written artifacts.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use derive_getters::Getters;
use derive_more::{Deref, DerefMut};
use serde::Deserialize;
use thiserror::Error;

use super::output::{ALL_FILE, CREATE_FILE, UPDATE_FILE};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("missing artifact: {}", .0.display())]
    MissingArtifact(PathBuf),
    #[error("csv error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    pub latency_ms: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Deref, DerefMut)]
pub struct Samples(pub Vec<Sample>);

impl Samples {
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, StatsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StatsError::MissingArtifact(path.to_path_buf()));
        }
        csv::Reader::from_path(path)?
            .deserialize()
            .collect::<Result<_, _>>()
            .map(Self)
            .map_err(StatsError::from)
    }

    /// Rows per occupied whole second. Seconds without rows are absent.
    pub fn per_second_counts(&self) -> BTreeMap<i64, usize> {
        let mut buckets = BTreeMap::new();
        for s in &self.0 {
            let second = (s.timestamp / 1000.0).floor() as i64;
            *buckets.entry(second).or_insert(0usize) += 1;
        }
        buckets
    }

    fn sorted_latencies(&self) -> Vec<f64> {
        let mut latencies: Vec<f64> = self.0.iter().map(|s| s.latency_ms).collect();
        latencies.sort_by(f64::total_cmp);
        latencies
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[derive(Debug, Clone, PartialEq, Getters)]
pub struct LatencyStats {
    count: usize,
    mean: f64,
    p50: f64,
    p90: f64,
    p95: f64,
}

impl LatencyStats {
    pub fn compute(samples: &Samples) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let sorted = samples.sorted_latencies();
        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted),
            p50: quantile(&sorted, 0.50),
            p90: quantile(&sorted, 0.90),
            p95: quantile(&sorted, 0.95),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Getters)]
pub struct ThroughputStats {
    peak_tps: f64,
    average_tps: f64,
}

impl ThroughputStats {
    /// The average spans every second from the first to the last occupied
    /// one, empty seconds counting as zero.
    pub fn compute(samples: &Samples) -> Option<Self> {
        let counts = samples.per_second_counts();
        let peak = *counts.values().max()?;
        let (&first, _) = counts.first_key_value()?;
        let (&last, _) = counts.last_key_value()?;
        let span = last as f64 - first as f64 + 1.0;
        Some(Self {
            peak_tps: peak as f64,
            average_tps: samples.len() as f64 / span,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Getters)]
pub struct TypeComparison {
    create: Option<LatencyStats>,
    create_count: usize,
    update: Option<LatencyStats>,
    update_count: usize,
}

#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Report {
    total: usize,
    throughput: Option<ThroughputStats>,
    latency: Option<LatencyStats>,
    by_type: Option<TypeComparison>,
}

impl Report {
    pub fn new(all: &Samples, by_type: Option<(&Samples, &Samples)>) -> Self {
        Self {
            total: all.len(),
            throughput: ThroughputStats::compute(all),
            latency: LatencyStats::compute(all),
            by_type: by_type.map(|(create, update)| TypeComparison {
                create: LatencyStats::compute(create),
                create_count: create.len(),
                update: LatencyStats::compute(update),
                update_count: update.len(),
            }),
        }
    }

    /// Per-type statistics are included only when both category files exist.
    pub fn from_dir(dir: &Path) -> Result<Self, StatsError> {
        let all = Samples::from_csv(dir.join(ALL_FILE))?;

        let (create_path, update_path) = (dir.join(CREATE_FILE), dir.join(UPDATE_FILE));
        let by_type = if create_path.exists() && update_path.exists() {
            Some((
                Samples::from_csv(create_path)?,
                Samples::from_csv(update_path)?,
            ))
        } else {
            log::debug!("category files missing in {}, skipping per-type stats", dir.display());
            None
        };

        Ok(Self::new(&all, by_type.as_ref().map(|(c, u)| (c, u))))
    }
}

fn write_type_stats(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    count: usize,
    stats: Option<&LatencyStats>,
) -> fmt::Result {
    writeln!(f, "{label} Operations: {count}")?;
    if let Some(stats) = stats {
        writeln!(f, "  - Average Latency: {:.1} ms", stats.mean)?;
        writeln!(f, "  - 95th Percentile: {:.1} ms", stats.p95)?;
    }

    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(by_type) = &self.by_type {
            writeln!(f, "Operation Type Statistics:")?;
            write_type_stats(f, "Create", by_type.create_count, by_type.create.as_ref())?;
            write_type_stats(f, "Update", by_type.update_count, by_type.update.as_ref())?;
            writeln!(f)?;
        }

        writeln!(f, "Overall Performance Statistics:")?;
        write!(f, "Total Transactions: {}", self.total)?;
        match (&self.throughput, &self.latency) {
            (Some(tps), Some(lat)) => {
                writeln!(f)?;
                writeln!(f, "Peak TPS: {:.1}", tps.peak_tps)?;
                writeln!(f, "Average TPS: {:.1}", tps.average_tps)?;
                writeln!(f, "Average Latency: {:.1} ms", lat.mean)?;
                writeln!(f, "Latency 50th Percentile: {:.1} ms", lat.p50)?;
                writeln!(f, "Latency 90th Percentile: {:.1} ms", lat.p90)?;
                write!(f, "Latency 95th Percentile: {:.1} ms", lat.p95)
            }
            _ => write!(f, " (no samples)"),
        }
    }
}
