use crate::models::{round1, CheckOutcome};
use crate::utils::DocCheckError;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Summary of one check, as kept in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEntry {
    pub timestamp: DateTime<Utc>,
    pub document_type: String,
    pub valid: bool,
    pub confidence_percent: f64,
    /// Security score as a percentage.
    pub security_score: f64,
}

impl AnalyticsEntry {
    pub fn from_outcome(outcome: &CheckOutcome, timestamp: DateTime<Utc>) -> Self {
        AnalyticsEntry {
            timestamp,
            document_type: outcome.document_type().to_string(),
            valid: outcome.is_valid(),
            confidence_percent: outcome.confidence_percent(),
            security_score: outcome.security_percent(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeBreakdown {
    pub total: usize,
    pub valid: usize,
}

impl TypeBreakdown {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            round1(self.valid as f64 / self.total as f64 * 100.0)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Percentage, one decimal.
    pub success_rate: f64,
    pub per_type: BTreeMap<String, TypeBreakdown>,
    pub average_confidence: f64,
    pub average_security_score: f64,
}

/// Bounded log of recent verdicts, safe to share between threads.
///
/// When a persistence path is set every entry is also appended to that file
/// as one JSON line. Write failures are counted and logged, never returned.
pub struct AnalyticsLog {
    capacity: usize,
    entries: Mutex<VecDeque<AnalyticsEntry>>,
    path: Option<PathBuf>,
    write_failures: AtomicU64,
}

impl AnalyticsLog {
    pub fn new(capacity: usize) -> Self {
        AnalyticsLog {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
            path: None,
            write_failures: AtomicU64::new(0),
        }
    }

    /// Open a log backed by a JSON-lines file, loading the most recent
    /// `capacity` entries already in it.
    pub fn with_persistence(path: &Path, capacity: usize) -> Result<Self, DocCheckError> {
        let mut log = Self::new(capacity);
        let mut entries = VecDeque::new();

        if path.exists() {
            let content = fs::read_to_string(path)?;
            for (index, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<AnalyticsEntry>(line) {
                    Ok(entry) => {
                        entries.push_back(entry);
                        if entries.len() > log.capacity {
                            entries.pop_front();
                        }
                    }
                    Err(e) => warn!(
                        "Skipping malformed analytics entry at {}:{}: {}",
                        path.display(),
                        index + 1,
                        e
                    ),
                }
            }
        }

        log.entries = Mutex::new(entries);
        log.path = Some(path.to_path_buf());
        Ok(log)
    }

    pub fn record(&self, entry: AnalyticsEntry) {
        let mut entries = self.lock();
        if let Some(path) = &self.path {
            if let Err(e) = Self::append(path, &entry) {
                self.write_failures.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to persist analytics entry to {}: {}", path.display(), e);
            }
        }
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn record_outcome(&self, outcome: &CheckOutcome) {
        self.record(AnalyticsEntry::from_outcome(outcome, Utc::now()));
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> Vec<AnalyticsEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    pub fn summary(&self) -> AnalyticsSummary {
        let entries = self.lock();
        let total = entries.len();
        if total == 0 {
            return AnalyticsSummary::default();
        }

        let valid = entries.iter().filter(|e| e.valid).count();
        let mut per_type: BTreeMap<String, TypeBreakdown> = BTreeMap::new();
        for entry in entries.iter() {
            let breakdown = per_type.entry(entry.document_type.clone()).or_default();
            breakdown.total += 1;
            if entry.valid {
                breakdown.valid += 1;
            }
        }

        let confidence: f64 = entries.iter().map(|e| e.confidence_percent).sum();
        let security: f64 = entries.iter().map(|e| e.security_score).sum();

        AnalyticsSummary {
            total,
            valid,
            invalid: total - valid,
            success_rate: round1(valid as f64 / total as f64 * 100.0),
            per_type,
            average_confidence: round1(confidence / total as f64),
            average_security_score: round1(security / total as f64),
        }
    }

    fn append(path: &Path, entry: &AnalyticsEntry) -> Result<(), DocCheckError> {
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    // A panic while holding the lock leaves the queue itself consistent.
    fn lock(&self) -> MutexGuard<'_, VecDeque<AnalyticsEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
