//! Trial run log
//!
//! Append-only JSON-lines store of per-trial outcome tables, one object per
//! line. The CLI keeps it in the XDG data directory (~/.local/share/q-audit/)
//! unless configured otherwise. Logged trials can be loaded back and replayed
//! through `FixedSource` or re-evaluated directly.

use crate::aggregate::TrialOutcome;
use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use crate::source::fixed::FixedSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One logged trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Run (uniformity check) this trial belongs to
    pub run_id: String,

    /// Dispatch index within the run
    pub trial: usize,

    /// Source name
    pub source: String,

    pub timestamp: DateTime<Utc>,

    pub counts: OutcomeCounts,
}

impl TrialRecord {
    /// Record a finished trial
    pub fn new(run_id: impl Into<String>, source: impl Into<String>, outcome: &TrialOutcome) -> Self {
        Self {
            run_id: run_id.into(),
            trial: outcome.trial,
            source: source.into(),
            timestamp: Utc::now(),
            counts: outcome.counts.clone(),
        }
    }

    /// Source that replays this trial's outcome table
    pub fn replay(&self) -> Result<FixedSource> {
        FixedSource::new(self.counts.clone())
    }
}

/// Run log backed by a JSON-lines file
#[derive(Debug)]
pub struct RunLog {
    records: Vec<TrialRecord>,
    path: PathBuf,
}

impl RunLog {
    /// Load the run log from a specific path
    ///
    /// A missing file is an empty log; blank lines are skipped.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    serde_json::from_str(line).map_err(|e| {
                        Error::Config(format!(
                            "Failed to parse run log {} line {}: {}",
                            path.display(),
                            i + 1,
                            e
                        ))
                    })
                })
                .collect::<Result<Vec<TrialRecord>>>()?
        } else {
            Vec::new()
        };

        Ok(Self { records, path })
    }

    /// File backing this log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record to the file and to memory
    pub fn append(&mut self, record: TrialRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;

        debug!(run_id = %record.run_id, trial = record.trial, "trial logged");
        self.records.push(record);
        Ok(())
    }

    /// Append every outcome of a run, ordered by trial index
    pub fn append_run(&mut self, run_id: &str, source: &str, outcomes: &[TrialOutcome]) -> Result<()> {
        let mut sorted: Vec<&TrialOutcome> = outcomes.iter().collect();
        sorted.sort_by_key(|o| o.trial);
        for outcome in sorted {
            self.append(TrialRecord::new(run_id, source, outcome))?;
        }
        Ok(())
    }

    /// All records, oldest first
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Distinct run ids, in the order they first appear
    pub fn runs(&self) -> Vec<&str> {
        let mut runs: Vec<&str> = Vec::new();
        for record in &self.records {
            if !runs.contains(&record.run_id.as_str()) {
                runs.push(&record.run_id);
            }
        }
        runs
    }

    /// Records of one run
    pub fn run(&self, run_id: &str) -> Vec<&TrialRecord> {
        self.records.iter().filter(|r| r.run_id == run_id).collect()
    }

    /// Outcomes of one run, ready for re-evaluation
    pub fn outcomes(&self, run_id: &str) -> Result<Vec<TrialOutcome>> {
        let outcomes: Vec<TrialOutcome> = self
            .run(run_id)
            .into_iter()
            .map(|r| TrialOutcome {
                trial: r.trial,
                counts: r.counts.clone(),
            })
            .collect();
        if outcomes.is_empty() {
            return Err(Error::Config(format!("No logged run with id {}", run_id)));
        }
        Ok(outcomes)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
