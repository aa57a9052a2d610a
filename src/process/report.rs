use serde::Serialize;
use std::fmt;

/// Artifact counts for one filing (JSON summaries and fundamentals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilingStats {
    pub published: usize,
    pub skipped_duplicates: usize,
    pub invalid: usize,
    pub not_found: usize,
    /// Statement branches abandoned on a storage or serialization error
    pub errors: usize,
}

impl FilingStats {
    pub fn add(&mut self, other: &FilingStats) {
        self.published += other.published;
        self.skipped_duplicates += other.skipped_duplicates;
        self.invalid += other.invalid;
        self.not_found += other.not_found;
        self.errors += other.errors;
    }
}

impl fmt::Display for FilingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} published, {} duplicate, {} invalid, {} not found, {} errors",
            self.published, self.skipped_duplicates, self.invalid, self.not_found, self.errors
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FilingOutcome {
    Completed(FilingStats),
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct FilingResult {
    pub doc_id: String,
    pub outcome: FilingOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub results: Vec<FilingResult>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FilingOutcome::Completed(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.completed()
    }

    pub fn totals(&self) -> FilingStats {
        let mut totals = FilingStats::default();
        for result in &self.results {
            if let FilingOutcome::Completed(stats) = &result.outcome {
                totals.add(stats);
            }
        }
        totals
    }

    pub fn outcome(&self, doc_id: &str) -> Option<&FilingOutcome> {
        self.results
            .iter()
            .find(|r| r.doc_id == doc_id)
            .map(|r| &r.outcome)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} filings: {} completed, {} failed ({})",
            self.results.len(),
            self.completed(),
            self.failed(),
            self.totals()
        )
    }
}
