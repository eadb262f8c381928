use crate::case::CaseOutcome;
use crate::year::Year;
use serde::{Deserialize, Serialize};

/// Per-run record of every listed case and what became of it.
///
/// Written as `manifest.json` next to the audio files so a later run (or a
/// person) can see which cases were skipped and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub year: Year,
    pub output_dir: String,
    /// Listing frame the cases were scraped from.
    pub listing_url: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub dry_run: bool,
    pub cases: Vec<CaseRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub index: usize,
    pub name: String,
    pub file_stem: String,
    pub player_url: Option<String>,
    pub stream_url: Option<String>,
    pub outcome: CaseOutcome,
}

/// Outcome counts for the end-of-run log line: `total` cases, then one
/// count per `CaseOutcome` kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub downloaded: usize,
    pub present: usize,
    pub listed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunManifest {
    pub fn new(year: Year, output_dir: &str, listing_url: &str, dry_run: bool) -> Self {
        Self {
            year,
            output_dir: output_dir.to_string(),
            listing_url: listing_url.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            finished_at: None,
            dry_run,
            cases: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(chrono::Utc::now().to_rfc3339());
    }

    pub fn summary(&self) -> RunSummary {
        let mut s = RunSummary {
            total: self.cases.len(),
            ..RunSummary::default()
        };
        for case in &self.cases {
            match case.outcome {
                CaseOutcome::Downloaded { .. } => s.downloaded += 1,
                CaseOutcome::AlreadyPresent { .. } => s.present += 1,
                CaseOutcome::Listed => s.listed += 1,
                CaseOutcome::Skipped { .. } => s.skipped += 1,
                CaseOutcome::Failed { .. } => s.failed += 1,
            }
        }
        s
    }
}
