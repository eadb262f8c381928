use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of a year's oral-argument listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseEntry {
    /// 1-based position in the listing.
    pub index: usize,
    /// Case name as shown in the listing (whitespace-collapsed, NFC).
    pub name: String,
    /// Media player page for the case video, absent when the row has no
    /// usable video link.
    pub player_url: Option<String>,
}

/// What happened to a single case during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Audio was extracted to `path`.
    Downloaded { path: PathBuf },
    /// `path` already existed and the run was asked to skip existing files.
    AlreadyPresent { path: PathBuf },
    /// Dry run: the case was listed and resolved but not downloaded.
    Listed,
    /// Nothing to download (no link, no stream manifest).
    Skipped { reason: String },
    /// Resolution or download was attempted and failed.
    Failed { reason: String },
}

impl CaseOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped { reason: reason.into() }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed { reason: reason.into() }
    }

    /// Path of the audio file this case produced, if any.
    pub fn output_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Downloaded { path } | Self::AlreadyPresent { path } => Some(path),
            _ => None,
        }
    }
}
