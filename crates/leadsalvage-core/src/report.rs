//! One-shot pipeline: blobs + displayed counters → render-ready report.
//!
//! extract → normalise → reconcile → resolve, strictly in that order.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SalvageConfig;
use crate::extract::{Extraction, extract};
use crate::stats::{RawStats, StatsTriple, reconcile};
use crate::verdict::{ResultVerdict, resolve};

/// A recovered record with messages ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEntry {
    pub display_name: String,
    pub email: Option<String>,
    pub messages: Vec<String>,
}

/// One non-empty failed row of the result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReport {
    pub extraction: Extraction,
    pub rendered: Vec<RenderedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub records: Vec<RecordReport>,
    /// Counters as displayed, after coercion.
    pub displayed: StatsTriple,
    /// Failed rows actually recovered from the blobs.
    pub authoritative_failed: u64,
    /// Reconciled counters; the verdict is derived from these.
    pub stats: StatsTriple,
    pub verdict: ResultVerdict,
    /// Whether reconciliation changed any displayed counter.
    pub corrected: bool,
}

/// Run the whole pipeline over one result page.
pub fn build_report<S: AsRef<str>>(
    blobs: &[S],
    displayed: &RawStats,
    config: &SalvageConfig,
) -> ImportReport {
    let records: Vec<RecordReport> = blobs
        .iter()
        .map(|blob| extract(blob.as_ref(), &config.unnamed_lead))
        .filter(|x| x.failed_rows() > 0)
        .map(|extraction| RecordReport {
            rendered: render_entries(&extraction, config),
            extraction,
        })
        .collect();

    let authoritative_failed: u64 = records
        .iter()
        .map(|r| r.extraction.failed_rows() as u64)
        .sum();

    let shown = displayed.to_triple();
    let stats = reconcile(shown, authoritative_failed);
    let verdict = resolve(&stats, &config.verdict);
    let corrected = stats != shown;

    if corrected {
        warn!(
            displayed = ?shown,
            reconciled = ?stats,
            authoritative_failed,
            "displayed counters disagreed with failed records"
        );
    }
    info!(
        blobs = blobs.len(),
        records = records.len(),
        authoritative_failed,
        status = %verdict.status,
        "import report built"
    );

    ImportReport {
        records,
        displayed: shown,
        authoritative_failed,
        stats,
        verdict,
        corrected,
    }
}

fn render_entries(extraction: &Extraction, config: &SalvageConfig) -> Vec<RenderedEntry> {
    extraction
        .entries
        .iter()
        .map(|entry| RenderedEntry {
            display_name: entry.display_name.clone(),
            email: entry.email.clone(),
            messages: entry.display_messages(config),
        })
        .collect()
}
