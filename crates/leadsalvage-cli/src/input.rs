//! Import-result documents as written by the upload flow.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use leadsalvage_core::{RawCounter, RawStats};
use serde::Deserialize;

/// The result payload kept for the result page.
///
/// Every field is optional; counters may be numbers or strings.
#[derive(Debug, Default, Deserialize)]
pub struct ResultDocument {
    #[serde(default, alias = "created")]
    pub created_count: RawCounter,
    #[serde(default, alias = "total")]
    pub total_count: RawCounter,
    #[serde(default, alias = "failed")]
    pub failed_count: RawCounter,
    #[serde(default)]
    pub failed_leads: Vec<String>,
}

impl ResultDocument {
    pub fn displayed(&self) -> RawStats {
        RawStats {
            created: self.created_count.clone(),
            total: self.total_count.clone(),
            failed: self.failed_count.clone(),
        }
    }
}

/// Read a document from `path`, or stdin when `path` is `None` or `-`.
pub fn read_document(path: Option<&Path>) -> anyhow::Result<ResultDocument> {
    let (text, source) = match path {
        Some(p) if p != Path::new("-") => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("reading {}", p.display()))?;
            (text, p.display().to_string())
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading result document from stdin")?;
            (text, "stdin".to_string())
        }
    };
    parse_document(&text).with_context(|| format!("parsing result document from {source}"))
}

pub fn parse_document(text: &str) -> anyhow::Result<ResultDocument> {
    Ok(serde_json::from_str(text)?)
}
