//! Failed-record entries recovered from import-result payloads.

use serde::{Deserialize, Serialize};

use crate::config::SalvageConfig;
use crate::normalize::normalize;

/// One failed lead recovered from a raw blob.
///
/// Built once by [`extract`](crate::extract::extract) and never mutated.
/// `messages` holds raw, un-normalised strings in field-priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedErrorEntry {
    pub display_name: String,
    pub email: Option<String>,
    pub messages: Vec<String>,
}

impl ExtractedErrorEntry {
    /// Messages ready to render: normalised in order, or the configured
    /// generic record error when nothing was recovered.
    pub fn display_messages(&self, config: &SalvageConfig) -> Vec<String> {
        if self.messages.is_empty() {
            return vec![config.generic_record_error.clone()];
        }
        self.messages.iter().map(|m| normalize(m)).collect()
    }
}
