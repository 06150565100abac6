//! Result verdict: the tri-state outcome shown in the icon/title/message
//! region of the result page.

use serde::{Deserialize, Serialize};

use crate::config::{VerdictTexts, fill};
use crate::stats::StatsTriple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Partial,
    Failure,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Success => "success",
            ResultStatus::Partial => "partial",
            ResultStatus::Failure => "failure",
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultVerdict {
    pub status: ResultStatus,
    pub title: String,
    pub message: String,
}

/// Map a reconciled triple to its verdict. First matching case wins:
///
/// 1. nothing created but something processed or failed → failure
/// 2. some created, some failed → partial
/// 3. some created, none failed → success
/// 4. nothing at all → success with the empty-result message
///
/// Pure: the same triple always yields the same verdict.
pub fn resolve(stats: &StatsTriple, texts: &VerdictTexts) -> ResultVerdict {
    let StatsTriple {
        created,
        total,
        failed,
    } = *stats;

    if created == 0 && (failed > 0 || total > 0) {
        return ResultVerdict {
            status: ResultStatus::Failure,
            title: texts.failure_title.clone(),
            message: texts.failure_message.clone(),
        };
    }

    if created > 0 && failed > 0 {
        let failed_part = if failed == 1 {
            &texts.partial_failed_one
        } else {
            &texts.partial_failed_many
        };
        let message = format!(
            "{} {}",
            fill(&texts.partial_message, created, total, failed),
            fill(failed_part, created, total, failed)
        );
        return ResultVerdict {
            status: ResultStatus::Partial,
            title: texts.completed_title.clone(),
            message,
        };
    }

    if created > 0 {
        let template = if created == 1 {
            &texts.success_message_one
        } else {
            &texts.success_message
        };
        return ResultVerdict {
            status: ResultStatus::Success,
            title: texts.completed_title.clone(),
            message: fill(template, created, total, failed),
        };
    }

    ResultVerdict {
        status: ResultStatus::Success,
        title: texts.completed_title.clone(),
        message: texts.empty_message.clone(),
    }
}
