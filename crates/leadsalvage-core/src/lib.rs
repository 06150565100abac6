//! Failed-record salvage and result reconciliation for lead imports.

pub mod config;
mod error;
pub mod extract;
pub mod fields;
pub mod normalize;
pub mod record;
pub mod report;
pub mod stats;
pub mod verdict;

pub use config::{SalvageConfig, VerdictTexts};
pub use error::ConfigError;
pub use extract::{Extraction, Strategy, extract};
pub use normalize::normalize;
pub use record::ExtractedErrorEntry;
pub use report::{ImportReport, RecordReport, RenderedEntry, build_report};
pub use stats::{RawCounter, RawStats, StatsTriple, reconcile};
pub use verdict::{ResultStatus, ResultVerdict, resolve};
