//! Import counters: coercion of displayed values and reconciliation against
//! the authoritative failed-record count.
//!
//! The result page shows three counters (created / total / failed) that are
//! computed upstream independently of the failed-record list. They can be
//! stale or disagree with each other. The list itself is ground truth for
//! the failed count, so [`reconcile`] rebuilds a consistent triple around it.

use serde::{Deserialize, Serialize};

/// Largest count carried through reconciliation. Any two counts sum
/// without overflow.
pub const MAX_COUNT: u64 = u64::MAX / 2;

/// A counter as it arrives from the page or result document: a JSON
/// number, a numeric string, or nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCounter {
    Number(serde_json::Number),
    Text(String),
    #[default]
    Missing,
}

impl RawCounter {
    /// Coerce to a count in `0..=MAX_COUNT`. Anything unreadable is 0.
    pub fn value(&self) -> u64 {
        let n = match self {
            RawCounter::Number(n) => number_value(n),
            RawCounter::Text(s) => leading_int(s),
            RawCounter::Missing => 0,
        };
        n.min(MAX_COUNT)
    }
}

impl From<u64> for RawCounter {
    fn from(n: u64) -> Self {
        RawCounter::Number(n.into())
    }
}

impl From<&str> for RawCounter {
    fn from(s: &str) -> Self {
        RawCounter::Text(s.to_string())
    }
}

fn number_value(n: &serde_json::Number) -> u64 {
    if let Some(u) = n.as_u64() {
        return u;
    }
    match n.as_f64() {
        // `as` saturates for values above u64::MAX.
        Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// Integer-prefix parse: `"  12 leads"` is 12, `"-3"` and `"n/a"` are 0.
fn leading_int(s: &str) -> u64 {
    let s = s.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = unsigned
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if negative || digits_end == 0 {
        return 0;
    }
    unsigned[..digits_end].parse().unwrap_or(u64::MAX)
}

/// Created / total / failed counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatsTriple {
    pub created: u64,
    pub total: u64,
    pub failed: u64,
}

impl StatsTriple {
    pub fn new(created: u64, total: u64, failed: u64) -> Self {
        Self {
            created,
            total,
            failed,
        }
    }

    /// `created + failed == total`.
    pub fn is_balanced(&self) -> bool {
        self.created.checked_add(self.failed) == Some(self.total)
    }
}

/// The three counters exactly as displayed, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub created: RawCounter,
    #[serde(default)]
    pub total: RawCounter,
    #[serde(default)]
    pub failed: RawCounter,
}

impl RawStats {
    pub fn to_triple(&self) -> StatsTriple {
        StatsTriple::new(self.created.value(), self.total.value(), self.failed.value())
    }
}

/// Reconcile displayed counters with the number of failed records actually
/// recovered.
///
/// When `authoritative_failed` is nonzero and disagrees with the displayed
/// failed count, the failed count is replaced and the total is rebuilt:
/// `created` is trusted when positive, otherwise the whole total is
/// attributed to failures. Otherwise the displayed created/failed counts
/// are kept and only the total is rebalanced to their sum.
///
/// Counts above [`MAX_COUNT`] are clamped first. Deterministic and
/// idempotent; every output satisfies `created + failed == total`.
pub fn reconcile(displayed: StatsTriple, authoritative_failed: u64) -> StatsTriple {
    let displayed = clamp(displayed);
    let authoritative_failed = authoritative_failed.min(MAX_COUNT);
    let corrected = authoritative_failed > 0 && authoritative_failed != displayed.failed;

    if !corrected {
        return balance(displayed);
    }

    let mut out = StatsTriple {
        created: displayed.created,
        total: displayed.total.max(authoritative_failed),
        failed: authoritative_failed,
    };

    if out.created + out.failed != out.total {
        if out.created > 0 {
            out.total = out.created + out.failed;
        } else {
            // Nothing created: the whole total is failures.
            out.total = out.failed;
        }
    }

    tracing::debug!(
        ?displayed,
        reconciled = ?out,
        authoritative_failed,
        "failed count replaced by recovered record count"
    );
    out
}

fn balance(stats: StatsTriple) -> StatsTriple {
    StatsTriple {
        total: stats.created + stats.failed,
        ..stats
    }
}

fn clamp(stats: StatsTriple) -> StatsTriple {
    StatsTriple::new(
        stats.created.min(MAX_COUNT),
        stats.total.min(MAX_COUNT),
        stats.failed.min(MAX_COUNT),
    )
}
