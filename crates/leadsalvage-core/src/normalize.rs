//! Error message normalisation for display.
//!
//! Converts a raw error string recovered from a failed-record payload into
//! a presentable sentence, so that `"error: invalid phone"` and
//! `"Invalid phone"` both render as `"Invalid phone."`.
//!
//! # Rules
//!
//! 1. Trim surrounding whitespace.
//! 2. Strip leading `error:` / `erro:` / `failure:` / `falha:` / `invalid:` /
//!    `inválido:` prefixes (case-insensitive), repeatedly.
//! 3. Uppercase the first character (Unicode-aware). If that exposes
//!    another prefix, go back to step 2.
//! 4. Append `.` unless the text already ends in `.`, `!` or `?`.

use std::sync::LazyLock;

use regex::Regex;

/// Rendered in place of a message that is empty once its prefix is gone.
pub const UNKNOWN_ERROR: &str = "Erro desconhecido.";

const TERMINATORS: [char; 3] = ['.', '!', '?'];

static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:error|erro|failure|falha|invalid|inv[aá]lido)\s*:\s*").unwrap()
});

/// Normalise a raw error string into a display sentence.
///
/// Total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let mut out = strip_prefixes(raw.trim()).to_string();

    // Uppercasing can surface a new prefix: "\u{131}nvalid:" becomes "Invalid:".
    loop {
        if out.is_empty() {
            return UNKNOWN_ERROR.to_string();
        }
        let capitalized = capitalize_first(&out);
        let rest = strip_prefixes(&capitalized);
        if rest.len() == capitalized.len() {
            out = capitalized;
            break;
        }
        out = rest.to_string();
    }

    if !out.ends_with(TERMINATORS) {
        out.push('.');
    }
    out
}

/// "Error: Erro: x" loses both prefixes.
fn strip_prefixes(mut rest: &str) -> &str {
    while let Some(m) = PREFIX.find(rest) {
        rest = &rest[m.end()..];
    }
    rest
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
