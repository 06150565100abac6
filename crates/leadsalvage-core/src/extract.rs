//! Salvage of failed-record payloads from raw page text.
//!
//! Each failed row on the result page carries a text blob that is meant to
//! describe one or more failed leads. In practice it is often a partially
//! serialised JSON list, several objects glued together, or plain prose.
//! [`extract`] tries progressively weaker strategies and stops at the first
//! one that yields anything:
//!
//! 1. **Array literal**: the widest `[{ ... }]` span, parsed as a JSON array.
//! 2. **Single object**: the widest `{ ... }` span, parsed as one object.
//! 3. **Object scan**: every flat `{ ... }` span parsed on its own,
//!    skipping the ones that fail.
//! 4. **Plain text**: clauses following error words ("erro", "invalid",
//!    "obrigatório", ...), deduplicated.
//!
//! When none applies the trimmed blob is handed back verbatim.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::fields;
use crate::record::ExtractedErrorEntry;

type Objects = Vec<Map<String, Value>>;

static ARRAY_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").unwrap());

static OBJECT_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

static FLAT_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^{}]*\}").unwrap());

static ERROR_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:errors?|erros?|failures?|falhas?|inv[aá]lid[oa]s?|invalid|required|obrigat[oó]ri[oa]s?)\b\s*[:;-]?\s*([^\n\r.]*)",
    )
    .unwrap()
});

/// JSON salvage attempts in priority order.
const JSON_STRATEGIES: &[(Strategy, fn(&str) -> Option<Objects>)] = &[
    (Strategy::ArrayLiteral, salvage_array),
    (Strategy::SingleObject, salvage_object),
    (Strategy::MultiObject, scan_objects),
];

/// Which salvage step produced an [`Extraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ArrayLiteral,
    SingleObject,
    MultiObject,
    PlainText,
    Verbatim,
}

impl Strategy {
    /// True for the JSON-based strategies.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Strategy::ArrayLiteral | Strategy::SingleObject | Strategy::MultiObject
        )
    }
}

/// Outcome of salvaging one blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub strategy: Strategy,
    pub entries: Vec<ExtractedErrorEntry>,
    /// The trimmed blob, set only for [`Strategy::Verbatim`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbatim: Option<String>,
}

impl Extraction {
    /// Number of failed rows this blob stands for: its entries, or one for
    /// non-empty verbatim text.
    pub fn failed_rows(&self) -> usize {
        match &self.verbatim {
            Some(text) if !text.is_empty() => 1,
            _ => self.entries.len(),
        }
    }
}

/// Salvage a raw failure blob. Never fails.
///
/// `unnamed` is the display name used for records without name fields and
/// for plain-text findings.
pub fn extract(blob: &str, unnamed: &str) -> Extraction {
    let structured = JSON_STRATEGIES.iter().find_map(|(strategy, attempt)| {
        let found = attempt(blob);
        if found.is_none() {
            debug!(?strategy, "salvage strategy found nothing");
        }
        found.map(|objects| (*strategy, objects))
    });

    if let Some((strategy, objects)) = structured {
        let entries = objects
            .iter()
            .map(|obj| entry_from_object(obj, unnamed))
            .collect();
        return Extraction {
            strategy,
            entries,
            verbatim: None,
        };
    }

    match plain_text_messages(blob) {
        Some(messages) => Extraction {
            strategy: Strategy::PlainText,
            entries: vec![ExtractedErrorEntry {
                display_name: unnamed.to_string(),
                email: None,
                messages,
            }],
            verbatim: None,
        },
        None => Extraction {
            strategy: Strategy::Verbatim,
            entries: Vec::new(),
            verbatim: Some(blob.trim().to_string()),
        },
    }
}

fn entry_from_object(obj: &Map<String, Value>, unnamed: &str) -> ExtractedErrorEntry {
    ExtractedErrorEntry {
        display_name: fields::display_name(obj).unwrap_or_else(|| unnamed.to_string()),
        email: fields::email(obj),
        messages: fields::messages(obj),
    }
}

// ── JSON strategies ──

/// Widest `[{ ... }]` span. A span that sits inside a parseable object is
/// a nested list (e.g. `"errors": [{...}]`) and the enclosing object is
/// left to the next strategy.
fn salvage_array(blob: &str) -> Option<Objects> {
    let m = ARRAY_LITERAL.find(blob)?;
    if inside_object(blob, m) {
        debug!("array literal is nested in an object");
        return None;
    }
    match serde_json::from_str::<Value>(m.as_str()) {
        Ok(Value::Array(items)) => non_empty(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => Some(obj),
                    _ => None,
                })
                .collect(),
        ),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "array literal did not parse");
            None
        }
    }
}

/// True when some brace before `array` opens a JSON object that closes at
/// or after the end of `array`.
fn inside_object(blob: &str, array: regex::Match<'_>) -> bool {
    blob[..array.start()].match_indices('{').any(|(pos, _)| {
        let mut stream = serde_json::Deserializer::from_str(&blob[pos..]).into_iter::<Value>();
        matches!(stream.next(), Some(Ok(Value::Object(_))))
            && pos + stream.byte_offset() >= array.end()
    })
}

/// Widest `{ ... }` span, from the first opening to the last closing brace.
fn salvage_object(blob: &str) -> Option<Objects> {
    let m = OBJECT_SPAN.find(blob)?;
    match serde_json::from_str::<Value>(m.as_str()) {
        Ok(Value::Object(obj)) => Some(vec![obj]),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "object span did not parse");
            None
        }
    }
}

/// Every flat `{ ... }` span, parsed independently, in order.
fn scan_objects(blob: &str) -> Option<Objects> {
    let objects: Objects = FLAT_OBJECT
        .find_iter(blob)
        .filter_map(|m| match serde_json::from_str::<Value>(m.as_str()) {
            Ok(Value::Object(obj)) => Some(obj),
            _ => {
                debug!(candidate = m.as_str(), "skipping unparseable object");
                None
            }
        })
        .collect();
    non_empty(objects)
}

fn non_empty(objects: Objects) -> Option<Objects> {
    if objects.is_empty() { None } else { Some(objects) }
}

// ── Plain text ──

/// Deduplicated clauses following error words, or `None` when the blob has
/// no error words at all. If error words appear but every clause is empty,
/// the whole trimmed blob stands in as the single message.
fn plain_text_messages(blob: &str) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let mut messages = Vec::new();
    let mut matched = false;

    for caps in ERROR_CLAUSE.captures_iter(blob) {
        matched = true;
        let clause = caps.get(1).map_or("", |m| m.as_str()).trim();
        if !clause.is_empty() && seen.insert(clause) {
            messages.push(clause.to_string());
        }
    }

    if !matched {
        return None;
    }
    if messages.is_empty() {
        messages.push(blob.trim().to_string());
    }
    Some(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use proptest::strategy::Strategy as _;

    const UNNAMED: &str = "Lead sem nome";

    fn run(blob: &str) -> Extraction {
        extract(blob, UNNAMED)
    }

    #[test]
    fn array_of_objects() {
        let x = run(r#"[{"name":"Ana Silva","email":"ana@x.com","errors":["Invalid phone"]}]"#);
        assert_eq!(x.strategy, Strategy::ArrayLiteral);
        assert_eq!(
            x.entries,
            vec![ExtractedErrorEntry {
                display_name: "Ana Silva".to_string(),
                email: Some("ana@x.com".to_string()),
                messages: vec!["Invalid phone".to_string()],
            }]
        );
    }

    #[test]
    fn array_embedded_in_prose_keeps_order() {
        let x = run(
            "Falha no processamento: [\n  {\"name\": \"A\", \"error\": \"x\"},\n  {\"name\": \"B\"},\n  {\"name\": \"C\"}\n] (3 leads)",
        );
        assert_eq!(x.strategy, Strategy::ArrayLiteral);
        let names: Vec<_> = x.entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn array_after_unrelated_object_in_prose() {
        let x = run(
            r#"Lote {"id":7} falhou: [{"name":"A","error":"x"},{"name":"B","error":"y"}]"#,
        );
        assert_eq!(x.strategy, Strategy::ArrayLiteral);
        let names: Vec<_> = x.entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn single_object() {
        let x = run(r#"Lead rejeitado: {"fullName": "Maria Lima", "message": "Missing field"}"#);
        assert_eq!(x.strategy, Strategy::SingleObject);
        assert_eq!(x.entries.len(), 1);
        assert_eq!(x.entries[0].display_name, "Maria Lima");
        assert_eq!(x.entries[0].messages, vec!["Missing field"]);
    }

    #[test]
    fn object_with_nested_error_list_is_one_record() {
        let x = run(
            r#"{"name":"Ana","errors":[{"message":"Required fields are missing: [LastName]","statusCode":"REQUIRED_FIELD_MISSING"}]}"#,
        );
        assert_eq!(x.strategy, Strategy::SingleObject);
        assert_eq!(x.entries.len(), 1);
        assert_eq!(x.entries[0].display_name, "Ana");
        assert_eq!(
            x.entries[0].messages,
            vec!["Required fields are missing: [LastName]"]
        );
    }

    #[test]
    fn juxtaposed_objects() {
        let x = run(
            r#"{"FirstName":"Joao","LastName":"Souza","Error":"Duplicate record"}{"name":"Maria","message":"Missing field"}"#,
        );
        assert_eq!(x.strategy, Strategy::MultiObject);
        assert_eq!(x.entries.len(), 2);
        assert_eq!(x.entries[0].display_name, "Joao Souza");
        assert_eq!(x.entries[0].messages, vec!["Duplicate record"]);
        assert_eq!(x.entries[1].display_name, "Maria");
        assert_eq!(x.entries[1].messages, vec!["Missing field"]);
    }

    #[test]
    fn object_scan_skips_broken_candidates() {
        let x = run(r#"{"name":"A","error":"x"} {broken} {"name":"B","error":"y"}"#);
        assert_eq!(x.strategy, Strategy::MultiObject);
        assert_eq!(x.entries.len(), 2);
    }

    #[test]
    fn unnamed_record_gets_placeholder() {
        let x = run(r#"{"email":"x@y.com","error":"Invalid email"}"#);
        assert_eq!(x.entries[0].display_name, UNNAMED);
        assert_eq!(x.entries[0].email.as_deref(), Some("x@y.com"));
    }

    #[test]
    fn portuguese_plain_text() {
        let x = run("Erro: CPF obrigatório");
        assert_eq!(x.strategy, Strategy::PlainText);
        assert_eq!(x.entries.len(), 1);
        assert_eq!(x.entries[0].display_name, UNNAMED);
        assert_eq!(x.entries[0].messages, vec!["CPF obrigatório"]);
    }

    #[test]
    fn plain_text_clauses_deduplicated() {
        let x = run("Ana: erro - telefone inválido. Bruno: erro - telefone inválido.\nFalha: email");
        assert_eq!(x.strategy, Strategy::PlainText);
        assert_eq!(x.entries[0].messages, vec!["telefone inválido", "email"]);
    }

    #[test]
    fn error_words_match_whole_words_only() {
        let x = run("Telefone invalido");
        assert_eq!(x.strategy, Strategy::PlainText);
        assert_eq!(x.entries[0].messages, vec!["Telefone invalido"]);

        let x = run("Errors found in row 3");
        assert_eq!(x.entries[0].messages, vec!["found in row 3"]);

        let x = run("Campos obrigatórios: email");
        assert_eq!(x.entries[0].messages, vec!["email"]);
    }

    #[test]
    fn error_word_inside_other_word_is_not_a_match() {
        let x = run("Terror na fila");
        assert_eq!(x.strategy, Strategy::Verbatim);
    }

    #[test]
    fn error_word_without_clause_keeps_text() {
        let x = run("  Erro.  ");
        assert_eq!(x.strategy, Strategy::PlainText);
        assert_eq!(x.entries[0].messages, vec!["Erro."]);
    }

    #[test]
    fn broken_json_falls_back_to_plain_text() {
        let x = run(r#"[{"name": "Ana", "error": "invalid phone""#);
        assert_eq!(x.strategy, Strategy::PlainText);
        assert!(!x.entries.is_empty());
    }

    #[test]
    fn no_structure_no_error_words_is_verbatim() {
        let x = run("  Ana Silva  ");
        assert_eq!(x.strategy, Strategy::Verbatim);
        assert!(x.entries.is_empty());
        assert_eq!(x.verbatim.as_deref(), Some("Ana Silva"));
        assert_eq!(x.failed_rows(), 1);
    }

    #[test]
    fn empty_blob_counts_nothing() {
        let x = run("   ");
        assert_eq!(x.strategy, Strategy::Verbatim);
        assert_eq!(x.failed_rows(), 0);
    }

    #[test]
    fn array_of_scalars_is_not_records() {
        let x = run(r#"["a", "b"]"#);
        assert_eq!(x.strategy, Strategy::Verbatim);
    }

    fn json_object() -> impl proptest::strategy::Strategy<Value = Value> {
        proptest::collection::btree_map("[a-zA-Z]{1,8}", ".*", 0..5).prop_map(|fields| {
            Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn any_object_is_one_entry(obj in json_object()) {
            let x = run(&obj.to_string());
            prop_assert_eq!(x.strategy, Strategy::SingleObject);
            prop_assert_eq!(x.entries.len(), 1);
        }

        #[test]
        fn any_array_of_objects_is_one_entry_each(
            objs in proptest::collection::vec(json_object(), 1..5),
        ) {
            let x = run(&Value::Array(objs.clone()).to_string());
            prop_assert_eq!(x.strategy, Strategy::ArrayLiteral);
            prop_assert_eq!(x.entries.len(), objs.len());
        }

        #[test]
        fn plain_numbers_are_verbatim(blob in "[0-9 ,;:]*") {
            let x = run(&blob);
            prop_assert_eq!(x.strategy, Strategy::Verbatim);
            prop_assert!(x.entries.is_empty());
        }
    }

    #[test]
    fn strategy_serialises_snake_case() {
        let json = serde_json::to_string(&Strategy::ArrayLiteral).unwrap();
        assert_eq!(json, "\"array_literal\"");
        assert!(Strategy::MultiObject.is_structured());
        assert!(!Strategy::PlainText.is_structured());
    }
}
