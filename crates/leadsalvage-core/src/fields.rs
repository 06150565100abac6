//! Field selection rules for failed-lead objects.
//!
//! Lead payloads come from several serialisers (our own result list,
//! Salesforce API errors, hand-built dicts), so the same fact lives under
//! different keys. Each rule table below is evaluated top to bottom and
//! the first match wins, except for messages, which accumulate.

use serde_json::{Map, Value};

type Object = Map<String, Value>;

// ── Identity ──

const NAME_KEYS: &[&str] = &["name", "Name"];
const FIRST_NAME_KEYS: &[&str] = &["firstName", "FirstName"];
const LAST_NAME_KEYS: &[&str] = &["lastName", "LastName"];
const FULL_NAME_KEYS: &[&str] = &["fullName", "FullName"];
const EMAIL_KEYS: &[&str] = &["email", "Email"];

/// Display name resolvers in priority order.
const DISPLAY_NAME_RULES: &[fn(&Object) -> Option<String>] =
    &[by_name, by_first_and_last_name, by_full_name];

// ── Messages ──

enum MessageRule {
    /// Every element of a list-valued field.
    List(&'static str),
    /// A string-valued field.
    Text(&'static str),
}

const MESSAGE_RULES: &[MessageRule] = &[
    MessageRule::List("errors"),
    MessageRule::Text("message"),
    MessageRule::Text("errorMessage"),
    MessageRule::Text("error"),
    MessageRule::Text("Error"),
];

/// Lowercased key fragments that mark any other field as a message.
const MESSAGE_KEY_MARKERS: &[&str] = &["error", "message"];

// ── Public API ──

/// Resolve the display name, or `None` when no rule matches.
pub fn display_name(obj: &Object) -> Option<String> {
    DISPLAY_NAME_RULES.iter().find_map(|rule| rule(obj))
}

/// First non-empty `email` / `Email` value.
pub fn email(obj: &Object) -> Option<String> {
    first_text(obj, EMAIL_KEYS).map(str::to_string)
}

/// Collect raw error messages in rule order.
///
/// The fixed rules concatenate as found; the catch-all key scan only adds
/// values not already collected.
pub fn messages(obj: &Object) -> Vec<String> {
    let mut out = Vec::new();

    for rule in MESSAGE_RULES {
        match rule {
            MessageRule::List(key) => {
                if let Some(Value::Array(items)) = obj.get(*key) {
                    out.extend(items.iter().filter_map(error_item_text));
                }
            }
            MessageRule::Text(key) => {
                if let Some(s) = text(obj, key) {
                    out.push(s.to_string());
                }
            }
        }
    }

    for (key, value) in obj {
        if !is_message_key(key) {
            continue;
        }
        if let Value::String(s) = value
            && !s.is_empty()
            && !out.contains(s)
        {
            out.push(s.clone());
        }
    }

    out
}

// ── Display name rules ──

fn by_name(obj: &Object) -> Option<String> {
    first_text(obj, NAME_KEYS).map(|s| s.trim().to_string())
}

fn by_first_and_last_name(obj: &Object) -> Option<String> {
    let first = first_text(obj, FIRST_NAME_KEYS).unwrap_or("");
    let last = first_text(obj, LAST_NAME_KEYS).unwrap_or("");
    let joined = format!("{first} {last}");
    let joined = joined.trim();
    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}

fn by_full_name(obj: &Object) -> Option<String> {
    first_text(obj, FULL_NAME_KEYS).map(|s| s.trim().to_string())
}

// ── Helpers ──

/// A string field with non-blank content.
fn text<'a>(obj: &'a Object, key: &str) -> Option<&'a str> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        _ => None,
    }
}

fn first_text<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| text(obj, key))
}

fn is_message_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    MESSAGE_KEY_MARKERS.iter().any(|m| lower.contains(m))
}

/// Render one element of an `errors` list.
///
/// Salesforce sends `{"message": ..., "statusCode": ...}` objects; those
/// contribute their message. Other objects fall back to compact JSON.
fn error_item_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(inner) => Some(
            text(inner, "message")
                .map(str::to_string)
                .unwrap_or_else(|| item.to_string()),
        ),
        other => Some(other.to_string()),
    }
}
