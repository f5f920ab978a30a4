//! Field-level change summaries for audit entries

use std::fmt;

use serde_json::{Map, Value};

/// Strings longer than this are cut short in summaries
const MAX_SHOWN_CHARS: usize = 50;

enum Change<'a> {
    Modified {
        field: &'a str,
        from: &'a Value,
        to: &'a Value,
    },
    Removed {
        field: &'a str,
        from: &'a Value,
    },
    Added {
        field: &'a str,
        to: &'a Value,
    },
}

impl fmt::Display for Change<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Modified { field, from, to } => {
                write!(f, "{}: {} -> {}", field, Shown(from), Shown(to))
            }
            Change::Removed { field, from } => write!(f, "{}: {} -> (removed)", field, Shown(from)),
            Change::Added { field, to } => write!(f, "{}: (added) -> {}", field, Shown(to)),
        }
    }
}

/// One-line summary of what an update changed, e.g. `total_fee: 0 -> 7500`
///
/// Objects are compared field by field at the top level. Returns `None`
/// when the two values are equal.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let summary = match (before, after) {
        (Value::Object(before), Value::Object(after)) => field_changes(before, after)
            .map(|change| change.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        _ if before != after => format!("{} -> {}", Shown(before), Shown(after)),
        _ => String::new(),
    };

    (!summary.is_empty()).then_some(summary)
}

fn field_changes<'a>(
    before: &'a Map<String, Value>,
    after: &'a Map<String, Value>,
) -> impl Iterator<Item = Change<'a>> {
    let modified_or_removed = before.iter().filter_map(move |(field, from)| {
        let field = field.as_str();
        match after.get(field) {
            Some(to) if to != from => Some(Change::Modified { field, from, to }),
            Some(_) => None,
            None => Some(Change::Removed { field, from }),
        }
    });

    let added = after
        .iter()
        .filter(move |(field, _)| !before.contains_key(field.as_str()))
        .map(|(field, to)| Change::Added {
            field: field.as_str(),
            to,
        });

    modified_or_removed.chain(added)
}

/// Compact rendering of a JSON value
struct Shown<'a>(&'a Value);

impl fmt::Display for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) if s.chars().count() > MAX_SHOWN_CHARS => {
                let head: String = s.chars().take(MAX_SHOWN_CHARS - 3).collect();
                write!(f, "\"{}...\"", head)
            }
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(items) => write!(f, "[{} items]", items.len()),
            Value::Object(fields) => write!(f, "{{{} fields}}", fields.len()),
            other => write!(f, "{}", other),
        }
    }
}
