use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use crate::xml::parse_xml;

/// Marker substring of the fallback sentence the query generator emits when
/// no query can be produced from the available context.
pub const FALLBACK_MARKER: &str = "cannot be generated";

/// Result of the extraction stage. Serializes either the match payload or
/// an error record; both are terminal for the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Failure {
        error: String,
    },
    Matches {
        #[serde(rename = "targetClass")]
        target_class: String,
        count: usize,
        matches: Vec<Value>,
    },
}

fn variable_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\?(\w+)").unwrap())
}

fn question_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)all (\w+)").unwrap())
}

/// Resolve the class name the extraction searches for.
///
/// The first `?variable` token of the query wins, unless the query is
/// missing or carries the fallback marker; then the `all <word>` pattern of
/// the original question is scanned. Case is preserved either way.
pub fn resolve_target_class(query: Option<&str>, question: &str) -> Option<String> {
    if let Some(query) = query {
        if !query.is_empty() && !query.contains(FALLBACK_MARKER) {
            if let Some(caps) = variable_regex().captures(query) {
                return Some(caps[1].to_string());
            }
        }
    }

    question_regex()
        .captures(question)
        .map(|caps| caps[1].to_string())
}

/// Collect every value whose key contains the class name, case-insensitively.
///
/// The walk recurses into nested objects and sequences without a depth
/// limit; the parsed XML tree is acyclic by construction. Sequence values
/// under a matching key are flattened one level into the result set.
pub fn find_instances(tree: &Value, class_name: &str) -> Vec<Value> {
    let needle = class_name.to_lowercase();
    let mut results = Vec::new();
    walk(tree, &needle, &mut results);
    results
}

fn walk(value: &Value, needle: &str, results: &mut Vec<Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.to_lowercase().contains(needle) {
                    match child {
                        Value::Array(items) => results.extend(items.iter().cloned()),
                        other => results.push(other.clone()),
                    }
                } else if child.is_object() || child.is_array() {
                    walk(child, needle, results);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, needle, results);
            }
        }
        _ => {}
    }
}

/// Run the full extraction step: resolve the target class, parse the XML
/// instance document, and collect matching elements.
pub fn extract_matches(query: Option<&str>, question: &str, xml: &str) -> ExtractionResult {
    let Some(target_class) = resolve_target_class(query, question) else {
        return ExtractionResult::Failure {
            error: "Could not determine target class/property from SPARQL or question."
                .to_string(),
        };
    };

    let tree = match parse_xml(xml) {
        Ok(tree) => tree,
        Err(_) => {
            return ExtractionResult::Failure {
                error: "Invalid XML provided.".to_string(),
            };
        }
    };

    let matches = find_instances(&tree, &target_class);

    ExtractionResult::Matches {
        count: matches.len(),
        target_class,
        matches,
    }
}
