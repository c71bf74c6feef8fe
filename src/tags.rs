//! Serialization tag parsing.
//!
//! Rust DTOs carry their wire names in attribute argument lists such as
//! `#[serde(rename = "user_id")]`. This module reads a single `key = "value"`
//! entry out of such a list without interpreting the value.

/// Returns the quoted value associated with `key` in a raw attribute argument
/// list, e.g. `rename = "id", default`.
///
/// The list may be wrapped in parentheses. Values are returned verbatim,
/// sentinels such as `-` included. Empty, missing or malformed input yields an
/// empty string.
pub fn extract_tag(raw: &str, key: &str) -> String {
    let mut tag = raw.trim();
    if tag.starts_with('(') && tag.ends_with(')') && tag.len() >= 2 {
        tag = tag[1..tag.len() - 1].trim();
    }
    if tag.is_empty() || key.is_empty() {
        return String::new();
    }

    for entry in split_entries(tag) {
        let Some((name, value)) = entry.split_once('=') else {
            continue;
        };
        if name.trim() != key {
            continue;
        }
        return unquote(value.trim()).unwrap_or_default().to_string();
    }

    String::new()
}

/// Looks up `key` in the first `#[attr_name(...)]` attribute that carries it.
pub fn attribute_tag(attrs: &[syn::Attribute], attr_name: &str, key: &str) -> String {
    for attr in attrs {
        if !attr.path().is_ident(attr_name) {
            continue;
        }
        if let Ok(list) = attr.meta.require_list() {
            let value = extract_tag(&list.tokens.to_string(), key);
            if !value.is_empty() {
                return value;
            }
        }
    }
    String::new()
}

/// Whether any `#[attr_name(...)]` attribute contains the bare word `flag`.
pub fn attribute_has_flag(attrs: &[syn::Attribute], attr_name: &str, flag: &str) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(attr_name))
        .filter_map(|attr| attr.meta.require_list().ok())
        .any(|list| {
            let tokens = list.tokens.to_string();
            split_entries(&tokens)
                .iter()
                .any(|entry| entry.trim() == flag)
        })
}

/// Splits on commas that are not inside a string literal.
fn split_entries(tag: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in tag.char_indices() {
        match ch {
            '\\' if in_quotes => {
                escaped = !escaped;
                continue;
            }
            '"' if !escaped => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                entries.push(&tag[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        escaped = false;
    }
    entries.push(&tag[start..]);
    entries
}

fn unquote(value: &str) -> Option<&str> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}
