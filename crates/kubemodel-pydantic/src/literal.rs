//! Python literals for strings and JSON default values.

use serde_json::Value;

/// Smallest tail worth splitting off a long string.
const MIN_SPLIT_TAIL: usize = 6;

/// Escape everything except quotes, which depend on the chosen delimiter.
fn escape_body(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Wrap already escaped text in quotes. Double quotes are used unless the
/// text holds more of them than single quotes (or the other way round when
/// single quotes are preferred).
fn quote_escaped(body: &str, prefer_double: bool) -> String {
    let doubles = body.matches('"').count();
    let singles = body.matches('\'').count();
    let use_double = if prefer_double {
        doubles <= singles
    } else {
        singles > doubles
    };
    let (quote, escaped) = if use_double {
        ('"', body.replace('"', "\\\""))
    } else {
        ('\'', body.replace('\'', "\\'"))
    };
    format!("{quote}{escaped}{quote}")
}

/// A Python string literal for `text`.
pub fn quote(text: &str, prefer_double: bool) -> String {
    quote_escaped(&escape_body(text), prefer_double)
}

/// Split `text` into literals of at most `max_width` columns each, breaking
/// before spaces so every chunk after the first starts with one. A run
/// without a usable space stays whole even when it is wider.
pub fn split_literal(text: &str, max_width: usize, prefer_double: bool) -> Vec<String> {
    let body: Vec<char> = escape_body(text).chars().collect();
    let max_content = max_width.saturating_sub(2);

    let mut chunks = Vec::new();
    let mut start = 0;
    while body.len() - start > max_content {
        let rest = &body[start..];
        let usable = |i: usize| rest[i] == ' ' && rest.len() - i >= MIN_SPLIT_TAIL;
        let left = (1..=max_content.min(rest.len() - 1)).rev().find(|&i| usable(i));
        let Some(at) = left.or_else(|| (max_content + 1..rest.len()).find(|&i| usable(i))) else {
            break;
        };
        chunks.push(rest[..at].iter().collect::<String>());
        start += at;
    }
    chunks.push(body[start..].iter().collect::<String>());

    chunks
        .iter()
        .map(|chunk| quote_escaped(chunk, prefer_double))
        .collect()
}

/// Python source for a JSON value used as a field default.
pub fn python_value(value: &Value, prefer_double: bool) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s, prefer_double),
        Value::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|item| python_value(item, prefer_double))
                .collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}: {}",
                        quote(k, prefer_double),
                        python_value(v, prefer_double)
                    )
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}
