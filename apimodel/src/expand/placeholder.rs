//! `${name}` substitution over strings, JSON values and header maps.

use serde_json::Value;

use super::Lookup;
use crate::Header;

/// Index of the `}` closing a placeholder whose name starts at `start`.
fn closing_brace(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0_usize;
    for (offset, &c) in chars.get(start..)?.iter().enumerate() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(start + offset),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Replace every `${name}` in `input`.
///
/// Names may themselves contain placeholders, which are expanded first, so
/// `${var.${which}}` looks up the variable named by `which`. Unbound names
/// expand to the empty string. An unterminated `${` is kept literally.
///
/// ```
/// use apimodel::expand::expand_string;
///
/// let lookup = |name: &str| (name == "var.host").then(|| "example.com".to_owned());
/// assert_eq!(expand_string("https://${var.host}/${missing}", &lookup), "https://example.com/");
/// ```
#[must_use]
pub fn expand_string(input: &str, lookup: &dyn Lookup) -> String {
    if !input.contains("${") {
        return input.to_owned();
    }
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while let Some(&c) = chars.get(i) {
        if c == '$' && chars.get(i + 1) == Some(&'{') {
            if let Some(end) = closing_brace(&chars, i + 2) {
                let inner: String = chars.get(i + 2..end).unwrap_or_default().iter().collect();
                let name = expand_string(&inner, lookup);
                if let Some(value) = lookup.lookup(name.trim()) {
                    out.push_str(&value);
                }
                i = end + 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Expand every string leaf of a JSON value. Object keys are left as-is.
#[must_use]
pub fn expand_value(value: &Value, lookup: &dyn Lookup) -> Value {
    match value {
        Value::String(s) => Value::String(expand_string(s, lookup)),
        Value::Array(items) => Value::Array(items.iter().map(|v| expand_value(v, lookup)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), expand_value(v, lookup)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Expand every value of a header or form map.
#[must_use]
pub fn expand_header(header: &Header, lookup: &dyn Lookup) -> Header {
    header
        .iter()
        .map(|(k, values)| {
            (
                k.clone(),
                values.iter().map(|v| expand_string(v, lookup)).collect(),
            )
        })
        .collect()
}
