//! Import of browser "copy as fetch" snippets.
//!
//! Only the shape browsers emit is understood: `fetch("url", { ... })` where
//! the options object is strict JSON. A trailing `;` is tolerated.

use std::{
    collections::BTreeMap,
    str::FromStr,
    sync::{Arc, LazyLock},
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Endpoint, Header, ModelError, ModelResult};

#[expect(clippy::expect_used, reason = "the pattern is a fixed literal")]
fn unquoted_key_pattern() -> Regex {
    Regex::new(r"[{,]\s*[a-zA-Z_][a-zA-Z0-9_]*\s*:").expect("unquoted key pattern compiles")
}

static UNQUOTED_KEY: LazyLock<Regex> = LazyLock::new(unquoted_key_pattern);

/// The subset of fetch options that map onto an endpoint. Other keys such as
/// `mode` or `credentials` are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Request method; empty means `GET`.
    pub method: String,
    /// Header values keyed by name as written in the snippet.
    pub headers: BTreeMap<String, String>,
    /// Body text, if the snippet sends one.
    pub body: Option<String>,
}

/// A parsed `fetch(url, options)` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchCall {
    /// Target URL.
    pub url: String,
    /// Decoded options object.
    pub options: FetchOptions,
}

fn fetch_error(message: impl Into<String>) -> Arc<ModelError> {
    Arc::new(ModelError::fetch(message))
}

/// Split on the first top-level comma, ignoring commas inside braces or
/// quoted strings.
fn split_arguments(args: &str) -> Option<(&str, &str)> {
    let mut depth = 0_i32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in args.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => depth -= 1,
            ',' if depth == 0 => return Some((args.get(..i)?, args.get(i + 1..)?)),
            _ => {}
        }
    }
    None
}

fn has_unquoted_keys(object: &str) -> bool {
    UNQUOTED_KEY.is_match(object)
}

/// `Content-type` becomes `Content-Type`, `x-api-key` becomes `X-Api-Key`.
fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

impl FetchCall {
    /// Parse a snippet.
    ///
    /// ```
    /// use apimodel::FetchCall;
    ///
    /// let call = FetchCall::parse(r#"fetch("https://example.com/", {"method": "PUT"})"#)?;
    /// assert_eq!(call.url, "https://example.com/");
    /// assert_eq!(call.options.method, "PUT");
    /// # Ok::<(), std::sync::Arc<apimodel::ModelError>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Fetch`] when the text is not a two-argument
    /// `fetch` call with a quoted URL and a JSON options object.
    pub fn parse(input: &str) -> ModelResult<Self> {
        let trimmed = input.trim();
        let call = trimmed.strip_suffix(';').map_or(trimmed, str::trim_end);
        let args = call
            .strip_prefix("fetch(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| fetch_error("expression is not a fetch(...) call"))?;
        let (url_part, options_part) = split_arguments(args)
            .ok_or_else(|| fetch_error("fetch call must have exactly two arguments"))?;

        let url_text = url_part.trim();
        if url_text.len() < 2 || !url_text.starts_with('"') || !url_text.ends_with('"') {
            return Err(fetch_error("fetch URL must be a quoted string"));
        }
        let url: String = serde_json::from_str(url_text)
            .map_err(|_| fetch_error("fetch URL must be a quoted string"))?;

        let options_text = options_part.trim();
        if !options_text.starts_with('{') || !options_text.ends_with('}') {
            return Err(fetch_error("fetch options must be an object literal"));
        }
        if has_unquoted_keys(options_text) {
            return Err(fetch_error("options object contains unquoted keys"));
        }
        let options: FetchOptions = serde_json::from_str(options_text)
            .map_err(|e| fetch_error(format!("invalid options JSON: {e}")))?;

        tracing::debug!(url = %url, method = %options.method, "parsed fetch snippet");
        Ok(Self { url, options })
    }

    /// Endpoint equivalent of the call.
    ///
    /// A body that parses as JSON becomes structured; any other text is kept
    /// as a string. Header names are canonicalised and an empty method
    /// becomes `GET`.
    #[must_use]
    pub fn to_endpoint(&self) -> Endpoint {
        let body = self
            .options
            .body
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(|text| {
                serde_json::from_str::<Value>(text)
                    .unwrap_or_else(|_| Value::String(text.to_owned()))
            });
        let mut headers = Header::new();
        for (name, value) in &self.options.headers {
            headers.insert(canonical_header_name(name), vec![value.clone()]);
        }
        let method = if self.options.method.is_empty() {
            "GET".to_owned()
        } else {
            self.options.method.to_ascii_uppercase()
        };
        Endpoint {
            method,
            headers,
            body,
            ..Endpoint::default()
        }
    }
}

impl FromStr for FetchCall {
    type Err = Arc<ModelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{FetchCall, canonical_header_name, split_arguments};

    const COPIED: &str = r#"fetch("https://api.example.com/graphql", {
    "body": "body",
    "cache": "default",
    "credentials": "include",
    "headers": {
        "Accept": "*/*",
        "Accept-Language": "en-US,en;q=0.9",
        "Authorization": "Bearer XXX",
        "Content-Type": "application/json"
    },
    "method": "POST",
    "mode": "cors",
    "redirect": "follow",
    "referrer": "https://api.example.com/",
    "referrerPolicy": "strict-origin-when-cross-origin"
})
"#;

    #[rstest]
    fn parses_browser_snippet() {
        let call = FetchCall::parse(COPIED).expect("valid snippet");
        assert_eq!(call.url, "https://api.example.com/graphql");
        assert_eq!(call.options.method, "POST");
        assert_eq!(call.options.body.as_deref(), Some("body"));
        assert_eq!(call.options.headers.len(), 4);
        assert_eq!(
            call.options.headers.get("Accept-Language").map(String::as_str),
            Some("en-US,en;q=0.9")
        );
    }

    #[rstest]
    #[case("get(\"x\", {})", "invalid fetch call: expression is not a fetch(...) call")]
    #[case("fetch(\"x\")", "invalid fetch call: fetch call must have exactly two arguments")]
    #[case("fetch(x, {})", "invalid fetch call: fetch URL must be a quoted string")]
    #[case("fetch(\"x\", [])", "invalid fetch call: fetch options must be an object literal")]
    #[case(
        "fetch(\"x\", {method: \"POST\"})",
        "invalid fetch call: options object contains unquoted keys"
    )]
    fn rejects_malformed_snippets(#[case] input: &str, #[case] message: &str) {
        let err = FetchCall::parse(input).expect_err("malformed snippet");
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    fn reports_bad_json() {
        let err = FetchCall::parse(r#"fetch("x", {"method": 1})"#).expect_err("bad options");
        assert!(
            err.to_string().starts_with("invalid fetch call: invalid options JSON: "),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    fn tolerates_semicolon_and_commas_in_url() {
        let call = FetchCall::parse("fetch(\"https://x.example/?a=1,2\", {});\n")
            .expect("valid snippet");
        assert_eq!(call.url, "https://x.example/?a=1,2");
        assert_eq!(call.options, super::FetchOptions::default());
    }

    #[rstest]
    #[case("\"a\", {\"b\": 1, \"c\": 2}", Some(("\"a\"", " {\"b\": 1, \"c\": 2}")))]
    #[case("{\"a\": 1}", None)]
    fn splits_on_top_level_comma(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_arguments(input), expected);
    }

    #[rstest]
    #[case("content-type", "Content-Type")]
    #[case("X-API-KEY", "X-Api-Key")]
    #[case("accept", "Accept")]
    fn canonicalises_header_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(canonical_header_name(input), expected);
    }

    #[rstest]
    #[case(Some(r#"{"query": "{ me }"}"#), Some(json!({"query": "{ me }"})))]
    #[case(Some("plain text"), Some(json!("plain text")))]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn endpoint_body_prefers_json(
        #[case] body: Option<&str>,
        #[case] expected: Option<serde_json::Value>,
    ) {
        let mut call = FetchCall::default();
        call.options.body = body.map(str::to_owned);
        assert_eq!(call.to_endpoint().body, expected);
    }

    #[rstest]
    fn endpoint_carries_method_and_headers() {
        let endpoint = FetchCall::parse(COPIED).expect("valid snippet").to_endpoint();
        assert_eq!(endpoint.method, "POST");
        assert_eq!(endpoint.headers.first("Authorization"), Some("Bearer XXX"));
        assert_eq!(endpoint.body, Some(json!("body")));
        assert_eq!(FetchCall::default().to_endpoint().method, "GET");
    }
}
