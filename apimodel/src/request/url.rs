//! URL composition across a resource lineage.

use std::sync::Arc;

use url::Url;

use crate::{ModelError, ModelResult, UriTemplate, Vars, identifier::has_url_scheme};

/// Join path templates with single slashes, skipping empty segments.
fn join_paths<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for seg in segments.into_iter().filter(|s| !s.is_empty()) {
        if out.is_empty() {
            out.push_str(seg);
            continue;
        }
        match (out.ends_with('/'), seg.strip_prefix('/')) {
            (true, Some(rest)) => out.push_str(rest),
            (false, None) => {
                out.push('/');
                out.push_str(seg);
            }
            _ => out.push_str(seg),
        }
    }
    out
}

fn parse_url(input: &str) -> ModelResult<Url> {
    Url::parse(input).map_err(|source| {
        Arc::new(ModelError::Url {
            input: input.to_owned(),
            source,
        })
    })
}

/// Compose a URL from a base template and path templates, root first.
///
/// A segment that is itself an absolute `http(s)://` or `unix://` URL
/// replaces the base: it and the segments after it form the whole URL. For
/// any other lineage the base and the joined path are expanded separately
/// against `vars`, and the path is resolved against the base unless it is
/// already absolute.
///
/// ```
/// use apimodel::request::resolve_url;
/// use serde_json::json;
///
/// let vars = json!({"b": "ar"});
/// let vars = vars.as_object().cloned().unwrap_or_default();
/// let url = resolve_url("https://example.com", ["", "a/{b}"], &vars)?;
/// assert_eq!(url.as_str(), "https://example.com/a/ar");
/// # Ok::<(), std::sync::Arc<apimodel::ModelError>>(())
/// ```
///
/// # Errors
///
/// Returns [`ModelError::UriTemplate`] for malformed templates and
/// [`ModelError::Url`] when the expanded text is not a URL.
pub fn resolve_url<'a, I>(base: &'a str, segments: I, vars: &Vars) -> ModelResult<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut base_template = Some(base);
    let mut path: Vec<&str> = Vec::new();
    for seg in segments {
        if has_url_scheme(seg) {
            base_template = None;
            path.clear();
        }
        path.push(seg);
    }
    let expanded_path = UriTemplate::parse(&join_paths(path))?.expand(vars);
    let Some(base_template) = base_template else {
        return parse_url(&expanded_path);
    };
    if !expanded_path.is_empty()
        && let Ok(absolute) = Url::parse(&expanded_path)
    {
        return Ok(absolute);
    }
    let base_url = parse_url(&UriTemplate::parse(base_template)?.expand(vars))?;
    if expanded_path.is_empty() {
        return Ok(base_url);
    }
    base_url.join(&expanded_path).map_err(|source| {
        Arc::new(ModelError::Url {
            input: expanded_path,
            source,
        })
    })
}
