//! Path-like identifiers naming a service and a chain of nested resources.

use std::{fmt, str::FromStr};

const URL_SCHEMES: [&str; 3] = ["http://", "https://", "unix://"];

/// Returns `true` when `segment` starts with an `http(s)://` or `unix://`
/// scheme.
pub(crate) fn has_url_scheme(segment: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| segment.starts_with(scheme))
}

/// Ordered list of names: the service first, then nested resource names.
///
/// # Examples
///
/// ```
/// use apimodel::ServiceSpec;
///
/// let spec: ServiceSpec = "httpbin/status/codes".parse().unwrap_or_default();
/// assert_eq!(spec.service_name(), Some("httpbin"));
/// assert_eq!(spec.path(), "httpbin/status/codes");
///
/// let scoped = ServiceSpec::new(["@acme/api", "users"]);
/// assert_eq!(scoped.path(), "@acme/api.users");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ServiceSpec(Vec<String>);

impl ServiceSpec {
    /// Build an identifier from its segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Name of the service, when any segment is present.
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Resource names following the service name.
    #[must_use]
    pub fn resource_names(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the identifier has no segments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// Identifier made of the first `len` segments.
    #[must_use]
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0.iter().take(len).cloned().collect())
    }

    /// Display path: segments joined with `/`, or with `.` when the service
    /// name itself contains a `/`.
    #[must_use]
    pub fn path(&self) -> String {
        let separator = if self.service_name().is_some_and(|s| s.contains('/')) {
            "."
        } else {
            "/"
        };
        self.0.join(separator)
    }

    /// Whether the first segment reads as a literal URL or host rather than a
    /// service name.
    ///
    /// Service names cannot contain `.` or `:`, so anything that does is
    /// taken to be an address. Scoped `@...` names never look like URLs.
    #[must_use]
    pub fn looks_like_url(&self) -> bool {
        let Some(first) = self.service_name() else {
            return false;
        };
        if first.starts_with('@') {
            return false;
        }
        first.starts_with('/')
            || first.contains(['.', ':'])
            || has_url_scheme(first)
            || first == "localhost"
    }
}

impl fmt::Display for ServiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for ServiceSpec {
    type Err = std::convert::Infallible;

    /// Parse a display path. Scoped identifiers (`@scope/name.a.b`) split on
    /// `.`; all others split on `/`. Empty segments are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = if s.starts_with('@') { '.' } else { '/' };
        Ok(Self::new(s.split(separator).filter(|seg| !seg.is_empty())))
    }
}

impl<S: Into<String>> FromIterator<S> for ServiceSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for ServiceSpec {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceSpec, has_url_scheme};
    use rstest::rstest;

    #[rstest]
    #[case(&["svc", "a", "b"], "svc/a/b")]
    #[case(&["@acme/svc", "a", "b"], "@acme/svc.a.b")]
    #[case(&["svc"], "svc")]
    #[case(&[], "")]
    fn path_joins_segments(#[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(ServiceSpec::new(segments.iter().copied()).path(), expected);
    }

    #[rstest]
    #[case("svc/a/b", &["svc", "a", "b"])]
    #[case("@acme/svc.a.b", &["@acme/svc", "a", "b"])]
    #[case("svc//a/", &["svc", "a"])]
    fn parses_display_paths(#[case] input: &str, #[case] expected: &[&str]) {
        let Ok(spec) = input.parse::<ServiceSpec>();
        assert_eq!(spec, ServiceSpec::new(expected.iter().copied()));
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("unix://var/run/app.sock", true)]
    #[case("/local/path", true)]
    #[case("127.0.0.1", true)]
    #[case("[::1]:8080", true)]
    #[case("localhost", true)]
    #[case("httpbin", false)]
    #[case("@acme/svc.a", false)]
    fn classifies_url_like_first_segment(#[case] first: &str, #[case] expected: bool) {
        assert_eq!(ServiceSpec::new([first, "x"]).looks_like_url(), expected);
    }

    #[rstest]
    #[case("http://a.example", true)]
    #[case("https://a.example/{id}", true)]
    #[case("unix:///run/app.sock", true)]
    #[case("ftp://a.example", false)]
    #[case("items/https://a.example", false)]
    #[case("HTTPS://a.example", false)]
    fn recognises_url_schemes(#[case] segment: &str, #[case] expected: bool) {
        assert_eq!(has_url_scheme(segment), expected);
    }

    #[rstest]
    fn truncation_keeps_prefix() {
        let spec = ServiceSpec::new(["svc", "a", "missing", "deeper"]);
        assert_eq!(spec.truncated(3).path(), "svc/a/missing");
    }

    #[rstest]
    fn empty_spec_has_no_service() {
        let spec = ServiceSpec::default();
        assert!(spec.service_name().is_none());
        assert!(spec.resource_names().is_empty());
        assert!(!spec.looks_like_url());
    }
}
