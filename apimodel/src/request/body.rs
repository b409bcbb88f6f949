//! Request body selection and encoding.

use std::io::{self, Cursor, Read};

use serde_json::Value;

use crate::{
    Endpoint, Header, ModelResult, ModelResultExt as _, Resource, Vars,
    expand::{Expander, Template, expand_header, expand_value},
};

/// Media type of form-encoded bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Media type of structured bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// How a [`Body`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Form fields, URL-encoded.
    Form,
    /// A string body rendered as a template.
    Template,
    /// A raw body sent without expansion.
    Raw,
    /// A structured body with expanded strings, encoded as JSON.
    Structured,
}

/// Encoded request body. Reads yield the encoded bytes once.
#[derive(Debug, Clone)]
pub struct Body {
    kind: BodyKind,
    content: Cursor<Vec<u8>>,
}

impl Body {
    const fn new(kind: BodyKind, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            content: Cursor::new(bytes),
        }
    }

    /// How the body was produced.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Content type implied by the body kind, if any.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self.kind {
            BodyKind::Form => Some(FORM_CONTENT_TYPE),
            BodyKind::Structured => Some(JSON_CONTENT_TYPE),
            BodyKind::Template | BodyKind::Raw => None,
        }
    }

    /// Every encoded byte, regardless of how much has been read.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.content.get_ref()
    }

    /// Consume the body, returning the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.content.into_inner()
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.content.read(buf)
    }
}

/// Body-bearing attributes of one level.
#[derive(Debug, Clone, Copy)]
pub(super) struct BodySource<'m> {
    form: &'m Header,
    body: Option<&'m Value>,
    raw_body: Option<&'m Value>,
}

impl<'m> From<&'m Endpoint> for BodySource<'m> {
    fn from(endpoint: &'m Endpoint) -> Self {
        Self {
            form: &endpoint.form,
            body: endpoint.body.as_ref(),
            raw_body: endpoint.raw_body.as_ref(),
        }
    }
}

impl<'m> From<&'m Resource> for BodySource<'m> {
    fn from(resource: &'m Resource) -> Self {
        Self {
            form: &resource.form,
            body: resource.body.as_ref(),
            raw_body: resource.raw_body.as_ref(),
        }
    }
}

/// `null` and the empty string both mean "no body".
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !matches!(v, Value::Null) && v.as_str() != Some(""))
}

/// Server form defaults underneath the level's own fields.
fn layered_form(defaults: &Header, form: &Header) -> Header {
    let mut merged = defaults.clone();
    for (key, values) in form {
        merged.insert(key.clone(), values.clone());
    }
    merged
}

fn encode_form(form: &Header, expander: &Expander<'_>) -> Vec<u8> {
    let expanded = expand_header(form, expander);
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, values) in &expanded {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish().into_bytes()
}

impl BodySource<'_> {
    fn select(&self, defaults: &Header, vars: &Vars) -> ModelResult<Option<Body>> {
        let form = layered_form(defaults, self.form);
        let expander = Expander::with_form(vars, &form);
        if !self.form.is_empty() {
            let encoded = encode_form(&form, &expander);
            return Ok(Some(Body::new(BodyKind::Form, encoded)));
        }
        if let Some(Value::String(text)) = present(self.body) {
            let rendered = Template::parse(text)?.render(&expander)?;
            return Ok(Some(Body::new(BodyKind::Template, rendered.into_bytes())));
        }
        if let Some(raw) = present(self.raw_body) {
            let bytes = match raw {
                Value::String(text) => text.clone().into_bytes(),
                other => serde_json::to_vec(other).into_model()?,
            };
            return Ok(Some(Body::new(BodyKind::Raw, bytes)));
        }
        if let Some(structured) = present(self.body) {
            let expanded = expand_value(structured, &expander);
            let encoded = serde_json::to_vec(&expanded).into_model()?;
            return Ok(Some(Body::new(BodyKind::Structured, encoded)));
        }
        Ok(None)
    }
}

/// Pick the first body among `levels`, most specific first.
///
/// Within a level, form fields win over a string body, which wins over a raw
/// body, which wins over a structured body. `defaults` are the server's form
/// fields; they are visible to every level and fill in keys a form body does
/// not set, but never create a form body on their own.
pub(super) fn select_body(
    levels: &[BodySource<'_>],
    defaults: &Header,
    vars: &Vars,
) -> ModelResult<Option<Body>> {
    for level in levels {
        if let Some(body) = level.select(defaults, vars)? {
            tracing::debug!(kind = ?body.kind(), len = body.as_bytes().len(), "rendered body");
            return Ok(Some(body));
        }
    }
    Ok(None)
}
