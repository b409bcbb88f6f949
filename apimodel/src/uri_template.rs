//! RFC 6570 URI templates, up to and including level 4.

use std::{fmt, sync::Arc};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::{ModelError, ModelResult, Vars};

/// Characters escaped in unreserved-only expansions.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Characters escaped when reserved characters may pass through.
const RESERVED: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

const MAX_PREFIX: usize = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    Path,
    PathParam,
    Query,
    QueryContinuation,
}

impl Operator {
    const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '+' => Self::Reserved,
            '#' => Self::Fragment,
            '.' => Self::Label,
            '/' => Self::Path,
            ';' => Self::PathParam,
            '?' => Self::Query,
            '&' => Self::QueryContinuation,
            _ => return None,
        })
    }

    const fn first(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved => "",
            Self::Fragment => "#",
            Self::Label => ".",
            Self::Path => "/",
            Self::PathParam => ";",
            Self::Query => "?",
            Self::QueryContinuation => "&",
        }
    }

    const fn separator(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved | Self::Fragment => ",",
            Self::Label => ".",
            Self::Path => "/",
            Self::PathParam => ";",
            Self::Query | Self::QueryContinuation => "&",
        }
    }

    const fn named(self) -> bool {
        matches!(self, Self::PathParam | Self::Query | Self::QueryContinuation)
    }

    const fn if_empty(self) -> &'static str {
        match self {
            Self::Query | Self::QueryContinuation => "=",
            _ => "",
        }
    }

    const fn allows_reserved(self) -> bool {
        matches!(self, Self::Reserved | Self::Fragment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Explode,
    Prefix(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VarSpec {
    name: String,
    modifier: Modifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Expression(Operator, Vec<VarSpec>),
}

/// A parsed URI template.
///
/// ```
/// use apimodel::UriTemplate;
/// use serde_json::json;
///
/// let vars = json!({"id": "a b", "q": ["x", "y"]});
/// let tpl = UriTemplate::parse("/items/{id}{?q*}")?;
/// let expanded = tpl.expand(vars.as_object().unwrap_or(&Default::default()));
/// assert_eq!(expanded, "/items/a%20b?q=x&q=y");
/// # Ok::<(), std::sync::Arc<apimodel::ModelError>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    parts: Vec<Part>,
}

impl UriTemplate {
    /// Parse template text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UriTemplate`] for unbalanced braces, unknown
    /// operators, empty or malformed variable names and bad prefix lengths.
    pub fn parse(text: &str) -> ModelResult<Self> {
        let fail = |message: String| {
            Arc::new(ModelError::UriTemplate {
                template: text.to_owned(),
                message,
            })
        };
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        body.push(inner);
                    }
                    if !closed {
                        return Err(fail("unclosed expression".to_owned()));
                    }
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(parse_expression(&body).map_err(fail)?);
                }
                '}' => return Err(fail("unmatched '}'".to_owned())),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }
        Ok(Self {
            source: text.to_owned(),
            parts,
        })
    }

    /// Template text as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of every variable the template references.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .flat_map(|part| match part {
                Part::Literal(_) => &[] as &[VarSpec],
                Part::Expression(_, specs) => specs.as_slice(),
            })
            .map(|spec| spec.name.as_str())
    }

    /// Expand against `vars`. Missing and `null` variables are undefined and
    /// expand to nothing.
    #[must_use]
    pub fn expand(&self, vars: &Vars) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(&encode(text, true)),
                Part::Expression(op, specs) => expand_expression(&mut out, *op, specs, vars),
            }
        }
        out
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_expression(body: &str) -> Result<Part, String> {
    let mut chars = body.chars();
    let (op, rest) = match chars.next() {
        None => return Err("empty expression".to_owned()),
        Some(c) => match Operator::from_char(c) {
            Some(op) => (op, chars.as_str()),
            None if matches!(c, '=' | ',' | '!' | '@' | '|') => {
                return Err(format!("unsupported operator {c:?}"));
            }
            None => (Operator::Simple, body),
        },
    };
    let specs = rest
        .split(',')
        .map(parse_varspec)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Part::Expression(op, specs))
}

fn parse_varspec(spec: &str) -> Result<VarSpec, String> {
    let (name, modifier) = if let Some(name) = spec.strip_suffix('*') {
        (name, Modifier::Explode)
    } else if let Some((name, len)) = spec.split_once(':') {
        let max = len
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_PREFIX).contains(n) && len.len() <= 4)
            .ok_or_else(|| format!("invalid prefix length {len:?}"))?;
        (name, Modifier::Prefix(max))
    } else {
        (spec, Modifier::None)
    };
    if name.is_empty() {
        return Err("empty variable name".to_owned());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%'))
    {
        return Err(format!("invalid variable name {name:?}"));
    }
    Ok(VarSpec {
        name: name.to_owned(),
        modifier,
    })
}

/// Percent-encode `text`, keeping existing `%XX` triplets when reserved
/// characters are allowed.
fn encode(text: &str, allow_reserved: bool) -> String {
    if !allow_reserved {
        return utf8_percent_encode(text, UNRESERVED).to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while let Some(&c) = chars.get(i) {
        let triplet = c == '%'
            && chars.get(i + 1).is_some_and(char::is_ascii_hexdigit)
            && chars.get(i + 2).is_some_and(char::is_ascii_hexdigit);
        if triplet {
            out.extend(chars.get(i..i + 3).unwrap_or_default());
            i += 3;
            continue;
        }
        let mut buf = [0_u8; 4];
        out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), RESERVED));
        i += 1;
    }
    out
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_undefined(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn expand_expression(out: &mut String, op: Operator, specs: &[VarSpec], vars: &Vars) {
    let reserved = op.allows_reserved();
    let mut first = true;
    for spec in specs {
        let Some(value) = vars.get(&spec.name).filter(|v| !is_undefined(v)) else {
            continue;
        };
        out.push_str(if first { op.first() } else { op.separator() });
        first = false;
        match (value, spec.modifier) {
            (Value::Array(items), Modifier::Explode) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(op.separator());
                    }
                    push_named(out, op, &spec.name, &scalar_text(item), reserved);
                }
            }
            (Value::Object(map), Modifier::Explode) => {
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(op.separator());
                    }
                    push_pair(out, op, key, &scalar_text(item), reserved);
                }
            }
            (Value::Array(items), _) => {
                let joined = items
                    .iter()
                    .map(|item| encode(&scalar_text(item), reserved))
                    .collect::<Vec<_>>()
                    .join(",");
                push_composite(out, op, &spec.name, &joined);
            }
            (Value::Object(map), _) => {
                let joined = map
                    .iter()
                    .flat_map(|(k, v)| [encode(k, reserved), encode(&scalar_text(v), reserved)])
                    .collect::<Vec<_>>()
                    .join(",");
                push_composite(out, op, &spec.name, &joined);
            }
            (scalar, modifier) => {
                let full = scalar_text(scalar);
                let text = match modifier {
                    Modifier::Prefix(max) => full.chars().take(max).collect(),
                    _ => full,
                };
                push_named(out, op, &spec.name, &text, reserved);
            }
        }
    }
}

fn push_named(out: &mut String, op: Operator, name: &str, text: &str, reserved: bool) {
    if op.named() {
        out.push_str(name);
        if text.is_empty() {
            out.push_str(op.if_empty());
            return;
        }
        out.push('=');
    }
    out.push_str(&encode(text, reserved));
}

fn push_pair(out: &mut String, op: Operator, key: &str, text: &str, reserved: bool) {
    out.push_str(&encode(key, reserved));
    if op.named() && text.is_empty() {
        out.push_str(op.if_empty());
        return;
    }
    out.push('=');
    out.push_str(&encode(text, reserved));
}

fn push_composite(out: &mut String, op: Operator, name: &str, joined: &str) {
    if op.named() {
        out.push_str(name);
        out.push('=');
    }
    out.push_str(joined);
}
