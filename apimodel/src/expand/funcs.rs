//! Functions callable from body templates.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::Lookup;
use crate::{ModelError, ModelResult};

/// Built-in template function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Func {
    Env,
    Var,
    Base64Encode,
    Base64Decode,
    UrlQuery,
    Json,
}

impl Func {
    /// Resolve a function name. Dotted helper names also accept the
    /// `.base64.Encode` field spelling.
    pub(super) fn lookup(name: &str) -> Option<Self> {
        let bare = name.strip_prefix('.').unwrap_or(name);
        match bare.to_ascii_lowercase().as_str() {
            "env" if bare == "env" => Some(Self::Env),
            "var" if bare == "var" => Some(Self::Var),
            "base64.encode" => Some(Self::Base64Encode),
            "base64.decode" => Some(Self::Base64Decode),
            "urlquery" if bare == "urlquery" => Some(Self::UrlQuery),
            "json" if bare == "json" => Some(Self::Json),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Var => "var",
            Self::Base64Encode => "base64.encode",
            Self::Base64Decode => "base64.decode",
            Self::UrlQuery => "urlquery",
            Self::Json => "json",
        }
    }

    pub(super) fn call(self, args: &[String], lookup: &dyn Lookup) -> ModelResult<String> {
        match self {
            Self::Env => Ok(std::env::var(self.single(args)?).unwrap_or_default()),
            Self::Var => resolve_var(args, lookup),
            Self::Base64Encode => Ok(STANDARD.encode(self.single(args)?)),
            Self::Base64Decode => {
                let bytes = STANDARD
                    .decode(self.single(args)?)
                    .map_err(|e| Arc::new(ModelError::template(format!("base64.decode: {e}"))))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Self::UrlQuery => Ok(url::form_urlencoded::byte_serialize(args.concat().as_bytes()).collect()),
            Self::Json => serde_json::to_string(self.single(args)?)
                .map_err(|e| Arc::new(ModelError::template(format!("json: {e}")))),
        }
    }

    fn single<'a>(self, args: &'a [String]) -> ModelResult<&'a str> {
        match args {
            [only] => Ok(only),
            _ => Err(Arc::new(ModelError::template(format!(
                "wrong number of args for {}: want 1 got {}",
                self.name(),
                args.len()
            )))),
        }
    }
}

/// Try each name in order; a trailing argument after the first that does not
/// resolve is returned literally.
fn resolve_var(names: &[String], lookup: &dyn Lookup) -> ModelResult<String> {
    let Some(first) = names.first() else {
        return Err(Arc::new(ModelError::template(
            "var requires at least one var name",
        )));
    };
    let last = names.len() - 1;
    for (i, name) in names.iter().enumerate() {
        if let Some(value) = lookup.lookup(name) {
            return Ok(value);
        }
        if i > 0 && i == last {
            return Ok(name.clone());
        }
    }
    Err(Arc::new(ModelError::VarNotFound {
        name: first.clone(),
    }))
}
