//! Namespaced variable lookup shared by placeholder expansion and body
//! templates.
//!
//! Names are resolved through three namespaces: `env.NAME` reads the process
//! environment, `var.name` reads the combined variables and `form.name` reads
//! form fields collected for the current body (comma-joined). A bare name
//! tries form fields first, then variables.

mod funcs;
mod placeholder;
mod template;

pub use placeholder::{expand_header, expand_string, expand_value};
pub use template::Template;

use serde_json::Value;

use crate::{Header, Vars};

/// Resolve a placeholder name to its text, if known.
pub trait Lookup {
    /// Text bound to `name`, or `None` when nothing matches.
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Render a variable value as placeholder text. Strings are inserted
/// verbatim, `null` counts as unbound and anything else is written as JSON.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The `env`/`var`/`form` namespace resolver.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    vars: &'a Vars,
    form: Option<&'a Header>,
}

impl<'a> Expander<'a> {
    /// Resolver over variables only.
    #[must_use]
    pub const fn new(vars: &'a Vars) -> Self {
        Self { vars, form: None }
    }

    /// Resolver that also sees the given form fields.
    #[must_use]
    pub const fn with_form(vars: &'a Vars, form: &'a Header) -> Self {
        Self {
            vars,
            form: Some(form),
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).and_then(value_text)
    }

    fn form_field(&self, name: &str) -> Option<String> {
        self.form
            .and_then(|form| form.get(name))
            .map(|values| values.join(","))
    }
}

impl Lookup for Expander<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(key) = name.strip_prefix("env.") {
            return std::env::var(key).ok();
        }
        if let Some(key) = name.strip_prefix("var.") {
            return self.var(key);
        }
        if let Some(key) = name.strip_prefix("form.") {
            return self.form_field(key);
        }
        self.form_field(name).or_else(|| self.var(name))
    }
}
