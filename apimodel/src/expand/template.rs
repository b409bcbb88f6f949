//! Function-call templates for string bodies.
//!
//! Text is copied through; `{{ ... }}` actions hold a pipeline of commands
//! separated by `|`. A command is either a single literal or a function name
//! followed by literal arguments, and each command after the first receives
//! the previous result as its final argument. `{{-` and `-}}` trim adjacent
//! whitespace, and `{{/* ... */}}` is a comment.

use std::sync::Arc;

use super::{Lookup, funcs::Func};
use crate::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Action(Vec<Command>),
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Literal(String),
    Call(Func, Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Ident(String),
    Pipe,
}

/// A parsed body template.
///
/// ```
/// use apimodel::expand::Template;
///
/// let lookup = |name: &str| (name == "user").then(|| "ada".to_owned());
/// let tpl = Template::parse(r#"{"user": {{ var "user" | json }}}"#)?;
/// assert_eq!(tpl.render(&lookup)?, r#"{"user": "ada"}"#);
/// # Ok::<(), std::sync::Arc<apimodel::ModelError>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

fn error(message: impl Into<String>) -> Arc<ModelError> {
    Arc::new(ModelError::template(message))
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn skip_spaces(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse(mut self) -> ModelResult<Template> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !self.starts_with("{{") {
                text.push(c);
                self.pos += 1;
                continue;
            }
            self.pos += 2;
            if self.peek() == Some('-') && self.peek_at(1).is_some_and(is_space) {
                self.pos += 1;
                text.truncate(text.trim_end_matches(is_space).len());
            }
            if !text.is_empty() {
                nodes.push(Node::Text(std::mem::take(&mut text)));
            }
            let (action, trim_after) = self.action()?;
            if let Some(commands) = action {
                nodes.push(Node::Action(commands));
            }
            if trim_after {
                self.skip_spaces();
            }
        }
        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }
        Ok(Template { nodes })
    }

    /// Consume the closing delimiter if it is next, reporting whether it
    /// trims the following text.
    fn close(&mut self, spaced: bool) -> Option<bool> {
        if spaced && self.starts_with("-}}") {
            self.pos += 3;
            return Some(true);
        }
        if self.starts_with("}}") {
            self.pos += 2;
            return Some(false);
        }
        None
    }

    fn action(&mut self) -> ModelResult<(Option<Vec<Command>>, bool)> {
        let spaced = self.skip_spaces();
        if self.starts_with("/*") {
            return self.comment().map(|trim| (None, trim));
        }
        let mut tokens = Vec::new();
        let mut spaced_before = spaced;
        loop {
            if let Some(trim) = self.close(spaced_before) {
                return commands(tokens).map(|c| (Some(c), trim));
            }
            let Some(c) = self.peek() else {
                return Err(error("unclosed action"));
            };
            match c {
                '|' => {
                    self.pos += 1;
                    tokens.push(Token::Pipe);
                }
                '"' => tokens.push(Token::Literal(self.quoted()?)),
                '`' => tokens.push(Token::Literal(self.raw()?)),
                c if c.is_ascii_digit()
                    || (matches!(c, '-' | '+')
                        && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) =>
                {
                    tokens.push(Token::Literal(self.number()));
                }
                c if c.is_alphabetic() || c == '_' || c == '.' => {
                    tokens.push(Token::Ident(self.ident()));
                }
                other => return Err(error(format!("unexpected {other:?} in command"))),
            }
            spaced_before = self.skip_spaces();
        }
    }

    fn comment(&mut self) -> ModelResult<bool> {
        self.pos += 2;
        while self.peek().is_some() {
            if self.starts_with("*/") {
                self.pos += 2;
                let spaced = self.skip_spaces();
                return self
                    .close(spaced)
                    .ok_or_else(|| error("comment ends before closing delimiter"));
            }
            self.pos += 1;
        }
        Err(error("unclosed comment"))
    }

    fn quoted(&mut self) -> ModelResult<String> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '"' => return Ok(out),
                '\\' => {
                    let escaped = self
                        .peek()
                        .ok_or_else(|| error("unterminated quoted string"))?;
                    self.pos += 1;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                '\n' => break,
                other => out.push(other),
            }
        }
        Err(error("unterminated quoted string"))
    }

    fn raw(&mut self) -> ModelResult<String> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '`' {
                return Ok(out);
            }
            out.push(c);
        }
        Err(error("unterminated raw quoted string"))
    }

    fn number(&mut self) -> String {
        let mut out = String::new();
        if let Some(sign) = self.peek().filter(|c| matches!(c, '-' | '+')) {
            out.push(sign);
            self.pos += 1;
        }
        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '.') {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '.'))
        {
            out.push(c);
            self.pos += 1;
        }
        out
    }
}

fn commands(tokens: Vec<Token>) -> ModelResult<Vec<Command>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for token in tokens.into_iter().chain(std::iter::once(Token::Pipe)) {
        if token == Token::Pipe {
            out.push(command(std::mem::take(&mut current))?);
        } else {
            current.push(token);
        }
    }
    Ok(out)
}

fn command(tokens: Vec<Token>) -> ModelResult<Command> {
    let mut iter = tokens.into_iter();
    let head = iter.next().ok_or_else(|| error("missing value for command"))?;
    let args = iter
        .map(|t| match t {
            Token::Literal(text) => Ok(text),
            Token::Ident(name) if name == "true" || name == "false" => Ok(name),
            Token::Ident(name) => Err(error(format!(
                "function {name:?} can only be called at the start of a command"
            ))),
            Token::Pipe => Err(error("missing value for command")),
        })
        .collect::<ModelResult<Vec<_>>>()?;
    match head {
        Token::Ident(name) if name == "true" || name == "false" => literal(name, &args),
        Token::Ident(name) => Func::lookup(&name)
            .map(|func| Command::Call(func, args))
            .ok_or_else(|| error(format!("function {name:?} not defined"))),
        Token::Literal(text) => literal(text, &args),
        Token::Pipe => Err(error("missing value for command")),
    }
}

fn literal(text: String, args: &[String]) -> ModelResult<Command> {
    if args.is_empty() {
        Ok(Command::Literal(text))
    } else {
        Err(error(format!("can't give argument to non-function {text:?}")))
    }
}

impl Template {
    /// Parse template text, checking every function name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Template`] for malformed actions and unknown
    /// functions.
    pub fn parse(text: &str) -> ModelResult<Self> {
        Parser {
            chars: text.chars().collect(),
            pos: 0,
        }
        .parse()
    }

    /// Render the template, resolving `var` and friends through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::VarNotFound`] when a `var` call exhausts its
    /// names, or [`ModelError::Template`] when a function fails.
    pub fn render(&self, lookup: &dyn Lookup) -> ModelResult<String> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Action(commands) => out.push_str(&run(commands, lookup)?),
            }
        }
        Ok(out)
    }
}

fn run(commands: &[Command], lookup: &dyn Lookup) -> ModelResult<String> {
    let mut piped: Option<String> = None;
    for command in commands {
        piped = Some(match command {
            Command::Literal(text) => {
                if piped.is_some() {
                    return Err(error(format!(
                        "can't give argument to non-function {text:?}"
                    )));
                }
                text.clone()
            }
            Command::Call(func, args) => {
                let mut all = args.clone();
                all.extend(piped.take());
                func.call(&all, lookup)?
            }
        });
    }
    Ok(piped.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Template;
    use crate::{Vars, config::header, expand::Expander};

    fn render(text: &str) -> Result<String, String> {
        let vars: Vars = [("found", "found"), ("v", "var")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), serde_json::Value::from(v)))
            .collect();
        let form = header([("v", ["form"])]);
        let expander = Expander::with_form(&vars, &form);
        Template::parse(text)
            .and_then(|t| t.render(&expander))
            .map_err(|e| e.to_string())
    }

    #[rstest]
    #[case(r#"{{ var "notfound" "fallback" }}"#, "fallback")]
    #[case(r#"{{ var "notfound" "found" "fallback" }}"#, "found")]
    #[case(r#"{{ var "v" }}"#, "form")]
    #[case(r#"{{ var "var.v" }}"#, "var")]
    #[case(r#"id={{ "x" | base64.encode }}"#, "id=eA==")]
    #[case(r#"{{ .base64.Encode "x" }}"#, "eA==")]
    #[case(r#"{{ var "found" | json }}"#, r#""found""#)]
    #[case(r#"q={{ urlquery "a b" }}"#, "q=a+b")]
    #[case("a  {{- 3 -}}  b", "a3b")]
    #[case("a {{/* note */}}b", "a b")]
    #[case("a {{- /* note */ -}} b", "ab")]
    #[case("{{ `raw \"text\"` }}", r#"raw "text""#)]
    #[case("no actions", "no actions")]
    #[case("{{ -1 }}", "-1")]
    fn renders(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(render(text).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case("{{ missing_func }}", r#"function "missing_func" not defined"#)]
    #[case("{{ var }}", "var requires at least one var name")]
    #[case(r#"{{ var "notfound" }}"#, r#"var not found: "notfound""#)]
    #[case("{{ var \"x\" ", "unclosed action")]
    #[case("{{ \"x }}", "unterminated quoted string")]
    #[case("{{ | json }}", "missing value for command")]
    #[case(r#"{{ "a" "b" }}"#, "can't give argument to non-function")]
    #[case(r#"{{ "a" | "b" }}"#, "can't give argument to non-function")]
    fn reports_errors(#[case] text: &str, #[case] expected: &str) {
        let err = render(text).expect_err("template must fail");
        assert!(err.contains(expected), "{err:?} does not mention {expected:?}");
    }

    #[rstest]
    fn unknown_functions_fail_at_parse_time() {
        let err = Template::parse("ok {{ nope 1 }}").expect_err("parse must fail");
        assert!(err.to_string().contains(r#"function "nope" not defined"#));
    }
}
