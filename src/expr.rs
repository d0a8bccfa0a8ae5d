//! Tag expression parsing
//!
//! A tag such as `.navlink li->attrEmpty(id, -1)` splits on the function
//! symbol into a CSS selector and an optional call `Name(arg, ...)`.
//! Arguments are bare words, single or double quoted strings, or the
//! `$value` placeholder understood by the concat builtins.

use crate::error::{BindError, Result};

/// Placeholder replaced by the node's own text in concat builtins
pub const VALUE_PLACEHOLDER: &str = "$value";

/// Parsed form of one raw tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagExpression {
    /// CSS selector relative to the current node; empty means the node itself
    pub selector: String,
    /// Function to call; empty means plain text extraction
    pub func_name: String,
    pub func_args: Vec<String>,
}

impl TagExpression {
    pub fn has_call(&self) -> bool {
        !self.func_name.is_empty()
    }
}

/// Parse a raw tag using `func_symbol` as the selector/call separator.
pub fn parse(raw: &str, func_symbol: &str) -> Result<TagExpression> {
    let (selector, call) = raw.split_once(func_symbol).unwrap_or((raw, ""));
    let selector = selector.trim().to_string();
    let call = call.trim();

    if call.is_empty() {
        return Ok(TagExpression {
            selector,
            ..TagExpression::default()
        });
    }

    let open = call
        .find('(')
        .ok_or_else(|| malformed(raw, format!("missing `(` after function `{}`", call)))?;
    let name = call[..open].trim();
    if !is_identifier(name) {
        return Err(malformed(raw, format!("invalid function name `{}`", name)));
    }

    let (func_args, rest) = parse_args(&call[open + 1..]).map_err(|reason| malformed(raw, reason))?;
    if !rest.trim().is_empty() {
        return Err(malformed(raw, format!("unexpected `{}` after `)`", rest.trim())));
    }

    Ok(TagExpression {
        selector,
        func_name: name.to_string(),
        func_args,
    })
}

fn malformed(raw: &str, reason: impl Into<String>) -> BindError {
    BindError::MalformedExpression {
        raw: raw.to_string(),
        reason: reason.into(),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Accumulates one argument, dropping whitespace outside quotes at both ends
#[derive(Default)]
struct ArgBuilder {
    value: String,
    pending_ws: String,
    started: bool,
}

impl ArgBuilder {
    fn push_bare(&mut self, c: char) {
        if c.is_whitespace() {
            if self.started {
                self.pending_ws.push(c);
            }
        } else {
            self.push_quoted(c);
        }
    }

    fn push_quoted(&mut self, c: char) {
        self.open_quote();
        self.value.push(c);
    }

    fn open_quote(&mut self) {
        self.value.push_str(&self.pending_ws);
        self.pending_ws.clear();
        self.started = true;
    }

    fn finish(&mut self) -> String {
        let arg = std::mem::take(&mut self.value);
        self.pending_ws.clear();
        self.started = false;
        arg
    }
}

/// Parse the argument list following `(`.
/// Returns the arguments and whatever follows the closing `)`.
fn parse_args(input: &str) -> std::result::Result<(Vec<String>, &str), String> {
    let mut args = Vec::new();
    let mut arg = ArgBuilder::default();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                match chars.next() {
                    Some((_, escaped)) => arg.push_quoted(escaped),
                    None => break,
                }
            } else if c == q {
                quote = None;
            } else {
                arg.push_quoted(c);
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                arg.open_quote();
                quote = Some(c);
            }
            '(' => {
                depth += 1;
                arg.push_bare(c);
            }
            ')' if depth > 0 => {
                depth -= 1;
                arg.push_bare(c);
            }
            ')' => {
                if arg.started || !args.is_empty() {
                    args.push(arg.finish());
                }
                return Ok((args, &input[i + 1..]));
            }
            ',' if depth == 0 => args.push(arg.finish()),
            _ => arg.push_bare(c),
        }
    }

    if quote.is_some() {
        Err("unterminated quote".to_string())
    } else {
        Err("unterminated `(`".to_string())
    }
}
