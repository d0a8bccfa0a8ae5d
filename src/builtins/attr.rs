//! Attribute access

use url::Url;

use super::{optional, required, FuncResult};
use crate::selection::Selection;
use crate::value::Value;

/// `attr(name[, default])`: attribute of the first element, `default` when missing
pub fn attr<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let name = required(args, 0, "attr", "an attribute name")?;
    let default = optional(args, 1).unwrap_or_default();
    Ok(Value::from(node.attr(name).unwrap_or(default)))
}

/// `attrEmpty(name, default)`: like `attr`, also substituting an empty value
pub fn attr_empty<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let name = required(args, 0, "attrEmpty", "an attribute name")?;
    let default = optional(args, 1).unwrap_or_default();
    let value = match node.attr(name) {
        Some(value) if !value.is_empty() => value,
        _ => default,
    };
    Ok(Value::from(value))
}

/// `absHref(base)`: `href` resolved against `base`
pub fn abs_href<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    absolute_attr(node, args, "absHref", "href")
}

/// `absSrc(base)`: `src` resolved against `base`
pub fn abs_src<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    absolute_attr(node, args, "absSrc", "src")
}

fn absolute_attr<'a>(
    node: &Selection<'a>,
    args: &[String],
    func: &str,
    name: &str,
) -> FuncResult<'a> {
    let base = required(args, 0, func, "a base URL")?;
    let base = Url::parse(base).map_err(|e| format!("{}() base URL {:?}: {}", func, base, e))?;

    let Some(link) = node.attr(name) else {
        return Ok(Value::Str(String::new()));
    };
    let absolute = base
        .join(link.trim())
        .map_err(|e| format!("{}() cannot resolve {:?}: {}", func, link, e))?;
    Ok(Value::Str(absolute.to_string()))
}
