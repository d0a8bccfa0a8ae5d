//! Builtin extraction functions
//!
//! Each module provides one family of `(selection, args) -> value`
//! functions. Missing nodes and attributes produce defaults, never errors;
//! malformed arguments are reported as function errors.

mod attr;
mod each;
mod markup;
mod nav;
mod strings;

pub use attr::*;
pub use each::*;
pub use markup::*;
pub use nav::*;
pub use strings::*;

use crate::cast;
use crate::error::FuncError;
use crate::registry::FunctionRegistry;
use crate::value::Value;

/// Return type of every builtin
pub type FuncResult<'a> = Result<Value<'a>, FuncError>;

/// Register every builtin under its tag name
pub fn register_all(registry: &FunctionRegistry) {
    // single node text and markup
    registry.register("text", text);
    registry.register("textEmpty", text_empty);
    registry.register("html", html);
    registry.register("outerHtml", outer_html);

    // attributes
    registry.register("attr", attr);
    registry.register("attrEmpty", attr_empty);
    registry.register("absHref", abs_href);
    registry.register("absSrc", abs_src);

    // projections over the selection
    registry.register("eachText", each_text);
    registry.register("eachTextEmpty", each_text_empty);
    registry.register("eachAttr", each_attr);
    registry.register("eachAttrEmpty", each_attr_empty);
    registry.register("eachHtml", each_html);
    registry.register("eachOutHtml", each_out_html);
    registry.register("eachTextJoin", each_text_join);

    // indexed access
    registry.register("eqAndText", eq_and_text);
    registry.register("eqAndAttr", eq_and_attr);
    registry.register("eqAndHtml", eq_and_html);
    registry.register("eqAndOutHtml", eq_and_out_html);
    registry.register("size", size);

    // tree navigation
    registry.register("first", first);
    registry.register("last", last);
    registry.register("eq", eq);
    registry.register("child", child);
    registry.register("prev", prev);
    registry.register("next", next);
    registry.register("parent", parent);
    registry.register("parents", parents);
    registry.register("parentsUntil", parents_until);
    registry.register("siblings", siblings);

    // string shaping
    registry.register("textSplit", text_split);
    registry.register("attrSplit", attr_split);
    registry.register("textConcat", text_concat);
    registry.register("attrConcat", attr_concat);
}

/// Argument at `index`, if given
fn optional(args: &[String], index: usize) -> Option<&str> {
    args.get(index).map(String::as_str)
}

/// Argument at `index`, or an error naming the function
fn required<'s>(
    args: &'s [String],
    index: usize,
    func: &str,
    what: &str,
) -> Result<&'s str, FuncError> {
    optional(args, index)
        .ok_or_else(|| format!("{}() requires {} as argument {}", func, what, index + 1).into())
}

fn index_arg(args: &[String], index: usize, func: &str) -> Result<isize, FuncError> {
    let raw = required(args, index, func, "an index")?;
    raw.trim()
        .parse::<isize>()
        .map_err(|e| format!("{}() index {:?} is not an integer: {}", func, raw, e).into())
}

fn bool_arg(args: &[String], index: usize, default: bool, func: &str) -> Result<bool, FuncError> {
    match optional(args, index) {
        None => Ok(default),
        Some(raw) => cast::to_bool(&Value::Str(raw.to_string()))
            .map_err(|e| format!("{}() flag: {}", func, e).into()),
    }
}

fn strings<'a>(items: impl IntoIterator<Item = String>) -> Value<'a> {
    Value::List(items.into_iter().map(Value::Str).collect())
}
