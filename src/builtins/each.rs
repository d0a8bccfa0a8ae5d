//! Projections over every element of a selection, and indexed access

use super::{index_arg, optional, required, strings, FuncResult};
use crate::selection::Selection;
use crate::value::Value;

fn trimmed_text(node: &Selection<'_>) -> String {
    node.text().trim().to_string()
}

/// `eachText()`: trimmed text of every element
pub fn each_text<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(strings(node.iter().map(|el| trimmed_text(&el))))
}

/// `eachTextEmpty(default)`: trimmed text of every element, `default` for empty ones
pub fn each_text_empty<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let default = optional(args, 0).unwrap_or_default();
    Ok(strings(node.iter().map(|el| {
        let text = trimmed_text(&el);
        if text.is_empty() {
            default.to_string()
        } else {
            text
        }
    })))
}

/// `eachAttr(name)`: attribute of every element, empty when missing
pub fn each_attr<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let name = required(args, 0, "eachAttr", "an attribute name")?;
    Ok(strings(
        node.iter()
            .map(|el| el.attr(name).unwrap_or_default().to_string()),
    ))
}

/// `eachAttrEmpty(name, default)`: attribute of every element, `default` when missing or empty
pub fn each_attr_empty<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let name = required(args, 0, "eachAttrEmpty", "an attribute name")?;
    let default = optional(args, 1).unwrap_or_default();
    Ok(strings(node.iter().map(|el| match el.attr(name) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    })))
}

/// `eachHtml()`: inner markup of every element
pub fn each_html<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(strings(node.iter().map(|el| el.html().unwrap_or_default())))
}

/// `eachOutHtml()`: outer markup of every element
pub fn each_out_html<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(strings(node.iter().map(|el| el.outer_html().unwrap_or_default())))
}

/// `eachTextJoin([sep])`: trimmed texts joined with `sep` (default `,`)
pub fn each_text_join<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let sep = optional(args, 0).unwrap_or(",");
    let texts: Vec<String> = node.iter().map(|el| trimmed_text(&el)).collect();
    Ok(Value::Str(texts.join(sep)))
}

/// `eqAndText(i)`
pub fn eq_and_text<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let index = index_arg(args, 0, "eqAndText")?;
    Ok(Value::Str(trimmed_text(&node.eq(index))))
}

/// `eqAndAttr(i, name)`
pub fn eq_and_attr<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let index = index_arg(args, 0, "eqAndAttr")?;
    let name = required(args, 1, "eqAndAttr", "an attribute name")?;
    Ok(Value::from(node.eq(index).attr(name).unwrap_or_default()))
}

/// `eqAndHtml(i)`
pub fn eq_and_html<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let index = index_arg(args, 0, "eqAndHtml")?;
    Ok(Value::Str(node.eq(index).html().unwrap_or_default()))
}

/// `eqAndOutHtml(i)`
pub fn eq_and_out_html<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let index = index_arg(args, 0, "eqAndOutHtml")?;
    Ok(Value::Str(node.eq(index).outer_html().unwrap_or_default()))
}

/// `size()`: number of elements in the selection
pub fn size<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(Value::from(node.len()))
}
