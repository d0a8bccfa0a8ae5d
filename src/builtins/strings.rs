//! Splitting and template-style concatenation

use super::{bool_arg, optional, required, strings, FuncResult};
use crate::expr::VALUE_PLACEHOLDER;
use crate::selection::Selection;
use crate::value::Value;

fn split(source: &str, sep: &str, trim: bool) -> Vec<String> {
    if source.trim().is_empty() {
        return Vec::new();
    }
    source
        .split(sep)
        .map(|piece| if trim { piece.trim() } else { piece })
        .map(str::to_string)
        .collect()
}

/// Join `parts`, replacing each `$value` with `value`
fn concat(parts: &[String], value: &str) -> String {
    parts
        .iter()
        .map(|part| if part == VALUE_PLACEHOLDER { value } else { part.as_str() })
        .collect()
}

/// `textSplit([sep][, trim])`: text split on `sep` (default `,`).
/// Pieces are trimmed unless `trim` is false.
pub fn text_split<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let sep = optional(args, 0).unwrap_or(",");
    let trim = bool_arg(args, 1, true, "textSplit")?;
    Ok(strings(split(&node.text(), sep, trim)))
}

/// `attrSplit(name[, sep][, trim])`
pub fn attr_split<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let name = required(args, 0, "attrSplit", "an attribute name")?;
    let sep = optional(args, 1).unwrap_or(",");
    let trim = bool_arg(args, 2, true, "attrSplit")?;
    Ok(strings(split(node.attr(name).unwrap_or_default(), sep, trim)))
}

/// `textConcat(parts...)`
pub fn text_concat<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let text = node.text();
    Ok(Value::Str(concat(args, text.trim())))
}

/// `attrConcat(name, parts...)`
pub fn attr_concat<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let name = required(args, 0, "attrConcat", "an attribute name")?;
    let value = node.attr(name).unwrap_or_default();
    Ok(Value::Str(concat(&args[1..], value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::fixtures::PAGE;
    use crate::cast;
    use scraper::Html;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn list(value: Value<'_>) -> Vec<String> {
        match value {
            Value::List(items) => items.iter().map(|v| cast::to_string(v).unwrap()).collect(),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_text_split() {
        let document = Html::parse_document(PAGE);
        let words = Selection::from_document(&document).find(".words");

        assert_eq!(list(text_split(&words, &args(&["|"])).unwrap()), vec!["A", "B", "C", "D"]);
        assert_eq!(
            list(text_split(&words, &args(&["|", "false"])).unwrap()),
            vec!["A", "B", "C", "D"]
        );
        assert!(list(text_split(&Selection::empty(), &args(&["|"])).unwrap()).is_empty());
        assert!(text_split(&words, &args(&["|", "maybe"])).is_err());
    }

    #[test]
    fn test_attr_split() {
        let document = Html::parse_document(PAGE);
        let words = Selection::from_document(&document).find(".words");

        assert_eq!(list(attr_split(&words, &args(&["data-tags"])).unwrap()), vec!["a", "b", "c"]);
        assert_eq!(
            list(attr_split(&words, &args(&["data-tags", ",", "false"])).unwrap()),
            vec!["a", " b ", "c"]
        );
        assert!(list(attr_split(&words, &args(&["missing"])).unwrap()).is_empty());
    }

    #[test]
    fn test_concat() {
        let document = Html::parse_document(PAGE);
        let words = Selection::from_document(&document).find(".words");

        let value = text_concat(&words, &args(&["this is words:", "[", "$value", "]"])).unwrap();
        assert_eq!(value.as_str(), Some("this is words:[A|B|C|D]"));

        let value = attr_concat(&words, &args(&["show", "isShow = [", "$value", "]"])).unwrap();
        assert_eq!(value.as_str(), Some("isShow = [true]"));

        let value = attr_concat(&words, &args(&["missing", "<", "$value", ">"])).unwrap();
        assert_eq!(value.as_str(), Some("<>"));
        assert!(attr_concat(&words, &[]).is_err());
    }
}
