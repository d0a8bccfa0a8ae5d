//! Tree navigation
//!
//! These return selections, so binding continues structurally from the
//! node they reach.

use super::{index_arg, optional, FuncResult};
use crate::selection::Selection;
use crate::value::Value;

pub fn first<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.first()))
}

pub fn last<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.last()))
}

/// `eq(i)`: element at `i`, negative counting from the end
pub fn eq<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let index = index_arg(args, 0, "eq")?;
    Ok(Value::Node(node.eq(index)))
}

/// `child([selector])`
pub fn child<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.children(optional(args, 0))))
}

/// `prev([selector])`
pub fn prev<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.prev(optional(args, 0))))
}

/// `next([selector])`
pub fn next<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.next(optional(args, 0))))
}

/// `parent([selector])`
pub fn parent<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.parent(optional(args, 0))))
}

/// `parents([selector])`
pub fn parents<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.parents(optional(args, 0))))
}

/// `parentsUntil(selector)`: ancestors up to the first one matching `selector`
pub fn parents_until<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.parents_until(optional(args, 0).unwrap_or_default())))
}

/// `siblings([selector])`
pub fn siblings<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    Ok(Value::Node(node.siblings(optional(args, 0))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::fixtures::PAGE;
    use scraper::Html;

    fn node<'a>(value: Value<'a>) -> Selection<'a> {
        match value {
            Value::Node(selection) => selection,
            other => panic!("expected selection, got {:?}", other),
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positions() {
        let document = Html::parse_document(PAGE);
        let items = Selection::from_document(&document).find(".nav li");

        assert_eq!(node(first(&items, &[]).unwrap()).text(), "Index");
        assert_eq!(node(last(&items, &[]).unwrap()).text(), "Pc Page");
        assert_eq!(node(eq(&items, &args(&["-2"])).unwrap()).text(), "Web page");
        assert!(eq(&items, &[]).is_err());
    }

    #[test]
    fn test_relatives() {
        let document = Html::parse_document(PAGE);
        let root = Selection::from_document(&document);
        let second = root.find(r#"li[id="2"]"#);

        assert_eq!(node(prev(&second, &[]).unwrap()).text(), "Index");
        assert_eq!(node(next(&second, &[]).unwrap()).text(), "Pc Page");
        assert!(node(next(&second, &args(&["#nope"])).unwrap()).is_empty());
        assert_eq!(node(siblings(&second, &[]).unwrap()).len(), 2);
        let third = child(&root.find(".nav"), &args(&["li[id='3']"])).unwrap();
        assert_eq!(node(third).text(), "Pc Page");

        let ul = node(parent(&second, &[]).unwrap());
        assert_eq!(ul.attr("class"), Some("nav"));

        // ul, body, html
        assert_eq!(node(parents(&second, &[]).unwrap()).len(), 3);
        assert_eq!(node(parents(&second, &args(&["body"])).unwrap()).len(), 1);
        assert_eq!(node(parents_until(&second, &args(&["body"])).unwrap()).len(), 1);
        assert_eq!(node(parents_until(&second, &[]).unwrap()).len(), 3);
    }
}
