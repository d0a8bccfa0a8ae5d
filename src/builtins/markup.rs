//! Text and markup of a selection

use super::{optional, FuncResult};
use crate::selection::Selection;
use crate::value::Value;

/// `text()`: trimmed text of the selection
pub fn text<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(Value::Str(node.text().trim().to_string()))
}

/// `textEmpty(default)`: trimmed text, or `default` when it is empty
pub fn text_empty<'a>(node: &Selection<'a>, args: &[String]) -> FuncResult<'a> {
    let text = node.text();
    let text = text.trim();
    if text.is_empty() {
        return Ok(Value::from(optional(args, 0).unwrap_or_default()));
    }
    Ok(Value::from(text))
}

/// `html()`: inner markup of the first element
pub fn html<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(Value::Str(node.html().unwrap_or_default()))
}

/// `outerHtml()`: outer markup of the first element
pub fn outer_html<'a>(node: &Selection<'a>, _args: &[String]) -> FuncResult<'a> {
    Ok(Value::Str(node.outer_html().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::fixtures::PAGE;
    use scraper::Html;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_text() {
        let document = Html::parse_document(PAGE);
        let root = Selection::from_document(&document);

        let value = text(&root.find(".nav li"), &[]).unwrap();
        assert_eq!(value.as_str(), Some("IndexWeb pagePc Page"));
        assert_eq!(text(&root.find(".missing"), &[]).unwrap().as_str(), Some(""));
    }

    #[test]
    fn test_text_empty() {
        let document = Html::parse_document(PAGE);
        let root = Selection::from_document(&document);

        let value = text_empty(&root.find(".empty"), &args(&["nodata"])).unwrap();
        assert_eq!(value.as_str(), Some("nodata"));
        let value = text_empty(&root.find("title"), &args(&["nodata"])).unwrap();
        assert_eq!(value.as_str(), Some("Fixture"));
        let value = text_empty(&root.find(".missing"), &[]).unwrap();
        assert_eq!(value.as_str(), Some(""));
    }

    #[test]
    fn test_html() {
        let document = Html::parse_document(PAGE);
        let root = Selection::from_document(&document);
        let items = root.find(".nav li");

        assert_eq!(html(&items, &[]).unwrap().as_str(), Some(r#"<a href="/">Index</a>"#));
        assert_eq!(
            outer_html(&items, &[]).unwrap().as_str(),
            Some(r#"<li id=""><a href="/">Index</a></li>"#)
        );
        assert_eq!(html(&root.find(".missing"), &[]).unwrap().as_str(), Some(""));
    }
}
