//! Node selections over a parsed document
//!
//! Wraps `scraper` element references in an ordered, de-duplicated set
//! with the query and traversal operations the binder and builtins need.
//! Invalid CSS selectors match nothing.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Ordered set of elements in one document
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    nodes: Vec<ElementRef<'a>>,
}

impl<'a> Selection<'a> {
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Selection holding the document's root element
    pub fn from_document(document: &'a Html) -> Self {
        Self::from_element(document.root_element())
    }

    pub fn from_element(element: ElementRef<'a>) -> Self {
        Self {
            nodes: vec![element],
        }
    }

    /// Build a selection keeping the first occurrence of each element
    pub fn from_elements(elements: impl IntoIterator<Item = ElementRef<'a>>) -> Self {
        let mut seen = HashSet::new();
        let nodes = elements
            .into_iter()
            .filter(|el| seen.insert(el.id()))
            .collect();
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn elements(&self) -> &[ElementRef<'a>] {
        &self.nodes
    }

    /// Each element as its own single-node selection, in document order
    pub fn iter(&self) -> impl Iterator<Item = Selection<'a>> + '_ {
        self.nodes.iter().map(|el| Selection::from_element(*el))
    }

    /// Descendants of any element in the selection matching `selector`
    pub fn find(&self, selector: &str) -> Self {
        let Some(selector) = compile(selector) else {
            return Self::empty();
        };
        Self::from_elements(self.nodes.iter().flat_map(|el| el.select(&selector)))
    }

    /// Elements of this selection matching `selector`
    pub fn filter(&self, selector: &str) -> Self {
        let filter = Filter::new(Some(selector));
        Self::from_elements(self.nodes.iter().copied().filter(|el| filter.accepts(el)))
    }

    /// Combined text of every element, untrimmed
    pub fn text(&self) -> String {
        self.nodes.iter().flat_map(|el| el.text()).collect()
    }

    /// Attribute of the first element
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.nodes.first().and_then(|el| el.value().attr(name))
    }

    /// Inner markup of the first element
    pub fn html(&self) -> Option<String> {
        self.nodes.first().map(|el| el.inner_html())
    }

    /// Outer markup of the first element
    pub fn outer_html(&self) -> Option<String> {
        self.nodes.first().map(|el| el.html())
    }

    /// Element at `index`; negative indices count from the end
    pub fn eq(&self, index: isize) -> Self {
        let len = self.nodes.len() as isize;
        let index = if index < 0 { len + index } else { index };
        if index < 0 || index >= len {
            return Self::empty();
        }
        Self::from_element(self.nodes[index as usize])
    }

    pub fn first(&self) -> Self {
        self.eq(0)
    }

    pub fn last(&self) -> Self {
        self.eq(-1)
    }

    /// Element children, optionally filtered
    pub fn children(&self, filter: Option<&str>) -> Self {
        let filter = Filter::new(filter);
        Self::from_elements(
            self.nodes
                .iter()
                .flat_map(|el| el.children().filter_map(ElementRef::wrap))
                .filter(|el| filter.accepts(el)),
        )
    }

    /// Immediately preceding element sibling of each element, kept if it matches
    pub fn prev(&self, filter: Option<&str>) -> Self {
        let filter = Filter::new(filter);
        Self::from_elements(
            self.nodes
                .iter()
                .filter_map(|el| el.prev_siblings().find_map(ElementRef::wrap))
                .filter(|el| filter.accepts(el)),
        )
    }

    /// Immediately following element sibling of each element, kept if it matches
    pub fn next(&self, filter: Option<&str>) -> Self {
        let filter = Filter::new(filter);
        Self::from_elements(
            self.nodes
                .iter()
                .filter_map(|el| el.next_siblings().find_map(ElementRef::wrap))
                .filter(|el| filter.accepts(el)),
        )
    }

    pub fn parent(&self, filter: Option<&str>) -> Self {
        let filter = Filter::new(filter);
        Self::from_elements(
            self.nodes
                .iter()
                .filter_map(|el| el.parent().and_then(ElementRef::wrap))
                .filter(|el| filter.accepts(el)),
        )
    }

    /// All element ancestors, nearest first for each element
    pub fn parents(&self, filter: Option<&str>) -> Self {
        let filter = Filter::new(filter);
        Self::from_elements(
            self.nodes
                .iter()
                .flat_map(|el| el.ancestors().filter_map(ElementRef::wrap))
                .filter(|el| filter.accepts(el)),
        )
    }

    /// Ancestors of each element up to, but excluding, the first one matching `selector`
    pub fn parents_until(&self, selector: &str) -> Self {
        let stop = Filter::new(Some(selector));
        Self::from_elements(self.nodes.iter().flat_map(|el| {
            el.ancestors()
                .filter_map(ElementRef::wrap)
                .take_while(|ancestor| !stop.matches(ancestor))
        }))
    }

    /// Element siblings of each element, excluding the element itself
    pub fn siblings(&self, filter: Option<&str>) -> Self {
        let filter = Filter::new(filter);
        Self::from_elements(
            self.nodes
                .iter()
                .flat_map(|el| {
                    let id = el.id();
                    el.parent()
                        .into_iter()
                        .flat_map(|parent| parent.children().filter_map(ElementRef::wrap))
                        .filter(move |sibling| sibling.id() != id)
                })
                .filter(|el| filter.accepts(el)),
        )
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!(selector, error = ?e, "Invalid selector, matching nothing");
            None
        }
    }
}

/// Optional selector restricting traversal results
enum Filter {
    Any,
    Only(Selector),
    Invalid,
}

impl Filter {
    fn new(selector: Option<&str>) -> Self {
        match selector.map(str::trim) {
            None | Some("") => Filter::Any,
            Some(selector) => compile(selector).map_or(Filter::Invalid, Filter::Only),
        }
    }

    fn accepts(&self, el: &ElementRef) -> bool {
        match self {
            Filter::Any => true,
            Filter::Only(selector) => selector.matches(el),
            Filter::Invalid => false,
        }
    }

    /// Like `accepts`, but an absent filter matches nothing
    fn matches(&self, el: &ElementRef) -> bool {
        match self {
            Filter::Only(selector) => selector.matches(el),
            Filter::Any | Filter::Invalid => false,
        }
    }
}
