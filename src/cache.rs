//! Parsed expression cache
//!
//! Tags are pure functions of their text, so parsed expressions are kept
//! for the lifetime of the engine and shared by every bind.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::expr::{self, TagExpression};

/// Raw tag text -> parsed expression
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: RwLock<HashMap<String, Arc<TagExpression>>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached expression for `raw`, parsing and storing it on a miss.
    pub fn get_or_parse(&self, raw: &str, func_symbol: &str) -> Result<Arc<TagExpression>> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(expr) = entries.get(raw) {
                return Ok(Arc::clone(expr));
            }
        }

        // Parse outside the lock; racing parses of one key produce equal values
        let parsed = Arc::new(expr::parse(raw, func_symbol)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let expr = entries.entry(raw.to_string()).or_insert(parsed);
        Ok(Arc::clone(expr))
    }

    /// Number of distinct tags parsed so far
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
