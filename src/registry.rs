//! Named function registry
//!
//! Functions are looked up by the name used in tags. The table is seeded
//! with the builtins and may be extended or overwritten at any time, from
//! any thread; the last registration of a name wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::builtins;
use crate::error::FuncError;
use crate::selection::Selection;
use crate::value::Value;

/// A registered function: `(selection, args) -> value`
pub type Func =
    Arc<dyn for<'a> Fn(&Selection<'a>, &[String]) -> Result<Value<'a>, FuncError> + Send + Sync>;

#[derive(Default)]
pub struct FunctionRegistry {
    funcs: RwLock<HashMap<String, Func>>,
}

impl FunctionRegistry {
    /// Empty registry without builtins
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with every builtin function
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtins::register_all(&registry);
        registry
    }

    /// Register or overwrite `name`
    pub fn register<F>(&self, name: impl Into<String>, func: F)
    where
        F: for<'a> Fn(&Selection<'a>, &[String]) -> Result<Value<'a>, FuncError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(name, Arc::new(func));
    }

    pub fn insert(&self, name: impl Into<String>, func: Func) {
        let mut funcs = self.funcs.write().unwrap_or_else(PoisonError::into_inner);
        funcs.insert(name.into(), func);
    }

    /// Look up `name`; the returned handle is called outside the lock
    pub fn get(&self, name: &str) -> Option<Func> {
        let funcs = self.funcs.read().unwrap_or_else(PoisonError::into_inner);
        funcs.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.funcs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let funcs = self.funcs.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = funcs.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;
    use std::thread;

    fn shout<'a>(node: &Selection<'a>, args: &[String]) -> Result<Value<'a>, FuncError> {
        let suffix = args.first().map(String::as_str).unwrap_or("!");
        Ok(Value::Str(format!("{}{}", node.text().trim().to_uppercase(), suffix)))
    }

    #[test]
    fn test_builtins_seeded() {
        let registry = FunctionRegistry::with_builtins();
        for name in ["text", "attrEmpty", "eachTextJoin", "parentsUntil", "textConcat", "absHref"] {
            assert!(registry.contains(name), "missing builtin {}", name);
        }
        assert!(FunctionRegistry::new().is_empty());
    }

    #[test]
    fn test_register_and_call() {
        let registry = FunctionRegistry::new();
        registry.register("shout", shout);

        let document = Html::parse_document("<p>hello</p>");
        let node = Selection::from_document(&document).find("p");
        let func = registry.get("shout").unwrap();
        let value = func(&node, &["?".to_string()]).unwrap();
        assert_eq!(value.as_str(), Some("HELLO?"));
        assert!(registry.get("whisper").is_none());
    }

    #[test]
    fn test_register_overwrites() {
        let registry = FunctionRegistry::with_builtins();
        let before = registry.len();
        registry.register("text", shout);
        assert_eq!(registry.len(), before);

        let document = Html::parse_document("<p>hi</p>");
        let node = Selection::from_document(&document).find("p");
        let value = registry.get("text").unwrap()(&node, &[]).unwrap();
        assert_eq!(value.as_str(), Some("HI!"));
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(FunctionRegistry::new());
        let builtin_names = FunctionRegistry::with_builtins().names();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let names = builtin_names.clone();
                thread::spawn(move || {
                    for _ in 0..10 {
                        for name in &names {
                            registry.register(name.clone(), shout);
                            assert!(registry.get(name).is_some());
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.names(), builtin_names);
    }
}
