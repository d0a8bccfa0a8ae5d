//! The binding engine
//!
//! Walks a target struct's fields in declaration order. For each tagged
//! field the expression is parsed (through the cache), the selector is
//! applied relative to the current node, and the optional function is
//! resolved and invoked. Selection results keep binding structurally;
//! anything else is cast into the field.
//!
//! Function names resolve against, in order: methods of the struct being
//! populated, methods of enclosing structs from nearest to outermost, then
//! the registry.

use std::io::Read;

use scraper::Html;
use tracing::{debug, warn};

use crate::cache::ExpressionCache;
use crate::config::{Config, IGNORE_SYMBOL};
use crate::error::{BindError, CastError, FuncError, Result};
use crate::expr::TagExpression;
use crate::field::{
    assign_value, reset_shape, Bindable, Field, FieldVisitor, Scope, Scopes, Shape, StructField,
};
use crate::registry::FunctionRegistry;
use crate::selection::Selection;
use crate::value::{FieldEffect, MethodOutput, Value};

/// Binds HTML into [`Bindable`] structs.
///
/// An engine is immutable apart from its expression cache and function
/// registry, both of which are safe to use from many threads at once.
#[derive(Debug)]
pub struct Engine {
    config: Config,
    cache: ExpressionCache,
    registry: FunctionRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the default config and every builtin registered
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            cache: ExpressionCache::new(),
            registry: FunctionRegistry::with_builtins(),
        }
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &ExpressionCache {
        &self.cache
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Register or overwrite a global function usable from any tag
    pub fn register_func<F>(&self, name: impl Into<String>, func: F)
    where
        F: for<'a> Fn(&Selection<'a>, &[String]) -> std::result::Result<Value<'a>, FuncError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register(name, func);
    }

    /// Parse `html` and bind it into `target`.
    ///
    /// `target` must be a struct, or an allocated `Option`/`Box` of one.
    pub fn parse<T: Field + ?Sized>(&self, target: &mut T, html: &str) -> Result<()> {
        let slot = struct_target(target.shape(), std::any::type_name::<T>())?;
        let document = Html::parse_document(html);
        slot.bind(self, &Selection::from_document(&document), None)
    }

    /// Read an HTML document from `reader` and bind it into `target`.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn parse_reader<T, R>(&self, target: &mut T, mut reader: R) -> Result<()>
    where
        T: Field + ?Sized,
        R: Read,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse(target, &String::from_utf8_lossy(&bytes))
    }

    /// Bind an already parsed document
    pub fn parse_document<T: Field + ?Sized>(&self, target: &mut T, document: &Html) -> Result<()> {
        self.parse_selection(target, &Selection::from_document(document))
    }

    /// Bind relative to `selection` instead of the document root
    pub fn parse_selection<T: Field + ?Sized>(
        &self,
        target: &mut T,
        selection: &Selection<'_>,
    ) -> Result<()> {
        let slot = struct_target(target.shape(), std::any::type_name::<T>())?;
        slot.bind(self, selection, None)
    }

    /// Parse `html` into a fresh `T`
    pub fn extract<T: Bindable>(&self, html: &str) -> Result<T> {
        let mut target = T::default();
        let document = Html::parse_document(html);
        self.bind_struct(&mut target, &Selection::from_document(&document), None)?;
        Ok(target)
    }

    /// Bind every tagged field of `target` relative to `node`
    pub(crate) fn bind_struct<T: Bindable>(
        &self,
        target: &mut T,
        node: &Selection<'_>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<()> {
        for descriptor in T::fields() {
            let Some(raw) = descriptor.tag(&self.config.tag_name) else {
                if self.config.debug {
                    debug!(
                        "{}.{}: no `{}` tag, skipping",
                        std::any::type_name::<T>(),
                        descriptor.name,
                        self.config.tag_name
                    );
                }
                continue;
            };
            if raw.trim() == IGNORE_SYMBOL {
                continue;
            }

            self.bind_field(target, descriptor.name, raw, node, parents)
                .map_err(|e| e.in_tag(raw))?;
        }
        Ok(())
    }

    fn bind_field<T: Bindable>(
        &self,
        target: &mut T,
        name: &str,
        raw: &str,
        node: &Selection<'_>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<()> {
        let expr = self.cache.get_or_parse(raw, &self.config.func_symbol)?;

        let mut sub = if expr.selector.is_empty() {
            node.clone()
        } else {
            node.find(&expr.selector)
        };

        let mut effects = Vec::new();
        if expr.has_call() {
            let output = self.call(&expr, &*target, &sub, parents)?;
            effects = output.effects;
            match output.value {
                Value::Node(next) => sub = next,
                value => {
                    visit_field(target, name, &mut |slot, _| self.assign(slot, &value))?;
                    return self.apply_effects(target, effects);
                }
            }
        }

        visit_field(target, name, &mut |slot, own| {
            let scopes = Scopes::new(own, parents);
            self.bind_shape(slot.shape(), &sub, Some(&scopes))
        })?;
        self.apply_effects(target, effects)
    }

    /// Resolve and invoke the function named by `expr`
    fn call<'a>(
        &self,
        expr: &TagExpression,
        own: &dyn Scope,
        node: &Selection<'a>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<MethodOutput<'a>> {
        let name = expr.func_name.as_str();
        let failed = |source: FuncError| BindError::FunctionExecution {
            name: name.to_string(),
            source,
        };

        if let Some(result) = own.call_method(name, node) {
            return result.map_err(failed);
        }

        for scope in parents.into_iter().flat_map(|scopes| scopes.iter()) {
            if let Some(result) = scope.call_method(name, node) {
                let mut output = result.map_err(failed)?;
                if !output.effects.is_empty() {
                    warn!(
                        "{}() resolved on an enclosing struct, ignoring {} field effect(s)",
                        name,
                        output.effects.len()
                    );
                    output.effects.clear();
                }
                return Ok(output);
            }
        }

        let func = self
            .registry
            .get(name)
            .ok_or_else(|| BindError::FunctionNotFound(name.to_string()))?;
        func(node, &expr.func_args).map(MethodOutput::new).map_err(failed)
    }

    /// Fill `shape` from `node`: text for scalars, one element per node for
    /// vectors, recursive binding for structs
    pub(crate) fn bind_shape(
        &self,
        shape: Shape<'_>,
        node: &Selection<'_>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<()> {
        match shape {
            Shape::Scalar(slot) => {
                let text = Value::Str(node.text().trim().to_string());
                match slot.assign(&text) {
                    Ok(()) => Ok(()),
                    Err(err) => self.cast_failed(err, || slot.reset()),
                }
            }
            Shape::Struct(slot) => slot.bind(self, node, parents),
            Shape::Slice(slot) => slot.bind_each(self, node, parents),
            Shape::Pointer(slot) => self.bind_shape(slot.pointee(), node, parents),
        }
    }

    /// Cast a terminal value into `slot` under the configured cast policy
    fn assign(&self, slot: &mut dyn Field, value: &Value<'_>) -> Result<()> {
        match assign_value(slot.shape(), value) {
            Ok(()) => Ok(()),
            Err(err) => self.cast_failed(err, || reset_shape(slot.shape())),
        }
    }

    /// Strict mode fails the bind; lenient mode zeroes the field
    fn cast_failed(&self, err: CastError, reset: impl FnOnce()) -> Result<()> {
        if self.config.cast_error {
            return Err(err.into());
        }
        if self.config.debug {
            debug!("{}, using zero value", err);
        }
        reset();
        Ok(())
    }

    fn apply_effects<T: Bindable>(
        &self,
        target: &mut T,
        effects: Vec<FieldEffect<'_>>,
    ) -> Result<()> {
        for effect in effects {
            visit_field(target, &effect.field, &mut |slot, _| {
                self.assign(slot, &effect.value)
            })?;
        }
        Ok(())
    }
}

fn visit_field<T: Bindable>(
    target: &mut T,
    name: &str,
    visit: &mut FieldVisitor<'_>,
) -> Result<()> {
    target.with_field(name, visit).unwrap_or_else(|| {
        Err(BindError::UnknownField {
            ty: std::any::type_name::<T>(),
            field: name.to_string(),
        })
    })
}

/// The struct behind a bind target
fn struct_target<'f>(shape: Shape<'f>, ty: &str) -> Result<&'f mut dyn StructField> {
    match shape {
        Shape::Struct(slot) => Ok(slot),
        Shape::Pointer(slot) if slot.is_null() => {
            Err(BindError::InvalidTarget(format!("{} is nil", ty)))
        }
        Shape::Pointer(slot) => struct_target(slot.pointee(), ty),
        Shape::Scalar(_) | Shape::Slice(_) => {
            Err(BindError::InvalidTarget(format!("{} is not a struct", ty)))
        }
    }
}
