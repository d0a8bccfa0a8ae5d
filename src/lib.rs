//! Declarative HTML extraction into typed structs
//!
//! Fields carry tag expressions of the form `selector->func(args)`:
//! - the selector is a CSS selector relative to the current node
//! - the optional call names a struct method, an enclosing struct's method,
//!   or a registered function
//! - selection results keep binding structurally; other values are cast
//!   into the field's type
//!
//! ```ignore
//! use tagbind::{bindable, Engine};
//!
//! #[derive(Debug, Default)]
//! struct Page {
//!     title: String,
//!     links: Vec<String>,
//! }
//!
//! bindable! {
//!     Page {
//!         title: "title",
//!         links: "a->eachAttr(href)",
//!     }
//! }
//!
//! let page: Page = Engine::new().extract(html)?;
//! ```

pub mod builtins;
pub mod cache;
pub mod cast;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod field;
pub mod registry;
pub mod selection;
pub mod value;

pub use cache::ExpressionCache;
pub use cast::{Castable, Kind};
pub use config::{Config, DEFAULT_FUNC_SYMBOL, DEFAULT_TAG_NAME, IGNORE_SYMBOL};
pub use engine::Engine;
pub use error::{BindError, CastError, FuncError, Result};
pub use expr::TagExpression;
pub use field::{
    Bindable, Field, FieldDescriptor, FieldVisitor, PointerField, ScalarField, Scope, Scopes, Shape,
    SliceField, StructField,
};
pub use registry::{Func, FunctionRegistry};
pub use selection::Selection;
pub use value::{FieldEffect, IntoOutput, MethodOutput, Value};
