//! Field shapes and struct descriptors
//!
//! Rust has no runtime reflection, so every bind target describes itself:
//! scalars, vectors and optional/boxed values implement [`Field`] here, and
//! structs implement [`Bindable`] through the [`bindable!`](crate::bindable)
//! macro, which emits a static table of field names and tags plus a method
//! table used for function resolution.

use crate::cast::{self, Castable, Kind};
use crate::engine::Engine;
use crate::error::{CastError, FuncError, Result};
use crate::selection::Selection;
use crate::value::{MethodOutput, Value};

/// How the binder treats a target value
pub enum Shape<'f> {
    Scalar(&'f mut dyn ScalarField),
    Struct(&'f mut dyn StructField),
    Slice(&'f mut dyn SliceField),
    Pointer(&'f mut dyn PointerField),
}

/// Anything the binder can fill
pub trait Field {
    fn shape(&mut self) -> Shape<'_>;
}

pub trait ScalarField {
    fn kind(&self) -> Kind;
    fn type_name(&self) -> &'static str;
    /// Overwrite with `value`; unchanged on error
    fn assign(&mut self, value: &Value<'_>) -> Result<(), CastError>;
    fn reset(&mut self);
}

pub trait StructField {
    fn type_name(&self) -> &'static str;
    fn bind(
        &mut self,
        engine: &Engine,
        node: &Selection<'_>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<()>;
}

pub trait SliceField {
    fn type_name(&self) -> &'static str;
    /// One element per node of the selection, in document order
    fn bind_each(
        &mut self,
        engine: &Engine,
        node: &Selection<'_>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<()>;
    /// Pointwise cast of a sequence value; unchanged on error
    fn assign(&mut self, value: &Value<'_>) -> Result<(), CastError>;
    fn reset(&mut self);
}

pub trait PointerField {
    fn is_null(&self) -> bool;
    /// The pointee, allocated with its default when absent
    fn pointee(&mut self) -> Shape<'_>;
}

/// Method lookup on a struct value taking part in a bind
pub trait Scope {
    /// Invoke the method `name` if this type declares it
    fn call_method<'a>(
        &self,
        name: &str,
        node: &Selection<'a>,
    ) -> Option<std::result::Result<MethodOutput<'a>, FuncError>>;
}

/// Static description of one struct field
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// `(tag name, raw tag)` pairs
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    /// Raw tag under `tag_name`, if the field declares one
    pub fn tag(&self, tag_name: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(name, _)| *name == tag_name)
            .map(|(_, raw)| *raw)
    }
}

/// Callback receiving a detached field and the struct it belongs to
pub type FieldVisitor<'v> = dyn FnMut(&mut dyn Field, &dyn Scope) -> Result<()> + 'v;

/// A struct whose fields are bound from tags. Implement with [`bindable!`](crate::bindable).
pub trait Bindable: Scope + Default {
    /// Fields in declaration order
    fn fields() -> &'static [FieldDescriptor];

    /// Run `visit` on the field `name`, passing the rest of the struct as a scope.
    /// Returns `None` if there is no such field.
    fn with_field(&mut self, name: &str, visit: &mut FieldVisitor<'_>) -> Option<Result<()>>;
}

/// Enclosing struct values of the current bind, innermost first
#[derive(Clone, Copy)]
pub struct Scopes<'s> {
    scope: &'s dyn Scope,
    parent: Option<&'s Scopes<'s>>,
}

impl<'s> Scopes<'s> {
    pub fn new(scope: &'s dyn Scope, parent: Option<&'s Scopes<'s>>) -> Self {
        Self { scope, parent }
    }

    pub fn iter(&'s self) -> impl Iterator<Item = &'s dyn Scope> + 's {
        std::iter::successors(Some(self), |scopes| scopes.parent).map(|scopes| scopes.scope)
    }
}

impl<T: Castable> ScalarField for T {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn assign(&mut self, value: &Value<'_>) -> Result<(), CastError> {
        *self = T::cast(value)?;
        Ok(())
    }

    fn reset(&mut self) {
        *self = T::default();
    }
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Scalar(self)
                }
            }
        )*
    };
}

scalar_field!(
    bool,
    String,
    f32,
    f64,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    serde_json::Value,
);

impl<T: Bindable> StructField for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn bind(
        &mut self,
        engine: &Engine,
        node: &Selection<'_>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<()> {
        engine.bind_struct(self, node, parents)
    }
}

/// Scalar kind at the bottom of a shape, looking through pointers
fn scalar_kind(shape: Shape<'_>) -> Option<Kind> {
    match shape {
        Shape::Scalar(slot) => Some(slot.kind()),
        Shape::Pointer(slot) => scalar_kind(slot.pointee()),
        Shape::Struct(_) | Shape::Slice(_) => None,
    }
}

/// Cast a terminal value into whatever `shape` holds
pub(crate) fn assign_value(shape: Shape<'_>, value: &Value<'_>) -> Result<(), CastError> {
    match shape {
        Shape::Scalar(slot) => slot.assign(value),
        Shape::Slice(slot) => slot.assign(value),
        Shape::Pointer(slot) => assign_value(slot.pointee(), value),
        Shape::Struct(slot) => Err(CastError::new(
            value.describe(),
            slot.type_name(),
            "cannot assign a value to a struct",
        )),
    }
}

/// Restore the zero value after a lenient cast failure
pub(crate) fn reset_shape(shape: Shape<'_>) {
    match shape {
        Shape::Scalar(slot) => slot.reset(),
        Shape::Slice(slot) => slot.reset(),
        Shape::Pointer(slot) => reset_shape(slot.pointee()),
        Shape::Struct(_) => {}
    }
}

impl<T: Field + Default> SliceField for Vec<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn bind_each(
        &mut self,
        engine: &Engine,
        node: &Selection<'_>,
        parents: Option<&Scopes<'_>>,
    ) -> Result<()> {
        let mut items = Vec::with_capacity(node.len());
        for element in node.iter() {
            let mut item = T::default();
            engine.bind_shape(item.shape(), &element, parents)?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }

    fn assign(&mut self, value: &Value<'_>) -> Result<(), CastError> {
        let target = self.type_name();
        let element = scalar_kind(T::default().shape())
            .ok_or_else(|| CastError::new(value.describe(), target, "elements are not scalar"))?;

        let sources = cast::list_items(value, element, target)?;
        let mut items = Vec::with_capacity(sources.len());
        for source in &sources {
            let mut item = T::default();
            assign_value(item.shape(), source)?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Slice(self)
    }
}

impl<T: Field + Default> PointerField for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn pointee(&mut self) -> Shape<'_> {
        self.get_or_insert_with(T::default).shape()
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Pointer(self)
    }
}

impl<T: Field> PointerField for Box<T> {
    fn is_null(&self) -> bool {
        false
    }

    fn pointee(&mut self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: Field> Field for Box<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Pointer(self)
    }
}

/// Implement [`Bindable`] for a struct from a list of field tags and methods.
///
/// ```ignore
/// #[derive(Debug, Default)]
/// struct Link {
///     name: String,
///     url: String,
///     note: String,
/// }
///
/// bindable! {
///     Link {
///         name: "->text()",
///         url: { tagbind = "->attr(href)", alt = "->absHref('https://example.com')" },
///         note,
///     }
///     methods {
///         "Shout" => shout,
///     }
/// }
/// ```
///
/// A bare string tag is stored under [`DEFAULT_TAG_NAME`](crate::DEFAULT_TAG_NAME).
/// Fields listed without a tag are skipped by the binder but can still be
/// set through method effects. Methods have the signature
/// `fn(&self, &Selection<'a>) -> Result<impl IntoOutput<'a>, impl Into<FuncError>>`.
#[macro_export]
macro_rules! bindable {
    (@tags) => {
        &[]
    };
    (@tags $raw:literal) => {
        &[($crate::DEFAULT_TAG_NAME, $raw)]
    };
    (@tags { $( $name:ident = $raw:literal ),* $(,)? }) => {
        &[ $( (stringify!($name), $raw) ),* ]
    };
    (
        $ty:ident {
            $( $field:ident $( : $tag:tt )? ),* $(,)?
        }
        $( methods { $( $fname:literal => $method:ident ),* $(,)? } )?
    ) => {
        impl $crate::Field for $ty {
            fn shape(&mut self) -> $crate::Shape<'_> {
                $crate::Shape::Struct(self)
            }
        }

        impl $crate::Scope for $ty {
            #[allow(unused_variables)]
            fn call_method<'a>(
                &self,
                name: &str,
                node: &$crate::Selection<'a>,
            ) -> ::std::option::Option<
                ::std::result::Result<$crate::MethodOutput<'a>, $crate::FuncError>,
            > {
                match name {
                    $($(
                        $fname => ::std::option::Option::Some(
                            self.$method(node)
                                .map(|out| $crate::IntoOutput::into_output(out))
                                .map_err(::std::convert::Into::into),
                        ),
                    )*)?
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl $crate::Bindable for $ty {
            fn fields() -> &'static [$crate::FieldDescriptor] {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::FieldDescriptor {
                            name: stringify!($field),
                            tags: $crate::bindable!(@tags $( $tag )?),
                        },
                    )*
                ];
                FIELDS
            }

            #[allow(unused_variables)]
            fn with_field(
                &mut self,
                name: &str,
                visit: &mut $crate::FieldVisitor<'_>,
            ) -> ::std::option::Option<$crate::Result<()>> {
                match name {
                    $(
                        stringify!($field) => {
                            let mut value = ::std::mem::take(&mut self.$field);
                            let result = visit(&mut value, &*self);
                            self.$field = value;
                            ::std::option::Option::Some(result)
                        }
                    )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Article {
        title: String,
        count: i32,
        skipped: String,
    }

    crate::bindable! {
        Article {
            title: "h1",
            count: { tagbind = "->size()", other = "->attr(n)" },
            skipped,
        }
    }

    #[test]
    fn test_descriptor_table() {
        let fields = Article::fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "title");
        assert_eq!(fields[0].tag("tagbind"), Some("h1"));
        assert_eq!(fields[1].tag("other"), Some("->attr(n)"));
        assert_eq!(fields[2].tag("tagbind"), None);
    }

    #[test]
    fn test_with_field_detaches_value() {
        let mut article = Article {
            title: "before".to_string(),
            ..Article::default()
        };

        let result = article.with_field("title", &mut |field, _scope| {
            let Shape::Scalar(slot) = field.shape() else {
                panic!("title should be scalar");
            };
            slot.assign(&Value::Str("after".to_string()))?;
            Ok(())
        });
        assert!(matches!(result, Some(Ok(()))));
        assert_eq!(article.title, "after");
        assert!(article.with_field("nope", &mut |_, _| Ok(())).is_none());
    }

    #[test]
    fn test_slice_assign_pointwise() {
        let mut numbers: Vec<i64> = Vec::new();
        let value = Value::List(vec![Value::from("1"), Value::from("-2")]);
        assign_value(numbers.shape(), &value).unwrap();
        assert_eq!(numbers, vec![1, -2]);

        let bad = Value::List(vec![Value::from("x")]);
        assert!(assign_value(numbers.shape(), &bad).is_err());
        assert_eq!(numbers, vec![1, -2]);

        reset_shape(numbers.shape());
        assert!(numbers.is_empty());
    }

    #[test]
    fn test_pointer_allocates() {
        let mut value: Option<Box<u32>> = None;
        assert!(matches!(value.shape(), Shape::Pointer(p) if p.is_null()));
        assign_value(value.shape(), &Value::from("7")).unwrap();
        assert_eq!(value.as_deref(), Some(&7));
    }

    #[test]
    fn test_struct_rejects_terminal_value() {
        let mut article = Article::default();
        assert!(assign_value(article.shape(), &Value::from("x")).is_err());
    }
}
