//! Untyped results of extraction functions

use crate::selection::Selection;

/// Result of a builtin, registered function or struct method.
///
/// A `Node` result redirects binding to a new selection; anything else is a
/// terminal value cast into the field.
#[derive(Debug, Clone, Default)]
pub enum Value<'a> {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value<'a>>),
    Node(Selection<'a>),
}

impl<'a> Value<'a> {
    /// Short description used in cast errors and logs
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => format!("{:?}", s),
            Value::List(items) => format!("list of {}", items.len()),
            Value::Node(selection) => format!("selection of {}", selection.len()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to JSON as-is; selections become their trimmed text
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Node(selection) => {
                serde_json::Value::String(selection.text().trim().to_string())
            }
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value<'_> {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value<'_> {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value<'_> {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<String>> for Value<'_> {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into_iter().map(Value::Str).collect())
    }
}

impl<'a> From<Selection<'a>> for Value<'a> {
    fn from(selection: Selection<'a>) -> Self {
        Value::Node(selection)
    }
}

/// Request to also set a field of the struct being populated
#[derive(Debug, Clone)]
pub struct FieldEffect<'a> {
    pub field: String,
    pub value: Value<'a>,
}

/// What a struct method returns: a value plus optional sibling-field effects
#[derive(Debug, Clone, Default)]
pub struct MethodOutput<'a> {
    pub value: Value<'a>,
    pub effects: Vec<FieldEffect<'a>>,
}

impl<'a> MethodOutput<'a> {
    pub fn new(value: impl Into<Value<'a>>) -> Self {
        Self {
            value: value.into(),
            effects: Vec::new(),
        }
    }

    /// Also set `field` of the struct being populated to `value`.
    /// Applied after the method's own field is assigned.
    pub fn also_set(mut self, field: impl Into<String>, value: impl Into<Value<'a>>) -> Self {
        self.effects.push(FieldEffect {
            field: field.into(),
            value: value.into(),
        });
        self
    }
}

/// Types a struct method may return
pub trait IntoOutput<'a> {
    fn into_output(self) -> MethodOutput<'a>;
}

impl<'a> IntoOutput<'a> for MethodOutput<'a> {
    fn into_output(self) -> MethodOutput<'a> {
        self
    }
}

macro_rules! into_output_via_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'a> IntoOutput<'a> for $ty {
                fn into_output(self) -> MethodOutput<'a> {
                    MethodOutput::new(self)
                }
            }
        )*
    };
}

into_output_via_value!(Value<'a>, Selection<'a>, String, &str, bool, i64, usize, f64, Vec<String>);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json() {
        let value = Value::List(vec![
            Value::Int(1),
            Value::Str("a".to_string()),
            Value::Bool(true),
            Value::Float(1.5),
            Value::Null,
        ]);
        assert_eq!(value.to_json(), json!([1, "a", true, 1.5, null]));
    }

    #[test]
    fn test_method_output_effects() {
        let output = "main".into_output();
        assert_eq!(output.value.as_str(), Some("main"));
        assert!(output.effects.is_empty());

        let output = MethodOutput::new("main").also_set("other", 3i64);
        assert_eq!(output.effects.len(), 1);
        assert_eq!(output.effects[0].field, "other");
        assert!(matches!(output.effects[0].value, Value::Int(3)));
    }
}
