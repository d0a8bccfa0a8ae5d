//! Value casting
//!
//! Converts untyped [`Value`]s into a field's static type using a permissive
//! "best representation" conversion: numeric strings become numbers,
//! boolean-ish strings become bools, numbers format as decimal strings.

use crate::error::CastError;
use crate::value::Value;

/// Broad category of a scalar target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Signed,
    Unsigned,
    Float,
    String,
    /// Unrecognized target; the value is kept as-is
    Any,
}

/// Scalar types a value can be cast into
pub trait Castable: Sized + Default {
    const KIND: Kind;
    /// Type name used in error messages
    const NAME: &'static str;

    fn cast(value: &Value<'_>) -> Result<Self, CastError>;
}

/// Cast `value` into `T`, failing with a [`CastError`].
pub fn cast<T: Castable>(value: &Value<'_>) -> Result<T, CastError> {
    T::cast(value)
}

/// Cast `value` into `T`, returning `T::default()` on failure.
pub fn cast_or_default<T: Castable>(value: &Value<'_>) -> T {
    T::cast(value).unwrap_or_default()
}

/// Items of a sequence-valued result, ready for pointwise casting.
///
/// Lists pass through; a string cast into a string sequence splits on
/// whitespace; null is an empty sequence.
pub fn list_items<'v, 'a>(
    value: &'v Value<'a>,
    element: Kind,
    target: &'static str,
) -> Result<Vec<Value<'a>>, CastError> {
    match value {
        Value::List(items) => Ok(items.clone()),
        Value::Null => Ok(Vec::new()),
        Value::Str(s) if element == Kind::String => {
            Ok(s.split_whitespace().map(Value::from).collect())
        }
        other if element == Kind::Any => Ok(vec![other.clone()]),
        other => Err(CastError::new(other.describe(), target, "not a sequence")),
    }
}

fn err(value: &Value<'_>, target: &'static str, reason: impl Into<String>) -> CastError {
    CastError::new(value.describe(), target, reason)
}

pub fn to_bool(value: &Value<'_>) -> Result<bool, CastError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Null => Ok(false),
        Value::Str(s) => match s.trim() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(err(value, "bool", "not a boolean")),
        },
        _ => Err(err(value, "bool", "unsupported value")),
    }
}

/// Drop a fractional part made only of zeros: `12.00` -> `12`
fn trim_zero_decimal(s: &str) -> &str {
    match s.split_once('.') {
        Some((int, frac)) if !int.is_empty() && frac.chars().all(|c| c == '0') => int,
        _ => s,
    }
}

/// Parse a signed decimal or `0x` hex integer into a wide intermediate
fn parse_integer(s: &str) -> Result<i128, String> {
    let s = trim_zero_decimal(s.trim());
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    }
    .map_err(|e| e.to_string())?;

    let magnitude = i128::from(magnitude);
    Ok(if negative { -magnitude } else { magnitude })
}

fn to_integer(value: &Value<'_>, target: &'static str) -> Result<i128, CastError> {
    match value {
        Value::Int(i) => Ok(i128::from(*i)),
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i128),
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Null => Ok(0),
        Value::Str(s) => parse_integer(s).map_err(|reason| err(value, target, reason)),
        _ => Err(err(value, target, "unsupported value")),
    }
}

pub fn to_i64(value: &Value<'_>) -> Result<i64, CastError> {
    let wide = to_integer(value, "i64")?;
    i64::try_from(wide).map_err(|_| err(value, "i64", "out of range"))
}

pub fn to_u64(value: &Value<'_>) -> Result<u64, CastError> {
    let wide = to_integer(value, "u64")?;
    if wide < 0 {
        return Err(err(value, "u64", "negative value"));
    }
    u64::try_from(wide).map_err(|_| err(value, "u64", "out of range"))
}

pub fn to_f64(value: &Value<'_>) -> Result<f64, CastError> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Int(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Ok(0.0),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| err(value, "f64", e.to_string())),
        _ => Err(err(value, "f64", "unsupported value")),
    }
}

pub fn to_string(value: &Value<'_>) -> Result<String, CastError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(err(value, "String", "unsupported value")),
    }
}

impl Castable for bool {
    const KIND: Kind = Kind::Bool;
    const NAME: &'static str = "bool";

    fn cast(value: &Value<'_>) -> Result<Self, CastError> {
        to_bool(value)
    }
}

impl Castable for String {
    const KIND: Kind = Kind::String;
    const NAME: &'static str = "String";

    fn cast(value: &Value<'_>) -> Result<Self, CastError> {
        to_string(value)
    }
}

impl Castable for f64 {
    const KIND: Kind = Kind::Float;
    const NAME: &'static str = "f64";

    fn cast(value: &Value<'_>) -> Result<Self, CastError> {
        to_f64(value)
    }
}

impl Castable for f32 {
    const KIND: Kind = Kind::Float;
    const NAME: &'static str = "f32";

    fn cast(value: &Value<'_>) -> Result<Self, CastError> {
        to_f64(value).map(|f| f as f32)
    }
}

impl Castable for serde_json::Value {
    const KIND: Kind = Kind::Any;
    const NAME: &'static str = "serde_json::Value";

    fn cast(value: &Value<'_>) -> Result<Self, CastError> {
        Ok(value.to_json())
    }
}

macro_rules! castable_integer {
    ($convert:ident, $kind:expr, $($ty:ty),*) => {
        $(
            impl Castable for $ty {
                const KIND: Kind = $kind;
                const NAME: &'static str = stringify!($ty);

                fn cast(value: &Value<'_>) -> Result<Self, CastError> {
                    let wide = $convert(value)?;
                    <$ty>::try_from(wide).map_err(|_| err(value, Self::NAME, "out of range"))
                }
            }
        )*
    };
}

castable_integer!(to_i64, Kind::Signed, i8, i16, i32, i64, isize);
castable_integer!(to_u64, Kind::Unsigned, u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value<'static> {
        Value::Str(text.to_string())
    }

    #[test]
    fn test_bool() {
        assert!(cast::<bool>(&s("true")).unwrap());
        assert!(cast::<bool>(&s(" T ")).unwrap());
        assert!(!cast::<bool>(&s("0")).unwrap());
        assert!(cast::<bool>(&Value::Int(3)).unwrap());
        assert!(!cast::<bool>(&Value::Null).unwrap());
        assert!(cast::<bool>(&s("yes")).is_err());
        assert!(!cast_or_default::<bool>(&s("yes")));
    }

    #[test]
    fn test_integers() {
        assert_eq!(cast::<i32>(&s("12345")).unwrap(), 12345);
        assert_eq!(cast::<i64>(&s("-1")).unwrap(), -1);
        assert_eq!(cast::<i64>(&s(" +7 ")).unwrap(), 7);
        assert_eq!(cast::<i64>(&s("0x1F")).unwrap(), 31);
        assert_eq!(cast::<i64>(&s("42.000")).unwrap(), 42);
        assert_eq!(cast::<u32>(&s("4")).unwrap(), 4);
        assert_eq!(cast::<i64>(&Value::Float(9.9)).unwrap(), 9);
        assert_eq!(cast::<u8>(&Value::Bool(true)).unwrap(), 1);
        assert_eq!(cast::<isize>(&Value::Null).unwrap(), 0);

        assert!(cast::<i64>(&s("12.5")).is_err());
        assert!(cast::<i64>(&s("")).is_err());
        assert!(cast::<u64>(&s("-1")).is_err());
        assert!(cast::<i8>(&s("300")).is_err());
        assert_eq!(cast_or_default::<i8>(&s("300")), 0);
        assert_eq!(cast::<i64>(&s("-9223372036854775808")).unwrap(), i64::MIN);
    }

    #[test]
    fn test_floats() {
        assert_eq!(cast::<f64>(&s("123.45")).unwrap(), 123.45);
        assert_eq!(cast::<f32>(&s("678.90")).unwrap(), 678.9f32);
        assert_eq!(cast::<f64>(&Value::Int(2)).unwrap(), 2.0);
        assert!(cast::<f64>(&s("abc")).is_err());
    }

    #[test]
    fn test_string() {
        assert_eq!(cast::<String>(&Value::Int(-12)).unwrap(), "-12");
        assert_eq!(cast::<String>(&Value::Float(678.9)).unwrap(), "678.9");
        assert_eq!(cast::<String>(&Value::Bool(false)).unwrap(), "false");
        assert_eq!(cast::<String>(&Value::Null).unwrap(), "");
        assert!(cast::<String>(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_integer_round_trip() {
        for text in ["0", "7", "-15", "12345", "9223372036854775807"] {
            let n = cast::<i64>(&s(text)).unwrap();
            assert_eq!(cast::<String>(&Value::Int(n)).unwrap(), text);
        }
    }

    #[test]
    fn test_list_items() {
        let list = Value::List(vec![s("1"), s("2")]);
        assert_eq!(list_items(&list, Kind::Signed, "Vec<i32>").unwrap().len(), 2);

        let words = list_items(&s("a b  c"), Kind::String, "Vec<String>").unwrap();
        let words: Vec<String> = words.iter().map(|v| cast::<String>(v).unwrap()).collect();
        assert_eq!(words, vec!["a", "b", "c"]);

        assert!(list_items(&Value::Null, Kind::Bool, "Vec<bool>").unwrap().is_empty());
        assert!(list_items(&s("1"), Kind::Signed, "Vec<i64>").is_err());
    }

    #[test]
    fn test_passthrough() {
        let value = Value::List(vec![Value::Int(1), s("x")]);
        assert_eq!(cast::<serde_json::Value>(&value).unwrap(), serde_json::json!([1, "x"]));
    }
}
