//! The host-facing dynamic value.
//!
//! [`GenericValue`] is the small, loosely typed value set handed to the host application. Every
//! CIM value collapses into it: all integer widths widen to [`GenericValue::Int`], both real
//! widths to [`GenericValue::Float`], and everything textual or object-valued becomes a
//! [`GenericValue::Str`].
//!
//! Maps are [`BTreeMap`]s so the iteration order of a projected instance is deterministic.

use std::{collections::BTreeMap, fmt};

/// A name-keyed map of generic values.
pub type GenericMap = BTreeMap<String, GenericValue>;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenericValue {
    /// No value
    #[default]
    Void,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// String
    Str(String),
    /// Ordered list
    List(Vec<GenericValue>),
    /// String-keyed map
    Map(GenericMap),
}

impl GenericValue {
    /// Returns `true` for [`GenericValue::Void`].
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, GenericValue::Void)
    }

    /// The string content of a [`GenericValue::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GenericValue::Str(text) => Some(text),
            _ => None,
        }
    }

    /// The value of a [`GenericValue::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            GenericValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The value of a [`GenericValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GenericValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The elements of a [`GenericValue::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[GenericValue]> {
        match self {
            GenericValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// The entries of a [`GenericValue::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&GenericMap> {
        match self {
            GenericValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` in a [`GenericValue::Map`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GenericValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in argument errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            GenericValue::Void => "void",
            GenericValue::Bool(_) => "boolean",
            GenericValue::Int(_) => "integer",
            GenericValue::Float(_) => "float",
            GenericValue::Str(_) => "string",
            GenericValue::List(_) => "list",
            GenericValue::Map(_) => "map",
        }
    }
}

/// Renders the value the way a host scripting layer would print it.
///
/// Strings print bare at the top level and quoted inside lists and maps.
impl fmt::Display for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericValue::Str(text) => f.write_str(text),
            other => fmt_nested(f, other),
        }
    }
}

fn fmt_nested(f: &mut fmt::Formatter<'_>, value: &GenericValue) -> fmt::Result {
    match value {
        GenericValue::Void => f.write_str("nil"),
        GenericValue::Bool(value) => write!(f, "{}", value),
        GenericValue::Int(value) => write!(f, "{}", value),
        GenericValue::Float(value) => write!(f, "{:?}", value),
        GenericValue::Str(text) => crate::model::write_quoted(f, text),
        GenericValue::List(items) => {
            f.write_str("[")?;
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                fmt_nested(f, item)?;
            }
            f.write_str("]")
        }
        GenericValue::Map(map) => {
            f.write_str("$[")?;
            for (index, (key, item)) in map.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                crate::model::write_quoted(f, key)?;
                f.write_str(":")?;
                fmt_nested(f, item)?;
            }
            f.write_str("]")
        }
    }
}

impl From<bool> for GenericValue {
    fn from(value: bool) -> Self {
        GenericValue::Bool(value)
    }
}

impl From<i64> for GenericValue {
    fn from(value: i64) -> Self {
        GenericValue::Int(value)
    }
}

impl From<f64> for GenericValue {
    fn from(value: f64) -> Self {
        GenericValue::Float(value)
    }
}

impl From<String> for GenericValue {
    fn from(value: String) -> Self {
        GenericValue::Str(value)
    }
}

impl From<&str> for GenericValue {
    fn from(value: &str) -> Self {
        GenericValue::Str(value.to_string())
    }
}

impl From<Vec<GenericValue>> for GenericValue {
    fn from(items: Vec<GenericValue>) -> Self {
        GenericValue::List(items)
    }
}

impl From<GenericMap> for GenericValue {
    fn from(map: GenericMap) -> Self {
        GenericValue::Map(map)
    }
}
