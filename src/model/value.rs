//! Tagged CIM values.
//!
//! A [`CimValue`] is what a broker attaches to a property, a qualifier or an object path key:
//! either nothing ([`CimValue::Null`]), a single typed element ([`CimValue::Scalar`]) or an
//! ordered array of elements of one kind ([`CimValue::Array`]). Array-ness is orthogonal to the
//! element kind, every [`CimScalar`] variant can appear in both shapes.
//!
//! Elements whose data type the broker reported but this layer does not know are carried as
//! [`CimScalar::Opaque`] so a transport never has to drop a response because of one odd value.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::model::{CimScalar, CimType, CimValue};
//!
//! let ports = CimValue::array(vec![CimScalar::UInt16(22), CimScalar::UInt16(443)])?;
//! assert!(ports.is_array());
//! assert_eq!(ports.cim_type(), Some(CimType::UInt16));
//!
//! // mixed kinds are rejected
//! assert!(CimValue::array(vec![CimScalar::UInt16(22), CimScalar::Boolean(true)]).is_err());
//! # Ok::<(), cimscope::Error>(())
//! ```

use std::{fmt, mem};

use crate::{
    model::{CimClass, CimInstance, CimType, ObjectPath},
    Error, Result,
};

/// Length of a DMTF datetime string (`yyyymmddhhmmss.mmmmmmsutc`).
const DMTF_DATETIME_LEN: usize = 25;

/// A CIM `datetime` value kept in its textual form.
///
/// The value is never reinterpreted: the codec hands the exact text received from the broker
/// to the host. [`CimDateTime::parse`] validates the DMTF layout, either a timestamp
/// (`yyyymmddhhmmss.mmmmmm+utc`) or an interval (`ddddddddhhmmss.mmmmmm:000`). Positions may use
/// `*` as a wildcard as DSP0004 allows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CimDateTime(String);

impl CimDateTime {
    /// Validates and wraps a DMTF datetime string.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if the text is not a DMTF timestamp or interval.
    pub fn parse(text: &str) -> Result<Self> {
        let mismatch = || Error::TypeMismatch {
            expected: CimType::DateTime,
            found: format!("'{}'", text),
        };

        let bytes = text.as_bytes();
        if bytes.len() != DMTF_DATETIME_LEN || bytes[14] != b'.' {
            return Err(mismatch());
        }

        let is_field = |b: &u8| b.is_ascii_digit() || *b == b'*';
        if !bytes[..14].iter().all(is_field) || !bytes[15..21].iter().all(is_field) {
            return Err(mismatch());
        }

        match bytes[21] {
            b'+' | b'-' if bytes[22..].iter().all(is_field) => {}
            b':' if &bytes[22..] == b"000" => {}
            _ => return Err(mismatch()),
        }

        Ok(CimDateTime(text.to_string()))
    }

    /// Wraps datetime text without validation.
    ///
    /// Used by transports whose brokers render datetimes in a non-DMTF form (e.g. ISO 8601 over
    /// WS-Management); the text is still passed through verbatim.
    #[must_use]
    pub fn from_raw(text: impl Into<String>) -> Self {
        CimDateTime(text.into())
    }

    /// The datetime text exactly as received.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is a DMTF interval rather than a timestamp.
    #[must_use]
    pub fn is_interval(&self) -> bool {
        self.0.len() == DMTF_DATETIME_LEN && self.0.as_bytes()[21] == b':'
    }
}

impl fmt::Display for CimDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single typed CIM element.
#[derive(Debug, Clone, PartialEq)]
pub enum CimScalar {
    /// `boolean`
    Boolean(bool),
    /// `uint8`
    UInt8(u8),
    /// `sint8`
    SInt8(i8),
    /// `uint16`
    UInt16(u16),
    /// `sint16`
    SInt16(i16),
    /// `uint32`
    UInt32(u32),
    /// `sint32`
    SInt32(i32),
    /// `uint64`
    UInt64(u64),
    /// `sint64`
    SInt64(i64),
    /// `real32`
    Real32(f32),
    /// `real64`
    Real64(f64),
    /// `char16`, one UCS-2 code unit
    Char16(u16),
    /// `string`
    String(String),
    /// `datetime`
    DateTime(CimDateTime),
    /// `reference`
    Reference(ObjectPath),
    /// `embeddedclass`
    EmbeddedClass(Box<CimClass>),
    /// `embeddedinstance`
    EmbeddedInstance(Box<CimInstance>),
    /// A value of a data type this layer does not know.
    Opaque {
        /// The type name reported by the broker
        type_name: String,
        /// The value text reported by the broker
        text: String,
    },
}

impl CimScalar {
    /// The CIM data type of this element, `None` for [`CimScalar::Opaque`].
    #[must_use]
    pub fn cim_type(&self) -> Option<CimType> {
        Some(match self {
            CimScalar::Boolean(_) => CimType::Boolean,
            CimScalar::UInt8(_) => CimType::UInt8,
            CimScalar::SInt8(_) => CimType::SInt8,
            CimScalar::UInt16(_) => CimType::UInt16,
            CimScalar::SInt16(_) => CimType::SInt16,
            CimScalar::UInt32(_) => CimType::UInt32,
            CimScalar::SInt32(_) => CimType::SInt32,
            CimScalar::UInt64(_) => CimType::UInt64,
            CimScalar::SInt64(_) => CimType::SInt64,
            CimScalar::Real32(_) => CimType::Real32,
            CimScalar::Real64(_) => CimType::Real64,
            CimScalar::Char16(_) => CimType::Char16,
            CimScalar::String(_) => CimType::String,
            CimScalar::DateTime(_) => CimType::DateTime,
            CimScalar::Reference(_) => CimType::Reference,
            CimScalar::EmbeddedClass(_) => CimType::EmbeddedClass,
            CimScalar::EmbeddedInstance(_) => CimType::EmbeddedInstance,
            CimScalar::Opaque { .. } => return None,
        })
    }

    /// The type name of this element as the broker would spell it.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            CimScalar::Opaque { type_name, .. } => type_name.clone(),
            other => other
                .cim_type()
                .map(|kind| kind.to_string())
                .unwrap_or_default(),
        }
    }

    /// Returns `true` if both elements are of the same kind.
    #[must_use]
    pub fn same_kind(&self, other: &CimScalar) -> bool {
        match (self, other) {
            (CimScalar::Opaque { type_name: a, .. }, CimScalar::Opaque { type_name: b, .. }) => {
                a.eq_ignore_ascii_case(b)
            }
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }

    /// Writes this element as a MOF literal.
    ///
    /// Strings, datetimes, references and embedded objects are double quoted with `\` and `"`
    /// escaped, `char16` is single quoted, booleans are `TRUE`/`FALSE`.
    pub(crate) fn fmt_mof(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CimScalar::Boolean(value) => f.write_str(if *value { "TRUE" } else { "FALSE" }),
            CimScalar::Char16(unit) => {
                write!(
                    f,
                    "'{}'",
                    char::from_u32(u32::from(*unit)).unwrap_or('\u{FFFD}')
                )
            }
            CimScalar::String(text) => write_quoted(f, text),
            CimScalar::DateTime(datetime) => write_quoted(f, datetime.as_str()),
            CimScalar::Reference(path) => write_quoted(f, &path.to_string()),
            CimScalar::EmbeddedClass(class) => write_quoted(f, &class.to_string()),
            CimScalar::EmbeddedInstance(instance) => write_quoted(f, &instance.to_string()),
            CimScalar::Opaque { text, .. } => write_quoted(f, text),
            numeric => write!(f, "{}", numeric),
        }
    }
}

impl fmt::Display for CimScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CimScalar::Boolean(value) => write!(f, "{}", value),
            CimScalar::UInt8(value) => write!(f, "{}", value),
            CimScalar::SInt8(value) => write!(f, "{}", value),
            CimScalar::UInt16(value) => write!(f, "{}", value),
            CimScalar::SInt16(value) => write!(f, "{}", value),
            CimScalar::UInt32(value) => write!(f, "{}", value),
            CimScalar::SInt32(value) => write!(f, "{}", value),
            CimScalar::UInt64(value) => write!(f, "{}", value),
            CimScalar::SInt64(value) => write!(f, "{}", value),
            CimScalar::Real32(value) => write!(f, "{}", value),
            CimScalar::Real64(value) => write!(f, "{}", value),
            CimScalar::Char16(unit) => write!(
                f,
                "{}",
                char::from_u32(u32::from(*unit)).unwrap_or('\u{FFFD}')
            ),
            CimScalar::String(text) => f.write_str(text),
            CimScalar::DateTime(datetime) => write!(f, "{}", datetime),
            CimScalar::Reference(path) => write!(f, "{}", path),
            CimScalar::EmbeddedClass(class) => write!(f, "{}", class),
            CimScalar::EmbeddedInstance(instance) => write!(f, "{}", instance),
            CimScalar::Opaque { text, .. } => f.write_str(text),
        }
    }
}

/// Writes `text` double quoted, escaping `\` and `"`.
pub(crate) fn write_quoted(f: &mut impl fmt::Write, text: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

/// A CIM value: absent, a single element, or an array of same-kind elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CimValue {
    /// No value, the property or key is uninitialized
    #[default]
    Null,
    /// A single element
    Scalar(CimScalar),
    /// An ordered array of elements of one kind
    Array(Vec<CimScalar>),
}

impl CimValue {
    /// Builds an array value, checking that all elements share one kind.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] naming the first element that differs in kind from
    /// the first element of the array.
    pub fn array(elements: Vec<CimScalar>) -> Result<Self> {
        if let Some(first) = elements.first() {
            if let Some(odd) = elements.iter().find(|element| !element.same_kind(first)) {
                return Err(match first.cim_type() {
                    Some(expected) => Error::TypeMismatch {
                        expected,
                        found: odd.type_name(),
                    },
                    None => Error::UnsupportedValueKind(first.type_name()),
                });
            }
        }

        Ok(CimValue::Array(elements))
    }

    /// Returns `true` for [`CimValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CimValue::Null)
    }

    /// Returns `true` for [`CimValue::Array`].
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, CimValue::Array(_))
    }

    /// The element kind of this value.
    ///
    /// `None` for null values, empty arrays and opaque elements.
    #[must_use]
    pub fn cim_type(&self) -> Option<CimType> {
        match self {
            CimValue::Null => None,
            CimValue::Scalar(scalar) => scalar.cim_type(),
            CimValue::Array(elements) => elements.first().and_then(CimScalar::cim_type),
        }
    }

    /// The single element of a scalar value.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&CimScalar> {
        match self {
            CimValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns `true` if this is a scalar `boolean` holding `true`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self, CimValue::Scalar(CimScalar::Boolean(true)))
    }

    /// Writes this value as a MOF initializer (`NULL`, a literal, or `{a, b}`).
    pub(crate) fn fmt_mof(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CimValue::Null => f.write_str("NULL"),
            CimValue::Scalar(scalar) => scalar.fmt_mof(f),
            CimValue::Array(elements) => {
                f.write_str("{")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    element.fmt_mof(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<CimScalar> for CimValue {
    fn from(scalar: CimScalar) -> Self {
        CimValue::Scalar(scalar)
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for CimValue {
                fn from(value: $ty) -> Self {
                    CimValue::Scalar(CimScalar::$variant(value))
                }
            }
        )*
    };
}

impl_from_primitive!(
    bool => Boolean,
    u8 => UInt8,
    i8 => SInt8,
    u16 => UInt16,
    i16 => SInt16,
    u32 => UInt32,
    i32 => SInt32,
    u64 => UInt64,
    i64 => SInt64,
    f32 => Real32,
    f64 => Real64,
    String => String,
    CimDateTime => DateTime,
    ObjectPath => Reference,
);

impl From<&str> for CimValue {
    fn from(value: &str) -> Self {
        CimValue::Scalar(CimScalar::String(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_timestamp() {
        let datetime = CimDateTime::parse("20240131120000.000000+060").unwrap();
        assert_eq!(datetime.as_str(), "20240131120000.000000+060");
        assert!(!datetime.is_interval());
    }

    #[test]
    fn test_datetime_interval() {
        let interval = CimDateTime::parse("00000001132312.000000:000").unwrap();
        assert!(interval.is_interval());
    }

    #[test]
    fn test_datetime_wildcards() {
        assert!(CimDateTime::parse("2024********.******+***").is_err());
        assert!(CimDateTime::parse("20240131******.******+000").is_ok());
    }

    #[test]
    fn test_datetime_rejects_iso() {
        assert!(matches!(
            CimDateTime::parse("2024-01-31T12:00:00Z"),
            Err(Error::TypeMismatch {
                expected: CimType::DateTime,
                ..
            })
        ));
        assert!(CimDateTime::parse("00000001132312.000000:001").is_err());
        // raw wrapping keeps the text as-is
        assert_eq!(
            CimDateTime::from_raw("2024-01-31T12:00:00Z").as_str(),
            "2024-01-31T12:00:00Z"
        );
    }

    #[test]
    fn test_array_same_kind() {
        let value = CimValue::array(vec![CimScalar::SInt32(-1), CimScalar::SInt32(7)]).unwrap();
        assert_eq!(value.cim_type(), Some(CimType::SInt32));

        match CimValue::array(vec![CimScalar::SInt32(-1), CimScalar::UInt32(7)]) {
            Err(Error::TypeMismatch { expected, found }) => {
                assert_eq!(expected, CimType::SInt32);
                assert_eq!(found, "uint32");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_array_is_not_null() {
        let value = CimValue::array(Vec::new()).unwrap();
        assert!(value.is_array());
        assert!(!value.is_null());
        assert_eq!(value.cim_type(), None);
        assert!(CimValue::default().is_null());
    }

    #[test]
    fn test_opaque_kind() {
        let opaque = CimScalar::Opaque {
            type_name: "octetstring".into(),
            text: "0x0102".into(),
        };
        assert_eq!(opaque.cim_type(), None);
        assert_eq!(opaque.type_name(), "octetstring");
        assert!(CimValue::array(vec![opaque.clone(), opaque]).is_ok());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(CimValue::from(true).cim_type(), Some(CimType::Boolean));
        assert_eq!(CimValue::from(5u64).cim_type(), Some(CimType::UInt64));
        assert_eq!(CimValue::from(-5i8).cim_type(), Some(CimType::SInt8));
        assert_eq!(CimValue::from("x").cim_type(), Some(CimType::String));
        assert!(CimValue::from(true).is_true());
        assert!(!CimValue::from("true").is_true());
    }

    #[test]
    fn test_display_char16() {
        assert_eq!(CimScalar::Char16(0x41).to_string(), "A");
        assert_eq!(CimScalar::Char16(0xD800).to_string(), "\u{FFFD}");
    }

    #[test]
    fn test_write_quoted_escapes() {
        let mut out = String::new();
        write_quoted(&mut out, r#"say "hi" \ bye"#).unwrap();
        assert_eq!(out, r#""say \"hi\" \\ bye""#);
    }
}
