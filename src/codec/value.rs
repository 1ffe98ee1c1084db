//! Conversion between tagged CIM values and generic values.
//!
//! The codec applies one widening policy to every value kind:
//!
//! | CIM kind | Generic value |
//! |---|---|
//! | null | `Void` |
//! | `boolean` | `Bool` |
//! | `uint8` .. `sint64` | `Int`, sign or zero extended |
//! | `real32`, `real64` | `Float` |
//! | `string`, `datetime`, `char16` | `Str`, datetime text verbatim |
//! | `reference` | `Str`, the canonical serialized path |
//! | `embeddedclass`, `embeddedinstance` | `Str`, the object's MOF text |
//! | array of any kind | `List`, element order preserved |
//!
//! Conversion never fails. A value of a kind this layer does not know becomes `Void`, and such
//! an element inside an array is dropped from the list; both cases are logged as warnings. One
//! unexpected server-side type therefore cannot abort an enumeration.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::codec::{value, GenericValue};
//! use cimscope::model::{CimScalar, CimValue};
//!
//! assert_eq!(value::to_generic(&CimValue::from(200u8)), GenericValue::Int(200));
//! assert_eq!(value::to_generic(&CimValue::Null), GenericValue::Void);
//!
//! let flags = CimValue::array(vec![CimScalar::Boolean(true), CimScalar::Boolean(false)])?;
//! assert_eq!(
//!     value::to_generic(&flags),
//!     GenericValue::List(vec![GenericValue::Bool(true), GenericValue::Bool(false)])
//! );
//! # Ok::<(), cimscope::Error>(())
//! ```

use crate::{
    codec::GenericValue,
    model::{CimScalar, CimValue},
};

/// Converts a CIM value into a generic value.
///
/// Null becomes `Void`, arrays become lists (see [`array_to_generic`]) and scalars follow the
/// widening table of this module. Unknown kinds yield `Void`.
#[must_use]
pub fn to_generic(value: &CimValue) -> GenericValue {
    match value {
        CimValue::Null => GenericValue::Void,
        CimValue::Array(_) => GenericValue::List(array_to_generic(value)),
        CimValue::Scalar(scalar) => scalar_to_generic(scalar).unwrap_or_else(|| {
            log::warn!(
                "unsupported CIM value kind '{}', converted to void",
                scalar.type_name()
            );
            GenericValue::Void
        }),
    }
}

/// Converts an array value into a list of generic values.
///
/// Returns an empty list if `value` is not array-shaped. Elements of an unsupported kind are
/// skipped with a warning, the remaining elements keep their relative order.
#[must_use]
pub fn array_to_generic(value: &CimValue) -> Vec<GenericValue> {
    let CimValue::Array(elements) = value else {
        return Vec::new();
    };

    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| {
            let converted = scalar_to_generic(element);
            if converted.is_none() {
                log::warn!(
                    "skipping array element {} of unsupported CIM value kind '{}'",
                    index,
                    element.type_name()
                );
            }
            converted
        })
        .collect()
}

/// Converts a single element, returning `None` for kinds this layer does not support.
#[must_use]
pub fn scalar_to_generic(scalar: &CimScalar) -> Option<GenericValue> {
    Some(match scalar {
        CimScalar::Boolean(value) => GenericValue::Bool(*value),

        CimScalar::UInt8(value) => GenericValue::Int(i64::from(*value)),
        CimScalar::SInt8(value) => GenericValue::Int(i64::from(*value)),
        CimScalar::UInt16(value) => GenericValue::Int(i64::from(*value)),
        CimScalar::SInt16(value) => GenericValue::Int(i64::from(*value)),
        CimScalar::UInt32(value) => GenericValue::Int(i64::from(*value)),
        CimScalar::SInt32(value) => GenericValue::Int(i64::from(*value)),
        CimScalar::UInt64(value) => GenericValue::Int(widen_u64(*value)),
        CimScalar::SInt64(value) => GenericValue::Int(*value),

        CimScalar::Real32(value) => GenericValue::Float(f64::from(*value)),
        CimScalar::Real64(value) => GenericValue::Float(*value),

        CimScalar::Char16(_) | CimScalar::String(_) | CimScalar::DateTime(_) => {
            GenericValue::Str(scalar.to_string())
        }

        CimScalar::Reference(path) => GenericValue::Str(path.to_string()),
        CimScalar::EmbeddedClass(class) => GenericValue::Str(class.to_string()),
        CimScalar::EmbeddedInstance(instance) => GenericValue::Str(instance.to_string()),

        CimScalar::Opaque { .. } => return None,
    })
}

/// `uint64` values above `i64::MAX` keep their bit pattern.
fn widen_u64(value: u64) -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let widened = value as i64;
    if widened < 0 {
        log::warn!(
            "uint64 value {} exceeds the generic integer range, reinterpreted as {}",
            value,
            widened
        );
    }
    widened
}

/// Converts a caller supplied generic value into a key value for path construction.
///
/// Every caller value is treated as a string: `Void` becomes the empty string, booleans
/// `true`/`false`, numbers their decimal form, and lists and maps their display form.
#[must_use]
pub fn generic_to_key_value(value: &GenericValue) -> CimValue {
    let text = match value {
        GenericValue::Void => String::new(),
        other => other.to_string(),
    };
    CimValue::Scalar(CimScalar::String(text))
}
