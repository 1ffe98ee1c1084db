//! CIM data type identifiers.
//!
//! This module defines [`CimType`], the closed set of intrinsic data types a CIM broker can
//! attach to a property, qualifier or key value (DSP0004, section 5.2). The names used for
//! parsing and display are the lowercase MOF keywords (`uint8`, `datetime`, `reference`, ...),
//! so a transport decoding a broker response can map a wire type name straight onto a variant.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::model::CimType;
//!
//! let kind = CimType::from_name("SInt64")?;
//! assert_eq!(kind, CimType::SInt64);
//! assert!(kind.is_integer());
//! assert_eq!(kind.to_string(), "sint64");
//! # Ok::<(), cimscope::Error>(())
//! ```

use std::str::FromStr;

use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::{Error, Result};

/// Identifiers for the intrinsic CIM data types.
///
/// ## Type Categories
///
/// ### Numeric
/// - **Integers**: `uint8`, `sint8`, `uint16`, `sint16`, `uint32`, `sint32`, `uint64`, `sint64`
/// - **Reals**: `real32`, `real64`
///
/// ### Textual
/// - **`string`**: UCS character string
/// - **`char16`**: single UCS-2 character
/// - **`datetime`**: DMTF timestamp or interval, kept in its 25 character form
///
/// ### Object-valued
/// - **`reference`**: an object path addressing another instance
/// - **`embeddedclass`** / **`embeddedinstance`**: a complete object carried inline
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, EnumCount, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CimType {
    /// Boolean
    Boolean,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 8-bit integer
    SInt8,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 16-bit integer
    SInt16,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 32-bit integer
    SInt32,
    /// Unsigned 64-bit integer
    UInt64,
    /// Signed 64-bit integer
    SInt64,
    /// IEEE 754 single precision
    Real32,
    /// IEEE 754 double precision
    Real64,
    /// Single UCS-2 character
    Char16,
    /// Character string
    String,
    /// DMTF datetime (timestamp or interval)
    DateTime,
    /// Object path reference
    Reference,
    /// Embedded class
    EmbeddedClass,
    /// Embedded instance
    EmbeddedInstance,
}

impl CimType {
    /// Parses a CIM type name, ignoring ASCII case.
    ///
    /// # Arguments
    /// * `name` - A MOF type keyword such as `uint32` or `DateTime`
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedValueKind`] if the name is not a known CIM type.
    pub fn from_name(name: &str) -> Result<Self> {
        CimType::from_str(name).map_err(|_| Error::UnsupportedValueKind(name.to_string()))
    }

    /// Returns `true` for the eight integer types.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            CimType::UInt8
                | CimType::SInt8
                | CimType::UInt16
                | CimType::SInt16
                | CimType::UInt32
                | CimType::SInt32
                | CimType::UInt64
                | CimType::SInt64
        )
    }

    /// Returns `true` for signed integer types.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            CimType::SInt8 | CimType::SInt16 | CimType::SInt32 | CimType::SInt64
        )
    }

    /// Returns `true` for `real32` and `real64`.
    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(self, CimType::Real32 | CimType::Real64)
    }

    /// Width in bits of numeric types, `None` for everything else.
    #[must_use]
    pub fn bit_width(&self) -> Option<u32> {
        match self {
            CimType::UInt8 | CimType::SInt8 => Some(8),
            CimType::UInt16 | CimType::SInt16 | CimType::Char16 => Some(16),
            CimType::UInt32 | CimType::SInt32 | CimType::Real32 => Some(32),
            CimType::UInt64 | CimType::SInt64 | CimType::Real64 => Some(64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names_round_trip() {
        for kind in CimType::iter() {
            let name = kind.to_string();
            assert_eq!(name, name.to_lowercase());
            assert_eq!(CimType::from_name(&name).unwrap(), kind);
        }
    }

    #[test]
    fn test_case_insensitive_parse() {
        assert_eq!(CimType::from_name("DATETIME").unwrap(), CimType::DateTime);
        assert_eq!(
            CimType::from_name("EmbeddedInstance").unwrap(),
            CimType::EmbeddedInstance
        );
    }

    #[test]
    fn test_unknown_name() {
        match CimType::from_name("octetstring") {
            Err(Error::UnsupportedValueKind(name)) => assert_eq!(name, "octetstring"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_integer_classification() {
        let integers: Vec<_> = CimType::iter().filter(CimType::is_integer).collect();
        assert_eq!(integers.len(), 8);
        assert_eq!(CimType::iter().filter(CimType::is_signed).count(), 4);
        assert!(!CimType::Real64.is_integer());
        assert!(CimType::Real32.is_real());
        assert_eq!(CimType::COUNT, 17);
    }

    #[test]
    fn test_bit_width() {
        assert_eq!(CimType::SInt8.bit_width(), Some(8));
        assert_eq!(CimType::UInt64.bit_width(), Some(64));
        assert_eq!(CimType::Real32.bit_width(), Some(32));
        assert_eq!(CimType::String.bit_width(), None);
    }
}
