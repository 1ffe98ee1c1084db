//! Textual object paths.
//!
//! An object path is the stringified identity of a CIM object:
//!
//! ```text
//! [//host/][namespace:]ClassName[.key=value{,key=value}][=@]
//! ```
//!
//! A `value` is one of
//! - a double-quoted string, `\"` and `\\` escape a quote and a backslash
//! - `true` or `false`, in any case
//! - a decimal integer; a leading `-` makes it a `sint64`, otherwise it is a `uint64`
//! - a decimal real, recognized by a `.` or an exponent; always a `real64`
//!
//! The `=@` suffix marks a singleton instance and is accepted on keyless paths. Serialization
//! writes keys in insertion order and quotes everything textual, including datetimes, `char16`
//! values and references. Parsing a serialized path therefore yields the same host, namespace,
//! class and key set, with key values equal by their serialized text; see
//! [`ObjectPath::is_equivalent`].
//!
//! # Examples
//!
//! ```rust
//! use cimscope::codec::path;
//! use cimscope::model::{CimValue, ObjectPath};
//!
//! let parsed = path::parse(r#"root/cimv2:Foo.Key="1""#)?;
//! assert_eq!(parsed.namespace, "root/cimv2");
//! assert_eq!(parsed.class_name, "Foo");
//! assert_eq!(parsed.key("Key"), Some(&CimValue::from("1")));
//!
//! let built = ObjectPath::new("root/cimv2", "Foo").with_key("Key", "1");
//! assert_eq!(path::serialize(&built), r#"root/cimv2:Foo.Key="1""#);
//! # Ok::<(), cimscope::Error>(())
//! ```

use std::fmt;

use crate::{
    codec::{value::generic_to_key_value, GenericMap},
    model::{write_quoted, CimInstance, CimScalar, CimValue, ObjectPath},
    Parser, Result,
};

/// Parses object path text.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [`crate::Error::MalformedPath`] for empty text, an invalid namespace segment, a
/// missing or invalid class name, a key without `=`, an empty or invalid key name, a duplicate
/// key, an unterminated quoted string, an unquoted value that is neither boolean nor numeric,
/// or trailing text after the path.
pub fn parse(text: &str) -> Result<ObjectPath> {
    let text = text.trim();
    if text.is_empty() {
        return Err(malformed_path!("empty object path"));
    }

    let mut parser = Parser::new(text);
    let mut path = ObjectPath::default();

    if parser.eat_str("//") {
        let host = parser.read_until(|c| c == '/');
        if host.is_empty() {
            return Err(malformed_path!("empty host name in '{}'", text));
        }
        parser.expect('/')?;
        path.host = Some(host.to_string());
    }

    let segment = parser.read_until(|c| matches!(c, ':' | '.' | '='));
    let class_name = if parser.eat(':') {
        check_namespace(segment)?;
        path.namespace = segment.to_string();
        parser.read_until(|c| matches!(c, '.' | '='))
    } else {
        segment
    };

    if class_name.is_empty() {
        return Err(malformed_path!("missing class name in '{}'", text));
    }
    check_name("class", class_name)?;
    path.class_name = class_name.to_string();

    if parser.eat('.') {
        parse_keys(&mut parser, &mut path)?;
    } else if !parser.eat_str("=@") && parser.has_more_data() {
        return Err(malformed_path!(
            "expected key list at offset {}, found '{}'",
            parser.pos(),
            parser.remaining()
        ));
    }

    if parser.has_more_data() {
        return Err(malformed_path!(
            "trailing text at offset {}: '{}'",
            parser.pos(),
            parser.remaining()
        ));
    }

    Ok(path)
}

fn parse_keys(parser: &mut Parser<'_>, path: &mut ObjectPath) -> Result<()> {
    loop {
        let offset = parser.pos();
        let name = parser.read_until(|c| c == '=' || c == ',');
        if name.is_empty() {
            return Err(malformed_path!("empty key name at offset {}", offset));
        }
        check_name("key", name)?;
        if !parser.eat('=') {
            return Err(malformed_path!(
                "key '{}' at offset {} has no value",
                name,
                offset
            ));
        }
        if path.key(name).is_some() {
            return Err(malformed_path!("duplicate key '{}'", name));
        }

        let value = parse_key_value(parser)?;
        path.set_key(name, value);

        if !parser.eat(',') {
            return Ok(());
        }
    }
}

/// Returns `true` if `name` is a CIM identifier: letters, digits and underscores.
///
/// Namespace segments, class names and key names all follow this rule.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn check_name(what: &str, name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(malformed_path!("invalid {} name '{}'", what, name))
    }
}

/// An empty namespace is allowed; otherwise every `/` separated segment is an identifier.
fn check_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() || namespace.split('/').all(is_identifier) {
        Ok(())
    } else {
        Err(malformed_path!("invalid namespace '{}'", namespace))
    }
}

/// Checks that `path` only carries names its own serialization can be parsed back with.
///
/// Paths built through [`ObjectPath::new`] and [`ObjectPath::set_key`] are not checked, since
/// brokers are the source of most of them.
///
/// # Errors
/// Returns [`crate::Error::MalformedPath`] for an invalid namespace segment, an empty or
/// invalid class name, or an invalid key name.
pub fn validate(path: &ObjectPath) -> Result<()> {
    check_namespace(&path.namespace)?;
    check_name("class", &path.class_name)?;
    for (name, _) in path.keys() {
        check_name("key", name)?;
    }
    Ok(())
}

fn parse_key_value(parser: &mut Parser<'_>) -> Result<CimValue> {
    if parser.peek_char() == Some('"') {
        return Ok(CimValue::from(parser.read_quoted_string()?));
    }

    let offset = parser.pos();
    let token = parser.read_until(|c| c == ',');
    if token.is_empty() {
        return Err(malformed_path!("missing key value at offset {}", offset));
    }

    let scalar = if token.eq_ignore_ascii_case("true") {
        Some(CimScalar::Boolean(true))
    } else if token.eq_ignore_ascii_case("false") {
        Some(CimScalar::Boolean(false))
    } else if !token.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
        None
    } else if token.contains(['.', 'e', 'E']) {
        token.parse::<f64>().ok().map(CimScalar::Real64)
    } else if token.starts_with('-') {
        token.parse::<i64>().ok().map(CimScalar::SInt64)
    } else {
        token.parse::<u64>().ok().map(CimScalar::UInt64)
    };

    scalar
        .map(CimValue::Scalar)
        .ok_or_else(|| malformed_path!("unparseable key value '{}' at offset {}", token, offset))
}

/// Serializes a path into its canonical text.
///
/// Equivalent to the path's [`std::fmt::Display`] output.
#[must_use]
pub fn serialize(path: &ObjectPath) -> String {
    path.to_string()
}

/// Writes the canonical text of `path`.
pub(crate) fn write_path(f: &mut fmt::Formatter<'_>, path: &ObjectPath) -> fmt::Result {
    if let Some(host) = &path.host {
        write!(f, "//{}/", host)?;
    }
    if !path.namespace.is_empty() {
        write!(f, "{}:", path.namespace)?;
    }
    f.write_str(&path.class_name)?;

    for (index, (name, value)) in path.keys().iter().enumerate() {
        f.write_str(if index == 0 { "." } else { "," })?;
        write!(f, "{}=", name)?;
        write_key_value(f, value)?;
    }
    Ok(())
}

/// The serialized text of a single key value, as it appears after `key=`.
pub(crate) fn key_value_text(value: &CimValue) -> String {
    let mut text = String::new();
    // writing into a String cannot fail
    let _ = write_key_value(&mut text, value);
    text
}

fn write_key_value(f: &mut impl fmt::Write, value: &CimValue) -> fmt::Result {
    match value {
        CimValue::Null => f.write_str("\"\""),
        CimValue::Scalar(scalar) => write_key_scalar(f, scalar),
        CimValue::Array(elements) => {
            let joined = elements
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            write_quoted(f, &joined)
        }
    }
}

fn write_key_scalar(f: &mut impl fmt::Write, scalar: &CimScalar) -> fmt::Result {
    match scalar {
        CimScalar::Boolean(_)
        | CimScalar::UInt8(_)
        | CimScalar::SInt8(_)
        | CimScalar::UInt16(_)
        | CimScalar::SInt16(_)
        | CimScalar::UInt32(_)
        | CimScalar::SInt32(_)
        | CimScalar::UInt64(_)
        | CimScalar::SInt64(_) => write!(f, "{}", scalar),
        CimScalar::Real32(value) => write_key_real(f, f64::from(*value)),
        CimScalar::Real64(value) => write_key_real(f, *value),
        textual => write_quoted(f, &textual.to_string()),
    }
}

/// Reals keep a `.` or exponent so they parse back as reals; non-finite values are quoted.
fn write_key_real(f: &mut impl fmt::Write, value: f64) -> fmt::Result {
    if value.is_finite() {
        write!(f, "{:?}", value)
    } else {
        write_quoted(f, &value.to_string())
    }
}

/// Builds a path from caller supplied key values.
///
/// Every value is converted with [`generic_to_key_value`], i.e. treated as a string. Keys are
/// added in the map's (sorted) order.
///
/// # Errors
/// Returns [`crate::Error::MalformedPath`] when the namespace, the class name or one of the
/// key names would not survive a round trip through [`parse`]; see [`validate`].
pub fn build(namespace: &str, class_name: &str, keys: &GenericMap) -> Result<ObjectPath> {
    let mut path = ObjectPath::new(namespace, class_name);
    for (name, value) in keys {
        path.set_key(name.as_str(), generic_to_key_value(value));
    }
    validate(&path)?;
    Ok(path)
}

/// Reconstructs the path of an instance.
///
/// Uses the path attached to the instance when there is one, filling in `namespace` if it
/// carries none. Otherwise the path is made of the instance's class name and its key
/// properties.
#[must_use]
pub fn from_instance(namespace: &str, instance: &CimInstance) -> ObjectPath {
    if let Some(attached) = &instance.path {
        let mut path = attached.clone();
        path.default_namespace(namespace);
        return path;
    }

    let mut path = ObjectPath::new(namespace, instance.class_name.as_str());
    for property in instance.key_properties() {
        path.set_key(property.name.as_str(), property.value.clone());
    }
    path
}
