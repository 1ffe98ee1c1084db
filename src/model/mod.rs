//! The CIM object model as seen by a client.
//!
//! This module holds the strongly, narrowly typed structures a broker speaks in, before any
//! conversion into generic values happens:
//!
//! - [`CimType`] - the intrinsic data types
//! - [`CimScalar`] / [`CimValue`] - tagged values, scalar or array
//! - [`CimDateTime`] - datetime text, validated but never reinterpreted
//! - [`ObjectPath`] - object identities
//! - [`Property`], [`Qualifier`], [`CimInstance`], [`CimClass`] - the objects themselves
//!
//! Everything here is plain owned data. Values are built per call from transport responses and
//! dropped once they have been projected, nothing is cached across calls.

mod instance;
mod path;
mod types;
mod value;

pub use instance::{CimClass, CimInstance, Property, Qualifier, KEY_QUALIFIER};
pub use path::ObjectPath;
pub use types::CimType;
pub(crate) use value::write_quoted;
pub use value::{CimDateTime, CimScalar, CimValue};
