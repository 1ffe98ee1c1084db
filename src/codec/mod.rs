//! Conversion from the CIM object model into generic values.
//!
//! - [`GenericValue`] - the dynamic value handed to the host
//! - [`value`] - tagged CIM values to generic values and back into path keys
//! - [`path`] - object path text, parsing and serialization
//! - [`projector`] - instances and classes to generic property maps
//!
//! Nothing in this module performs I/O or fails on unexpected value kinds; the only fallible
//! entry point is [`path::parse`].

mod generic;

pub mod path;
pub mod projector;
pub mod value;

pub use generic::{GenericMap, GenericValue};
pub use projector::ProjectionOptions;
