//! Flattening of instances and classes into generic property maps.
//!
//! A projected object is a [`GenericMap`] keyed by property name. Every entry is itself a map:
//!
//! ```text
//! {
//!     "value":      <the property value, see crate::codec::value>,
//!     "qualifiers": { <qualifier name>: <qualifier value>, ... },
//!     "type":       "<cim type name>"          (only with ProjectionOptions::include_type)
//! }
//! ```
//!
//! A property without a value keeps its entry with a `Void` value. The `qualifiers` entry is
//! always present; it is empty when the property has none or qualifiers are not requested.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::codec::{projector, GenericValue, ProjectionOptions};
//! use cimscope::model::{CimInstance, Property, Qualifier};
//!
//! let instance = CimInstance::new("Foo")
//!     .with_property(Property::new("Id", "1").with_qualifier(Qualifier::new("Key", true)));
//!
//! let map = projector::project_instance(&instance, &ProjectionOptions::default());
//! let id = &map["Id"];
//! assert_eq!(id.get("value"), Some(&GenericValue::from("1")));
//! assert_eq!(id.get("qualifiers").and_then(|q| q.get("Key")), Some(&GenericValue::Bool(true)));
//! ```

use crate::{
    codec::{value::to_generic, GenericMap, GenericValue},
    model::{CimClass, CimInstance, CimScalar, CimValue, Property},
};

/// Key of the value entry in a projected property.
pub const VALUE_KEY: &str = "value";
/// Key of the qualifier map in a projected property.
pub const QUALIFIERS_KEY: &str = "qualifiers";
/// Key of the type name in a projected property.
pub const TYPE_KEY: &str = "type";

/// Controls what a projected property carries besides its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Fill the `qualifiers` map of each property
    pub include_qualifiers: bool,
    /// Add a `type` entry with the CIM type name of each property
    pub include_type: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        ProjectionOptions {
            include_qualifiers: true,
            include_type: false,
        }
    }
}

/// Projects all properties of an instance.
#[must_use]
pub fn project_instance(instance: &CimInstance, options: &ProjectionOptions) -> GenericMap {
    project_properties(instance.properties(), options)
}

/// Projects the declared properties of a class, their default values as `value`.
#[must_use]
pub fn project_class(class: &CimClass, options: &ProjectionOptions) -> GenericMap {
    project_properties(class.properties(), options)
}

fn project_properties(properties: &[Property], options: &ProjectionOptions) -> GenericMap {
    properties
        .iter()
        .map(|property| (property.name.clone(), project_property(property, options)))
        .collect()
}

/// Projects a single property into its `{"value", "qualifiers"}` map.
#[must_use]
pub fn project_property(property: &Property, options: &ProjectionOptions) -> GenericValue {
    let qualifiers: GenericMap = if options.include_qualifiers {
        property
            .qualifiers
            .iter()
            .map(|qualifier| (qualifier.name.clone(), to_generic(&qualifier.value)))
            .collect()
    } else {
        GenericMap::new()
    };

    let mut entry = GenericMap::new();
    entry.insert(VALUE_KEY.to_string(), to_generic(&property.value));
    entry.insert(QUALIFIERS_KEY.to_string(), GenericValue::Map(qualifiers));
    if options.include_type {
        entry.insert(TYPE_KEY.to_string(), type_name(property));
    }
    GenericValue::Map(entry)
}

fn type_name(property: &Property) -> GenericValue {
    if let Some(kind) = property.cim_type.or_else(|| property.value.cim_type()) {
        return GenericValue::Str(kind.to_string());
    }

    let opaque = match &property.value {
        CimValue::Scalar(scalar) => Some(scalar),
        CimValue::Array(elements) => elements.first(),
        CimValue::Null => None,
    };
    match opaque {
        Some(CimScalar::Opaque { type_name, .. }) => GenericValue::Str(type_name.clone()),
        _ => GenericValue::Void,
    }
}
