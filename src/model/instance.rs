//! Instances, classes and their properties.
//!
//! These are the objects a broker returns from enumeration and fetch calls. Both [`CimInstance`]
//! and [`CimClass`] keep their properties unique by name (ignoring ASCII case) and render
//! themselves as MOF through [`std::fmt::Display`]; that text is the opaque string form used
//! when one of them travels embedded inside a value.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::model::{CimInstance, Property, Qualifier};
//!
//! let disk = CimInstance::new("CIM_LogicalDisk")
//!     .with_property(Property::new("DeviceID", "C:").with_qualifier(Qualifier::new("Key", true)))
//!     .with_property(Property::new("Size", 512_000_000u64));
//!
//! assert_eq!(disk.key_properties().count(), 1);
//! assert!(disk.to_string().starts_with("instance of CIM_LogicalDisk"));
//! ```

use std::fmt;

use crate::model::{CimType, CimValue, ObjectPath};

/// Name of the qualifier marking key properties.
pub const KEY_QUALIFIER: &str = "Key";

/// A named value attached to a class, property or method as metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Qualifier {
    /// Qualifier name, e.g. `Key` or `Description`
    pub name: String,
    /// Qualifier value
    pub value: CimValue,
}

impl Qualifier {
    /// Creates a qualifier.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<CimValue>) -> Self {
        Qualifier {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_true() {
            return f.write_str(&self.name);
        }
        write!(f, "{} (", self.name)?;
        self.value.fmt_mof(f)?;
        f.write_str(")")
    }
}

/// A property of an instance or a class.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Declared data type, when the broker reported one
    pub cim_type: Option<CimType>,
    /// Property value; the default value for class properties
    pub value: CimValue,
    /// Qualifiers attached to the property, may be empty
    pub qualifiers: Vec<Qualifier>,
}

impl Property {
    /// Creates a property, taking the declared type from the value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<CimValue>) -> Self {
        let value = value.into();
        Property {
            name: name.into(),
            cim_type: value.cim_type(),
            value,
            qualifiers: Vec::new(),
        }
    }

    /// Creates a property declaration without a value.
    #[must_use]
    pub fn declared(name: impl Into<String>, cim_type: CimType) -> Self {
        Property {
            name: name.into(),
            cim_type: Some(cim_type),
            value: CimValue::Null,
            qualifiers: Vec::new(),
        }
    }

    /// Builder form attaching a qualifier, replacing one of the same name.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        match self
            .qualifiers
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&qualifier.name))
        {
            Some(slot) => *slot = qualifier,
            None => self.qualifiers.push(qualifier),
        }
        self
    }

    /// Looks up a qualifier by name, ignoring ASCII case.
    #[must_use]
    pub fn qualifier(&self, name: &str) -> Option<&Qualifier> {
        self.qualifiers
            .iter()
            .find(|qualifier| qualifier.name.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if the property carries a `Key` qualifier set to `true`.
    #[must_use]
    pub fn is_key(&self) -> bool {
        self.qualifier(KEY_QUALIFIER)
            .is_some_and(|qualifier| qualifier.value.is_true())
    }

    fn fmt_qualifiers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_qualifier_list(f, &self.qualifiers, " ")
    }
}

fn fmt_qualifier_list(
    f: &mut fmt::Formatter<'_>,
    qualifiers: &[Qualifier],
    suffix: &str,
) -> fmt::Result {
    if qualifiers.is_empty() {
        return Ok(());
    }
    f.write_str("[")?;
    for (index, qualifier) in qualifiers.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", qualifier)?;
    }
    write!(f, "]{}", suffix)
}

fn upsert_property(properties: &mut Vec<Property>, property: Property) {
    match properties
        .iter_mut()
        .find(|existing| existing.name.eq_ignore_ascii_case(&property.name))
    {
        Some(slot) => *slot = property,
        None => properties.push(property),
    }
}

fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties
        .iter()
        .find(|property| property.name.eq_ignore_ascii_case(name))
}

/// A CIM instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CimInstance {
    /// The instance's path, if the broker attached one
    pub path: Option<ObjectPath>,
    /// Name of the instance's class
    pub class_name: String,
    properties: Vec<Property>,
}

impl CimInstance {
    /// Creates an instance of `class_name` without properties.
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        CimInstance {
            path: None,
            class_name: class_name.into(),
            properties: Vec::new(),
        }
    }

    /// Builder form of [`CimInstance::set_property`].
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.set_property(property);
        self
    }

    /// Builder form attaching a path.
    #[must_use]
    pub fn with_path(mut self, path: ObjectPath) -> Self {
        self.path = Some(path);
        self
    }

    /// Adds a property, replacing one of the same name.
    pub fn set_property(&mut self, property: Property) {
        upsert_property(&mut self.properties, property);
    }

    /// Looks up a property by name, ignoring ASCII case.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        find_property(&self.properties, name)
    }

    /// All properties in the order the broker reported them.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The properties qualified as keys.
    pub fn key_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|property| property.is_key())
    }
}

impl fmt::Display for CimInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "instance of {}", self.class_name)?;
        writeln!(f, "{{")?;
        for property in &self.properties {
            write!(f, "\t{} = ", property.name)?;
            property.value.fmt_mof(f)?;
            writeln!(f, ";")?;
        }
        f.write_str("};")
    }
}

/// A CIM class definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CimClass {
    /// Class name
    pub name: String,
    /// Name of the direct superclass, if any
    pub superclass: Option<String>,
    /// Class level qualifiers
    pub qualifiers: Vec<Qualifier>,
    properties: Vec<Property>,
}

impl CimClass {
    /// Creates a class without superclass, qualifiers or properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        CimClass {
            name: name.into(),
            ..CimClass::default()
        }
    }

    /// Builder form setting the superclass.
    #[must_use]
    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Builder form adding a class qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Builder form of [`CimClass::set_property`].
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.set_property(property);
        self
    }

    /// Declares a property, replacing one of the same name.
    pub fn set_property(&mut self, property: Property) {
        upsert_property(&mut self.properties, property);
    }

    /// Looks up a property by name, ignoring ASCII case.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        find_property(&self.properties, name)
    }

    /// All declared properties.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}

impl fmt::Display for CimClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_qualifier_list(f, &self.qualifiers, "\n")?;
        write!(f, "class {}", self.name)?;
        if let Some(superclass) = &self.superclass {
            write!(f, " : {}", superclass)?;
        }
        writeln!(f)?;
        writeln!(f, "{{")?;
        for property in &self.properties {
            f.write_str("\t")?;
            property.fmt_qualifiers(f)?;
            let type_name = property
                .cim_type
                .or_else(|| property.value.cim_type())
                .map_or_else(|| "string".to_string(), |kind| kind.to_string());
            write!(f, "{} {}", type_name, property.name)?;
            if property.value.is_array() {
                f.write_str("[]")?;
            }
            if !property.value.is_null() {
                f.write_str(" = ")?;
                property.value.fmt_mof(f)?;
            }
            writeln!(f, ";")?;
        }
        f.write_str("};")
    }
}
