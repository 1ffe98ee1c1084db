//! Object paths, the identity of a CIM instance or class.
//!
//! An [`ObjectPath`] addresses one object on a broker: the namespace it lives in, its class and,
//! for instances, the values of its key properties. The textual form and its parser live in
//! [`crate::codec::path`]; this module only holds the structure and the invariants on its keys.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::model::ObjectPath;
//!
//! let mut path = ObjectPath::new("root/cimv2", "CIM_LogicalDisk");
//! path.set_key("DeviceID", "C:");
//! path.set_key("deviceid", "D:"); // CIM names ignore case, this replaces the first binding
//!
//! assert_eq!(path.keys().len(), 1);
//! assert_eq!(path.to_string(), r#"root/cimv2:CIM_LogicalDisk.DeviceID="D:""#);
//! ```

use std::fmt;

use crate::{codec, model::CimValue};

/// A structured CIM object identity.
///
/// Keys are unique by name, compared ignoring ASCII case as CIM names are. They keep insertion
/// order, which is also the order they are serialized in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectPath {
    /// Broker host, present when the path was given in its `//host/...` form
    pub host: Option<String>,
    /// Namespace, e.g. `root/cimv2`; empty when the path did not carry one
    pub namespace: String,
    /// Class name; empty for the null path
    pub class_name: String,
    keys: Vec<(String, CimValue)>,
}

impl ObjectPath {
    /// Creates a path without keys.
    ///
    /// # Arguments
    /// * `namespace` - The namespace, may be empty
    /// * `class_name` - The class name
    #[must_use]
    pub fn new(namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        ObjectPath {
            host: None,
            namespace: namespace.into(),
            class_name: class_name.into(),
            keys: Vec::new(),
        }
    }

    /// Builder form of [`ObjectPath::set_key`].
    #[must_use]
    pub fn with_key(mut self, name: impl Into<String>, value: impl Into<CimValue>) -> Self {
        self.set_key(name, value);
        self
    }

    /// Builder form setting the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Binds a key to a value, replacing an existing binding of the same name in place.
    ///
    /// The original spelling of the name is kept when a binding is replaced.
    pub fn set_key(&mut self, name: impl Into<String>, value: impl Into<CimValue>) {
        let name = name.into();
        let value = value.into();
        match self
            .keys
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, slot)) => *slot = value,
            None => self.keys.push((name, value)),
        }
    }

    /// Looks up a key value by name, ignoring ASCII case.
    #[must_use]
    pub fn key(&self, name: &str) -> Option<&CimValue> {
        self.keys
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Removes a key binding, returning its value.
    pub fn remove_key(&mut self, name: &str) -> Option<CimValue> {
        let index = self
            .keys
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))?;
        Some(self.keys.remove(index).1)
    }

    /// All key bindings in insertion order.
    #[must_use]
    pub fn keys(&self) -> &[(String, CimValue)] {
        &self.keys
    }

    /// Returns `true` for the null path, which addresses nothing.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.class_name.is_empty()
    }

    /// Returns `true` if the path has no keys, i.e. addresses a class or a singleton.
    #[must_use]
    pub fn is_class_path(&self) -> bool {
        self.keys.is_empty()
    }

    /// Fills in `namespace` if this path does not carry one.
    pub fn default_namespace(&mut self, namespace: &str) {
        if self.namespace.is_empty() {
            self.namespace = namespace.to_string();
        }
    }

    /// Compares two paths for identity.
    ///
    /// Host, namespace, class and key names are compared ignoring ASCII case. Key values compare
    /// by their serialized text and key order is irrelevant, so a path is equivalent to the
    /// result of parsing its own serialization.
    #[must_use]
    pub fn is_equivalent(&self, other: &ObjectPath) -> bool {
        let host_matches = match (&self.host, &other.host) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };

        host_matches
            && self.namespace.eq_ignore_ascii_case(&other.namespace)
            && self.class_name.eq_ignore_ascii_case(&other.class_name)
            && self.keys.len() == other.keys.len()
            && self.keys.iter().all(|(name, value)| {
                other.key(name).is_some_and(|theirs| {
                    codec::path::key_value_text(value) == codec::path::key_value_text(theirs)
                })
            })
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        codec::path::write_path(f, self)
    }
}
