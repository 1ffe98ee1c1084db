//! Traversal configuration.
//!
//! A [`TraversalConfig`] is handed to a [`crate::client::Session`] when it is created and read by
//! every [`crate::client::GraphTraversal`] borrowing that session. It decides the namespace used
//! when a connect call names none, the flags sent with instance and class requests, and how
//! fetched objects are projected.
//!
//! Three presets are available:
//!
//! - [`TraversalConfig::default`] - deep instance enumeration including qualifiers but not
//!   class origin, the request a broker is traditionally sent for this layer
//! - [`TraversalConfig::minimal`] - shallow, local only, no qualifiers; the smallest responses
//! - [`TraversalConfig::full`] - everything the broker can report, including type names in
//!   projected properties
//!
//! # Examples
//!
//! ```rust
//! use cimscope::config::{EnumerationFlags, TraversalConfig};
//!
//! let config = TraversalConfig {
//!     namespace: "root/interop".to_string(),
//!     ..TraversalConfig::default()
//! };
//! assert!(config.instance_flags.contains(EnumerationFlags::DEEP));
//! assert!(!config.instance_flags.contains(EnumerationFlags::INCLUDE_CLASS_ORIGIN));
//! ```

use bitflags::bitflags;

use crate::codec::ProjectionOptions;

/// Namespace used when a connect call does not name one.
pub const DEFAULT_NAMESPACE: &str = "root/cimv2";

bitflags! {
    /// Request flags sent with enumeration and fetch calls.
    ///
    /// Each flag maps to the request option of the same name; a cleared flag is its negation
    /// (`LOCAL_ONLY` cleared means "not local only").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EnumerationFlags: u8 {
        /// Include properties added by subclasses
        const DEEP = 0x01;
        /// Only properties declared or overridden in the requested class
        const LOCAL_ONLY = 0x02;
        /// Include qualifiers of the returned objects
        const INCLUDE_QUALIFIERS = 0x04;
        /// Include the `CLASSORIGIN` attribute of properties
        const INCLUDE_CLASS_ORIGIN = 0x08;
    }
}

/// Settings shared by all traversals over one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Namespace used when a connect call names none
    pub namespace: String,
    /// Flags for instance enumeration and instance fetches
    pub instance_flags: EnumerationFlags,
    /// Flags for class enumeration and class fetches; depth is chosen per call instead of `DEEP`
    pub class_flags: EnumerationFlags,
    /// Projection of fetched objects into generic maps
    pub projection: ProjectionOptions,
    /// Probe the broker before every operation rather than trusting an open connection
    pub probe_before_use: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        TraversalConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            instance_flags: EnumerationFlags::DEEP | EnumerationFlags::INCLUDE_QUALIFIERS,
            class_flags: EnumerationFlags::INCLUDE_QUALIFIERS,
            projection: ProjectionOptions::default(),
            probe_before_use: true,
        }
    }
}

impl TraversalConfig {
    /// Smallest possible responses: shallow, local only, no qualifiers.
    #[must_use]
    pub fn minimal() -> Self {
        TraversalConfig {
            instance_flags: EnumerationFlags::LOCAL_ONLY,
            class_flags: EnumerationFlags::LOCAL_ONLY,
            projection: ProjectionOptions {
                include_qualifiers: false,
                include_type: false,
            },
            ..TraversalConfig::default()
        }
    }

    /// Everything the broker can report, including type names in projected properties.
    #[must_use]
    pub fn full() -> Self {
        TraversalConfig {
            instance_flags: EnumerationFlags::DEEP
                | EnumerationFlags::INCLUDE_QUALIFIERS
                | EnumerationFlags::INCLUDE_CLASS_ORIGIN,
            class_flags: EnumerationFlags::INCLUDE_QUALIFIERS
                | EnumerationFlags::INCLUDE_CLASS_ORIGIN,
            projection: ProjectionOptions {
                include_qualifiers: true,
                include_type: true,
            },
            ..TraversalConfig::default()
        }
    }

    /// Builder form setting the default namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}
