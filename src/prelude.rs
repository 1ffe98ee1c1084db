//! # cimscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cimscope library. Import this module to get quick access to the essential
//! types for talking to a CIM broker and consuming its objects as generic values.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cimscope operations
pub use crate::Error;

/// The result type used throughout cimscope
pub use crate::Result;

/// Low-level text cursor used by the object path codec
pub use crate::Parser;

// ================================================================================================
// CIM Object Model
// ================================================================================================

/// Intrinsic data types and tagged values
pub use crate::model::{CimDateTime, CimScalar, CimType, CimValue};

/// Object identities
pub use crate::model::ObjectPath;

/// Instances, classes and their members
pub use crate::model::{CimClass, CimInstance, Property, Qualifier, KEY_QUALIFIER};

// ================================================================================================
// Generic Values and Projection
// ================================================================================================

/// The dynamically typed values handed to a host
pub use crate::codec::{GenericMap, GenericValue};

/// Options controlling how objects are projected into generic maps
pub use crate::codec::ProjectionOptions;

// ================================================================================================
// Configuration
// ================================================================================================

/// Request flags and traversal configuration
pub use crate::config::{EnumerationFlags, TraversalConfig, DEFAULT_NAMESPACE};

// ================================================================================================
// Broker Access
// ================================================================================================

/// Transport boundary implemented by the caller
pub use crate::client::{CimTransport, ElementSource, Elements, VecSource};

/// Enumeration depth and association filters
pub use crate::client::{AssociationFilter, DeepFlag, ReferenceFilter};

/// Session bootstrap and liveness
pub use crate::client::{Connector, Session, SessionGate};

/// Lazy enumeration over remote result sets
pub use crate::client::{drain, EnumerationCursor};

/// The graph traversal operations
pub use crate::client::{create_object_path, GraphTraversal, PathRef};

// ================================================================================================
// Dispatch
// ================================================================================================

/// Name based operation dispatch
pub use crate::dispatch::{Dispatcher, Operation};
