//! Broker access: sessions, transports, cursors and traversals.
//!
//! # Key Components
//!
//! - [`CimTransport`] / [`ElementSource`] - the caller-provided wire transport boundary
//! - [`Connector`] / [`SessionGate`] / [`Session`] - connection bootstrap and liveness probing
//! - [`EnumerationCursor`] / [`drain`] - lazy pull iteration over remote result sets
//! - [`GraphTraversal`] - the operations a host calls, returning generic values
//!
//! # Examples
//!
//! ```rust,no_run
//! use cimscope::client::{AssociationFilter, GraphTraversal, SessionGate};
//!
//! fn neighbours(session: &dyn SessionGate, disk: &str) -> cimscope::Result<Vec<String>> {
//!     let filter = AssociationFilter::new().assoc_class("CIM_SystemDevice");
//!     GraphTraversal::new(session).associator_names(disk, &filter)
//! }
//! ```

mod cursor;
mod session;
mod transport;
mod traversal;

pub use cursor::{drain, EnumerationCursor};
pub use session::{Connector, Session, SessionGate};
pub use transport::{
    AssociationFilter, CimTransport, DeepFlag, ElementSource, Elements, ReferenceFilter, VecSource,
};
pub use traversal::{create_object_path, GraphTraversal, PathRef};
