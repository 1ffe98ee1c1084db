// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # cimscope
//!
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://www.apache.org/licenses/LICENSE-2.0)
//!
//! A client-side layer for CIM/WBEM object brokers (CIMOMs). `cimscope` connects to a broker
//! through a caller-provided transport, walks its object graph (namespaces, classes, instances,
//! associations and references) and projects every strongly typed CIM object it fetches into
//! plain, dynamically typed values a scripting host can consume directly.
//!
//! ## Features
//!
//! - **🔌 Transport agnostic** - The wire protocol lives behind the [`client::CimTransport`] trait
//! - **🧭 Lazy enumeration** - Remote result sets are pulled element by element through cursors
//! - **🧱 Failure isolation** - One broken element never aborts an enumeration
//! - **🏷️ Object paths** - Parse, build and serialize `namespace:Class.Key="value"` identities
//! - **📦 Generic projection** - Instances and classes become maps of [`codec::GenericValue`]
//! - **🗂️ Name based dispatch** - [`dispatch::Dispatcher`] maps host function names to operations
//!
//! ## Quick Start
//!
//! Add `cimscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cimscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use cimscope::prelude::*;
//!
//! fn list_disks(connector: impl Connector) -> cimscope::Result<Vec<String>> {
//!     let mut session = Session::new(connector);
//!     session.try_connect("http://localhost:5988", "root/cimv2")?;
//!
//!     GraphTraversal::new(&session).enumerate_instance_names("CIM_LogicalDisk")
//! }
//! ```
//!
//! ### Object Paths
//!
//! ```rust
//! use cimscope::codec::path;
//!
//! let parsed = path::parse(r#"root/cimv2:CIM_LogicalDisk.DeviceID="C:""#)?;
//! assert_eq!(parsed.namespace, "root/cimv2");
//! assert_eq!(parsed.class_name, "CIM_LogicalDisk");
//! assert_eq!(path::serialize(&parsed), r#"root/cimv2:CIM_LogicalDisk.DeviceID="C:""#);
//! # Ok::<(), cimscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The crate is layered bottom-up:
//!
//! - [`model`] - The CIM object model: types, values, object paths, instances and classes
//! - [`codec`] - Conversion of the model into generic values, object path text
//! - [`config`] - Request flags, projection options and the default namespace
//! - [`client`] - Sessions, transports, cursors and the graph traversal operations
//! - [`dispatch`] - Name based operation dispatch for host scripting layers
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], with [`Error`] distinguishing a missing session
//! ([`Error::Unavailable`]) from a failed operation and from an operation that simply found
//! nothing (an empty list or map).

#[macro_use]
pub(crate) mod error;
pub(crate) mod parser;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the cimscope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use cimscope::prelude::*;
///
/// let path = ObjectPath::new("root/cimv2", "CIM_LogicalDisk").with_key("DeviceID", "C:");
/// assert_eq!(path.to_string(), r#"root/cimv2:CIM_LogicalDisk.DeviceID="C:""#);
/// ```
pub mod prelude;

pub mod client;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod model;

/// `cimscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use cimscope::{codec::path, model::ObjectPath, Result};
///
/// fn parse_disk(text: &str) -> Result<ObjectPath> {
///     path::parse(text)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `cimscope` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use cimscope::{codec::path, Error};
///
/// match path::parse("Foo.Key=") {
///     Ok(path) => println!("Parsed {}", path),
///     Err(Error::MalformedPath { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Provides access to the low-level text cursor used for object path parsing.
///
/// # Example
///
/// ```rust
/// use cimscope::Parser;
///
/// let mut parser = Parser::new("root/cimv2:CIM_LogicalDisk");
/// let namespace = parser.read_until(|c| c == ':');
/// assert_eq!(namespace, "root/cimv2");
/// assert!(parser.eat(':'));
/// ```
pub use parser::Parser;
