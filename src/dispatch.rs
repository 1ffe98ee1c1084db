//! Name based operation dispatch for host scripting layers.
//!
//! A host that calls into this crate by function name and with dynamically typed arguments
//! goes through a [`Dispatcher`]. The externally visible names map onto [`Operation`], and every
//! operation maps onto exactly one [`crate::client::GraphTraversal`] (or session) call with its
//! arguments taken from a slice of [`GenericValue`]s.
//!
//! | Operation | Arguments | Result |
//! |---|---|---|
//! | `Connect` | url, namespace | `Bool` |
//! | `LastError` | - | `Str` |
//! | `EnumerateInstanceNames` | class | `List<Str>` |
//! | `EnumerateInstances` | class | `List<Map>` |
//! | `EnumerateClassNames` | class, `deep`/`shallow` | `List<Str>` |
//! | `EnumerateClasses` | class, `deep`/`shallow` | `List<Map>` |
//! | `GetInstance` | path | `Map` |
//! | `GetClass` | class | `Map` |
//! | `DeleteInstance` | path | `Bool` |
//! | `AssociatorNames`, `Associators` | path, assoc class, result class, role, result role | `List` |
//! | `ReferenceNames`, `References` | path, result class, role | `List` |
//! | `CreateObjectPath` | namespace, class, key map | `Str` |
//!
//! Trailing filter and depth arguments may be left out; filters then match everything and the
//! depth is shallow.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cimscope::dispatch::Dispatcher;
//! use cimscope::prelude::*;
//!
//! fn disks(dispatcher: &mut Dispatcher<impl SessionGate>) -> cimscope::Result<GenericValue> {
//!     dispatcher.call("EnumerateInstanceNames", &[GenericValue::from("CIM_LogicalDisk")])
//! }
//! ```

use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::{
    client::{
        create_object_path, AssociationFilter, DeepFlag, GraphTraversal, ReferenceFilter,
        SessionGate,
    },
    codec::{GenericMap, GenericValue},
    Error, Result,
};

/// The externally visible operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount)]
pub enum Operation {
    /// Connect to a broker
    Connect,
    /// Message of the last failed operation
    LastError,
    /// Serialized paths of a class's instances
    EnumerateInstanceNames,
    /// Projected instances of a class
    EnumerateInstances,
    /// Names of a class's subclasses
    EnumerateClassNames,
    /// Projected subclasses of a class
    EnumerateClasses,
    /// A single projected instance
    GetInstance,
    /// A single projected class
    GetClass,
    /// Delete an instance
    DeleteInstance,
    /// Serialized paths of associated objects
    AssociatorNames,
    /// Projected associated objects
    Associators,
    /// Serialized paths of referencing associations
    ReferenceNames,
    /// Projected referencing associations
    References,
    /// Build a serialized path from key values
    CreateObjectPath,
}

/// Executes operations by name against a session, remembering the last failure.
pub struct Dispatcher<G: SessionGate> {
    session: G,
    last_error: String,
}

impl<G: SessionGate> Dispatcher<G> {
    /// Creates a dispatcher owning `session`.
    #[must_use]
    pub fn new(session: G) -> Self {
        Dispatcher {
            session,
            last_error: String::new(),
        }
    }

    /// The session operations run against.
    #[must_use]
    pub fn session(&self) -> &G {
        &self.session
    }

    /// The message of the last failed operation, empty if the last operation succeeded.
    #[must_use]
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Executes the operation named `name`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an unknown operation name, otherwise see
    /// [`Dispatcher::dispatch`].
    pub fn call(&mut self, name: &str, args: &[GenericValue]) -> Result<GenericValue> {
        match name.parse::<Operation>() {
            Ok(operation) => self.dispatch(operation, args),
            Err(_) => {
                let error = Error::InvalidArgument(format!("unknown operation '{}'", name));
                self.last_error = error.to_string();
                Err(error)
            }
        }
    }

    /// Executes `operation`.
    ///
    /// `Connect` and `DeleteInstance` report failure as `false`; the failure message is still
    /// recorded for `LastError`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for missing or mistyped arguments, or the error
    /// of the underlying traversal operation.
    pub fn dispatch(
        &mut self,
        operation: Operation,
        args: &[GenericValue],
    ) -> Result<GenericValue> {
        if operation == Operation::LastError {
            return Ok(GenericValue::Str(self.last_error.clone()));
        }

        log::debug!("dispatching {} with {} arguments", operation, args.len());
        match self.execute(operation, args) {
            Ok(Outcome::Done(value)) => {
                self.last_error.clear();
                Ok(value)
            }
            Ok(Outcome::Refused(message)) => {
                self.last_error = message;
                Ok(GenericValue::Bool(false))
            }
            Err(error) => {
                self.last_error = error.to_string();
                Err(error)
            }
        }
    }

    fn execute(&mut self, operation: Operation, args: &[GenericValue]) -> Result<Outcome> {
        let traversal = GraphTraversal::new(&self.session);

        let value = match operation {
            Operation::Connect => {
                let url = required(args, 0, "url")?;
                let namespace = optional(args, 1, "namespace")?;
                if !self.session.connect(url, namespace) {
                    return Ok(Outcome::Refused(format!("cannot connect to '{}'", url)));
                }
                GenericValue::Bool(true)
            }
            Operation::LastError => GenericValue::Str(self.last_error.clone()),
            Operation::EnumerateInstanceNames => {
                strings(traversal.enumerate_instance_names(required(args, 0, "class")?)?)
            }
            Operation::EnumerateInstances => {
                maps(traversal.enumerate_instances(required(args, 0, "class")?)?)
            }
            Operation::EnumerateClassNames => strings(
                traversal.enumerate_class_names(required(args, 0, "class")?, depth(args, 1)?)?,
            ),
            Operation::EnumerateClasses => {
                maps(traversal.enumerate_classes(required(args, 0, "class")?, depth(args, 1)?)?)
            }
            Operation::GetInstance => {
                GenericValue::Map(traversal.get_instance(required(args, 0, "path")?)?)
            }
            Operation::GetClass => {
                GenericValue::Map(traversal.get_class(required(args, 0, "class")?)?)
            }
            Operation::DeleteInstance => {
                let path = required(args, 0, "path")?;
                if !traversal.delete_instance(path)? {
                    return Ok(Outcome::Refused(format!("cannot delete '{}'", path)));
                }
                GenericValue::Bool(true)
            }
            Operation::AssociatorNames => strings(
                traversal
                    .associator_names(required(args, 0, "path")?, &association_filter(args)?)?,
            ),
            Operation::Associators => maps(
                traversal.associators(required(args, 0, "path")?, &association_filter(args)?)?,
            ),
            Operation::ReferenceNames => strings(
                traversal.reference_names(required(args, 0, "path")?, &reference_filter(args)?)?,
            ),
            Operation::References => {
                maps(traversal.references(required(args, 0, "path")?, &reference_filter(args)?)?)
            }
            Operation::CreateObjectPath => {
                let namespace = required(args, 0, "namespace")?;
                let class_name = required(args, 1, "class")?;
                let keys = key_map(args, 2)?;
                GenericValue::Str(create_object_path(namespace, class_name, keys)?)
            }
        };

        Ok(Outcome::Done(value))
    }
}

enum Outcome {
    Done(GenericValue),
    Refused(String),
}

fn strings(items: Vec<String>) -> GenericValue {
    GenericValue::List(items.into_iter().map(GenericValue::Str).collect())
}

fn maps(items: Vec<GenericMap>) -> GenericValue {
    GenericValue::List(items.into_iter().map(GenericValue::Map).collect())
}

fn required<'a>(args: &'a [GenericValue], index: usize, name: &str) -> Result<&'a str> {
    match args.get(index) {
        Some(GenericValue::Str(text)) => Ok(text),
        Some(other) => Err(Error::InvalidArgument(format!(
            "argument {} ({}) must be a string, found {}",
            index + 1,
            name,
            other.kind_name()
        ))),
        None => Err(Error::InvalidArgument(format!(
            "missing argument {} ({})",
            index + 1,
            name
        ))),
    }
}

fn optional<'a>(args: &'a [GenericValue], index: usize, name: &str) -> Result<&'a str> {
    match args.get(index) {
        None | Some(GenericValue::Void) => Ok(""),
        Some(_) => required(args, index, name),
    }
}

fn depth(args: &[GenericValue], index: usize) -> Result<DeepFlag> {
    let symbol = optional(args, index, "depth")?;
    Ok(if symbol.is_empty() {
        DeepFlag::Shallow
    } else {
        DeepFlag::from_symbol(symbol)
    })
}

fn association_filter(args: &[GenericValue]) -> Result<AssociationFilter> {
    Ok(AssociationFilter::new()
        .assoc_class(optional(args, 1, "assoc class")?)
        .result_class(optional(args, 2, "result class")?)
        .role(optional(args, 3, "role")?)
        .result_role(optional(args, 4, "result role")?))
}

fn reference_filter(args: &[GenericValue]) -> Result<ReferenceFilter> {
    Ok(ReferenceFilter::new()
        .result_class(optional(args, 1, "result class")?)
        .role(optional(args, 2, "role")?))
}

fn key_map(args: &[GenericValue], index: usize) -> Result<&GenericMap> {
    args.get(index)
        .and_then(GenericValue::as_map)
        .ok_or_else(|| {
            Error::InvalidArgument(format!("argument {} (keys) must be a map", index + 1))
        })
}
