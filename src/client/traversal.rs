//! Graph traversal operations over a broker session.
//!
//! [`GraphTraversal`] composes the transport, [`crate::client::EnumerationCursor`] and the codecs
//! into the operations a host calls: enumerating instances and classes, fetching and deleting
//! single objects, and following associations. Every operation
//!
//! 1. asks the session whether the broker is available and fails with
//!    [`crate::Error::Unavailable`] if it is not,
//! 2. resolves its object path argument, failing with [`crate::Error::MalformedPath`],
//! 3. issues the remote call, whose failure surfaces as the transport's error,
//! 4. pulls and converts the results, skipping elements that fail individually.
//!
//! Operations returning full objects for an enumeration use a two step fetch: the enumeration
//! only yields cheap handles, and every handle's path is resolved and fetched on its own (see
//! [`GraphTraversal::enumerate_instances`]). This costs one call per element, but the fetch
//! returns the qualifiers and types an enumeration response may leave out.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cimscope::prelude::*;
//! # fn connector() -> impl Connector { |_: &url::Url, _: &str| -> cimscope::Result<Box<dyn CimTransport>> { unimplemented!() } }
//!
//! let mut session = Session::new(connector());
//! if !session.connect("https://broker.example.com:5989", "root/cimv2") {
//!     return Ok(());
//! }
//!
//! let traversal = GraphTraversal::new(&session);
//! for disk in traversal.enumerate_instances("CIM_LogicalDisk")? {
//!     println!("{}", disk["DeviceID"]);
//! }
//! # Ok::<(), cimscope::Error>(())
//! ```

use std::borrow::Cow;

use crate::{
    client::{
        drain, AssociationFilter, CimTransport, DeepFlag, EnumerationCursor, ReferenceFilter,
        SessionGate,
    },
    codec::{
        path,
        projector::{project_class, project_instance},
        GenericMap,
    },
    config::EnumerationFlags,
    model::{CimClass, CimInstance, ObjectPath},
    Error, Result,
};

/// An object path argument, either already parsed or as text.
#[derive(Debug, Clone, PartialEq)]
pub enum PathRef<'a> {
    /// A parsed path
    Path(Cow<'a, ObjectPath>),
    /// Path text, parsed when the operation runs
    Text(&'a str),
}

impl PathRef<'_> {
    /// Resolves to a path, filling in `namespace` when the path carries none.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedPath`] if the text does not parse or names no class.
    pub fn resolve(&self, namespace: &str) -> Result<ObjectPath> {
        let mut resolved = match self {
            PathRef::Path(path) => path.clone().into_owned(),
            PathRef::Text(text) => path::parse(text)?,
        };
        if resolved.is_null() {
            return Err(malformed_path!("null object path"));
        }
        resolved.default_namespace(namespace);
        Ok(resolved)
    }
}

impl<'a> From<&'a ObjectPath> for PathRef<'a> {
    fn from(path: &'a ObjectPath) -> Self {
        PathRef::Path(Cow::Borrowed(path))
    }
}

impl From<ObjectPath> for PathRef<'_> {
    fn from(path: ObjectPath) -> Self {
        PathRef::Path(Cow::Owned(path))
    }
}

impl<'a> From<&'a str> for PathRef<'a> {
    fn from(text: &'a str) -> Self {
        PathRef::Text(text)
    }
}

impl<'a> From<&'a String> for PathRef<'a> {
    fn from(text: &'a String) -> Self {
        PathRef::Text(text)
    }
}

/// Traversal operations borrowing a session.
pub struct GraphTraversal<'s, G: SessionGate + ?Sized> {
    session: &'s G,
}

impl<'s, G: SessionGate + ?Sized> GraphTraversal<'s, G> {
    /// Creates a traversal over `session`.
    #[must_use]
    pub fn new(session: &'s G) -> Self {
        GraphTraversal { session }
    }

    fn transport(&self) -> Result<&'s dyn CimTransport> {
        if !self.session.is_available() {
            return Err(Error::Unavailable);
        }
        self.session.transport().ok_or(Error::Unavailable)
    }

    fn namespace(&self) -> &'s str {
        self.session.namespace()
    }

    fn instance_flags(&self) -> EnumerationFlags {
        self.session.config().instance_flags
    }

    /// Class requests take their depth from the caller.
    fn class_flags(&self) -> EnumerationFlags {
        self.session.config().class_flags - EnumerationFlags::DEEP
    }

    /// Lists the serialized paths of all instances of `class_name`.
    ///
    /// Null paths in the response are left out.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker, or the transport error of
    /// the enumeration.
    pub fn enumerate_instance_names(&self, class_name: &str) -> Result<Vec<String>> {
        let transport = self.transport()?;
        log::debug!("enumerating instance names of {}", class_name);

        let elements = transport.enumerate_instance_names(self.namespace(), class_name)?;
        drain(EnumerationCursor::new(elements), serialize_non_null)
    }

    /// Lists all instances of `class_name`, each fetched in full and projected.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker, the transport error of the
    /// enumeration, or a fatal error of one of the per-instance fetches.
    pub fn enumerate_instances(&self, class_name: &str) -> Result<Vec<GenericMap>> {
        let transport = self.transport()?;
        log::debug!("enumerating instances of {}", class_name);

        let elements =
            transport.enumerate_instances(self.namespace(), class_name, self.instance_flags())?;
        self.resolve_then_fetch(transport, EnumerationCursor::new(elements))
    }

    /// Resolves every enumerated handle to a path, fetches the full instance and projects it.
    ///
    /// A handle without a resolvable path and a failed fetch are each skipped with a warning,
    /// a fatal fetch error aborts.
    fn resolve_then_fetch(
        &self,
        transport: &dyn CimTransport,
        handles: EnumerationCursor<'_, CimInstance>,
    ) -> Result<Vec<GenericMap>> {
        let namespace = self.namespace();
        let flags = self.instance_flags();
        let options = self.session.config().projection;

        drain(handles, |handle: CimInstance| {
            let path = path::from_instance(namespace, &handle);
            if path.is_null() {
                log::warn!("skipping handle without an object path: {}", handle);
                return Ok(None);
            }

            log::debug!("fetching {}", path);
            let instance = transport.get_instance(&path, flags)?;
            Ok(Some(project_instance(&instance, &options)))
        })
    }

    /// Lists the names of the subclasses of `class_name`.
    ///
    /// An empty `class_name` lists the classes of the whole namespace.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker, or the transport error of
    /// the enumeration.
    pub fn enumerate_class_names(&self, class_name: &str, depth: DeepFlag) -> Result<Vec<String>> {
        let transport = self.transport()?;
        log::debug!("enumerating class names of {} ({})", class_name, depth);

        let elements = transport.enumerate_class_names(self.namespace(), class_name, depth)?;
        drain(EnumerationCursor::new(elements), |name: String| {
            Ok((!name.is_empty()).then_some(name))
        })
    }

    /// Lists the subclasses of `class_name`, each projected with its property declarations.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker, or the transport error of
    /// the enumeration.
    pub fn enumerate_classes(&self, class_name: &str, depth: DeepFlag) -> Result<Vec<GenericMap>> {
        let transport = self.transport()?;
        log::debug!("enumerating classes of {} ({})", class_name, depth);

        let options = self.session.config().projection;
        let elements =
            transport.enumerate_classes(self.namespace(), class_name, depth, self.class_flags())?;
        drain(EnumerationCursor::new(elements), |class: CimClass| {
            Ok(Some(project_class(&class, &options)))
        })
    }

    /// Fetches and projects a single instance.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker,
    /// [`crate::Error::MalformedPath`] for an unparseable path, or the transport error of the
    /// fetch.
    pub fn get_instance<'p>(&self, path: impl Into<PathRef<'p>>) -> Result<GenericMap> {
        let transport = self.transport()?;
        let path = path.into().resolve(self.namespace())?;
        log::debug!("fetching {}", path);

        let instance = transport.get_instance(&path, self.instance_flags())?;
        Ok(project_instance(
            &instance,
            &self.session.config().projection,
        ))
    }

    /// Fetches and projects a single class.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker, or the transport error of
    /// the fetch.
    pub fn get_class(&self, class_name: &str) -> Result<GenericMap> {
        let transport = self.transport()?;
        log::debug!("fetching class {}", class_name);

        let class = transport.get_class(self.namespace(), class_name, self.class_flags())?;
        Ok(project_class(&class, &self.session.config().projection))
    }

    /// Deletes a single instance.
    ///
    /// Returns `false` if the broker refused or failed the deletion; the failure is logged.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker, or
    /// [`crate::Error::MalformedPath`] for an unparseable path.
    pub fn delete_instance<'p>(&self, path: impl Into<PathRef<'p>>) -> Result<bool> {
        let transport = self.transport()?;
        let path = path.into().resolve(self.namespace())?;
        log::debug!("deleting {}", path);

        match transport.delete_instance(&path) {
            Ok(()) => Ok(true),
            Err(error) => {
                log::error!("deleting {} failed: {}", path, error);
                Ok(false)
            }
        }
    }

    /// Lists the serialized paths of the objects associated with `path`.
    ///
    /// Empty filter fields are passed to the broker unchanged and match everything.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker,
    /// [`crate::Error::MalformedPath`] for an unparseable path, or the transport error of the
    /// query.
    pub fn associator_names<'p>(
        &self,
        path: impl Into<PathRef<'p>>,
        filter: &AssociationFilter,
    ) -> Result<Vec<String>> {
        let transport = self.transport()?;
        let path = path.into().resolve(self.namespace())?;
        log::debug!("following associations of {}", path);

        let elements = transport.associator_names(&path, filter)?;
        drain(EnumerationCursor::new(elements), serialize_non_null)
    }

    /// Lists the objects associated with `path`, each fetched in full and projected.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker,
    /// [`crate::Error::MalformedPath`] for an unparseable path, the transport error of the
    /// query, or a fatal error of one of the per-object fetches.
    pub fn associators<'p>(
        &self,
        path: impl Into<PathRef<'p>>,
        filter: &AssociationFilter,
    ) -> Result<Vec<GenericMap>> {
        let transport = self.transport()?;
        let path = path.into().resolve(self.namespace())?;
        log::debug!("following associations of {}", path);

        let elements = transport.associators(&path, filter, self.instance_flags())?;
        self.resolve_then_fetch(transport, EnumerationCursor::new(elements))
    }

    /// Lists the serialized paths of the association instances referring to `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker,
    /// [`crate::Error::MalformedPath`] for an unparseable path, or the transport error of the
    /// query.
    pub fn reference_names<'p>(
        &self,
        path: impl Into<PathRef<'p>>,
        filter: &ReferenceFilter,
    ) -> Result<Vec<String>> {
        let transport = self.transport()?;
        let path = path.into().resolve(self.namespace())?;
        log::debug!("following references to {}", path);

        let elements = transport.reference_names(&path, filter)?;
        drain(EnumerationCursor::new(elements), serialize_non_null)
    }

    /// Lists the association instances referring to `path`, each fetched in full and projected.
    ///
    /// # Errors
    /// Returns [`crate::Error::Unavailable`] without a usable broker,
    /// [`crate::Error::MalformedPath`] for an unparseable path, the transport error of the
    /// query, or a fatal error of one of the per-object fetches.
    pub fn references<'p>(
        &self,
        path: impl Into<PathRef<'p>>,
        filter: &ReferenceFilter,
    ) -> Result<Vec<GenericMap>> {
        let transport = self.transport()?;
        let path = path.into().resolve(self.namespace())?;
        log::debug!("following references to {}", path);

        let elements = transport.references(&path, filter, self.instance_flags())?;
        self.resolve_then_fetch(transport, EnumerationCursor::new(elements))
    }
}

/// Builds the serialized path of an instance from caller supplied key values.
///
/// Needs no broker; every key value is rendered as a string.
///
/// # Errors
/// Returns [`crate::Error::MalformedPath`] if the namespace, the class name or a key name is
/// not a CIM identifier, as the resulting text could not be parsed back.
pub fn create_object_path(namespace: &str, class_name: &str, keys: &GenericMap) -> Result<String> {
    Ok(path::serialize(&path::build(namespace, class_name, keys)?))
}

fn serialize_non_null(path: ObjectPath) -> Result<Option<String>> {
    if path.is_null() {
        log::warn!("skipping null object path in response");
        return Ok(None);
    }
    Ok(Some(path.to_string()))
}
