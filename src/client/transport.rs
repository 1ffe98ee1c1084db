//! The wire transport boundary.
//!
//! This crate never speaks a wire protocol. A [`CimTransport`] is provided by the caller (through
//! a [`crate::client::Connector`]) and exposes the handful of intrinsic broker operations the
//! traversals need. Enumerating calls hand back an [`ElementSource`], the transport's
//! pull-iteration primitive; [`crate::client::EnumerationCursor`] adapts it into an iterator.
//!
//! Errors a transport returns should be [`crate::Error::RemoteProtocol`] for a failure the broker
//! reported and [`crate::Error::Disconnected`] when the connection itself is gone.

use strum::{Display, EnumIter, EnumString};

use crate::{
    config::EnumerationFlags,
    model::{CimClass, CimInstance, ObjectPath},
    Result,
};

/// A lazily pulled remote result set.
pub trait ElementSource<T> {
    /// Returns `true` while further elements can be pulled.
    fn has_more(&mut self) -> bool;

    /// Pulls the next element.
    ///
    /// # Errors
    /// Returns the transport error that prevented the element from being received.
    fn next_element(&mut self) -> Result<T>;
}

impl<T, S> ElementSource<T> for &mut S
where
    S: ElementSource<T> + ?Sized,
{
    fn has_more(&mut self) -> bool {
        (**self).has_more()
    }

    fn next_element(&mut self) -> Result<T> {
        (**self).next_element()
    }
}

/// A boxed [`ElementSource`] borrowing its transport.
pub type Elements<'a, T> = Box<dyn ElementSource<T> + 'a>;

/// Whether class enumeration descends into subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DeepFlag {
    /// Only the named class level
    #[default]
    Shallow,
    /// The named class and all its descendants
    Deep,
}

impl DeepFlag {
    /// Reads a depth symbol, falling back to [`DeepFlag::Shallow`] for anything unrecognized.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        symbol.parse().unwrap_or_else(|_| {
            log::warn!("unknown depth '{}', using shallow", symbol);
            DeepFlag::Shallow
        })
    }

    /// Returns `true` for [`DeepFlag::Deep`].
    #[must_use]
    pub fn is_deep(self) -> bool {
        self == DeepFlag::Deep
    }
}

/// Filters of an associator query; an empty string leaves a filter unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssociationFilter {
    /// Association class the traversal must go through
    pub assoc_class: String,
    /// Class the returned objects must be of
    pub result_class: String,
    /// Role the source object plays in the association
    pub role: String,
    /// Role the returned objects play in the association
    pub result_role: String,
}

impl AssociationFilter {
    /// Creates a filter matching every associated object.
    #[must_use]
    pub fn new() -> Self {
        AssociationFilter::default()
    }

    /// Builder form setting the association class.
    #[must_use]
    pub fn assoc_class(mut self, class_name: impl Into<String>) -> Self {
        self.assoc_class = class_name.into();
        self
    }

    /// Builder form setting the result class.
    #[must_use]
    pub fn result_class(mut self, class_name: impl Into<String>) -> Self {
        self.result_class = class_name.into();
        self
    }

    /// Builder form setting the source role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Builder form setting the result role.
    #[must_use]
    pub fn result_role(mut self, role: impl Into<String>) -> Self {
        self.result_role = role.into();
        self
    }

    /// Returns `true` if no filter is set.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.assoc_class.is_empty()
            && self.result_class.is_empty()
            && self.role.is_empty()
            && self.result_role.is_empty()
    }
}

/// Filters of a reference query; an empty string leaves a filter unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceFilter {
    /// Association class of the returned references
    pub result_class: String,
    /// Role the source object plays in the association
    pub role: String,
}

impl ReferenceFilter {
    /// Creates a filter matching every referencing association.
    #[must_use]
    pub fn new() -> Self {
        ReferenceFilter::default()
    }

    /// Builder form setting the result class.
    #[must_use]
    pub fn result_class(mut self, class_name: impl Into<String>) -> Self {
        self.result_class = class_name.into();
        self
    }

    /// Builder form setting the source role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Returns `true` if no filter is set.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.result_class.is_empty() && self.role.is_empty()
    }
}

/// The intrinsic broker operations used by traversals.
///
/// All calls are synchronous. Namespaced calls receive the session namespace explicitly; calls
/// taking an [`ObjectPath`] receive a path whose namespace has already been filled in.
pub trait CimTransport {
    /// Lists the namespaces of the broker; also serves as the liveness probe.
    ///
    /// # Errors
    /// Returns the transport error if the broker cannot be reached.
    fn enumerate_namespaces(&self) -> Result<Vec<String>>;

    /// Enumerates the paths of all instances of `class_name`.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn enumerate_instance_names(
        &self,
        namespace: &str,
        class_name: &str,
    ) -> Result<Elements<'_, ObjectPath>>;

    /// Enumerates the instances of `class_name`.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn enumerate_instances(
        &self,
        namespace: &str,
        class_name: &str,
        flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimInstance>>;

    /// Fetches a single instance.
    ///
    /// # Errors
    /// Returns the transport error if the instance cannot be fetched.
    fn get_instance(&self, path: &ObjectPath, flags: EnumerationFlags) -> Result<CimInstance>;

    /// Deletes a single instance.
    ///
    /// # Errors
    /// Returns the transport error if the broker refuses the deletion.
    fn delete_instance(&self, path: &ObjectPath) -> Result<()>;

    /// Enumerates the names of `class_name`'s subclasses, all of the namespace for an empty name.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn enumerate_class_names(
        &self,
        namespace: &str,
        class_name: &str,
        depth: DeepFlag,
    ) -> Result<Elements<'_, String>>;

    /// Enumerates the subclasses of `class_name`, all of the namespace for an empty name.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn enumerate_classes(
        &self,
        namespace: &str,
        class_name: &str,
        depth: DeepFlag,
        flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimClass>>;

    /// Fetches a single class definition.
    ///
    /// # Errors
    /// Returns the transport error if the class cannot be fetched.
    fn get_class(
        &self,
        namespace: &str,
        class_name: &str,
        flags: EnumerationFlags,
    ) -> Result<CimClass>;

    /// Enumerates the paths of the objects associated with `path`.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn associator_names(
        &self,
        path: &ObjectPath,
        filter: &AssociationFilter,
    ) -> Result<Elements<'_, ObjectPath>>;

    /// Enumerates the objects associated with `path`.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn associators(
        &self,
        path: &ObjectPath,
        filter: &AssociationFilter,
        flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimInstance>>;

    /// Enumerates the paths of the association instances referring to `path`.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn reference_names(
        &self,
        path: &ObjectPath,
        filter: &ReferenceFilter,
    ) -> Result<Elements<'_, ObjectPath>>;

    /// Enumerates the association instances referring to `path`.
    ///
    /// # Errors
    /// Returns the transport error if the request is rejected.
    fn references(
        &self,
        path: &ObjectPath,
        filter: &ReferenceFilter,
        flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimInstance>>;
}

/// An [`ElementSource`] over elements already received.
///
/// Handy for transports whose protocol returns complete result sets in one response.
#[derive(Debug)]
pub struct VecSource<T> {
    elements: std::vec::IntoIter<Result<T>>,
}

impl<T> VecSource<T> {
    /// Creates a source yielding `elements` in order.
    #[must_use]
    pub fn new(elements: Vec<T>) -> Self {
        VecSource {
            elements: elements.into_iter().map(Ok).collect::<Vec<_>>().into_iter(),
        }
    }

    /// Creates a source yielding each outcome in order, including failed pulls.
    #[must_use]
    pub fn from_results(elements: Vec<Result<T>>) -> Self {
        VecSource {
            elements: elements.into_iter(),
        }
    }
}

impl<T> ElementSource<T> for VecSource<T> {
    fn has_more(&mut self) -> bool {
        self.elements.len() > 0
    }

    fn next_element(&mut self) -> Result<T> {
        self.elements
            .next()
            .unwrap_or_else(|| Err(crate::Error::remote("result set exhausted")))
    }
}
