//! Sessions: connection bootstrap and liveness probing.
//!
//! Traversals never manage a connection themselves. They borrow a [`SessionGate`], ask it whether
//! the broker is reachable before every operation, and take the transport and namespace from it.
//!
//! [`Session`] is the gate shipped with this crate. It holds the [`TraversalConfig`] and, once
//! connected, the transport opened by its [`Connector`]. A connection attempt parses the broker
//! URL, opens a transport and probes it by listing the broker's namespaces; the session only
//! keeps the transport when the probe succeeds.

use url::Url;

use crate::{client::CimTransport, config::TraversalConfig, Result};

/// Access to a broker connection, as consumed by traversals.
pub trait SessionGate {
    /// Connects to the broker at `url`, replacing an existing connection.
    ///
    /// An empty `namespace` selects the configured default namespace. Returns `true` if the
    /// broker answered the liveness probe.
    fn connect(&mut self, url: &str, namespace: &str) -> bool;

    /// Returns `true` if the broker can currently be used.
    fn is_available(&self) -> bool;

    /// The transport of the current connection.
    fn transport(&self) -> Option<&dyn CimTransport>;

    /// The namespace of the current connection.
    fn namespace(&self) -> &str;

    /// The configuration traversals over this session use.
    fn config(&self) -> &TraversalConfig;
}

/// Opens transports for a [`Session`].
pub trait Connector {
    /// Opens a transport to the broker at `url`, bound to `namespace`.
    ///
    /// # Errors
    /// Returns the transport's error if the broker cannot be reached.
    fn open(&self, url: &Url, namespace: &str) -> Result<Box<dyn CimTransport>>;
}

impl<F> Connector for F
where
    F: Fn(&Url, &str) -> Result<Box<dyn CimTransport>>,
{
    fn open(&self, url: &Url, namespace: &str) -> Result<Box<dyn CimTransport>> {
        self(url, namespace)
    }
}

/// A broker session over transports opened by `C`.
pub struct Session<C: Connector> {
    connector: C,
    config: TraversalConfig,
    transport: Option<Box<dyn CimTransport>>,
    namespace: String,
    url: Option<Url>,
}

impl<C: Connector> Session<C> {
    /// Creates an unconnected session with the default configuration.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Session::with_config(connector, TraversalConfig::default())
    }

    /// Creates an unconnected session.
    #[must_use]
    pub fn with_config(connector: C, config: TraversalConfig) -> Self {
        Session {
            namespace: config.namespace.clone(),
            connector,
            config,
            transport: None,
            url: None,
        }
    }

    /// Connects to the broker at `url`, replacing an existing connection.
    ///
    /// An empty `namespace` selects the configured default namespace.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidUrl`] if `url` does not parse, or the transport error of
    /// opening the connection or of the liveness probe. The session is left unconnected.
    pub fn try_connect(&mut self, url: &str, namespace: &str) -> Result<()> {
        self.disconnect();

        let url = Url::parse(url)?;
        let namespace = if namespace.is_empty() {
            self.config.namespace.clone()
        } else {
            namespace.to_string()
        };

        log::debug!(
            "connecting to {}://{} namespace {}",
            url.scheme(),
            url.host_str().unwrap_or_default(),
            namespace
        );

        let transport = self.connector.open(&url, &namespace)?;
        let namespaces = transport.enumerate_namespaces()?;
        log::debug!("broker reports {} namespaces", namespaces.len());

        self.transport = Some(transport);
        self.namespace = namespace;
        self.url = Some(url);
        Ok(())
    }

    /// Drops the current connection, if any.
    pub fn disconnect(&mut self) {
        self.transport = None;
        self.url = None;
        self.namespace = self.config.namespace.clone();
    }

    /// Returns `true` if a transport is open, without probing it.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// The URL of the current connection.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }
}

impl<C: Connector> SessionGate for Session<C> {
    fn connect(&mut self, url: &str, namespace: &str) -> bool {
        match self.try_connect(url, namespace) {
            Ok(()) => true,
            Err(error) => {
                log::error!("connect failed: {}", error);
                false
            }
        }
    }

    fn is_available(&self) -> bool {
        let Some(transport) = &self.transport else {
            return false;
        };
        if !self.config.probe_before_use {
            return true;
        }

        match transport.enumerate_namespaces() {
            Ok(_) => true,
            Err(error) => {
                log::error!("could not enumerate namespaces: {}", error);
                false
            }
        }
    }

    fn transport(&self) -> Option<&dyn CimTransport> {
        self.transport.as_deref()
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn config(&self) -> &TraversalConfig {
        &self.config
    }
}
