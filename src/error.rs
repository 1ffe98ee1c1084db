use thiserror::Error;

use crate::model::CimType;

macro_rules! malformed_path {
    // Single string version
    ($msg:expr) => {
        crate::Error::MalformedPath {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedPath {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants are split so that a caller can always tell apart the three outcomes that matter
/// when talking to a broker: the operation produced nothing (an `Ok` holding an empty list or
/// map), the operation failed ([`Error::RemoteProtocol`], [`Error::MalformedPath`], ...), or there
/// was no live session to run it on ([`Error::Unavailable`]).
///
/// # Error Categories
///
/// ## Session Errors
/// - [`Error::Unavailable`] - No live session, the availability probe failed
/// - [`Error::InvalidUrl`] - The broker URL handed to `connect` could not be parsed
///
/// ## Remote Errors
/// - [`Error::RemoteProtocol`] - The broker rejected or failed a request
/// - [`Error::Disconnected`] - The transport lost its connection mid-operation
///
/// ## Codec Errors
/// - [`Error::MalformedPath`] - Object path text could not be parsed
/// - [`Error::UnsupportedValueKind`] - A CIM type name is not known to this layer
/// - [`Error::TypeMismatch`] - A value did not have the expected CIM type
/// - [`Error::InvalidArgument`] - A caller supplied argument had the wrong shape
///
/// # Examples
///
/// ```rust
/// use cimscope::{codec::path, Error};
///
/// match path::parse("root/cimv2:") {
///     Ok(path) => println!("parsed {}", path),
///     Err(Error::MalformedPath { message, .. }) => eprintln!("bad path: {}", message),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Session errors
    /// No live session is available.
    ///
    /// Returned by every traversal operation when the session gate reports the broker as
    /// unreachable. This is never folded into an empty result.
    #[error("The CIM broker is not available")]
    Unavailable,

    /// The URL given to `connect` is not a valid URL.
    #[error("Invalid broker URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Remote errors
    /// The broker rejected or failed a request.
    ///
    /// Carries the message reported by the broker. Surfaced for the outer call of an operation;
    /// inside an enumeration, the affected element is skipped instead.
    #[error("Remote protocol error: {message}")]
    RemoteProtocol {
        /// The message reported by the broker or transport
        message: String,
    },

    /// The transport lost its connection.
    ///
    /// This is the transport-level subtype of a remote protocol failure. Unlike
    /// [`Error::RemoteProtocol`] it is fatal to an enumeration in progress.
    #[error("Connection to the CIM broker lost: {0}")]
    Disconnected(String),

    // Codec errors
    /// The object path text could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed object path - {file}:{line}: {message}")]
    MalformedPath {
        /// The message to be printed for the MalformedPath error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The CIM data type name is not supported by this layer.
    ///
    /// The value codec never returns this; unsupported values degrade to `Void` there. It is
    /// produced when a type name is parsed explicitly, e.g. by a transport decoding a response.
    #[error("Unsupported CIM value kind - {0}")]
    UnsupportedValueKind(String),

    /// A value had a different CIM type than required.
    #[error("Type mismatch - expected {expected}, found {found}")]
    TypeMismatch {
        /// The type that was required
        expected: CimType,
        /// The type that was found
        found: String,
    },

    /// A caller supplied argument had the wrong shape or was missing.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Creates a [`Error::RemoteProtocol`] from any displayable broker message.
    pub fn remote(message: impl Into<String>) -> Self {
        Error::RemoteProtocol {
            message: message.into(),
        }
    }

    /// Returns `true` if this error must abort an enumeration instead of skipping one element.
    ///
    /// Per-element failures (a broker rejecting a single secondary fetch, a malformed element)
    /// degrade the result set. A lost connection or a vanished session cannot be recovered from
    /// by skipping, so those abort.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Disconnected(_) | Error::Unavailable)
    }
}
