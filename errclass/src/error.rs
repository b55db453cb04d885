//! The kinded Error type

use crate::chain::{io_error_kind, kind_of, shared, SharedError};
use crate::ErrorKind;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// An error constructed as one [`ErrorKind`].
///
/// This error type provides:
/// - `kind`: Which semantic kind the error belongs to
/// - `message`: Human-readable description
/// - `context`: Key-value pairs for debugging
/// - `source`: The underlying error (if any), kept as a shared handle so the
///   same cause may be reachable from several places
///
/// # Example
///
/// ```rust
/// use errclass::{is_not_found, Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::NotFound, "image missing")
///     .with_context("ref", "docker.io/library/alpine");
///
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert!(is_not_found(&err));
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<SharedError>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Get the source error (if any)
    pub fn source_ref(&self) -> Option<&SharedError> {
        self.source.as_ref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// Accepts anything that converts into a boxed error, including
    /// `anyhow::Error`, `std::io::Error` and plain strings.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(self, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        self.set_shared_source(shared(source))
    }

    /// Set the source error from an existing shared handle, keeping its identity.
    pub fn set_shared_source(mut self, source: SharedError) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source);
        self
    }

    /// Convert into a shared handle, ready for [`crate::join`]
    pub fn into_shared(self) -> SharedError {
        Arc::new(self)
    }
}

// =============================================================================
// Display - compact, single-line format, used as the status detail
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind.description())?;
        } else {
            write!(f, "{}", self.message)?;
        }

        if !self.context.is_empty() {
            write!(f, " {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if let Some(source) = &self.source {
            if f.alternate() {
                write!(f, ": {:#}", source)?;
            } else {
                write!(f, ": {}", source)?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:#}", source)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn StdError + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = io_error_kind(&err).unwrap_or(ErrorKind::Unknown);
        Error::new(kind, "io").set_source(err)
    }
}

/// Keeps the first kind found in the anyhow chain, `Unknown` when there is none
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        let kind = kind_of(&*err).unwrap_or(ErrorKind::Unknown);
        Error::new(kind, "").set_source(err)
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a NotFound error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an AlreadyExists error
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    /// Create a FailedPrecondition error
    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FailedPrecondition, message)
    }

    /// Create a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a NotModified error
    pub fn not_modified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotModified, message)
    }

    /// Create an Unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// Create a NotImplemented error
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    /// Create a Canceled error
    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Canceled, message)
    }

    /// Create a DeadlineExceeded error
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeadlineExceeded, message)
    }

    /// Create an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a PermissionDenied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a DataLoss error
    pub fn data_loss(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataLoss, message)
    }

    /// Create an Aborted error
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Aborted, message)
    }

    /// Create an OutOfRange error
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange, message)
    }

    /// Create a ResourceExhausted error
    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceExhausted, message)
    }

    /// Create an Unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::NotFound, "container 'web' not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "container 'web' not found");
        assert!(err.source_ref().is_none());
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::conflict("lease held")
            .with_context("lease", "gc-1")
            .with_context("owner", "snapshotter");

        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("lease", "gc-1".to_string()));
        assert_eq!(err.to_string(), "lease held { lease: gc-1, owner: snapshotter }");
    }

    #[test]
    fn test_display_falls_back_to_kind() {
        let err = Error::new(ErrorKind::DeadlineExceeded, "");
        assert_eq!(err.to_string(), "deadline exceeded");
    }

    #[test]
    fn test_display_includes_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = Error::internal("write snapshot").set_source(io_err);
        assert_eq!(err.to_string(), "write snapshot: disk full");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_set_source_accepts_anyhow() {
        let cause = anyhow::anyhow!("upstream refused");
        let err = Error::unavailable("registry").set_source(cause);
        assert_eq!(err.to_string(), "registry: upstream refused");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/var/lib");
        let err = Error::from(io_err);
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "odd");
        assert_eq!(Error::from(io_err).kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_from_anyhow_keeps_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        let err = Error::from(anyhow::Error::new(io_err).context("loading config"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "not found: loading config");

        let err = Error::from(anyhow::anyhow!("no idea"));
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(Error::invalid_argument("x").kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::not_modified("x").kind(), ErrorKind::NotModified);
        assert_eq!(Error::unauthorized("x").kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::resource_exhausted("x").kind(), ErrorKind::ResourceExhausted);
        assert_eq!(Error::unknown("x").kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_debug_is_multiline() {
        let err = Error::data_loss("checksum mismatch").with_context("blob", "sha256:ab");
        let debug = format!("{:?}", err);
        assert!(debug.starts_with("data_loss\n"));
        assert!(debug.contains("Message: checksum mismatch"));
        assert!(debug.contains("blob: sha256:ab"));
    }
}
