//! Attaching call-site context to errors
//!
//! `wrap` and friends put a message in front of an error and join a captured
//! [`Stack`](crate::Stack) next to it. Terse rendering shows the message
//! chain, verbose rendering adds the stack. The original error stays
//! reachable through the chain, so it can still be classified and compared.
//!
//! ```rust
//! use errclass::{is_not_found, wrap, Error};
//!
//! let err = Error::not_found("manifest").into_shared();
//! let err = wrap(err, "resolving image").unwrap();
//!
//! assert_eq!(err.to_string(), "resolving image: manifest");
//! assert!(is_not_found(&*err));
//! ```

use crate::chain::SharedError;
use crate::join::join_pair;
use crate::stack::capture;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// A message, optionally in front of the error it describes
#[derive(Debug)]
pub struct Context {
    message: String,
    cause: Option<SharedError>,
}

impl Context {
    pub fn new(message: impl Into<String>, cause: Option<SharedError>) -> Self {
        Context {
            message: message.into(),
            cause,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&SharedError> {
        self.cause.as_ref()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        match &self.cause {
            Some(cause) if f.alternate() => write!(f, ": {:#}", cause),
            Some(cause) => write!(f, ": {}", cause),
            None => Ok(()),
        }
    }
}

impl StdError for Context {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| &**cause as &(dyn StdError + 'static))
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// A new error with a captured stack
#[inline(never)]
pub fn new(message: impl Into<String>) -> SharedError {
    join_pair(Arc::new(Context::new(message, None)), capture(1))
}

/// A new error from format arguments, with a captured stack
///
/// ```rust
/// let err = errclass::errorf(format_args!("shim {} exited", 42));
/// assert_eq!(err.to_string(), "shim 42 exited");
/// ```
#[inline(never)]
pub fn errorf(args: fmt::Arguments<'_>) -> SharedError {
    join_pair(Arc::new(Context::new(args.to_string(), None)), capture(1))
}

/// Put `message` in front of `err` and attach the caller's stack.
///
/// Returns `None` when `err` is `None`.
#[inline(never)]
pub fn wrap(err: impl Into<Option<SharedError>>, message: impl Into<String>) -> Option<SharedError> {
    let err = err.into()?;
    Some(join_pair(
        Arc::new(Context::new(message, Some(err))),
        capture(1),
    ))
}

/// [`wrap`] with a formatted message
#[inline(never)]
pub fn wrapf(err: impl Into<Option<SharedError>>, args: fmt::Arguments<'_>) -> Option<SharedError> {
    let err = err.into()?;
    Some(join_pair(
        Arc::new(Context::new(args.to_string(), Some(err))),
        capture(1),
    ))
}

/// Put `message` in front of `err` without capturing a stack
pub fn with_message(
    err: impl Into<Option<SharedError>>,
    message: impl Into<String>,
) -> Option<SharedError> {
    let err = err.into()?;
    Some(Arc::new(Context::new(message, Some(err))))
}

/// [`with_message`] with a formatted message
pub fn with_messagef(
    err: impl Into<Option<SharedError>>,
    args: fmt::Arguments<'_>,
) -> Option<SharedError> {
    with_message(err, args.to_string())
}

/// Attach the caller's stack to `err`
#[inline(never)]
pub fn with_stack(err: impl Into<Option<SharedError>>) -> Option<SharedError> {
    let err = err.into()?;
    Some(join_pair(err, capture(1)))
}
