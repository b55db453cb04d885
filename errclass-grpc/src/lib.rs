//! # errclass-grpc
//!
//! Translation between errclass kinds and gRPC status codes.
//!
//! The table and its priority order are the contract with the other side of
//! the wire: an error that carries several kinds always translates to the
//! same code, and translating twice is a no-op.
//!
//! ```rust
//! use errclass::{join, Error};
//! use errclass_grpc::to_status;
//! use tonic::{Code, Status};
//!
//! let err = join([None, Some(Error::not_found("image x").into_shared()), None]);
//! let status = to_status(err).unwrap();
//!
//! let status = status.downcast_ref::<Status>().unwrap();
//! assert_eq!(status.code(), Code::NotFound);
//! assert!(status.message().contains("x"));
//! ```

use errclass::{kinds, walk, Error, ErrorKind, SharedError};
use std::error::Error as StdError;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use tonic::{Code, Status};

/// The status code a kind translates to
pub fn code_for(kind: ErrorKind) -> Code {
    match kind {
        ErrorKind::InvalidArgument => Code::InvalidArgument,
        ErrorKind::NotFound => Code::NotFound,
        ErrorKind::AlreadyExists => Code::AlreadyExists,
        ErrorKind::FailedPrecondition | ErrorKind::Conflict | ErrorKind::NotModified => {
            Code::FailedPrecondition
        }
        ErrorKind::Unavailable => Code::Unavailable,
        ErrorKind::NotImplemented => Code::Unimplemented,
        ErrorKind::Canceled => Code::Cancelled,
        ErrorKind::DeadlineExceeded => Code::DeadlineExceeded,
        ErrorKind::Unauthorized => Code::Unauthenticated,
        ErrorKind::PermissionDenied => Code::PermissionDenied,
        ErrorKind::Internal => Code::Internal,
        ErrorKind::DataLoss => Code::DataLoss,
        ErrorKind::Aborted => Code::Aborted,
        ErrorKind::OutOfRange => Code::OutOfRange,
        ErrorKind::ResourceExhausted => Code::ResourceExhausted,
        ErrorKind::Unknown => Code::Unknown,
    }
}

/// The kind a status code translates back to. `Ok` has none.
pub fn kind_for(code: Code) -> Option<ErrorKind> {
    match code {
        Code::Ok => None,
        Code::InvalidArgument => Some(ErrorKind::InvalidArgument),
        Code::NotFound => Some(ErrorKind::NotFound),
        Code::AlreadyExists => Some(ErrorKind::AlreadyExists),
        Code::FailedPrecondition => Some(ErrorKind::FailedPrecondition),
        Code::Unavailable => Some(ErrorKind::Unavailable),
        Code::Unimplemented => Some(ErrorKind::NotImplemented),
        Code::Cancelled => Some(ErrorKind::Canceled),
        Code::DeadlineExceeded => Some(ErrorKind::DeadlineExceeded),
        Code::Unauthenticated => Some(ErrorKind::Unauthorized),
        Code::PermissionDenied => Some(ErrorKind::PermissionDenied),
        Code::Internal => Some(ErrorKind::Internal),
        Code::DataLoss => Some(ErrorKind::DataLoss),
        Code::Aborted => Some(ErrorKind::Aborted),
        Code::OutOfRange => Some(ErrorKind::OutOfRange),
        Code::ResourceExhausted => Some(ErrorKind::ResourceExhausted),
        Code::Unknown => Some(ErrorKind::Unknown),
    }
}

/// The kind that decides the status of `err`: the first of
/// [`ErrorKind::PRIORITY`] found anywhere in its chain.
pub fn classify(err: &(dyn StdError + 'static)) -> Option<ErrorKind> {
    kinds(err).first_by_priority()
}

/// The first status found in the chain of `err`
fn find_status<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Status> {
    let mut found = None;
    let _ = walk(err, |node| match node.downcast_ref::<Status>() {
        Some(status) => {
            found = Some(status);
            ControlFlow::Break(())
        }
        None => ControlFlow::Continue(()),
    });
    found
}

/// Check whether `err` already carries a gRPC status
pub fn is_status(err: &(dyn StdError + 'static)) -> bool {
    find_status(err).is_some()
}

/// Translate an error into a gRPC status error.
///
/// - `None` stays `None`.
/// - An error that already carries a [`Status`] is returned unchanged.
/// - Otherwise the highest priority kind in the chain picks the code and the
///   error's terse rendering becomes the status message.
/// - An unclassified error is returned unchanged.
pub fn to_status(err: impl Into<Option<SharedError>>) -> Option<SharedError> {
    let err = err.into()?;

    if is_status(&*err) {
        tracing::trace!("error already carries a status");
        return Some(err);
    }

    let Some(kind) = classify(&*err) else {
        tracing::trace!("error has no kind, passing through");
        return Some(err);
    };

    let code = code_for(kind);
    tracing::trace!(%kind, ?code, "translated error to status");
    Some(Arc::new(Status::new(code, err.to_string())))
}

/// [`to_status`] after putting a formatted message in front of `err`.
///
/// The message is composed first, so classification sees the whole chain.
pub fn to_statusf(err: impl Into<Option<SharedError>>, args: fmt::Arguments<'_>) -> Option<SharedError> {
    to_status(errclass::with_messagef(err, args))
}

/// A status for `err`, for handlers that have to return one.
///
/// A status carried in the chain keeps its code; a classified error gets the
/// code of its kind; anything else is `Unknown`. The message is the terse
/// rendering of `err`, with a carried status rendered as its message only.
pub fn status_of(err: &SharedError) -> Status {
    if let Some(status) = err.downcast_ref::<Status>() {
        return status.clone();
    }

    let message = err.to_string();
    if let Some(status) = find_status(&**err) {
        // Status's Display dumps code, details and metadata
        let message = message.replace(&status.to_string(), status.message());
        return Status::new(status.code(), message);
    }

    match classify(&**err) {
        Some(kind) => Status::new(code_for(kind), message),
        None => Status::unknown(message),
    }
}

/// Rebuild a kinded error from a status received over the wire
pub fn from_status(status: &Status) -> Option<Error> {
    kind_for(status.code()).map(|kind| Error::new(kind, status.message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use errclass::{join, shared, with_message, Error};

    fn code_of(err: &SharedError) -> Code {
        err.downcast_ref::<Status>().unwrap().code()
    }

    #[test]
    fn test_code_table() {
        for kind in ErrorKind::ALL {
            let err = Error::new(kind, "boom").into_shared();
            let status = to_status(err).unwrap();
            assert_eq!(code_of(&status), code_for(kind), "kind {}", kind);
        }
    }

    #[test]
    fn test_merged_bucket() {
        assert_eq!(code_for(ErrorKind::FailedPrecondition), Code::FailedPrecondition);
        assert_eq!(code_for(ErrorKind::Conflict), Code::FailedPrecondition);
        assert_eq!(code_for(ErrorKind::NotModified), Code::FailedPrecondition);
    }

    #[test]
    fn test_none() {
        assert!(to_status(None::<SharedError>).is_none());
    }

    #[test]
    fn test_idempotent() {
        let first = to_status(Error::aborted("txn").into_shared()).unwrap();
        let second = to_status(first.clone()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_wrapped_status_passes_through() {
        let status: SharedError = Arc::new(Status::not_found("remote"));
        let err = with_message(status, "call shim").unwrap();
        let out = to_status(err.clone()).unwrap();
        assert!(Arc::ptr_eq(&err, &out));
    }

    #[test]
    fn test_unclassified_passes_through() {
        let err = shared("plain");
        let out = to_status(err.clone()).unwrap();
        assert!(Arc::ptr_eq(&err, &out));
    }

    #[test]
    fn test_priority_over_members() {
        let err = join([
            Error::data_loss("b").into_shared(),
            Error::invalid_argument("a").into_shared(),
        ])
        .unwrap();
        let status = to_status(err).unwrap();
        assert_eq!(code_of(&status), Code::InvalidArgument);
    }

    #[test]
    fn test_to_statusf_composes_first() {
        let err = Error::unauthorized("token expired").into_shared();
        let status = to_statusf(err, format_args!("pull {}", "alpine")).unwrap();
        let status = status.downcast_ref::<Status>().unwrap();
        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "pull alpine: token expired");
    }

    #[test]
    fn test_status_of() {
        let err = Error::not_implemented("checkpoint").into_shared();
        assert_eq!(status_of(&err).code(), Code::Unimplemented);

        let err = shared("weird");
        let status = status_of(&err);
        assert_eq!(status.code(), Code::Unknown);
        assert_eq!(status.message(), "weird");

        let inner: SharedError = Arc::new(Status::resource_exhausted("quota"));
        let err = with_message(inner, "create").unwrap();
        let status = status_of(&err);
        assert_eq!(status.code(), Code::ResourceExhausted);
        assert_eq!(status.message(), "create: quota");

        let inner: SharedError = Arc::new(Status::unavailable("shim gone"));
        let err = join([with_message(inner, "exec").unwrap(), shared("cleanup")]).unwrap();
        let status = status_of(&err);
        assert_eq!(status.code(), Code::Unavailable);
        assert_eq!(status.message(), "exec: shim gone\ncleanup");
    }

    #[test]
    fn test_from_status() {
        let err = from_status(&Status::unauthenticated("no token")).unwrap();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.message(), "no token");

        assert!(from_status(&Status::ok("")).is_none());

        for kind in ErrorKind::ALL {
            let back = kind_for(code_for(kind)).unwrap();
            assert_eq!(code_for(back), code_for(kind));
        }
    }
}
