//! Walking error chains and testing them for kinds
//!
//! An error may point at zero, one or many causes: `source()` gives one,
//! [`Aggregate`] gives many, and a few holder types are looked through
//! transparently. Together they form a DAG, which is walked depth-first,
//! pre-order, left to right, visiting every node at most once.

use crate::{Aggregate, Error, ErrorKind, KindSet};
use std::collections::HashSet;
use std::error::Error as StdError;
use std::ops::ControlFlow;
use std::sync::Arc;

/// A shared, immutable error handle.
///
/// Sharing lets one error be reachable through several joins, and
/// `Arc::ptr_eq` gives it an identity.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Maximum depth followed below the root of a walk.
///
/// Each [`wrap`](crate::wrap) puts its cause two levels deeper (the join,
/// then the message), so a kind survives 128 nested wraps.
pub const MAX_DEPTH: usize = 256;

/// Convert anything error-like into a [`SharedError`].
///
/// Accepts concrete errors, `anyhow::Error`, boxed errors and strings.
/// Pass an existing `SharedError` around with `Arc::clone` instead, so its
/// identity is kept.
pub fn shared<E>(err: E) -> SharedError
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    Arc::from(err.into())
}

/// The immediate causes of one error, left to right.
pub fn causes<'a>(err: &'a (dyn StdError + 'static)) -> Vec<&'a (dyn StdError + 'static)> {
    if let Some(aggregate) = err.downcast_ref::<Aggregate>() {
        return aggregate
            .errors()
            .iter()
            .map(|e| &**e as &(dyn StdError + 'static))
            .collect();
    }

    // holders whose Error impl forwards to the inner value
    if let Some(inner) = err.downcast_ref::<SharedError>() {
        return vec![&**inner as &(dyn StdError + 'static)];
    }

    // io::Error::source skips its own payload
    if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
        return io_err
            .get_ref()
            .map(|inner| vec![inner as &(dyn StdError + 'static)])
            .unwrap_or_default();
    }

    err.source().into_iter().collect()
}

/// Walk every node reachable from `err`, stopping early when `visit` breaks.
pub fn walk<'a, F>(err: &'a (dyn StdError + 'static), mut visit: F) -> ControlFlow<()>
where
    F: FnMut(&'a (dyn StdError + 'static)) -> ControlFlow<()>,
{
    // keyed on address and vtable: a struct holding its cause inline shares
    // the cause's address
    let mut seen: HashSet<*const (dyn StdError + 'static)> = HashSet::new();
    let mut pending = vec![(err, 0usize)];

    while let Some((node, depth)) = pending.pop() {
        // zero-sized errors share addresses; they are never deduplicated
        if std::mem::size_of_val(node) != 0 && !seen.insert(node as *const _) {
            continue;
        }

        visit(node)?;

        if depth == MAX_DEPTH {
            continue;
        }
        for cause in causes(node).into_iter().rev() {
            pending.push((cause, depth + 1));
        }
    }

    ControlFlow::Continue(())
}

/// Structural kind of an io error
pub(crate) fn io_error_kind(err: &std::io::Error) -> Option<ErrorKind> {
    use std::io::ErrorKind as Io;

    match err.kind() {
        Io::NotFound => Some(ErrorKind::NotFound),
        Io::PermissionDenied => Some(ErrorKind::PermissionDenied),
        Io::AlreadyExists => Some(ErrorKind::AlreadyExists),
        Io::InvalidInput => Some(ErrorKind::InvalidArgument),
        Io::TimedOut => Some(ErrorKind::DeadlineExceeded),
        Io::Unsupported => Some(ErrorKind::NotImplemented),
        Io::ConnectionRefused => Some(ErrorKind::Unavailable),
        Io::OutOfMemory => Some(ErrorKind::ResourceExhausted),
        Io::Interrupted => Some(ErrorKind::Canceled),
        _ => None,
    }
}

/// The kind a single node carries by itself, ignoring its causes
fn node_kind(node: &(dyn StdError + 'static)) -> Option<ErrorKind> {
    if let Some(err) = node.downcast_ref::<Error>() {
        return Some(err.kind());
    }
    node.downcast_ref::<std::io::Error>().and_then(io_error_kind)
}

/// Every kind carried anywhere in the chain
pub fn kinds(err: &(dyn StdError + 'static)) -> KindSet {
    let mut set = KindSet::new();
    let _ = walk(err, |node| {
        if let Some(kind) = node_kind(node) {
            set.insert(kind);
        }
        ControlFlow::Continue(())
    });
    set
}

/// The first kind met in walk order, or `None` for an unclassified error
pub fn kind_of(err: &(dyn StdError + 'static)) -> Option<ErrorKind> {
    let mut found = None;
    let _ = walk(err, |node| match node_kind(node) {
        Some(kind) => {
            found = Some(kind);
            ControlFlow::Break(())
        }
        None => ControlFlow::Continue(()),
    });
    found
}

/// Check whether any node reachable from `err` carries `kind`.
///
/// `None` is never of any kind.
pub fn is_kind(err: Option<&(dyn StdError + 'static)>, kind: ErrorKind) -> bool {
    let Some(err) = err else {
        return false;
    };
    walk(err, |node| {
        if node_kind(node) == Some(kind) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

// =============================================================================
// Predicates, one per kind
// =============================================================================

pub fn is_invalid_argument(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::InvalidArgument)
}

pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::NotFound)
}

pub fn is_already_exists(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::AlreadyExists)
}

pub fn is_failed_precondition(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::FailedPrecondition)
}

pub fn is_conflict(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::Conflict)
}

pub fn is_not_modified(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::NotModified)
}

pub fn is_unavailable(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::Unavailable)
}

pub fn is_not_implemented(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::NotImplemented)
}

pub fn is_canceled(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::Canceled)
}

pub fn is_deadline_exceeded(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::DeadlineExceeded)
}

pub fn is_unauthorized(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::Unauthorized)
}

pub fn is_permission_denied(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::PermissionDenied)
}

pub fn is_internal(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::Internal)
}

pub fn is_data_loss(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::DataLoss)
}

pub fn is_aborted(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::Aborted)
}

pub fn is_out_of_range(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::OutOfRange)
}

pub fn is_resource_exhausted(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::ResourceExhausted)
}

pub fn is_unknown(err: &(dyn StdError + 'static)) -> bool {
    is_kind(Some(err), ErrorKind::Unknown)
}
