//! # errclass
//!
//! Error classification and composition for services that talk across RPC
//! boundaries.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: A closed set of semantic kinds (NotFound, Conflict, ...)
//!   that both sides of a boundary agree on
//! - **Predicates**: `is_not_found(err)` and friends walk the whole cause
//!   chain, through single causes and joined errors alike
//! - **Join**: Several errors become one value without losing any of them
//! - **Context**: `wrap` adds a message and a captured stack while keeping
//!   the original error reachable
//!
//! ## Usage
//!
//! ```rust
//! use errclass::{is_not_found, join, wrap, Error};
//!
//! fn lookup(id: &str) -> Result<(), errclass::SharedError> {
//!     let err = Error::not_found(format!("container {}", id)).into_shared();
//!     Err(wrap(err, "start task").expect("input is present"))
//! }
//!
//! let err = lookup("web").unwrap_err();
//! assert!(is_not_found(&*err));
//! assert_eq!(err.to_string(), "start task: container web");
//!
//! // the captured stack only shows up in verbose rendering
//! assert!(format!("{:#}", err).contains("stack trace"));
//!
//! let both = join([err, Error::internal("cleanup").into_shared()]).unwrap();
//! assert_eq!(both.to_string(), "start task: container web\ncleanup");
//! ```
//!
//! ## Rendering
//!
//! - `{}` is terse: members of a join that are collapsible (captured stacks,
//!   [`Collapsed`] errors) are left out
//! - `{:#}` is verbose: everything is shown, one member per line

mod chain;
mod context;
mod error;
mod join;
mod kind;
mod stack;

pub use chain::{
    causes, is_aborted, is_already_exists, is_canceled, is_conflict, is_data_loss,
    is_deadline_exceeded, is_failed_precondition, is_internal, is_invalid_argument, is_kind,
    is_not_found, is_not_implemented, is_not_modified, is_out_of_range, is_permission_denied,
    is_resource_exhausted, is_unauthorized, is_unavailable, is_unknown, kind_of, kinds, shared,
    walk, SharedError, MAX_DEPTH,
};
pub use context::{errorf, new, with_message, with_messagef, with_stack, wrap, wrapf, Context};
pub use error::Error;
pub use join::{collapsed, is_collapsible, join, Aggregate, Collapsed, Wrapped};
pub use kind::{ErrorKind, KindSet};
pub use stack::{capture, Stack};

/// Result type alias using errclass Error
///
/// ```rust
/// use errclass::{is_out_of_range, Error};
///
/// fn offset(index: usize, len: usize) -> errclass::Result<usize> {
///     if index >= len {
///         return Err(Error::out_of_range(format!("index {} of {}", index, len)));
///     }
///     Ok(index * 8)
/// }
///
/// assert_eq!(offset(1, 4).unwrap(), 8);
/// assert!(is_out_of_range(&offset(4, 4).unwrap_err()));
/// ```
pub type Result<T> = std::result::Result<T, Error>;
