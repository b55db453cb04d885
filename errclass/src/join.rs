//! Joining errors into one value
//!
//! [`join`] keeps every member as its own error, so each one can still be
//! classified and compared by identity afterwards. Rendering comes in two
//! forms: `{}` is terse and leaves out collapsible members such as captured
//! stacks, `{:#}` is verbose and shows everything.

use crate::chain::SharedError;
use crate::stack::Stack;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Join errors into one.
///
/// `None` entries are dropped. With nothing left the result is `None`. A
/// single error is returned as-is when it is already a [`Wrapped`] or an
/// [`Aggregate`], otherwise it is put in a [`Wrapped`]. Two or more errors
/// become an [`Aggregate`] holding exactly those errors, in order; nested
/// aggregates are not flattened.
///
/// ```rust
/// use errclass::{join, Error};
///
/// let a = Error::conflict("lease held").into_shared();
/// let b = Error::data_loss("torn write").into_shared();
///
/// let err = join([Some(a), None, Some(b)]).unwrap();
/// assert_eq!(err.to_string(), "lease held\ntorn write");
/// assert!(join::<_, Option<errclass::SharedError>>([None, None]).is_none());
/// ```
pub fn join<I, T>(errs: I) -> Option<SharedError>
where
    I: IntoIterator<Item = T>,
    T: Into<Option<SharedError>>,
{
    let mut errs: Vec<SharedError> = errs.into_iter().filter_map(|e| e.into()).collect();

    match errs.len() {
        0 => None,
        1 => {
            let err = errs.pop()?;
            // wrapping again would nest the formatting
            if err.is::<Aggregate>() || err.is::<Wrapped>() {
                Some(err)
            } else {
                Some(Arc::new(Wrapped { cause: err }))
            }
        }
        _ => Some(Arc::new(Aggregate { errs })),
    }
}

/// Join two errors known to be present
pub(crate) fn join_pair(first: SharedError, second: SharedError) -> SharedError {
    Arc::new(Aggregate {
        errs: vec![first, second],
    })
}

/// Check whether an error is hidden from terse aggregate rendering
pub fn is_collapsible(err: &(dyn StdError + 'static)) -> bool {
    err.is::<Collapsed>() || err.is::<Stack>()
}

// =============================================================================
// Aggregate
// =============================================================================

/// An ordered list of two or more errors, built by [`join`].
#[derive(Debug)]
pub struct Aggregate {
    errs: Vec<SharedError>,
}

impl Aggregate {
    /// The members, in the order they were joined
    pub fn errors(&self) -> &[SharedError] {
        &self.errs
    }

    /// Number of members, never less than two
    pub fn len(&self) -> usize {
        self.errs.len()
    }

    /// Always `false`: [`join`] only builds an aggregate from two or more errors
    pub fn is_empty(&self) -> bool {
        self.errs.is_empty()
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbose = f.alternate();
        let mut first = true;

        for err in &self.errs {
            if !verbose && is_collapsible(&**err) {
                continue;
            }
            if !first {
                writeln!(f)?;
            }
            if verbose {
                write!(f, "{:#}", err)?;
            } else {
                write!(f, "{}", err)?;
            }
            first = false;
        }

        Ok(())
    }
}

// Members are reached through `errors()`; a single `source` would hide all
// but one of them.
impl StdError for Aggregate {}

// =============================================================================
// Wrapped
// =============================================================================

/// A single error put behind the join layer. Renders exactly as its cause.
#[derive(Debug)]
pub struct Wrapped {
    cause: SharedError,
}

impl Wrapped {
    pub fn cause(&self) -> &SharedError {
        &self.cause
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.cause, f)
    }
}

impl StdError for Wrapped {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.cause as &(dyn StdError + 'static))
    }
}

// =============================================================================
// Collapsed
// =============================================================================

/// Marks an error as collapsible: an [`Aggregate`] shows it only when
/// rendered with `{:#}`.
#[derive(Debug)]
pub struct Collapsed {
    inner: SharedError,
}

impl Collapsed {
    pub fn new(inner: SharedError) -> Self {
        Collapsed { inner }
    }

    pub fn inner(&self) -> &SharedError {
        &self.inner
    }
}

/// Shorthand for a shared [`Collapsed`] error
pub fn collapsed(inner: SharedError) -> SharedError {
    Arc::new(Collapsed::new(inner))
}

impl fmt::Display for Collapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl StdError for Collapsed {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.inner as &(dyn StdError + 'static))
    }
}
