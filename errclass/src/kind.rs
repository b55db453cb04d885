//! Error kinds shared across service boundaries

use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic kind of an error.
///
/// The set is closed: every service on either side of an RPC boundary agrees
/// on exactly these labels. A kind says nothing about the concrete error
/// type; an error carries a kind because it was built as one
/// ([`crate::Error::new`]) or because it structurally maps to one (for
/// example a `std::io::Error` with `io::ErrorKind::NotFound`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // =========================================================================
    // Request errors
    // =========================================================================
    /// The caller supplied an invalid argument
    InvalidArgument,

    /// The requested object does not exist
    NotFound,

    /// The object the caller tried to create already exists
    AlreadyExists,

    /// The system is not in a state required for the operation
    FailedPrecondition,

    /// The operation conflicts with the current state of the object
    Conflict,

    /// The object was not modified
    NotModified,

    // =========================================================================
    // Availability errors
    // =========================================================================
    /// The service is currently unavailable
    Unavailable,

    /// The operation is not implemented or not supported
    NotImplemented,

    /// The operation was canceled, typically by the caller
    Canceled,

    /// The deadline expired before the operation could complete
    DeadlineExceeded,

    // =========================================================================
    // Access errors
    // =========================================================================
    /// The caller has no valid authentication credentials
    Unauthorized,

    /// The caller is authenticated but not allowed to perform the operation
    PermissionDenied,

    // =========================================================================
    // System errors
    // =========================================================================
    /// An internal invariant was broken
    Internal,

    /// Unrecoverable data loss or corruption
    DataLoss,

    /// The operation was aborted, typically due to a concurrency issue
    Aborted,

    /// The operation was attempted past the valid range
    OutOfRange,

    /// Some resource has been exhausted
    ResourceExhausted,

    /// The error is known to be an error but nothing more is known
    Unknown,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 18] = [
        ErrorKind::InvalidArgument,
        ErrorKind::NotFound,
        ErrorKind::AlreadyExists,
        ErrorKind::FailedPrecondition,
        ErrorKind::Conflict,
        ErrorKind::NotModified,
        ErrorKind::Unavailable,
        ErrorKind::NotImplemented,
        ErrorKind::Canceled,
        ErrorKind::DeadlineExceeded,
        ErrorKind::Unauthorized,
        ErrorKind::PermissionDenied,
        ErrorKind::Internal,
        ErrorKind::DataLoss,
        ErrorKind::Aborted,
        ErrorKind::OutOfRange,
        ErrorKind::ResourceExhausted,
        ErrorKind::Unknown,
    ];

    /// The order in which kinds are tested when an error has to be reduced to
    /// a single classification. The first kind present wins.
    ///
    /// `FailedPrecondition`, `Conflict` and `NotModified` share one slot: they
    /// are adjacent here and always translate to the same status.
    pub const PRIORITY: [ErrorKind; 18] = [
        ErrorKind::InvalidArgument,
        ErrorKind::NotFound,
        ErrorKind::AlreadyExists,
        ErrorKind::FailedPrecondition,
        ErrorKind::Conflict,
        ErrorKind::NotModified,
        ErrorKind::Unavailable,
        ErrorKind::NotImplemented,
        ErrorKind::Canceled,
        ErrorKind::DeadlineExceeded,
        ErrorKind::Unauthorized,
        ErrorKind::PermissionDenied,
        ErrorKind::Internal,
        ErrorKind::DataLoss,
        ErrorKind::Aborted,
        ErrorKind::OutOfRange,
        ErrorKind::ResourceExhausted,
        ErrorKind::Unknown,
    ];

    /// Returns the stable name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            // Request
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::FailedPrecondition => "failed_precondition",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotModified => "not_modified",

            // Availability
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::NotImplemented => "not_implemented",
            ErrorKind::Canceled => "canceled",
            ErrorKind::DeadlineExceeded => "deadline_exceeded",

            // Access
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::PermissionDenied => "permission_denied",

            // System
            ErrorKind::Internal => "internal",
            ErrorKind::DataLoss => "data_loss",
            ErrorKind::Aborted => "aborted",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::ResourceExhausted => "resource_exhausted",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Human readable description, used when an error has no message of its own
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::NotFound => "not found",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::FailedPrecondition => "failed precondition",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotModified => "not modified",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::NotImplemented => "not implemented",
            ErrorKind::Canceled => "canceled",
            ErrorKind::DeadlineExceeded => "deadline exceeded",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::Internal => "internal",
            ErrorKind::DataLoss => "data loss",
            ErrorKind::Aborted => "aborted",
            ErrorKind::OutOfRange => "out of range",
            ErrorKind::ResourceExhausted => "resource exhausted",
            ErrorKind::Unknown => "unknown",
        }
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// KindSet - every kind found while walking one error
// =============================================================================

/// A set of kinds, as collected from an error chain by [`crate::kinds`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KindSet(u32);

impl KindSet {
    /// Create an empty set
    pub const fn new() -> Self {
        KindSet(0)
    }

    /// Add a kind to the set
    pub fn insert(&mut self, kind: ErrorKind) {
        self.0 |= kind.bit();
    }

    /// Check whether the set holds `kind`
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// The highest priority kind in the set, per [`ErrorKind::PRIORITY`]
    pub fn first_by_priority(&self) -> Option<ErrorKind> {
        ErrorKind::PRIORITY
            .iter()
            .copied()
            .find(|kind| self.contains(*kind))
    }

    /// Iterate the kinds in declaration order
    pub fn iter(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        ErrorKind::ALL
            .iter()
            .copied()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<ErrorKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        let mut set = KindSet::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
        assert_eq!(ErrorKind::DeadlineExceeded.to_string(), "deadline_exceeded");
        assert_eq!(ErrorKind::NotFound.description(), "not found");
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: ErrorKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_priority_covers_every_kind() {
        let set: KindSet = ErrorKind::PRIORITY.iter().copied().collect();
        assert_eq!(set.len(), ErrorKind::ALL.len());
        assert_eq!(ErrorKind::PRIORITY[0], ErrorKind::InvalidArgument);
        assert_eq!(ErrorKind::PRIORITY[17], ErrorKind::Unknown);
    }

    #[test]
    fn test_kind_set_priority() {
        let set: KindSet = [ErrorKind::DataLoss, ErrorKind::Conflict].into_iter().collect();
        assert!(set.contains(ErrorKind::Conflict));
        assert!(!set.contains(ErrorKind::NotFound));
        assert_eq!(set.first_by_priority(), Some(ErrorKind::Conflict));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![ErrorKind::Conflict, ErrorKind::DataLoss]
        );

        assert!(KindSet::new().is_empty());
        assert_eq!(KindSet::new().first_by_priority(), None);
    }
}
