//! Application error types.
//!
//! Every rules-engine operation fails with an [`AppError`]: a machine-readable
//! [`ErrorKind`] plus a human-readable message carried by `anyhow::Error`.
//! Callers branch on the kind and show the message.

use anyhow::Error;
use std::fmt;

/// Classification of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: non-digit number, bad name or email shape, non-positive capacity.
    InvalidFormat,
    /// A required field was empty.
    MissingField,
    /// Primary key already taken.
    DuplicateKey,
    /// Unique attribute (email, group name) already taken.
    DuplicateValue,
    /// Email suffix is not an accepted institutional domain.
    InvalidDomain,
    /// `min_capacity` greater than `max_capacity`.
    InvalidRange,
    /// Referenced student or group does not exist.
    NotFound,
    /// Student already belongs to a group.
    AlreadyAssigned,
    /// Student is not listed in the group.
    NotAMember,
    /// Operation would not change anything.
    NoOp,
    /// Group has no vacancy.
    GroupFull,
    /// Removal would leave the group under its minimum.
    BelowMinimum,
    /// New maximum is smaller than the current membership.
    CapacityBelowOccupancy,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::MissingField => "missing_field",
            Self::DuplicateKey => "duplicate_key",
            Self::DuplicateValue => "duplicate_value",
            Self::InvalidDomain => "invalid_domain",
            Self::InvalidRange => "invalid_range",
            Self::NotFound => "not_found",
            Self::AlreadyAssigned => "already_assigned",
            Self::NotAMember => "not_a_member",
            Self::NoOp => "no_op",
            Self::GroupFull => "group_full",
            Self::BelowMinimum => "below_minimum",
            Self::CapacityBelowOccupancy => "capacity_below_occupancy",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            error: err.into(),
        }
    }

    pub fn invalid_format<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InvalidFormat, err)
    }

    pub fn missing_field<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::MissingField, err)
    }

    pub fn duplicate_key<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::DuplicateKey, err)
    }

    pub fn duplicate_value<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::DuplicateValue, err)
    }

    pub fn invalid_domain<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InvalidDomain, err)
    }

    pub fn invalid_range<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InvalidRange, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, err)
    }

    pub fn already_assigned<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::AlreadyAssigned, err)
    }

    pub fn not_a_member<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotAMember, err)
    }

    pub fn no_op<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NoOp, err)
    }

    pub fn group_full<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::GroupFull, err)
    }

    pub fn below_minimum<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::BelowMinimum, err)
    }

    pub fn capacity_below_occupancy<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::CapacityBelowOccupancy, err)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}
