//! Outcome taxonomy shared by both registries.

use std::fmt;

use thiserror::Error;

/// Why a registry operation was rejected.
///
/// Every rejected call leaves the registry exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A non-positive id, two ids that must differ but are equal, or a
    /// numeric argument out of range. Checked before any lookup.
    #[error("invalid input")]
    InvalidInput,
    /// A referenced id is unknown, or the entity is not in the state the
    /// operation needs (empty ship, merged-away fleet, different groups).
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    /// Removing a ship that still has pirates aboard.
    #[error("conflict")]
    Conflict,
    /// A table or index could not grow.
    #[error("allocation failure")]
    AllocationFailure,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::AllocationFailure
    }
}

impl From<indexmap::TryReserveError> for Error {
    fn from(_: indexmap::TryReserveError) -> Self {
        Error::AllocationFailure
    }
}

/// Flat per-call status reported by the command driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    AllocationError,
    InvalidInput,
    Failure,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::AllocationError => "ALLOCATION_ERROR",
            Status::InvalidInput => "INVALID_INPUT",
            Status::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Business-rule rejections collapse into [`Status::Failure`].
    pub fn status(self) -> Status {
        match self {
            Error::InvalidInput => Status::InvalidInput,
            Error::AllocationFailure => Status::AllocationError,
            Error::NotFound | Error::AlreadyExists | Error::Conflict => Status::Failure,
        }
    }
}

/// Rejects non-positive identifiers.
#[inline]
pub(crate) fn check_id(id: i32) -> Result<()> {
    if id > 0 {
        Ok(())
    } else {
        Err(Error::InvalidInput)
    }
}

/// Rejects a pair of ids unless both are positive and distinct.
#[inline]
pub(crate) fn check_pair(a: i32, b: i32) -> Result<()> {
    check_id(a)?;
    check_id(b)?;
    if a == b {
        return Err(Error::InvalidInput);
    }
    Ok(())
}
