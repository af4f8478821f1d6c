//! Persistent storage collaborator.

use thiserror::Error;

/// Failure of the underlying persistent region. Callers treat this the same
/// as a corrupt snapshot: fall back to full negotiation, never crash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(&'static str),

    #[error("storage write failed: {0}")]
    Write(&'static str),

    #[error("storage region too small: need {need} bytes at offset {offset}")]
    OutOfBounds { offset: u32, need: usize },
}

/// A byte-addressable persistent region.
///
/// The snapshot slot has a single writer (the continuity driver), so no
/// locking is modeled. Implementations should make `write_bytes` of one
/// snapshot as close to atomic as the medium allows; the leading checksum
/// in the snapshot layout turns a torn write into a detectable
/// `InvalidFormat` on the next boot rather than silent corruption.
pub trait SnapshotStore {
    fn read_bytes(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError>;
    fn write_bytes(&mut self, offset: u32, bytes: &[u8]) -> Result<(), StorageError>;
}
