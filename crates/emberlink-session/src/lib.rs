#![forbid(unsafe_code)]

//! Persisted network-session snapshots.
//!
//! A [`SessionSnapshot`] captures everything a device needs to resume its
//! network identity after a reset without renegotiating: link credentials,
//! assigned addressing, resolver and time-server pairs, radio mode and
//! channel. The wire form is a fixed little-endian layout guarded by a
//! leading CRC-32; a snapshot either decodes in its entirety or is rejected
//! as [`DecodeError`], so partially populated state never escapes.
//!
//! The checksum defends against bit rot and torn writes in non-volatile
//! storage, not against tampering.

pub mod codec;
pub mod snapshot;
pub mod store;

pub use codec::{decode, encode, DecodeError, FORMAT_VERSION, SNAPSHOT_LEN};
pub use snapshot::{Addressing, Credentials, LinkMode, NetAddr, SessionSnapshot};
pub use store::{SnapshotStore, StorageError};
