//! Collaborator contracts consumed by the continuity driver.

use core::fmt;

use emberlink_netdump::{dump_line, HexDumpOptions};
use emberlink_session::{SessionSnapshot, SnapshotStore, StorageError};
use thiserror::Error;

/// Failure surfaced by the network-stack collaborator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("association failed: {0}")]
    Association(&'static str),

    #[error("negotiation failed: {0}")]
    Negotiation(&'static str),
}

/// The network-stack collaborator.
///
/// `apply_state` reapplies previously negotiated addressing, resolvers,
/// time servers, mode and channel without triggering renegotiation; only
/// the link-layer association itself still happens, reusing the snapshot's
/// credentials. `negotiate` is the standard full acquisition path and
/// returns the freshly acquired state in snapshot shape.
pub trait LinkStack {
    fn apply_state(&mut self, snapshot: &SessionSnapshot) -> Result<(), LinkError>;
    fn negotiate(&mut self) -> Result<SessionSnapshot, LinkError>;
}

/// Streaming digest primitive consumed by layers above this core.
///
/// The continuity layer itself never hashes anything (the snapshot
/// integrity code is a CRC, not a digest); this three-call contract exists
/// so upper layers can be handed one without depending on a concrete
/// implementation.
pub trait Digest {
    type Output: AsRef<[u8]>;

    fn init() -> Self;
    fn update(&mut self, bytes: &[u8]);
    fn finalize(self) -> Self::Output;
}

/// Push-only sink for captured link-layer frames.
pub trait FrameSink {
    fn frame(&mut self, buf: &[u8]);
}

/// A [`FrameSink`] that renders each frame as one summary line, optionally
/// followed by a hex dump.
pub struct DumpSink<W> {
    out: W,
    hex: Option<HexDumpOptions>,
}

impl<W: fmt::Write> DumpSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, hex: None }
    }

    pub fn with_hex(out: W, options: HexDumpOptions) -> Self {
        Self {
            out,
            hex: Some(options),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: fmt::Write> FrameSink for DumpSink<W> {
    fn frame(&mut self, buf: &[u8]) {
        // A full sink is a diagnostics problem, not a capture-path failure.
        let _ = dump_line(&mut self.out, buf);
        if let Some(options) = &self.hex {
            let _ = emberlink_netdump::dump_hex(&mut self.out, buf, options);
        }
    }
}

/// No-op persistence used when no storage module registers at startup.
///
/// Reads report an empty (all-zero) region, which fails snapshot
/// validation and routes boot to full negotiation; writes are discarded.
/// This replaces link-time tricks for making the storage module optional:
/// a build without persistence pays one virtual call and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl SnapshotStore for NullStore {
    fn read_bytes(&mut self, _offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        buf.fill(0);
        Ok(())
    }

    fn write_bytes(&mut self, _offset: u32, _bytes: &[u8]) -> Result<(), StorageError> {
        Ok(())
    }
}
