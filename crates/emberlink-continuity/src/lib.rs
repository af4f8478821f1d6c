//! Connectivity continuity: the composition root that ties the session
//! codec, the bounded stack proxy and the frame inspector together.
//!
//! Per boot cycle the driver walks
//! `Cold -> SnapshotCheck -> {FastResume, FullNegotiate} -> Steady`, with
//! explicit save points while steady. A corrupt or absent snapshot is
//! silent and self-healing: it routes to full negotiation and a fresh save,
//! never to a hard failure at the application layer.

pub mod collab;
mod driver;

pub use collab::{Digest, DumpSink, FrameSink, LinkError, LinkStack, NullStore};
pub use driver::{BootPath, ContinuityDriver, DriverConfig, DriverError, DriverState, SaveError};
