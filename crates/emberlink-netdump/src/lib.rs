#![forbid(unsafe_code)]

//! Protocol-aware inspection of captured link-layer frames.
//!
//! Everything in this crate is a pure function over a borrowed byte buffer:
//! nothing is owned, mutated, or retained between calls, so multiple capture
//! sources can feed frames through the same entry points concurrently. A
//! frame that cannot be recognized classifies as [`FrameKind::Unknown`]
//! rather than erroring; truncated buffers are never read past their length.

pub mod dump;
pub mod frame;

pub use dump::{dump, dump_hex, dump_line, HexDumpOptions};
pub use frame::{
    classify, ArpSummary, EtherType, EthernetView, FrameKind, Ipv4Summary, Ipv6Summary, MacAddr,
};
