use core::fmt;

use emberlink_altstack::{AltStackError, StackProxy, StackStats};
use emberlink_netdump::{dump, dump_hex, dump_line, HexDumpOptions};
use emberlink_session::{
    decode, encode, DecodeError, SessionSnapshot, SnapshotStore, StorageError, SNAPSHOT_LEN,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::collab::{LinkError, LinkStack, NullStore};

/// Warn once a shielded call has consumed this fraction of the region.
const PRESSURE_NUM: usize = 7;
const PRESSURE_DEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Byte offset of the snapshot slot inside the storage region.
    pub slot_offset: u32,
    /// When set, the alternate stack is initialized at construction with
    /// this capacity.
    pub stack_capacity: Option<usize>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            slot_offset: 0,
            stack_capacity: None,
        }
    }
}

/// Which boot path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPath {
    FastResume,
    FullNegotiate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Cold,
    Steady,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("driver has already completed boot")]
    AlreadyBooted,

    #[error(transparent)]
    Link(#[from] LinkError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaveError {
    #[error("no live session to save")]
    NoSession,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Why a fast resume was skipped. Every variant routes to full negotiation.
#[derive(Debug, Error)]
enum ResumeSkip {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("snapshot: {0}")]
    Format(#[from] DecodeError),

    #[error("link: {0}")]
    Apply(#[from] LinkError),
}

/// Composition root for connectivity continuity.
///
/// Owns the storage capability, the alternate-stack proxy and the live
/// session snapshot; collaborates with the network stack through
/// [`LinkStack`].
pub struct ContinuityDriver<L: LinkStack> {
    link: L,
    store: Box<dyn SnapshotStore>,
    stack: StackProxy,
    config: DriverConfig,
    state: DriverState,
    live: Option<SessionSnapshot>,
}

impl<L: LinkStack> ContinuityDriver<L> {
    /// Driver without persistence: boots via full negotiation and discards
    /// saves (see [`NullStore`]).
    pub fn new(link: L, config: DriverConfig) -> Result<Self, AltStackError> {
        Self::with_store(link, Box::new(NullStore), config)
    }

    pub fn with_store(
        link: L,
        store: Box<dyn SnapshotStore>,
        config: DriverConfig,
    ) -> Result<Self, AltStackError> {
        let mut stack = StackProxy::new();
        if let Some(capacity) = config.stack_capacity {
            stack.init(capacity)?;
        }
        Ok(Self {
            link,
            store,
            stack,
            config,
            state: DriverState::Cold,
            live: None,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The session applied or negotiated at boot, refreshed by
    /// [`update_session`](Self::update_session).
    pub fn current_session(&self) -> Option<&SessionSnapshot> {
        self.live.as_ref()
    }

    /// Replace the live session ahead of the next save point.
    pub fn update_session(&mut self, snapshot: SessionSnapshot) {
        self.live = Some(snapshot);
    }

    /// Run the snapshot check and bring the link up.
    ///
    /// A valid stored snapshot is applied as-is (fast resume, credentials
    /// reused). A missing, corrupt or unapplicable snapshot falls back to
    /// full negotiation followed by an opportunistic fresh save; that
    /// fallback is deliberate self-healing, not an error.
    pub fn boot(&mut self) -> Result<BootPath, DriverError> {
        if self.state != DriverState::Cold {
            return Err(DriverError::AlreadyBooted);
        }
        debug!("boot: checking stored snapshot");
        let path = match self.try_fast_resume() {
            Ok(snapshot) => {
                debug!(mode = ?snapshot.mode, channel = snapshot.channel, "fast resume applied");
                self.live = Some(snapshot);
                BootPath::FastResume
            }
            Err(skip) => {
                warn!(reason = %skip, "fast resume unavailable, negotiating");
                let fresh = self.link.negotiate()?;
                self.live = Some(fresh);
                if let Err(err) = self.save() {
                    debug!(error = %err, "post-negotiation save skipped");
                }
                BootPath::FullNegotiate
            }
        };
        self.state = DriverState::Steady;
        Ok(path)
    }

    fn try_fast_resume(&mut self) -> Result<SessionSnapshot, ResumeSkip> {
        let mut buf = [0u8; SNAPSHOT_LEN];
        self.store.read_bytes(self.config.slot_offset, &mut buf)?;
        let snapshot = decode(&buf)?;
        self.link.apply_state(&snapshot)?;
        Ok(snapshot)
    }

    /// Persist the live session as one checksummed slot write. Called at
    /// explicit save points, e.g. before a deliberate low-power transition.
    pub fn save(&mut self) -> Result<(), SaveError> {
        let snapshot = self.live.as_ref().ok_or(SaveError::NoSession)?;
        let bytes = encode(snapshot);
        self.store
            .write_bytes(self.config.slot_offset, &bytes)?;
        debug!("session snapshot saved");
        Ok(())
    }

    /// Run `f` on the alternate stack and poll the canary afterwards,
    /// warning when the region nears exhaustion.
    pub fn call_shielded<F, R>(&mut self, f: F) -> Result<R, AltStackError>
    where
        F: FnOnce() -> R,
    {
        let value = self.stack.run(f)?;
        let stats = self.stack.stats()?;
        if stats.used * PRESSURE_DEN >= stats.capacity * PRESSURE_NUM {
            warn!(
                used = stats.used,
                capacity = stats.capacity,
                "alternate stack nearing exhaustion"
            );
        }
        Ok(value)
    }

    pub fn init_stack(&mut self, capacity: usize) -> Result<(), AltStackError> {
        self.stack.init(capacity)
    }

    /// Tear the alternate stack down once the constrained library is no
    /// longer needed; queries report `NotInitialized` from here on.
    pub fn deinit_stack(&mut self) -> Result<(), AltStackError> {
        self.stack.deinit()
    }

    pub fn stack_stats(&self) -> Result<StackStats, AltStackError> {
        self.stack.stats()
    }

    /// Protocol-aware dump of one captured frame. Stateless passthrough,
    /// safe to reach from several capture sources.
    pub fn inspect_frame<W: fmt::Write>(&self, out: &mut W, buf: &[u8]) -> fmt::Result {
        dump(out, buf)
    }

    /// One-line summary variant for streaming captures.
    pub fn inspect_frame_line<W: fmt::Write>(&self, out: &mut W, buf: &[u8]) -> fmt::Result {
        dump_line(out, buf)
    }

    pub fn inspect_frame_hex<W: fmt::Write>(
        &self,
        out: &mut W,
        buf: &[u8],
        options: &HexDumpOptions,
    ) -> fmt::Result {
        dump_hex(out, buf, options)
    }
}
