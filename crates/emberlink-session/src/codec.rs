//! Fixed-layout wire form of [`SessionSnapshot`].
//!
//! Layout, little-endian, all widths fixed:
//!
//! ```text
//! crc:u32 | version:u8 | ssid:32 | passphrase:64 | bssid:6 |
//! addr:4 | netmask:4 | gateway:4 | name_servers:2x17 | time_servers:2x17 |
//! mode:u8 | channel:u8 | persistent:u8
//! ```
//!
//! `crc` is an IEEE CRC-32 over every byte after itself, version included.
//! Placing it first means a short read fails before any field is trusted.
//! The version byte is the one deliberate deviation from the ancestral
//! version-less layout; any value other than [`FORMAT_VERSION`] is rejected
//! outright instead of being guessed at.

use core::net::{Ipv4Addr, Ipv6Addr};

use thiserror::Error;

use crate::snapshot::{
    Addressing, Credentials, LinkMode, NetAddr, SessionSnapshot, MAX_CHANNEL, PASSPHRASE_LEN,
    SSID_LEN,
};

pub const FORMAT_VERSION: u8 = 1;

const CRC_LEN: usize = 4;
const NETADDR_LEN: usize = 17;
const PAYLOAD_LEN: usize = 1 // version
    + SSID_LEN
    + PASSPHRASE_LEN
    + 6 // bssid
    + 12 // addressing
    + 2 * NETADDR_LEN // name servers
    + 2 * NETADDR_LEN // time servers
    + 3; // mode, channel, persistent

/// Total encoded size: 190 bytes.
pub const SNAPSHOT_LEN: usize = CRC_LEN + PAYLOAD_LEN;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("snapshot length {found} does not match expected {expected}")]
    Truncated { expected: usize, found: usize },

    #[error("checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    BadChecksum { stored: u32, computed: u32 },

    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid field encoding: {0}")]
    BadField(&'static str),
}

/// Serialize a snapshot into its wire form. Always exactly [`SNAPSHOT_LEN`]
/// bytes with a correct leading checksum.
pub fn encode(snapshot: &SessionSnapshot) -> Vec<u8> {
    let mut out = Vec::with_capacity(SNAPSHOT_LEN);
    out.extend_from_slice(&[0; CRC_LEN]); // checksum backfilled below
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&snapshot.credentials.ssid);
    out.extend_from_slice(&snapshot.credentials.passphrase);
    out.extend_from_slice(&snapshot.credentials.bssid);
    out.extend_from_slice(&snapshot.addressing.addr.octets());
    out.extend_from_slice(&snapshot.addressing.netmask.octets());
    out.extend_from_slice(&snapshot.addressing.gateway.octets());
    for server in snapshot.name_servers.iter().chain(&snapshot.time_servers) {
        push_net_addr(&mut out, server);
    }
    out.push(snapshot.mode as u8);
    out.push(snapshot.channel);
    out.push(snapshot.persistent as u8);
    debug_assert_eq!(out.len(), SNAPSHOT_LEN);

    let crc = crc32fast::hash(&out[CRC_LEN..]);
    out[..CRC_LEN].copy_from_slice(&crc.to_le_bytes());
    out
}

/// Deserialize and validate a snapshot. Truncation, checksum mismatch, an
/// unknown version, or any out-of-range field rejects the input in its
/// entirety.
pub fn decode(bytes: &[u8]) -> Result<SessionSnapshot, DecodeError> {
    if bytes.len() != SNAPSHOT_LEN {
        return Err(DecodeError::Truncated {
            expected: SNAPSHOT_LEN,
            found: bytes.len(),
        });
    }

    let stored = u32::from_le_bytes(bytes[..CRC_LEN].try_into().unwrap());
    let computed = crc32fast::hash(&bytes[CRC_LEN..]);
    if stored != computed {
        return Err(DecodeError::BadChecksum { stored, computed });
    }

    let mut r = Reader::new(&bytes[CRC_LEN..]);
    let version = r.u8()?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let mut credentials = Credentials::default();
    credentials.ssid.copy_from_slice(r.take(SSID_LEN)?);
    credentials
        .passphrase
        .copy_from_slice(r.take(PASSPHRASE_LEN)?);
    credentials.bssid.copy_from_slice(r.take(6)?);

    let addressing = Addressing {
        addr: r.ipv4()?,
        netmask: r.ipv4()?,
        gateway: r.ipv4()?,
    };

    let name_servers = [r.net_addr()?, r.net_addr()?];
    let time_servers = [r.net_addr()?, r.net_addr()?];

    let mode = LinkMode::from_wire(r.u8()?).ok_or(DecodeError::BadField("link mode"))?;
    let channel = r.u8()?;
    if channel > MAX_CHANNEL {
        return Err(DecodeError::BadField("channel out of range"));
    }
    let persistent = match r.u8()? {
        0 => false,
        1 => true,
        _ => return Err(DecodeError::BadField("persistent flag")),
    };
    r.finish()?;

    Ok(SessionSnapshot {
        credentials,
        addressing,
        name_servers,
        time_servers,
        mode,
        channel,
        persistent,
    })
}

fn push_net_addr(out: &mut Vec<u8>, addr: &NetAddr) {
    match addr {
        NetAddr::Unset => {
            out.push(0);
            out.extend_from_slice(&[0; 16]);
        }
        NetAddr::V4(v4) => {
            out.push(4);
            out.extend_from_slice(&v4.octets());
            out.extend_from_slice(&[0; 12]);
        }
        NetAddr::V6(v6) => {
            out.push(6);
            out.extend_from_slice(&v6.octets());
        }
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(DecodeError::BadField("short read"))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn ipv4(&mut self) -> Result<Ipv4Addr, DecodeError> {
        let b = self.take(4)?;
        Ok(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
    }

    fn net_addr(&mut self) -> Result<NetAddr, DecodeError> {
        let family = self.u8()?;
        let raw = self.take(16)?;
        match family {
            0 => {
                if raw.iter().any(|&b| b != 0) {
                    return Err(DecodeError::BadField("unset address padding"));
                }
                Ok(NetAddr::Unset)
            }
            4 => {
                if raw[4..].iter().any(|&b| b != 0) {
                    return Err(DecodeError::BadField("ipv4 address padding"));
                }
                Ok(NetAddr::V4(Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3])))
            }
            6 => Ok(NetAddr::V6(Ipv6Addr::from(
                <[u8; 16]>::try_from(raw).unwrap(),
            ))),
            _ => Err(DecodeError::BadField("address family")),
        }
    }

    fn finish(self) -> Result<(), DecodeError> {
        if self.pos == self.buf.len() {
            Ok(())
        } else {
            Err(DecodeError::BadField("trailing bytes"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_width_is_stable() {
        assert_eq!(SNAPSHOT_LEN, 190);
        assert_eq!(encode(&SessionSnapshot::default()).len(), SNAPSHOT_LEN);
    }

    #[test]
    fn default_snapshot_round_trips() {
        let s = SessionSnapshot::default();
        assert_eq!(decode(&encode(&s)).unwrap(), s);
    }
}
