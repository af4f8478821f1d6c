use core::fmt;
use core::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const SSID_LEN: usize = 32;
pub const PASSPHRASE_LEN: usize = 64;

/// Link-layer authentication material, stored verbatim as fixed-size,
/// zero-padded records.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: [u8; SSID_LEN],
    pub passphrase: [u8; PASSPHRASE_LEN],
    pub bssid: [u8; 6],
}

impl Credentials {
    /// Build from variable-length inputs. Returns `None` if either exceeds
    /// its fixed field width.
    pub fn new(ssid: &[u8], passphrase: &[u8], bssid: [u8; 6]) -> Option<Self> {
        if ssid.len() > SSID_LEN || passphrase.len() > PASSPHRASE_LEN {
            return None;
        }
        let mut c = Self {
            ssid: [0; SSID_LEN],
            passphrase: [0; PASSPHRASE_LEN],
            bssid,
        };
        c.ssid[..ssid.len()].copy_from_slice(ssid);
        c.passphrase[..passphrase.len()].copy_from_slice(passphrase);
        Some(c)
    }

    /// SSID bytes up to the first NUL pad.
    pub fn ssid_bytes(&self) -> &[u8] {
        let end = self.ssid.iter().position(|&b| b == 0).unwrap_or(SSID_LEN);
        &self.ssid[..end]
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            ssid: [0; SSID_LEN],
            passphrase: [0; PASSPHRASE_LEN],
            bssid: [0; 6],
        }
    }
}

// The passphrase stays out of Debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &String::from_utf8_lossy(self.ssid_bytes()))
            .field("passphrase", &"<redacted>")
            .field("bssid", &self.bssid)
            .finish()
    }
}

/// Assigned IPv4 address, netmask and gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addressing {
    pub addr: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl Default for Addressing {
    fn default() -> Self {
        Self {
            addr: Ipv4Addr::UNSPECIFIED,
            netmask: Ipv4Addr::UNSPECIFIED,
            gateway: Ipv4Addr::UNSPECIFIED,
        }
    }
}

/// An optional IPv4-or-IPv6 server address, encoded as a fixed 17-byte
/// record (family tag + 16 address bytes) so resolver and time-server slots
/// keep a fixed width on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetAddr {
    #[default]
    Unset,
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl NetAddr {
    pub fn is_set(&self) -> bool {
        !matches!(self, NetAddr::Unset)
    }

    pub fn to_ip(&self) -> Option<IpAddr> {
        match *self {
            NetAddr::Unset => None,
            NetAddr::V4(v4) => Some(IpAddr::V4(v4)),
            NetAddr::V6(v6) => Some(IpAddr::V6(v6)),
        }
    }
}

impl From<IpAddr> for NetAddr {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => NetAddr::V4(v4),
            IpAddr::V6(v6) => NetAddr::V6(v6),
        }
    }
}

/// Radio role. Discriminants are the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LinkMode {
    #[default]
    Off = 0,
    Station = 1,
    AccessPoint = 2,
    StationAp = 3,
}

impl LinkMode {
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(LinkMode::Off),
            1 => Some(LinkMode::Station),
            2 => Some(LinkMode::AccessPoint),
            3 => Some(LinkMode::StationAp),
            _ => None,
        }
    }
}

/// Everything needed to resume a network identity without renegotiation.
///
/// Snapshots are value types: each save produces a complete new snapshot,
/// and a restored one is consumed once at boot. The integrity code lives in
/// the wire form only (see [`crate::codec`]), so an in-memory snapshot can
/// never be "half valid".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub credentials: Credentials,
    pub addressing: Addressing,
    pub name_servers: [NetAddr; 2],
    pub time_servers: [NetAddr; 2],
    pub mode: LinkMode,
    pub channel: u8,
    /// Whether the radio configuration should itself be written to the
    /// device driver's non-volatile storage on resume.
    pub persistent: bool,
}

/// Highest radio channel accepted on decode. Device-specific; 14 covers the
/// 2.4 GHz band.
pub const MAX_CHANNEL: u8 = 14;
