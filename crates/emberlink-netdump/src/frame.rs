use core::fmt;
use core::net::{Ipv4Addr, Ipv6Addr};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const BROADCAST: Self = Self([0xff; 6]);
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

pub struct EtherType;

impl EtherType {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const IPV6: u16 = 0x86dd;
}

/// Protocol family of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Arp,
    Ipv4,
    Ipv6,
    Unknown,
}

impl FrameKind {
    pub fn name(self) -> &'static str {
        match self {
            FrameKind::Arp => "ARP",
            FrameKind::Ipv4 => "IPv4",
            FrameKind::Ipv6 => "IPv6",
            FrameKind::Unknown => "unknown",
        }
    }
}

/// Classify a raw frame by its ethertype, cross-checked against the IP
/// version nibble where one exists.
///
/// Only the minimum header bytes are inspected. Buffers shorter than an
/// Ethernet header are `Unknown`, never an error.
pub fn classify(buf: &[u8]) -> FrameKind {
    if buf.len() < EthernetView::HEADER_LEN {
        return FrameKind::Unknown;
    }
    let ethertype = u16::from_be_bytes([buf[12], buf[13]]);
    let version = buf.get(EthernetView::HEADER_LEN).map(|b| b >> 4);
    match ethertype {
        EtherType::ARP => FrameKind::Arp,
        EtherType::IPV4 if version == Some(4) => FrameKind::Ipv4,
        EtherType::IPV6 if version == Some(6) => FrameKind::Ipv6,
        _ => FrameKind::Unknown,
    }
}

/// Borrowed view of the Ethernet header of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetView<'a> {
    pub dst: MacAddr,
    pub src: MacAddr,
    pub ethertype: u16,
    pub payload: &'a [u8],
}

impl<'a> EthernetView<'a> {
    pub const HEADER_LEN: usize = 14;

    pub fn parse(buf: &'a [u8]) -> Option<Self> {
        if buf.len() < Self::HEADER_LEN {
            return None;
        }
        let dst = MacAddr(buf[0..6].try_into().unwrap());
        let src = MacAddr(buf[6..12].try_into().unwrap());
        let ethertype = u16::from_be_bytes([buf[12], buf[13]]);
        Some(Self {
            dst,
            src,
            ethertype,
            payload: &buf[Self::HEADER_LEN..],
        })
    }
}

pub const ARP_OP_REQUEST: u16 = 1;
pub const ARP_OP_REPLY: u16 = 2;

/// The interesting subset of an Ethernet/IPv4 ARP payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpSummary {
    pub operation: u16,
    pub sender_hw: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_ip: Ipv4Addr,
}

impl ArpSummary {
    const PAYLOAD_LEN: usize = 28;

    /// Parse from the Ethernet payload. Returns `None` for truncated input
    /// or hardware/protocol types other than Ethernet/IPv4.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < Self::PAYLOAD_LEN {
            return None;
        }
        let htype = u16::from_be_bytes([payload[0], payload[1]]);
        let ptype = u16::from_be_bytes([payload[2], payload[3]]);
        if htype != 1 || ptype != EtherType::IPV4 || payload[4] != 6 || payload[5] != 4 {
            return None;
        }
        let operation = u16::from_be_bytes([payload[6], payload[7]]);
        let sender_hw = MacAddr(payload[8..14].try_into().unwrap());
        let sender_ip = Ipv4Addr::new(payload[14], payload[15], payload[16], payload[17]);
        let target_ip = Ipv4Addr::new(payload[24], payload[25], payload[26], payload[27]);
        Some(Self {
            operation,
            sender_hw,
            sender_ip,
            target_ip,
        })
    }
}

/// Summary of an IPv4 header, length-validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Summary {
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub protocol: u8,
    pub total_len: u16,
}

impl Ipv4Summary {
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < 20 {
            return None;
        }
        let version = payload[0] >> 4;
        let ihl = (payload[0] & 0x0f) as usize;
        if version != 4 || ihl < 5 || payload.len() < ihl * 4 {
            return None;
        }
        let total_len = u16::from_be_bytes([payload[2], payload[3]]);
        let protocol = payload[9];
        let src = Ipv4Addr::new(payload[12], payload[13], payload[14], payload[15]);
        let dst = Ipv4Addr::new(payload[16], payload[17], payload[18], payload[19]);
        Some(Self {
            src,
            dst,
            protocol,
            total_len,
        })
    }

    pub fn protocol_name(&self) -> &'static str {
        ip_protocol_name(self.protocol)
    }
}

/// Summary of a fixed IPv6 header, length-validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Summary {
    pub src: Ipv6Addr,
    pub dst: Ipv6Addr,
    pub next_header: u8,
    pub payload_len: u16,
}

impl Ipv6Summary {
    const HEADER_LEN: usize = 40;

    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < Self::HEADER_LEN || payload[0] >> 4 != 6 {
            return None;
        }
        let payload_len = u16::from_be_bytes([payload[4], payload[5]]);
        let next_header = payload[6];
        let src = Ipv6Addr::from(<[u8; 16]>::try_from(&payload[8..24]).unwrap());
        let dst = Ipv6Addr::from(<[u8; 16]>::try_from(&payload[24..40]).unwrap());
        Some(Self {
            src,
            dst,
            next_header,
            payload_len,
        })
    }

    pub fn next_header_name(&self) -> &'static str {
        ip_protocol_name(self.next_header)
    }
}

fn ip_protocol_name(protocol: u8) -> &'static str {
    match protocol {
        1 => "ICMP",
        6 => "TCP",
        17 => "UDP",
        58 => "ICMPv6",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_handles_empty_and_short_buffers() {
        assert_eq!(classify(&[]), FrameKind::Unknown);
        assert_eq!(classify(&[0u8; 13]), FrameKind::Unknown);
        // Exactly one header, no payload: ethertype alone is not enough for IP.
        let mut hdr = [0u8; 14];
        hdr[12] = 0x08;
        assert_eq!(classify(&hdr), FrameKind::Unknown);
    }

    #[test]
    fn classify_requires_matching_version_nibble() {
        let mut frame = [0u8; 15];
        frame[12..14].copy_from_slice(&EtherType::IPV4.to_be_bytes());
        frame[14] = 0x60; // v6 nibble under an IPv4 ethertype
        assert_eq!(classify(&frame), FrameKind::Unknown);
        frame[14] = 0x45;
        assert_eq!(classify(&frame), FrameKind::Ipv4);
    }

    #[test]
    fn arp_summary_rejects_non_ethernet_ipv4() {
        let mut payload = [0u8; 28];
        payload[0..2].copy_from_slice(&1u16.to_be_bytes());
        payload[2..4].copy_from_slice(&EtherType::IPV4.to_be_bytes());
        payload[4] = 6;
        payload[5] = 4;
        payload[6..8].copy_from_slice(&ARP_OP_REQUEST.to_be_bytes());
        assert!(ArpSummary::parse(&payload).is_some());

        payload[4] = 8; // bogus hardware address length
        assert!(ArpSummary::parse(&payload).is_none());
    }

    #[test]
    fn mac_addr_formats_as_colon_hex() {
        let mac = MacAddr([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
        assert_eq!(mac.to_string(), "de:ad:be:ef:00:01");
    }
}
