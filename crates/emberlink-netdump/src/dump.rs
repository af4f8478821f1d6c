//! Human-oriented rendering of captured frames.
//!
//! Output goes to any [`core::fmt::Write`] sink so the same code serves a
//! heap `String`, a serial console adapter, or a test buffer.

use core::fmt::{self, Write};

use crate::frame::{
    classify, ArpSummary, EthernetView, FrameKind, Ipv4Summary, Ipv6Summary, ARP_OP_REPLY,
    ARP_OP_REQUEST,
};

/// Column layout for [`dump_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexDumpOptions {
    /// Data bytes rendered per output line. Clamped to at least 1.
    pub bytes_per_line: usize,
    pub show_hex: bool,
    pub show_ascii: bool,
}

impl Default for HexDumpOptions {
    fn default() -> Self {
        Self {
            bytes_per_line: 16,
            show_hex: true,
            show_ascii: true,
        }
    }
}

/// Write a canonical offset/hex/ASCII rendering of `buf`.
///
/// The final partial line keeps its hex columns blank-padded so the ASCII
/// column stays aligned with the full lines above it; no data is fabricated
/// to fill the row. An empty buffer produces no output.
pub fn dump_hex<W: Write>(out: &mut W, buf: &[u8], options: &HexDumpOptions) -> fmt::Result {
    let per_line = options.bytes_per_line.max(1);
    for (line, chunk) in buf.chunks(per_line).enumerate() {
        write!(out, "{:04x}", line * per_line)?;
        if options.show_hex {
            for col in 0..per_line {
                match chunk.get(col) {
                    Some(b) => write!(out, " {b:02x}")?,
                    None => out.write_str("   ")?,
                }
            }
        }
        if options.show_ascii {
            out.write_str("  |")?;
            for &b in chunk {
                let c = if (0x20..0x7f).contains(&b) { b as char } else { '.' };
                out.write_char(c)?;
            }
            for _ in chunk.len()..per_line {
                out.write_char(' ')?;
            }
            out.write_char('|')?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

/// Write a protocol-aware summary of one frame: a frame header line followed
/// by a per-protocol detail line.
pub fn dump<W: Write>(out: &mut W, buf: &[u8]) -> fmt::Result {
    let Some(eth) = EthernetView::parse(buf) else {
        return writeln!(out, "frame: {} bytes, short", buf.len());
    };
    let kind = classify(buf);
    writeln!(
        out,
        "frame: {} bytes, {} > {}, {}",
        buf.len(),
        eth.src,
        eth.dst,
        kind.name()
    )?;
    match kind {
        FrameKind::Arp => match ArpSummary::parse(eth.payload) {
            Some(arp) => match arp.operation {
                ARP_OP_REQUEST => writeln!(
                    out,
                    "  ARP request: who has {}, tell {}",
                    arp.target_ip, arp.sender_ip
                ),
                ARP_OP_REPLY => writeln!(
                    out,
                    "  ARP reply: {} is at {}",
                    arp.sender_ip, arp.sender_hw
                ),
                op => writeln!(out, "  ARP op {op}"),
            },
            None => writeln!(out, "  ARP (truncated)"),
        },
        FrameKind::Ipv4 => match Ipv4Summary::parse(eth.payload) {
            Some(ip) => writeln!(
                out,
                "  IPv4 {} > {}, {} ({}), total {}",
                ip.src,
                ip.dst,
                ip.protocol_name(),
                ip.protocol,
                ip.total_len
            ),
            None => writeln!(out, "  IPv4 (truncated)"),
        },
        FrameKind::Ipv6 => match Ipv6Summary::parse(eth.payload) {
            Some(ip) => writeln!(
                out,
                "  IPv6 {} > {}, {} ({}), payload {}",
                ip.src,
                ip.dst,
                ip.next_header_name(),
                ip.next_header,
                ip.payload_len
            ),
            None => writeln!(out, "  IPv6 (truncated)"),
        },
        FrameKind::Unknown => writeln!(out, "  unclassified ethertype {:#06x}", eth.ethertype),
    }
}

/// One frame, one line. Suited to streaming captures where `dump` would be
/// too chatty.
pub fn dump_line<W: Write>(out: &mut W, buf: &[u8]) -> fmt::Result {
    match classify(buf) {
        FrameKind::Arp => {
            let payload = &buf[EthernetView::HEADER_LEN..];
            match ArpSummary::parse(payload) {
                Some(arp) if arp.operation == ARP_OP_REQUEST => {
                    writeln!(out, "ARP req {} > {}", arp.sender_ip, arp.target_ip)
                }
                Some(arp) if arp.operation == ARP_OP_REPLY => {
                    writeln!(out, "ARP rep {} > {}", arp.sender_ip, arp.target_ip)
                }
                _ => writeln!(out, "ARP len {}", buf.len()),
            }
        }
        FrameKind::Ipv4 => match Ipv4Summary::parse(&buf[EthernetView::HEADER_LEN..]) {
            Some(ip) => writeln!(
                out,
                "IPv4 {} > {} {} len {}",
                ip.src,
                ip.dst,
                ip.protocol_name(),
                ip.total_len
            ),
            None => writeln!(out, "IPv4 len {}", buf.len()),
        },
        FrameKind::Ipv6 => match Ipv6Summary::parse(&buf[EthernetView::HEADER_LEN..]) {
            Some(ip) => writeln!(
                out,
                "IPv6 {} > {} {} len {}",
                ip.src,
                ip.dst,
                ip.next_header_name(),
                ip.payload_len
            ),
            None => writeln!(out, "IPv6 len {}", buf.len()),
        },
        FrameKind::Unknown => writeln!(out, "unknown len {}", buf.len()),
    }
}
