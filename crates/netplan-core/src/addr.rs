use crate::error::{PlanError, Result};
use std::net::Ipv4Addr;

/// Longest IPv4 prefix
pub const MAX_PREFIX: u8 = 32;

/// Bit mask for a prefix length, as an integer
pub fn mask_bits(prefix: u8) -> u32 {
    if prefix == 0 {
        0u32
    } else {
        !0u32 << (32 - prefix.min(MAX_PREFIX))
    }
}

/// Convert a prefix length to a dotted mask (24 -> 255.255.255.0)
pub fn prefix_to_mask(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(mask_bits(prefix))
}

/// Wildcard mask, each octet being `255 - octet` of the mask
pub fn wildcard(mask: Ipv4Addr) -> Ipv4Addr {
    let o = mask.octets();
    Ipv4Addr::new(255 - o[0], 255 - o[1], 255 - o[2], 255 - o[3])
}

/// Address with the host bits cleared
pub fn network_of(addr: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr) & mask_bits(prefix))
}

/// Address with the host bits set
pub fn broadcast_of(addr: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr) | !mask_bits(prefix))
}

/// Parse a dotted-quad address
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr> {
    s.trim()
        .parse()
        .map_err(|_| PlanError::invalid(format!("malformed IPv4 address '{}'", s)))
}

/// Check a prefix length is within 0..=32
pub fn validate_prefix(prefix: u8) -> Result<u8> {
    if prefix > MAX_PREFIX {
        return Err(PlanError::invalid(format!(
            "prefix /{} is out of range (0-32)",
            prefix
        )));
    }
    Ok(prefix)
}
