use crate::addr::{broadcast_of, network_of, parse_ipv4, validate_prefix};
use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, warn};

/// Default cap on the number of blocks a single split may enumerate (a /8 cut into /24s)
pub const MAX_SUBNETS: usize = 1 << 16;

/// Longest prefix that still leaves a usable host range (/30: two hosts)
pub const MAX_SPLIT_PREFIX: u8 = 30;

/// A subnet produced by partitioning
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Subnet {
    /// Network address, host bits zeroed (e.g., 10.0.1.0)
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub network: Ipv4Addr,

    /// Prefix length (e.g., 24 for /24)
    pub mask: u8,

    /// First usable host
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub first_address: Ipv4Addr,

    /// Last usable host
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub last_address: Ipv4Addr,
}

impl Subnet {
    /// Build the subnet containing `addr` with the given prefix.
    ///
    /// The prefix must leave at least two host addresses, i.e. be /30 or shorter.
    pub fn from_block(addr: Ipv4Addr, mask: u8) -> Result<Self> {
        validate_prefix(mask)?;
        if mask > MAX_SPLIT_PREFIX {
            return Err(PlanError::invalid(format!(
                "/{} leaves no usable host range",
                mask
            )));
        }

        let network = network_of(addr, mask);
        let broadcast = broadcast_of(addr, mask);

        Ok(Self {
            network,
            mask,
            first_address: Ipv4Addr::from(u32::from(network) + 1),
            last_address: Ipv4Addr::from(u32::from(broadcast) - 1),
        })
    }

    /// All-ones address of the block
    pub fn broadcast(&self) -> Ipv4Addr {
        broadcast_of(self.network, self.mask)
    }

    /// Whether `addr` is a usable host of this subnet
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        addr >= self.first_address && addr <= self.last_address
    }

    /// Number of usable host addresses
    pub fn usable_hosts(&self) -> u32 {
        u32::from(self.last_address) - u32::from(self.first_address) + 1
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.mask)
    }
}

/// Split `network/original_prefix` into `/new_prefix` blocks, bounded by [`MAX_SUBNETS`].
///
/// The first and the last block of the split are reserved and dropped.
pub fn partition(network: &str, original_prefix: u8, new_prefix: u8) -> Result<Vec<Subnet>> {
    partition_with_limit(network, original_prefix, new_prefix, MAX_SUBNETS)
}

/// Same as [`partition`] with an explicit bound on the number of blocks.
pub fn partition_with_limit(
    network: &str,
    original_prefix: u8,
    new_prefix: u8,
    limit: usize,
) -> Result<Vec<Subnet>> {
    let base = parse_ipv4(network)?;
    validate_prefix(original_prefix)?;
    validate_prefix(new_prefix)?;

    if new_prefix < original_prefix {
        return Err(PlanError::invalid(format!(
            "new prefix /{} is shorter than original prefix /{}",
            new_prefix, original_prefix
        )));
    }
    if new_prefix > MAX_SPLIT_PREFIX {
        return Err(PlanError::invalid(format!(
            "new prefix /{} leaves no usable host range (longest is /{})",
            new_prefix, MAX_SPLIT_PREFIX
        )));
    }

    let count = 1u64 << (new_prefix - original_prefix);
    if count > limit as u64 {
        return Err(PlanError::invalid(format!(
            "splitting /{} into /{} yields {} subnets, limit is {}",
            original_prefix, new_prefix, count, limit
        )));
    }

    let base = network_of(base, original_prefix);
    let step = 1u64 << (32 - new_prefix);
    debug!(
        "Partitioning {}/{} into {} blocks of /{}",
        base, original_prefix, count, new_prefix
    );

    let mut subnets = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start = u64::from(u32::from(base)) + i * step;
        let Ok(start) = u32::try_from(start) else {
            warn!("Block {} of {}/{} falls outside IPv4 space", i, base, original_prefix);
            return Ok(Vec::new());
        };
        subnets.push(Subnet::from_block(Ipv4Addr::from(start), new_prefix)?);
    }

    if subnets.len() <= 2 {
        warn!(
            "Splitting {}/{} into /{} leaves no subnet once first and last are reserved",
            base, original_prefix, new_prefix
        );
        return Ok(Vec::new());
    }

    subnets.remove(0);
    subnets.pop();

    Ok(subnets)
}
