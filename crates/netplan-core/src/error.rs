use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use thiserror::Error;

/// Errors returned by the partitioner and the allocator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Malformed address, out-of-range prefix, bad topology or options
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The subnet pool ran out before the topology was fully addressed
    #[error("subnet pool exhausted at router {router_id} ({purpose}): needed subnet #{needed}, pool holds {available}")]
    PoolExhausted {
        router_id: String,
        purpose: String,
        needed: usize,
        available: usize,
    },

    /// A router declares more peers than it has serial interfaces
    #[error("router {router_id} has no interface left for peer {peer_id}")]
    InterfaceExhausted { router_id: String, peer_id: String },

    /// The second endpoint of a link has no usable address left in the link subnet
    #[error("no usable host left in {network}/{mask} for router {router_id}")]
    HostRangeExhausted {
        router_id: String,
        network: Ipv4Addr,
        mask: u8,
    },
}

impl PlanError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the caller supplied bad data, as opposed to a plan that does not fit
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type for planning operations
pub type Result<T> = std::result::Result<T, PlanError>;

/// Non-fatal conditions surfaced alongside a successful plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// The link to `peer_id` was skipped because every interface was taken
    InterfaceExhausted { router_id: String, peer_id: String },
}

impl std::fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InterfaceExhausted { router_id, peer_id } => write!(
                f,
                "router {} has no interface left, link to {} skipped",
                router_id, peer_id
            ),
        }
    }
}
