use crate::allocator::{allocate, AllocationOptions, Plan};
use crate::error::Result;
use crate::router::RoutingProtocol;
use crate::subnet::{partition_with_limit, MAX_SUBNETS};
use crate::topology::Topology;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything needed to address a topology: the address block, the split and the routers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlanRequest {
    /// Base network address (e.g., 10.0.0.0)
    pub network: String,

    /// Prefix length of the base network
    pub original_prefix: u8,

    /// Prefix length of the subnets handed out
    pub new_prefix: u8,

    pub routers: Topology,

    #[serde(default)]
    pub enable_dhcp: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_ip_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RoutingProtocol>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_number: Option<u32>,

    #[serde(default)]
    pub strict_interfaces: bool,
}

impl PlanRequest {
    pub fn options(&self) -> AllocationOptions {
        AllocationOptions {
            enable_dhcp: self.enable_dhcp,
            static_ip_count: self.static_ip_count,
            protocol: self.protocol,
            as_number: self.as_number,
            strict_interfaces: self.strict_interfaces,
        }
    }

    /// Partition the base network and allocate the topology from the resulting pool
    pub fn execute(&self, limit: usize) -> Result<Plan> {
        let pool = partition_with_limit(&self.network, self.original_prefix, self.new_prefix, limit)?;
        let plan = allocate(&self.routers, &pool, &self.options())?;
        info!(
            "Planned {} routers from {}/{} split into /{} ({} of {} subnets used)",
            plan.len(),
            self.network,
            self.original_prefix,
            self.new_prefix,
            plan.subnets_consumed,
            pool.len()
        );
        Ok(plan)
    }
}

/// [`PlanRequest::execute`] with the default partition bound
pub fn plan(request: &PlanRequest) -> Result<Plan> {
    request.execute(MAX_SUBNETS)
}
