//! Subnet partitioning and address assignment for small router networks
//!
//! This library splits an address block into equally sized subnets and walks a
//! router topology to hand out link subnets, endpoint addresses, interfaces and
//! DHCP pools. It performs no I/O and keeps no state between calls.

pub mod addr;
pub mod allocator;
pub mod error;
pub mod interface;
pub mod plan;
pub mod render;
pub mod router;
pub mod subnet;
pub mod topology;

pub use allocator::{allocate, AllocationOptions, Plan};
pub use error::{PlanError, PlanWarning, Result};
pub use interface::Interface;
pub use plan::{plan, PlanRequest};
pub use render::{render_plan, render_router_config, summary_rows, RouterConfig, SummaryRow};
pub use router::{Connection, Router, RoutingProtocol};
pub use subnet::{partition, partition_with_limit, Subnet, MAX_SUBNETS};
pub use topology::{RouterSpec, Topology};
