//! Device configuration text and the per-link summary of a plan.

use crate::addr::{prefix_to_mask, wildcard};
use crate::allocator::Plan;
use crate::interface::lan_interface;
use crate::router::{Router, RoutingProtocol};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::net::Ipv4Addr;

/// Rendered configuration for one router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouterConfig {
    pub router_id: String,
    pub name: String,
    pub config: String,
}

/// One line of the addressing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SummaryRow {
    pub router: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub network: Ipv4Addr,
    pub mask: u8,
    pub interface: String,
    /// Name of the router at the other end
    pub peer: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub ip_address: Ipv4Addr,
}

/// Hostname as accepted by the device: whitespace becomes `_`
pub fn hostname(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn network_statement(protocol: RoutingProtocol, network: Ipv4Addr, mask: u8) -> String {
    let wildcard = wildcard(prefix_to_mask(mask));
    match protocol {
        RoutingProtocol::Rip => format!("network {}", network),
        RoutingProtocol::Eigrp => format!("network {} {}", network, wildcard),
        RoutingProtocol::Ospf => format!("network {} {} area 0", network, wildcard),
    }
}

/// Render the command sequence configuring `router`
pub fn render_router_config(router: &Router) -> String {
    let mut out = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(out, "enable");
    let _ = writeln!(out, "config terminal");
    let _ = writeln!(out, "hostname {}", hostname(&router.name));

    for conn in &router.connections {
        let _ = writeln!(out, "interface {}", conn.interface);
        let _ = writeln!(out, "ip address {} {}", conn.ip_address, prefix_to_mask(conn.mask));
        let _ = writeln!(out, "no shutdown");
        let _ = writeln!(out, "exit");
    }

    for (index, subnet) in router.dhcp_subnets.iter().flatten().enumerate() {
        let mask = prefix_to_mask(subnet.mask);
        let _ = writeln!(out, "interface {}", lan_interface(index));
        let _ = writeln!(out, "ip address {} {}", subnet.first_address, mask);
        let _ = writeln!(out, "no shutdown");
        let _ = writeln!(out, "exit");
        let _ = writeln!(out, "ip dhcp pool lan_{}", index + 1);
        let _ = writeln!(out, "network {} {}", subnet.network, mask);
        let _ = writeln!(out, "default-router {}", subnet.first_address);
    }

    if let Some(protocol) = router.protocol {
        match router.as_number {
            Some(as_number) if protocol.needs_as_number() => {
                let _ = writeln!(out, "router {} {}", protocol, as_number);
            }
            _ => {
                let _ = writeln!(out, "router {}", protocol);
            }
        }
        if protocol == RoutingProtocol::Rip {
            let _ = writeln!(out, "version 2");
        }
        for (network, mask) in router.advertised_networks() {
            let _ = writeln!(out, "{}", network_statement(protocol, network, mask));
        }
    }

    out
}

/// Render every router of the plan, in declaration order
pub fn render_plan(plan: &Plan) -> Vec<RouterConfig> {
    plan.routers
        .iter()
        .map(|router| RouterConfig {
            router_id: router.id.clone(),
            name: router.name.clone(),
            config: render_router_config(router),
        })
        .collect()
}

/// Addressing table, one row per configured link
pub fn summary_rows(plan: &Plan) -> Vec<SummaryRow> {
    plan.routers
        .iter()
        .flat_map(|router| {
            router.connections.iter().map(move |conn| SummaryRow {
                router: router.name.clone(),
                network: conn.network,
                mask: conn.mask,
                interface: conn.interface.to_string(),
                peer: plan
                    .router(&conn.peer_id)
                    .map(|peer| peer.name.clone())
                    .unwrap_or_else(|| conn.peer_id.clone()),
                ip_address: conn.ip_address,
            })
        })
        .collect()
}
