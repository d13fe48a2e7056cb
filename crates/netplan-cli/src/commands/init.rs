use anyhow::Result;
use netplan_core::{PlanRequest, RoutingProtocol, Topology};
use std::path::Path;

/// Plan request with `count` routers and no links, ready to be edited
pub fn scaffold(
    count: usize,
    network: String,
    original_prefix: u8,
    new_prefix: u8,
    protocol: Option<RoutingProtocol>,
    as_number: Option<u32>,
    enable_dhcp: bool,
) -> PlanRequest {
    PlanRequest {
        network,
        original_prefix,
        new_prefix,
        routers: Topology::scaffold(count),
        enable_dhcp,
        static_ip_count: None,
        protocol,
        as_number,
        strict_interfaces: false,
    }
}

pub fn write(request: &PlanRequest, output: Option<&Path>) -> Result<()> {
    let yaml = serde_yaml::to_string(request)?;
    match output {
        Some(path) => {
            std::fs::write(path, yaml)?;
            println!(
                "Wrote plan with {} routers to {}",
                request.routers.len(),
                path.display()
            );
        }
        None => print!("{}", yaml),
    }
    Ok(())
}
