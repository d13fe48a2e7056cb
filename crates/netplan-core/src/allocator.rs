//! Walks a topology in declaration order and hands out link subnets,
//! endpoint addresses, interfaces and DHCP pools from a subnet pool.

use crate::addr::broadcast_of;
use crate::error::{PlanError, PlanWarning, Result};
use crate::interface::InterfaceSlots;
use crate::router::{Connection, Router, RoutingProtocol};
use crate::subnet::Subnet;
use crate::topology::Topology;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use tracing::{debug, warn};

/// Subnets set aside after every router, used for DHCP when enabled
pub const DHCP_SUBNETS_PER_ROUTER: usize = 2;

/// Settings applied uniformly to every router of the topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AllocationOptions {
    #[serde(default)]
    pub enable_dhcp: bool,

    #[serde(default)]
    pub static_ip_count: Option<u32>,

    #[serde(default)]
    pub protocol: Option<RoutingProtocol>,

    /// AS number (EIGRP) or process id (OSPF)
    #[serde(default)]
    pub as_number: Option<u32>,

    /// Fail instead of warning when a router declares more peers than interfaces
    #[serde(default)]
    pub strict_interfaces: bool,
}

impl AllocationOptions {
    pub fn validate(&self) -> Result<()> {
        if let Some(protocol) = self.protocol {
            if protocol.needs_as_number() {
                match self.as_number {
                    Some(n) if (1..=65535).contains(&n) => {}
                    Some(n) => {
                        return Err(PlanError::invalid(format!(
                            "AS number {} for {} is out of range (1-65535)",
                            n, protocol
                        )))
                    }
                    None => {
                        return Err(PlanError::invalid(format!(
                            "{} requires an AS number",
                            protocol
                        )))
                    }
                }
            }
        }
        Ok(())
    }
}

/// Result of a successful allocation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Plan {
    /// One entry per input router, in declaration order
    pub routers: Vec<Router>,

    #[serde(default)]
    pub warnings: Vec<PlanWarning>,

    /// Pool entries read or reserved by the pass
    pub subnets_consumed: usize,
}

impl Plan {
    pub fn router(&self, id: &str) -> Option<&Router> {
        self.routers.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}

/// Position in the subnet pool, advanced once per minted link and twice per router
struct PoolCursor<'a> {
    pool: &'a [Subnet],
    position: usize,
}

impl<'a> PoolCursor<'a> {
    fn new(pool: &'a [Subnet]) -> Self {
        Self { pool, position: 0 }
    }

    fn take(&mut self, router_id: &str, purpose: &str) -> Result<&'a Subnet> {
        let subnet = self
            .pool
            .get(self.position)
            .ok_or_else(|| PlanError::PoolExhausted {
                router_id: router_id.to_string(),
                purpose: purpose.to_string(),
                needed: self.position + 1,
                available: self.pool.len(),
            })?;
        self.position += 1;
        Ok(subnet)
    }

    fn skip(&mut self, n: usize) {
        self.position += n;
    }

    fn consumed(&self) -> usize {
        self.position.min(self.pool.len())
    }
}

/// Address following `prev` on the same link, checked against the link broadcast
fn next_host(router_id: &str, prev: &Connection) -> Result<Ipv4Addr> {
    let broadcast = u32::from(broadcast_of(prev.network, prev.mask));
    u32::from(prev.ip_address)
        .checked_add(1)
        .filter(|ip| *ip < broadcast)
        .map(Ipv4Addr::from)
        .ok_or_else(|| PlanError::HostRangeExhausted {
            router_id: router_id.to_string(),
            network: prev.network,
            mask: prev.mask,
        })
}

/// Assign link subnets, addresses, interfaces and DHCP pools to every router.
///
/// A link is minted from the pool by whichever endpoint comes first in the
/// topology; the other endpoint reuses the subnet and takes the next address.
pub fn allocate(topology: &Topology, pool: &[Subnet], options: &AllocationOptions) -> Result<Plan> {
    topology.validate()?;
    options.validate()?;

    let mut cursor = PoolCursor::new(pool);
    let mut routers: Vec<Router> = Vec::with_capacity(topology.len());
    let mut processed: HashMap<&str, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for spec in topology.routers() {
        let mut slots = InterfaceSlots::new();
        let mut connections = Vec::with_capacity(spec.peers.len());

        for peer_id in &spec.peers {
            let Some(interface) = slots.next() else {
                if options.strict_interfaces {
                    return Err(PlanError::InterfaceExhausted {
                        router_id: spec.id.clone(),
                        peer_id: peer_id.clone(),
                    });
                }
                warn!(
                    "Router {} has no interface left, skipping link to {}",
                    spec.id, peer_id
                );
                warnings.push(PlanWarning::InterfaceExhausted {
                    router_id: spec.id.clone(),
                    peer_id: peer_id.clone(),
                });
                continue;
            };

            let back_link = processed
                .get(peer_id.as_str())
                .and_then(|&i| routers[i].connection_to(&spec.id));

            let connection = match back_link {
                Some(prev) => {
                    let ip_address = next_host(&spec.id, prev)?;
                    debug!(
                        "Link {} <-> {} reuses {}/{}, {} gets {}",
                        peer_id, spec.id, prev.network, prev.mask, spec.id, ip_address
                    );
                    Connection {
                        peer_id: peer_id.clone(),
                        interface,
                        network: prev.network,
                        mask: prev.mask,
                        ip_address,
                    }
                }
                None => {
                    let subnet = cursor.take(&spec.id, &format!("link to {}", peer_id))?;
                    debug!(
                        "Link {} <-> {} minted {}, {} gets {}",
                        spec.id, peer_id, subnet, spec.id, subnet.first_address
                    );
                    Connection {
                        peer_id: peer_id.clone(),
                        interface,
                        network: subnet.network,
                        mask: subnet.mask,
                        ip_address: subnet.first_address,
                    }
                }
            };
            connections.push(connection);
        }

        let dhcp_subnets = if options.enable_dhcp {
            let first = cursor.take(&spec.id, "dhcp")?.clone();
            let second = cursor.take(&spec.id, "dhcp")?.clone();
            debug!("Router {} serves DHCP on {} and {}", spec.id, first, second);
            Some([first, second])
        } else {
            cursor.skip(DHCP_SUBNETS_PER_ROUTER);
            None
        };

        processed.insert(spec.id.as_str(), routers.len());
        routers.push(Router {
            id: spec.id.clone(),
            name: spec.name.clone(),
            connections,
            interfaces_used: slots.into_used(),
            dhcp_subnets,
            static_ip_count: options.static_ip_count,
            protocol: options.protocol,
            as_number: options.as_number,
        });
    }

    Ok(Plan {
        routers,
        warnings,
        subnets_consumed: cursor.consumed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::Interface;
    use crate::subnet::partition;
    use crate::topology::RouterSpec;

    fn pool() -> Vec<Subnet> {
        partition("10.0.0.0", 16, 24).unwrap()
    }

    fn triangle() -> Topology {
        Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2", "r3"]),
            RouterSpec::new("r2", "R2", &["r1", "r3"]),
            RouterSpec::new("r3", "R3", &["r1", "r2"]),
        ])
    }

    #[test]
    fn test_two_routers_share_link_subnet() {
        let pool = vec![Subnet::from_block(Ipv4Addr::new(10, 0, 1, 0), 24).unwrap()];
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2"]),
            RouterSpec::new("r2", "R2", &["r1"]),
        ]);

        let plan = allocate(&topology, &pool, &AllocationOptions::default()).unwrap();

        let r1 = plan.router("r1").unwrap().connection_to("r2").unwrap();
        assert_eq!(r1.ip_address, Ipv4Addr::new(10, 0, 1, 1));
        assert_eq!(r1.interface, Interface::S000);

        let r2 = plan.router("r2").unwrap().connection_to("r1").unwrap();
        assert_eq!(r2.ip_address, Ipv4Addr::new(10, 0, 1, 2));
        assert_eq!(r2.interface, Interface::S000);

        assert_eq!((r1.network, r1.mask), (r2.network, r2.mask));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_triangle_consumption_order() {
        let plan = allocate(&triangle(), &pool(), &AllocationOptions::default()).unwrap();

        let r1 = plan.router("r1").unwrap();
        assert_eq!(r1.connection_to("r2").unwrap().ip_address, Ipv4Addr::new(10, 0, 1, 1));
        assert_eq!(r1.connection_to("r3").unwrap().ip_address, Ipv4Addr::new(10, 0, 2, 1));
        assert_eq!(r1.interfaces_used, vec![Interface::S000, Interface::S001]);

        // r1 reserved pool[2] and pool[3], so the r2 <-> r3 link takes pool[4]
        let r2 = plan.router("r2").unwrap();
        assert_eq!(r2.connection_to("r1").unwrap().ip_address, Ipv4Addr::new(10, 0, 1, 2));
        assert_eq!(r2.connection_to("r3").unwrap().ip_address, Ipv4Addr::new(10, 0, 5, 1));

        let r3 = plan.router("r3").unwrap();
        assert_eq!(r3.connection_to("r1").unwrap().ip_address, Ipv4Addr::new(10, 0, 2, 2));
        assert_eq!(r3.connection_to("r2").unwrap().ip_address, Ipv4Addr::new(10, 0, 5, 2));
        assert_eq!(r3.connection_to("r2").unwrap().interface, Interface::S001);

        assert_eq!(plan.subnets_consumed, 9);
    }

    #[test]
    fn test_symmetric_links_have_consecutive_hosts() {
        let plan = allocate(&triangle(), &pool(), &AllocationOptions::default()).unwrap();

        for router in &plan.routers {
            for conn in &router.connections {
                let back = plan.router(&conn.peer_id).unwrap().connection_to(&router.id).unwrap();
                assert_eq!((conn.network, conn.mask), (back.network, back.mask));
                let (a, b) = (u32::from(conn.ip_address), u32::from(back.ip_address));
                assert_eq!(a.abs_diff(b), 1);
            }
        }
    }

    #[test]
    fn test_dhcp_takes_two_subnets_after_links() {
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2"]),
            RouterSpec::new("r2", "R2", &["r1"]),
        ]);
        let options = AllocationOptions {
            enable_dhcp: true,
            ..Default::default()
        };

        let plan = allocate(&topology, &pool(), &options).unwrap();

        let r1 = plan.router("r1").unwrap();
        let [a, b] = r1.dhcp_subnets.as_ref().unwrap();
        assert_eq!(a.network, Ipv4Addr::new(10, 0, 2, 0));
        assert_eq!(b.network, Ipv4Addr::new(10, 0, 3, 0));

        let r2 = plan.router("r2").unwrap();
        let [c, d] = r2.dhcp_subnets.as_ref().unwrap();
        assert_eq!(c.network, Ipv4Addr::new(10, 0, 4, 0));
        assert_eq!(d.network, Ipv4Addr::new(10, 0, 5, 0));
        assert_eq!(plan.subnets_consumed, 5);
    }

    #[test]
    fn test_dhcp_toggle_keeps_link_addressing() {
        let with = allocate(
            &triangle(),
            &pool(),
            &AllocationOptions {
                enable_dhcp: true,
                ..Default::default()
            },
        )
        .unwrap();
        let without = allocate(&triangle(), &pool(), &AllocationOptions::default()).unwrap();

        for (a, b) in with.routers.iter().zip(&without.routers) {
            assert_eq!(a.connections, b.connections);
            assert!(a.dhcp_subnets.is_some());
            assert!(b.dhcp_subnets.is_none());
        }
    }

    #[test]
    fn test_fifth_peer_is_skipped_with_warning() {
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2", "r3", "r4", "r5", "r6"]),
            RouterSpec::new("r2", "R2", &[]),
            RouterSpec::new("r3", "R3", &[]),
            RouterSpec::new("r4", "R4", &[]),
            RouterSpec::new("r5", "R5", &[]),
            RouterSpec::new("r6", "R6", &[]),
        ]);

        let plan = allocate(&topology, &pool(), &AllocationOptions::default()).unwrap();

        let r1 = plan.router("r1").unwrap();
        assert_eq!(r1.connections.len(), 4);
        assert_eq!(r1.interfaces_used, Interface::ALL.to_vec());
        assert!(r1.connection_to("r6").is_none());
        assert_eq!(
            plan.warnings,
            vec![PlanWarning::InterfaceExhausted {
                router_id: "r1".to_string(),
                peer_id: "r6".to_string(),
            }]
        );
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn test_fifth_peer_fails_in_strict_mode() {
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2", "r3", "r4", "r5", "r6"]),
            RouterSpec::new("r2", "R2", &[]),
            RouterSpec::new("r3", "R3", &[]),
            RouterSpec::new("r4", "R4", &[]),
            RouterSpec::new("r5", "R5", &[]),
            RouterSpec::new("r6", "R6", &[]),
        ]);
        let options = AllocationOptions {
            strict_interfaces: true,
            ..Default::default()
        };

        let err = allocate(&topology, &pool(), &options).unwrap_err();
        assert_eq!(
            err,
            PlanError::InterfaceExhausted {
                router_id: "r1".to_string(),
                peer_id: "r6".to_string(),
            }
        );
    }

    #[test]
    fn test_one_sided_links() {
        // r1 declares r2, r2 declares nothing
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2"]),
            RouterSpec::new("r2", "R2", &[]),
        ]);
        let plan = allocate(&topology, &pool(), &AllocationOptions::default()).unwrap();
        assert_eq!(plan.router("r1").unwrap().connections.len(), 1);
        assert!(plan.router("r2").unwrap().connections.is_empty());

        // only the later router declares the link, so it mints the subnet
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &[]),
            RouterSpec::new("r2", "R2", &["r1"]),
        ]);
        let plan = allocate(&topology, &pool(), &AllocationOptions::default()).unwrap();
        let conn = plan.router("r2").unwrap().connection_to("r1").unwrap();
        assert_eq!(conn.network, Ipv4Addr::new(10, 0, 3, 0));
        assert_eq!(conn.ip_address, Ipv4Addr::new(10, 0, 3, 1));
    }

    #[test]
    fn test_pool_exhaustion_is_an_error() {
        let pool = vec![Subnet::from_block(Ipv4Addr::new(10, 0, 1, 0), 24).unwrap()];
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2", "r3"]),
            RouterSpec::new("r2", "R2", &[]),
            RouterSpec::new("r3", "R3", &[]),
        ]);

        let err = allocate(&topology, &pool, &AllocationOptions::default()).unwrap_err();
        assert_eq!(
            err,
            PlanError::PoolExhausted {
                router_id: "r1".to_string(),
                purpose: "link to r3".to_string(),
                needed: 2,
                available: 1,
            }
        );
    }

    #[test]
    fn test_dhcp_pool_exhaustion_is_an_error() {
        let pool: Vec<Subnet> = pool().into_iter().take(2).collect();
        let topology = Topology::new(vec![RouterSpec::new("r1", "R1", &[])]);
        let options = AllocationOptions {
            enable_dhcp: true,
            ..Default::default()
        };
        assert!(allocate(&topology, &pool, &options).is_ok());

        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &[]),
            RouterSpec::new("r2", "R2", &[]),
        ]);
        let err = allocate(&topology, &pool, &options).unwrap_err();
        assert!(matches!(err, PlanError::PoolExhausted { ref purpose, .. } if purpose == "dhcp"));
    }

    #[test]
    fn test_reuse_increments_whole_address() {
        // caller-supplied pool whose first host sits on an octet boundary
        let pool = vec![Subnet {
            network: Ipv4Addr::new(10, 1, 0, 0),
            mask: 16,
            first_address: Ipv4Addr::new(10, 1, 0, 255),
            last_address: Ipv4Addr::new(10, 1, 255, 254),
        }];
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2"]),
            RouterSpec::new("r2", "R2", &["r1"]),
        ]);

        let plan = allocate(&topology, &pool, &AllocationOptions::default()).unwrap();
        let conn = plan.router("r2").unwrap().connection_to("r1").unwrap();
        assert_eq!(conn.ip_address, Ipv4Addr::new(10, 1, 1, 0));
    }

    #[test]
    fn test_reuse_past_broadcast_is_an_error() {
        let pool = vec![Subnet {
            network: Ipv4Addr::new(10, 0, 0, 0),
            mask: 30,
            first_address: Ipv4Addr::new(10, 0, 0, 2),
            last_address: Ipv4Addr::new(10, 0, 0, 2),
        }];
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2"]),
            RouterSpec::new("r2", "R2", &["r1"]),
        ]);

        let err = allocate(&topology, &pool, &AllocationOptions::default()).unwrap_err();
        assert!(matches!(err, PlanError::HostRangeExhausted { mask: 30, .. }));
    }

    #[test]
    fn test_options_are_applied_to_every_router() {
        let options = AllocationOptions {
            enable_dhcp: false,
            static_ip_count: Some(5),
            protocol: Some(RoutingProtocol::Eigrp),
            as_number: Some(100),
            strict_interfaces: false,
        };
        let plan = allocate(&triangle(), &pool(), &options).unwrap();
        for router in &plan.routers {
            assert_eq!(router.protocol, Some(RoutingProtocol::Eigrp));
            assert_eq!(router.as_number, Some(100));
            assert_eq!(router.static_ip_count, Some(5));
        }
    }

    #[test]
    fn test_options_validation() {
        let missing_as = AllocationOptions {
            protocol: Some(RoutingProtocol::Ospf),
            ..Default::default()
        };
        assert!(allocate(&triangle(), &pool(), &missing_as)
            .unwrap_err()
            .is_invalid_input());

        let out_of_range = AllocationOptions {
            protocol: Some(RoutingProtocol::Eigrp),
            as_number: Some(70000),
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());

        let rip = AllocationOptions {
            protocol: Some(RoutingProtocol::Rip),
            ..Default::default()
        };
        assert!(rip.validate().is_ok());
    }

    #[test]
    fn test_invalid_topology_is_rejected() {
        let topology = Topology::new(vec![RouterSpec::new("r1", "R1", &["ghost"])]);
        assert!(allocate(&topology, &pool(), &AllocationOptions::default())
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_allocate_is_idempotent() {
        let options = AllocationOptions {
            enable_dhcp: true,
            ..Default::default()
        };
        let first = allocate(&triangle(), &pool(), &options).unwrap();
        let second = allocate(&triangle(), &pool(), &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_topology() {
        let plan = allocate(&Topology::default(), &[], &AllocationOptions::default()).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.subnets_consumed, 0);
    }
}
