use crate::interface::Interface;
use crate::subnet::Subnet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Dynamic routing protocol configured on every router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RoutingProtocol {
    Rip,
    Ospf,
    Eigrp,
}

impl RoutingProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rip => "rip",
            Self::Ospf => "ospf",
            Self::Eigrp => "eigrp",
        }
    }

    /// OSPF needs a process id and EIGRP an AS number
    pub fn needs_as_number(self) -> bool {
        !matches!(self, Self::Rip)
    }
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rip" => Ok(Self::Rip),
            "ospf" => Ok(Self::Ospf),
            "eigrp" => Ok(Self::Eigrp),
            other => Err(format!("unknown routing protocol '{}'", other)),
        }
    }
}

/// One side of a point-to-point link, owned by the router it is configured on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Connection {
    /// Router at the other end of the link
    pub peer_id: String,

    pub interface: Interface,

    /// Link subnet network address
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub network: Ipv4Addr,

    /// Link subnet prefix length
    pub mask: u8,

    /// Address of this router on the link
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub ip_address: Ipv4Addr,
}

/// Addressing computed for a single router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Router {
    pub id: String,

    pub name: String,

    /// Links in peer declaration order, at most one per peer
    pub connections: Vec<Connection>,

    pub interfaces_used: Vec<Interface>,

    /// LAN subnets served over DHCP, present when DHCP is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<Subnet>>))]
    pub dhcp_subnets: Option<[Subnet; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_ip_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RoutingProtocol>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_number: Option<u32>,
}

impl Router {
    /// The link towards `peer_id`, if one was allocated on this router
    pub fn connection_to(&self, peer_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.peer_id == peer_id)
    }

    /// Networks to advertise: link subnets first, then DHCP subnets
    pub fn advertised_networks(&self) -> Vec<(Ipv4Addr, u8)> {
        let links = self.connections.iter().map(|c| (c.network, c.mask));
        let lans = self
            .dhcp_subnets
            .iter()
            .flatten()
            .map(|s| (s.network, s.mask));
        links.chain(lans).collect()
    }
}
