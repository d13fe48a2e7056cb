use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A router as declared by the user, with the routers it links to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouterSpec {
    pub id: String,

    pub name: String,

    /// Peer router ids, in the order interfaces get assigned
    #[serde(default)]
    pub peers: Vec<String>,
}

impl RouterSpec {
    pub fn new(id: &str, name: &str, peers: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            peers: peers.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Routers in declaration order. The order drives subnet consumption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct Topology(pub Vec<RouterSpec>);

impl Topology {
    pub fn new(routers: Vec<RouterSpec>) -> Self {
        Self(routers)
    }

    /// `count` unconnected routers named `router_1`/`Router 1` onwards
    pub fn scaffold(count: usize) -> Self {
        Self(
            (1..=count)
                .map(|i| RouterSpec {
                    id: format!("router_{}", i),
                    name: format!("Router {}", i),
                    peers: Vec::new(),
                })
                .collect(),
        )
    }

    pub fn routers(&self) -> &[RouterSpec] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RouterSpec> {
        self.0.iter().find(|r| r.id == id)
    }

    /// Reject topologies whose peer references cannot be resolved
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for router in &self.0 {
            if router.id.trim().is_empty() {
                return Err(PlanError::invalid("router id must not be empty"));
            }
            if !ids.insert(router.id.as_str()) {
                return Err(PlanError::invalid(format!(
                    "duplicate router id '{}'",
                    router.id
                )));
            }
        }

        for router in &self.0 {
            let mut seen = HashSet::new();
            for peer in &router.peers {
                if peer == &router.id {
                    return Err(PlanError::invalid(format!(
                        "router '{}' lists itself as a peer",
                        router.id
                    )));
                }
                if !ids.contains(peer.as_str()) {
                    return Err(PlanError::invalid(format!(
                        "router '{}' lists unknown peer '{}'",
                        router.id, peer
                    )));
                }
                if !seen.insert(peer.as_str()) {
                    return Err(PlanError::invalid(format!(
                        "router '{}' lists peer '{}' twice",
                        router.id, peer
                    )));
                }
            }
        }

        Ok(())
    }
}

impl From<Vec<RouterSpec>> for Topology {
    fn from(routers: Vec<RouterSpec>) -> Self {
        Self(routers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let topology = Topology::scaffold(3);
        assert_eq!(topology.len(), 3);
        assert_eq!(topology.routers()[0].id, "router_1");
        assert_eq!(topology.routers()[2].name, "Router 3");
        assert!(topology.routers().iter().all(|r| r.peers.is_empty()));
        assert!(Topology::scaffold(0).is_empty());
    }

    #[test]
    fn test_validate_accepts_triangle() {
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2", "r3"]),
            RouterSpec::new("r2", "R2", &["r1", "r3"]),
            RouterSpec::new("r3", "R3", &["r1", "r2"]),
        ]);
        assert!(topology.validate().is_ok());
        assert_eq!(topology.get("r2").map(|r| r.name.as_str()), Some("R2"));
    }

    #[test]
    fn test_validate_rejects_duplicate_id() {
        let topology = Topology::new(vec![
            RouterSpec::new("r1", "R1", &[]),
            RouterSpec::new("r1", "Again", &[]),
        ]);
        let err = topology.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid input: duplicate router id 'r1'");
    }

    #[test]
    fn test_validate_rejects_bad_peers() {
        let self_peer = Topology::new(vec![RouterSpec::new("r1", "R1", &["r1"])]);
        assert!(self_peer.validate().is_err());

        let unknown = Topology::new(vec![RouterSpec::new("r1", "R1", &["r9"])]);
        assert!(unknown
            .validate()
            .unwrap_err()
            .to_string()
            .contains("unknown peer 'r9'"));

        let twice = Topology::new(vec![
            RouterSpec::new("r1", "R1", &["r2", "r2"]),
            RouterSpec::new("r2", "R2", &[]),
        ]);
        assert!(twice.validate().is_err());

        let blank = Topology::new(vec![RouterSpec::new(" ", "R1", &[])]);
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_topology_deserializes_from_list() {
        let yaml = "- id: r1\n  name: Router 1\n  peers: [r2]\n- id: r2\n  name: Router 2\n";
        let topology: Topology = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(topology.len(), 2);
        assert_eq!(topology.routers()[0].peers, vec!["r2".to_string()]);
        assert!(topology.routers()[1].peers.is_empty());
    }
}
