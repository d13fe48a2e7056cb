use netplan_core::MAX_SUBNETS;
use serde::{Deserialize, Serialize};

/// Configuration structure loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Planner limits and policies
    #[serde(default)]
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listening address
    #[serde(default = "default_api_address")]
    pub listen_address: String,

    /// API listening port
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Optional Unix socket path for local clients
    #[serde(default)]
    pub unix_socket: Option<String>,
}

fn default_api_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_address: default_api_address(),
            port: default_api_port(),
            unix_socket: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Largest number of blocks a single partition may enumerate
    #[serde(default = "default_max_subnets")]
    pub max_subnets: usize,

    /// Reject plans where a router has more peers than interfaces
    #[serde(default)]
    pub strict_interfaces: bool,
}

fn default_max_subnets() -> usize {
    MAX_SUBNETS
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_subnets: default_max_subnets(),
            strict_interfaces: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}
