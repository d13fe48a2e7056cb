use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serial WAN interfaces available on every router, in allocation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Interface {
    #[serde(rename = "s0/0/0")]
    S000,
    #[serde(rename = "s0/0/1")]
    S001,
    #[serde(rename = "s0/1/0")]
    S010,
    #[serde(rename = "s0/1/1")]
    S011,
}

impl Interface {
    pub const ALL: [Interface; 4] = [Self::S000, Self::S001, Self::S010, Self::S011];

    pub const COUNT: usize = Self::ALL.len();

    /// Device name of the interface
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S000 => "s0/0/0",
            Self::S001 => "s0/0/1",
            Self::S010 => "s0/1/0",
            Self::S011 => "s0/1/1",
        }
    }

    /// Position in allocation order
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown interface '{}'", s))
    }
}

/// Name of the LAN interface serving the DHCP pool at `index`
pub fn lan_interface(index: usize) -> String {
    format!("gi0/{}", index)
}

/// First-available interface allocator for a single router
#[derive(Debug, Clone, Default)]
pub struct InterfaceSlots {
    used: Vec<Interface>,
}

impl InterfaceSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next free interface, `None` once all of them are used
    pub fn next(&mut self) -> Option<Interface> {
        let interface = Interface::from_index(self.used.len())?;
        self.used.push(interface);
        Some(interface)
    }

    pub fn remaining(&self) -> usize {
        Interface::COUNT - self.used.len()
    }

    pub fn into_used(self) -> Vec<Interface> {
        self.used
    }
}
