use serde::{Deserialize, Serialize};

/// Description of a machine a simulation ran on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlatformInformation {
    pub architecture_bits: String,
    pub architecture_linkage: String,
    pub machine: String,
    pub network_name: String,
    pub ip_addr: String,
    pub processor: String,
    pub release: String,
    pub system_name: String,
    pub version: String,
}
