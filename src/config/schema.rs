//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blockchain::types::ChainByte;

/// Root configuration for the signer gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Network used when the current path carries no address.
    pub default_network: String,

    /// Known networks.
    pub networks: Vec<NetworkConfig>,

    /// Account defaults.
    pub account: AccountConfig,

    /// Block explorer settings.
    pub explorer: ExplorerConfig,

    /// Confirmation polling settings.
    pub confirmation: ConfirmationConfig,

    /// Submission tracking settings.
    pub tracker: TrackerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            default_network: "mainnet".to_string(),
            networks: default_networks(),
            account: AccountConfig::default(),
            explorer: ExplorerConfig::default(),
            confirmation: ConfirmationConfig::default(),
            tracker: TrackerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// One network entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Identifier (e.g. "mainnet").
    pub id: String,

    /// Node REST endpoint.
    pub node_url: String,

    /// Chain byte as a number (87 = 'W').
    pub chain_byte: ChainByte,

    /// Code used in explorer links. Empty means the network id.
    #[serde(default)]
    pub explorer_code: String,

    /// Signing provider origin. Absent means the provider cannot be used.
    #[serde(default)]
    pub provider_origin: Option<String>,
}

fn default_networks() -> Vec<NetworkConfig> {
    vec![
        NetworkConfig {
            id: "mainnet".to_string(),
            node_url: "https://nodes.wavesnodes.com".to_string(),
            chain_byte: ChainByte::MAINNET,
            explorer_code: "mainnet".to_string(),
            provider_origin: Some("https://waves.exchange/signer/".to_string()),
        },
        NetworkConfig {
            id: "testnet".to_string(),
            node_url: "https://nodes-testnet.wavesnodes.com".to_string(),
            chain_byte: ChainByte::TESTNET,
            explorer_code: "testnet".to_string(),
            provider_origin: Some("https://testnet.waves.exchange/signer/".to_string()),
        },
        NetworkConfig {
            id: "stagenet".to_string(),
            node_url: "https://nodes-stagenet.wavesnodes.com".to_string(),
            chain_byte: ChainByte::STAGENET,
            explorer_code: "stagenet".to_string(),
            provider_origin: None,
        },
    ]
}

/// Account defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Fee applied to fee-bearing transactions, in whole tokens.
    pub fee: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            fee: "0.005".to_string(),
        }
    }
}

/// Block explorer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Explorer origin.
    pub base_url: String,

    /// Explorer code that is served from the root path.
    pub root_code: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wavesexplorer.com".to_string(),
            root_code: "mainnet".to_string(),
        }
    }
}

/// Confirmation polling settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// First delay between status polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound for the backoff between polls in milliseconds.
    pub max_poll_interval_ms: u64,

    /// Give up waiting after this many seconds.
    pub timeout_secs: u64,

    /// Timeout for a single node request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_poll_interval_ms: 5000,
            timeout_secs: 120,
            request_timeout_secs: 10,
        }
    }
}

/// Submission tracking settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Seconds a finished submission stays queryable.
    pub finished_ttl_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            finished_ttl_secs: 300,
        }
    }
}

impl TrackerConfig {
    pub fn finished_ttl(&self) -> Duration {
        Duration::from_secs(self.finished_ttl_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
