//! Network registry and chain-byte resolution.
//!
//! The registry is built once from configuration and never mutated. Every
//! session, login and submission looks networks up here.

use url::Url;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainByte};
use crate::config::schema::{GatewayConfig, NetworkConfig};

/// Connection parameters for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Registry identifier (e.g. "mainnet").
    pub id: String,
    /// Node REST endpoint.
    pub node_url: Url,
    /// Chain byte carried by this network's addresses.
    pub chain_byte: ChainByte,
    /// Code used when building explorer links.
    pub explorer_code: String,
    /// Origin of the signing provider, if the provider supports this network.
    pub provider_origin: Option<Url>,
}

impl Network {
    /// Build a network from its configuration entry.
    pub fn from_config(config: &NetworkConfig) -> BlockchainResult<Self> {
        let node_url = parse_url(&config.node_url)?;
        let provider_origin = config
            .provider_origin
            .as_deref()
            .map(parse_url)
            .transpose()?;

        Ok(Self {
            id: config.id.clone(),
            node_url,
            chain_byte: config.chain_byte,
            explorer_code: if config.explorer_code.is_empty() {
                config.id.clone()
            } else {
                config.explorer_code.clone()
            },
            provider_origin,
        })
    }

    /// Whether the signing provider can be used on this network.
    pub fn supports_provider(&self) -> bool {
        self.provider_origin.is_some()
    }
}

fn parse_url(raw: &str) -> BlockchainResult<Url> {
    Url::parse(raw).map_err(|e| BlockchainError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Immutable set of known networks with a designated default.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<Network>,
    default_idx: usize,
}

impl NetworkRegistry {
    /// Build the registry from validated configuration.
    pub fn from_config(config: &GatewayConfig) -> BlockchainResult<Self> {
        let networks = config
            .networks
            .iter()
            .map(Network::from_config)
            .collect::<BlockchainResult<Vec<_>>>()?;

        Self::new(networks, &config.default_network)
    }

    /// Build a registry from explicit networks.
    pub fn new(networks: Vec<Network>, default_id: &str) -> BlockchainResult<Self> {
        let default_idx = networks
            .iter()
            .position(|n| n.id == default_id)
            .ok_or_else(|| BlockchainError::UnknownNetwork(default_id.to_string()))?;

        Ok(Self {
            networks,
            default_idx,
        })
    }

    /// Look a network up by identifier.
    pub fn get(&self, id: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.id == id)
    }

    /// Network used when nothing more specific is known.
    pub fn default_network(&self) -> &Network {
        &self.networks[self.default_idx]
    }

    /// Look a network up by its chain byte.
    pub fn by_chain_byte(&self, byte: ChainByte) -> Option<&Network> {
        self.networks.iter().find(|n| n.chain_byte == byte)
    }

    /// Resolve a raw chain byte reported by the signer.
    ///
    /// `Ok(None)` means the byte is well-formed but belongs to no known
    /// network. `Err` means the value is not a byte at all.
    pub fn resolve_byte(&self, raw: i64) -> BlockchainResult<Option<&Network>> {
        let byte = ChainByte::try_from(raw)?;
        let network = self.by_chain_byte(byte);
        if network.is_none() {
            tracing::debug!(chain_byte = %byte, "Chain byte matches no known network");
        }
        Ok(network)
    }

    /// All registered networks.
    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NetworkRegistry {
        NetworkRegistry::from_config(&GatewayConfig::default()).unwrap()
    }

    #[test]
    fn test_default_registry() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.default_network().id, "mainnet");
        assert!(registry.get("mainnet").unwrap().supports_provider());
        assert!(registry.get("testnet").unwrap().supports_provider());
        assert!(!registry.get("stagenet").unwrap().supports_provider());
    }

    #[test]
    fn test_resolve_known_bytes() {
        let registry = registry();
        assert_eq!(registry.resolve_byte(84).unwrap().unwrap().id, "testnet");
        assert_eq!(registry.resolve_byte(83).unwrap().unwrap().id, "stagenet");
        assert_eq!(registry.resolve_byte(87).unwrap().unwrap().id, "mainnet");
    }

    #[test]
    fn test_resolve_unknown_bytes() {
        let registry = registry();
        for byte in [0i64, 1, 65, 82, 85, 86, 88, 255] {
            assert!(registry.resolve_byte(byte).unwrap().is_none(), "byte {byte}");
        }
    }

    #[test]
    fn test_resolve_invalid_byte() {
        let registry = registry();
        assert!(matches!(
            registry.resolve_byte(1024),
            Err(BlockchainError::InvalidChainByte(1024))
        ));
    }

    #[test]
    fn test_unknown_default() {
        let mut config = GatewayConfig::default();
        config.default_network = "devnet".into();
        let err = NetworkRegistry::from_config(&config).unwrap_err();
        assert!(matches!(err, BlockchainError::UnknownNetwork(id) if id == "devnet"));
    }

    #[test]
    fn test_invalid_node_url() {
        let mut config = GatewayConfig::default();
        config.networks[0].node_url = "not a url".into();
        let err = NetworkRegistry::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_explorer_code_defaults_to_id() {
        let config: GatewayConfig = toml::from_str(
            r#"
            default_network = "testnet"

            [[networks]]
            id = "testnet"
            node_url = "https://nodes-testnet.wavesnodes.com"
            chain_byte = 84
            provider_origin = "https://testnet.waves.exchange/signer/"
            "#,
        )
        .unwrap();
        let registry = NetworkRegistry::from_config(&config).unwrap();
        let testnet = registry.get("testnet").unwrap();

        assert_eq!(testnet.explorer_code, "testnet");
        let links = crate::blockchain::ExplorerLinks::new(&config.explorer);
        assert_eq!(
            links.link(&testnet.explorer_code, "abc", crate::blockchain::LinkKind::Tx),
            "https://wavesexplorer.com/testnet/tx/abc"
        );
    }
}
