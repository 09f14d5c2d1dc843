//! Shared account state.
//!
//! Identity fields are swapped as one snapshot so readers never observe a
//! half-applied login.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::account::address::find_address;
use crate::blockchain::network::{Network, NetworkRegistry};
use crate::config::AccountConfig;

/// How the current account was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    /// Through the external signing provider.
    Exchange,
    /// Through the browser extension.
    Keeper,
}

/// Who is logged in and on which network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountIdentity {
    pub address: Option<String>,
    pub network: Option<Network>,
    pub login_type: Option<LoginType>,
}

/// Account state shared between the UI and the session coordinator.
pub struct AccountStore {
    identity: ArcSwap<AccountIdentity>,
    fee: ArcSwap<String>,
    registry: Arc<NetworkRegistry>,
}

impl AccountStore {
    pub fn new(registry: Arc<NetworkRegistry>, config: &AccountConfig) -> Self {
        Self {
            identity: ArcSwap::from_pointee(AccountIdentity::default()),
            fee: ArcSwap::from_pointee(config.fee.clone()),
            registry,
        }
    }

    /// Current identity snapshot.
    pub fn identity(&self) -> Arc<AccountIdentity> {
        self.identity.load_full()
    }

    pub fn network(&self) -> Option<Network> {
        self.identity.load().network.clone()
    }

    pub fn address(&self) -> Option<String> {
        self.identity.load().address.clone()
    }

    pub fn login_type(&self) -> Option<LoginType> {
        self.identity.load().login_type
    }

    /// Configured fee in whole tokens.
    pub fn fee(&self) -> String {
        self.fee.load().as_ref().clone()
    }

    pub fn set_fee(&self, fee: impl Into<String>) {
        self.fee.store(Arc::new(fee.into()));
    }

    pub fn set_network(&self, network: Option<Network>) {
        self.identity.rcu(|current| AccountIdentity {
            network: network.clone(),
            ..AccountIdentity::clone(current)
        });
    }

    /// Record a successful login in one swap.
    ///
    /// `network` is written as given: `None` leaves the account without a
    /// network rather than keeping the previous one.
    pub fn apply_login(&self, network: Option<Network>, address: String, login_type: LoginType) {
        tracing::info!(
            address = %address,
            network = network.as_ref().map(|n| n.id.as_str()).unwrap_or("unknown"),
            ?login_type,
            "Account logged in"
        );
        self.identity.store(Arc::new(AccountIdentity {
            address: Some(address),
            network,
            login_type: Some(login_type),
        }));
    }

    pub fn logout(&self) {
        self.identity.store(Arc::new(AccountIdentity::default()));
    }

    /// Network of the first address found in `path`, if it is a known one.
    pub fn network_for_address(&self, path: &str) -> Option<Network> {
        let (address, byte) = find_address(path)?;
        let network = self.registry.by_chain_byte(byte).cloned();
        if network.is_none() {
            tracing::debug!(address, chain_byte = %byte, "Address belongs to an unknown network");
        }
        network
    }

    pub fn registry(&self) -> &Arc<NetworkRegistry> {
        &self.registry
    }
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("identity", &self.identity.load())
            .field("fee", &self.fee.load())
            .finish()
    }
}
