//! Signer and wallet provider seams.
//!
//! Signing happens outside this crate. A [`Signer`] is built against one
//! node URL, gets a [`WalletProvider`] attached, and from then on can log
//! the user in and sign-and-broadcast transactions.
//!
//! # Security
//! - Keys never pass through this crate
//! - A signer is only valid for the network it was built for

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::blockchain::transaction::InvokeTransaction;

/// Errors reported by the external signer or provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The user rejected the request in the wallet.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or attached.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The node refused the broadcast.
    #[error("{0}")]
    Broadcast(String),

    /// Any other failure, carried as the raw message.
    #[error("{0}")]
    Other(String),
}

impl From<String> for SignerError {
    fn from(message: String) -> Self {
        SignerError::Other(message)
    }
}

impl From<&str> for SignerError {
    fn from(message: &str) -> Self {
        SignerError::Other(message.to_string())
    }
}

/// Result type for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;

/// Result of asking the user to log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The user approved and the wallet exposed an account.
    Authorized {
        address: String,
        public_key: Option<String>,
    },
    /// The user closed or declined the prompt.
    Declined,
}

/// Transaction accepted by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedTransaction {
    /// Transaction id; empty when the signer did not report one.
    #[serde(default)]
    pub id: String,
}

/// Handle to the wallet side of the signing flow.
pub trait WalletProvider: Send + Sync + std::fmt::Debug {
    /// Origin the provider talks to.
    fn origin(&self) -> &Url;
}

/// Builds wallet providers for an origin.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, origin: &Url) -> Arc<dyn WalletProvider>;
}

/// Provider served from a web origin.
#[derive(Debug, Clone)]
pub struct WebProvider {
    origin: Url,
}

impl WebProvider {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }
}

impl WalletProvider for WebProvider {
    fn origin(&self) -> &Url {
        &self.origin
    }
}

/// Factory producing [`WebProvider`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebProviderFactory;

impl ProviderFactory for WebProviderFactory {
    fn create(&self, origin: &Url) -> Arc<dyn WalletProvider> {
        Arc::new(WebProvider::new(origin.clone()))
    }
}

/// External signer bound to one node.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Attach the wallet provider. The signer is unusable until this resolves.
    async fn set_provider(&mut self, provider: Arc<dyn WalletProvider>) -> SignerResult<()>;

    /// Ask the user to authenticate.
    async fn login(&self) -> SignerResult<LoginOutcome>;

    /// Chain byte of the network the wallet is connected to.
    async fn network_byte(&self) -> SignerResult<i64>;

    /// Sign `tx` and broadcast it to the node.
    async fn invoke_and_broadcast(&self, tx: InvokeTransaction)
        -> SignerResult<BroadcastedTransaction>;
}

/// Builds signers for a node endpoint.
pub trait SignerFactory: Send + Sync {
    fn create(&self, node_url: &Url) -> Box<dyn Signer>;
}
