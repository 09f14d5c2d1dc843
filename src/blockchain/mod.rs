//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Config (networks, fee, polling)
//!     → network.rs (registry, chain byte resolution)
//!     → transaction.rs + amount.rs (normalize requests to base units)
//!     → signer.rs (external signer: login, sign, broadcast)
//!     → client.rs (node polling until the transaction is on chain)
//!     → explorer.rs (links for notifications)
//! ```
//!
//! # Security Constraints
//! - No key material is handled here; signing is delegated
//! - All node calls have configurable timeouts

pub mod amount;
pub mod client;
pub mod explorer;
pub mod network;
pub mod signer;
pub mod transaction;
pub mod types;

pub use client::{ConfirmationWaiter, NodeClient};
pub use explorer::{ExplorerLinks, LinkKind};
pub use network::{Network, NetworkRegistry};
pub use signer::{
    BroadcastedTransaction, LoginOutcome, ProviderFactory, Signer, SignerError, SignerFactory,
    WalletProvider, WebProviderFactory,
};
pub use transaction::{InvokeTransaction, TransactionRequest};
pub use types::{
    ApplicationStatus, BlockchainError, BlockchainResult, ChainByte, TransactionStatus,
};
