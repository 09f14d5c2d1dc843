//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single-byte network code carried by addresses and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainByte(pub u8);

impl ChainByte {
    /// Mainnet (`'W'`).
    pub const MAINNET: ChainByte = ChainByte(b'W');
    /// Testnet (`'T'`).
    pub const TESTNET: ChainByte = ChainByte(b'T');
    /// Stagenet (`'S'`).
    pub const STAGENET: ChainByte = ChainByte(b'S');

    /// The byte rendered as its ASCII character.
    pub fn as_char(self) -> char {
        self.0 as char
    }
}

impl From<u8> for ChainByte {
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

impl From<ChainByte> for u8 {
    fn from(byte: ChainByte) -> Self {
        byte.0
    }
}

impl TryFrom<i64> for ChainByte {
    type Error = BlockchainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(ChainByte)
            .map_err(|_| BlockchainError::InvalidChainByte(value))
    }
}

impl std::fmt::Display for ChainByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_char(), self.0)
    }
}

/// Errors that can occur during node and network operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// HTTP request to the node failed.
    #[error("Node request failed: {0}")]
    Rpc(String),

    /// The node answered with an unexpected status.
    #[error("Node returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Transaction was not seen on chain within the allowed time.
    #[error("Transaction {id} not confirmed after {secs} seconds")]
    ConfirmationTimeout { id: String, secs: u64 },

    /// Chain byte outside the single-byte range.
    #[error("Invalid chain byte: {0}")]
    InvalidChainByte(i64),

    /// Network identifier not present in the registry.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// A URL could not be built from configuration.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type for node and network operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// On-chain execution outcome, distinct from broadcast acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "scriptExecutionFailed", alias = "script_execution_failed")]
    ScriptExecutionFailed,
    #[serde(other)]
    Unknown,
}

/// Confirmation result for a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    /// Transaction identifier.
    pub id: String,
    /// Application status; absent on nodes that predate it.
    #[serde(default)]
    pub application_status: Option<ApplicationStatus>,
    /// Block height the transaction was included at.
    #[serde(default)]
    pub height: Option<u64>,
}

impl TransactionStatus {
    /// True when the embedded script failed even though the transaction was accepted.
    pub fn is_script_failure(&self) -> bool {
        matches!(
            self.application_status,
            Some(ApplicationStatus::ScriptExecutionFailed)
        )
    }
}
