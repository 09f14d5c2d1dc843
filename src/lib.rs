//! Signing session and transaction lifecycle coordination.
//!
//! Selects the network for the current view, delegates signing to an
//! external signer, broadcasts, and follows the transaction until the node
//! confirms it, reporting every terminal state as a notification.

pub mod account;
pub mod blockchain;
pub mod config;
pub mod notifications;
pub mod observability;
pub mod resilience;
pub mod session;

pub use account::AccountStore;
pub use blockchain::{NetworkRegistry, NodeClient};
pub use config::GatewayConfig;
pub use session::{SessionCoordinator, SubmissionOutcome, SubmitOptions};
