//! Signing session subsystem.
//!
//! # Data Flow
//! ```text
//! navigation path
//!     → coordinator.rs init_session (network, signer, provider)
//!     → coordinator.rs login (account store update)
//!     → coordinator.rs submit (normalize → sign/broadcast → confirm → notify)
//!     → tracker.rs (per-submission state)
//! ```

pub mod coordinator;
pub mod tracker;

pub use coordinator::{SessionCoordinator, SessionError, SubmissionOutcome, SubmitOptions};
pub use tracker::{TrackedTransaction, TransactionTracker, TxState};
