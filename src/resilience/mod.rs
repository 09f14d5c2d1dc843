//! Resilience helpers.
//!
//! Only the confirmation waiter polls; the submission pipeline itself never
//! retries a broadcast.

pub mod backoff;

pub use backoff::Backoff;
