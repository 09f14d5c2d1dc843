//! Metrics collection.
//!
//! Counters go through the `metrics` facade; the embedding application
//! decides which recorder (if any) receives them.
//!
//! # Metrics
//! - `signer_sessions_total` (counter): session initializations by result
//! - `signer_logins_total` (counter): login attempts by result
//! - `signer_transactions_total` (counter): submissions by terminal outcome
//! - `signer_confirmation_polls_total` (counter): node status polls

use ::metrics::counter;

/// Record a session initialization (`ready`, `unsupported`, `provider_failed`).
pub fn record_session(result: &'static str) {
    counter!("signer_sessions_total", "result" => result).increment(1);
}

/// Record a login attempt (`authorized`, `declined`).
pub fn record_login(result: &'static str) {
    counter!("signer_logins_total", "result" => result).increment(1);
}

/// Record a submission outcome.
pub fn record_transaction(outcome: &'static str) {
    counter!("signer_transactions_total", "outcome" => outcome).increment(1);
}

/// Record one confirmation poll against a node.
pub fn record_confirmation_poll() {
    counter!("signer_confirmation_polls_total").increment(1);
}
