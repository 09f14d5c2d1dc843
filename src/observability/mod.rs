//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! session / login / submission pipeline:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
