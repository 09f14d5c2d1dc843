//! Account identity shared with the rest of the application.

pub mod address;
pub mod store;

pub use store::{AccountIdentity, AccountStore, LoginType};
