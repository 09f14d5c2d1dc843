//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default network exists)
//! - Reject ambiguous networks (duplicate ids or chain bytes)
//! - Validate value ranges (intervals > 0, fee is a decimal)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no networks configured")]
    NoNetworks,

    #[error("default network '{0}' is not configured")]
    UnknownDefaultNetwork(String),

    #[error("network id '{0}' is declared more than once")]
    DuplicateNetworkId(String),

    #[error("chain byte {byte} is used by both '{first}' and '{second}'")]
    DuplicateChainByte {
        byte: u8,
        first: String,
        second: String,
    },

    #[error("{field} of network '{network}' is not a valid URL: {value}")]
    InvalidUrl {
        network: String,
        field: &'static str,
        value: String,
    },

    #[error("explorer base_url is not a valid URL: {0}")]
    InvalidExplorerUrl(String),

    #[error("account fee '{0}' is not a non-negative decimal")]
    InvalidFee(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.networks.is_empty() {
        errors.push(ValidationError::NoNetworks);
    }

    if !config.networks.iter().any(|n| n.id == config.default_network) {
        errors.push(ValidationError::UnknownDefaultNetwork(
            config.default_network.clone(),
        ));
    }

    let mut ids = HashSet::new();
    for network in &config.networks {
        if !ids.insert(network.id.as_str()) {
            errors.push(ValidationError::DuplicateNetworkId(network.id.clone()));
        }

        if Url::parse(&network.node_url).is_err() {
            errors.push(ValidationError::InvalidUrl {
                network: network.id.clone(),
                field: "node_url",
                value: network.node_url.clone(),
            });
        }

        if let Some(origin) = &network.provider_origin {
            if Url::parse(origin).is_err() {
                errors.push(ValidationError::InvalidUrl {
                    network: network.id.clone(),
                    field: "provider_origin",
                    value: origin.clone(),
                });
            }
        }
    }

    for (i, network) in config.networks.iter().enumerate() {
        if let Some(first) = config.networks[..i]
            .iter()
            .find(|n| n.chain_byte == network.chain_byte)
        {
            errors.push(ValidationError::DuplicateChainByte {
                byte: network.chain_byte.0,
                first: first.id.clone(),
                second: network.id.clone(),
            });
        }
    }

    if Url::parse(&config.explorer.base_url).is_err() {
        errors.push(ValidationError::InvalidExplorerUrl(
            config.explorer.base_url.clone(),
        ));
    }

    match Decimal::from_str(config.account.fee.trim()) {
        Ok(fee) if !fee.is_sign_negative() => {}
        _ => errors.push(ValidationError::InvalidFee(config.account.fee.clone())),
    }

    if config.confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroValue("confirmation.poll_interval_ms"));
    }
    if config.confirmation.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("confirmation.timeout_secs"));
    }
    if config.confirmation.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("confirmation.request_timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
