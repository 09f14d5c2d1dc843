//! Transaction requests and their normalization into signable form.
//!
//! # Responsibilities
//! - Accept invoke requests with human-readable amounts
//! - Rescale payments and fees to base units
//! - Drop fee-asset overrides the provider does not accept

use serde::{Deserialize, Serialize};

use crate::blockchain::amount::{to_base_units, AmountError};

/// Argument of a dApp function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallArg {
    Integer(i64),
    String(String),
    Boolean(bool),
    Binary(String),
    List(Vec<CallArg>),
}

/// dApp function invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function: String,
    #[serde(default)]
    pub args: Vec<CallArg>,
}

/// Attached payment as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount in whole tokens, e.g. `"1.5"`.
    #[serde(alias = "tokenAmount")]
    pub tokens: String,
    /// Asset id; `None` is the native token.
    #[serde(default)]
    pub asset_id: Option<String>,
}

/// Invoke request built by callers, amounts in whole tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub d_app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Vec<PaymentRequest>>,
    /// Presence requests a fee; the value itself is replaced by the account fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_asset_id: Option<String>,
}

impl TransactionRequest {
    pub fn invoke(d_app: impl Into<String>) -> Self {
        Self {
            d_app: d_app.into(),
            call: None,
            payment: None,
            fee: None,
            fee_asset_id: None,
        }
    }

    pub fn with_call(mut self, function: impl Into<String>, args: Vec<CallArg>) -> Self {
        self.call = Some(FunctionCall {
            function: function.into(),
            args,
        });
        self
    }

    pub fn with_payment(mut self, tokens: impl Into<String>, asset_id: Option<String>) -> Self {
        self.payment.get_or_insert_with(Vec::new).push(PaymentRequest {
            tokens: tokens.into(),
            asset_id,
        });
        self
    }

    pub fn with_fee(mut self, fee: impl Into<String>) -> Self {
        self.fee = Some(fee.into());
        self
    }

    pub fn with_fee_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.fee_asset_id = Some(asset_id.into());
        self
    }

    /// Convert to base units.
    ///
    /// Payments are rescaled and drop the fee-asset override. A requested
    /// fee also drops the override and is replaced by `account_fee`.
    pub fn normalize(self, account_fee: &str) -> Result<InvokeTransaction, AmountError> {
        let mut fee_asset_id = self.fee_asset_id;

        let payment = match self.payment {
            Some(entries) => {
                fee_asset_id = None;
                entries
                    .into_iter()
                    .map(|p| {
                        Ok(Payment {
                            amount: to_base_units(&p.tokens)?,
                            asset_id: p.asset_id,
                        })
                    })
                    .collect::<Result<Vec<_>, AmountError>>()?
            }
            None => Vec::new(),
        };

        let fee = match self.fee {
            Some(_) => {
                fee_asset_id = None;
                Some(to_base_units(account_fee)?)
            }
            None => None,
        };

        Ok(InvokeTransaction {
            d_app: self.d_app,
            call: self.call,
            payment,
            fee,
            fee_asset_id,
        })
    }
}

/// Payment in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: i64,
    pub asset_id: Option<String>,
}

/// Normalized invoke transaction handed to the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeTransaction {
    pub d_app: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<FunctionCall>,
    pub payment: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_asset_id: Option<String>,
}
