//! Hosted payment page integration (JazzCash mobile-wallet form post).
//!
//! The gateway protocol is a signed form: every parameter travels as a
//! form field and `pp_SecureHash` authenticates the set. The signature is
//! a lowercase hex HMAC-SHA256, keyed with the merchant integrity key, over
//! the non-empty parameter values joined with `&` in key order.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{Config, PaymentGatewayConfig, DEFAULT_CURRENCY};
use crate::domain::payment::format_gateway_amount;
use crate::domain::PaymentForm;
use crate::errors::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

pub const SECURE_HASH_FIELD: &str = "pp_SecureHash";
pub const TXN_REF_FIELD: &str = "pp_TxnRefNo";
pub const RESPONSE_CODE_FIELD: &str = "pp_ResponseCode";
pub const AMOUNT_FIELD: &str = "pp_Amount";

/// A signed form plus the transaction reference it carries.
#[derive(Debug, Clone)]
pub struct SignedPayment {
    pub transaction_ref: String,
    pub form: PaymentForm,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PaymentGateway: Send + Sync {
    /// Build the signed form for charging `amount_minor`.
    fn build_payment(&self, amount_minor: i64, description: &str) -> AppResult<SignedPayment>;

    /// Recompute the signature over a callback's fields and compare it with
    /// the `pp_SecureHash` it carries.
    fn verify_signature(&self, params: &BTreeMap<String, String>) -> bool;
}

/// Compute `pp_SecureHash` for a parameter set. An existing hash field is
/// ignored.
pub fn sign_params(integrity_key: &[u8], params: &BTreeMap<String, String>) -> AppResult<String> {
    let mac = keyed_mac(integrity_key, params)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn keyed_mac(integrity_key: &[u8], params: &BTreeMap<String, String>) -> AppResult<HmacSha256> {
    let message = params
        .iter()
        .filter(|(key, value)| key.as_str() != SECURE_HASH_FIELD && !value.is_empty())
        .map(|(_, value)| value.as_str())
        .collect::<Vec<_>>()
        .join("&");

    let mut mac = HmacSha256::new_from_slice(integrity_key)
        .map_err(|e| AppError::internal(format!("Invalid integrity key: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(mac)
}

pub struct JazzCashGateway {
    config: PaymentGatewayConfig,
    url: &'static str,
}

impl JazzCashGateway {
    pub fn new(config: PaymentGatewayConfig, url: &'static str) -> Self {
        Self { config, url }
    }

    /// Gateway for the configured environment, if credentials are present.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .payment_gateway
            .clone()
            .map(|gateway| Self::new(gateway, config.payment_gateway_url()))
    }

    fn params_at(
        &self,
        now: DateTime<Utc>,
        amount_minor: i64,
        description: &str,
    ) -> BTreeMap<String, String> {
        let millis = now.timestamp_millis();
        let fields = [
            ("pp_Version", "1.1".to_string()),
            ("pp_TxnType", "MWALLET".to_string()),
            ("pp_Language", "EN".to_string()),
            ("pp_MerchantID", self.config.merchant_id.clone()),
            ("pp_SubMerchantID", String::new()),
            ("pp_Password", self.config.merchant_password().to_string()),
            (TXN_REF_FIELD, format!("T{}", millis)),
            (AMOUNT_FIELD, format_gateway_amount(amount_minor)),
            ("pp_TxnCurrency", DEFAULT_CURRENCY.to_string()),
            ("pp_TxnDateTime", now.format("%Y%m%d%H%M%S").to_string()),
            ("pp_BillReference", format!("REF{}", millis)),
            ("pp_Description", description.to_string()),
            ("pp_ReturnURL", self.config.return_url.clone()),
            ("pp_BankID", "JAZZCASH".to_string()),
        ];

        fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

impl PaymentGateway for JazzCashGateway {
    fn build_payment(&self, amount_minor: i64, description: &str) -> AppResult<SignedPayment> {
        let mut params = self.params_at(Utc::now(), amount_minor, description);
        let hash = sign_params(self.config.integrity_key(), &params)?;
        params.insert(SECURE_HASH_FIELD.to_string(), hash);

        let transaction_ref = params.get(TXN_REF_FIELD).cloned().unwrap_or_default();

        Ok(SignedPayment {
            transaction_ref,
            form: PaymentForm {
                url: self.url.to_string(),
                method: "POST".to_string(),
                form_data: params,
            },
        })
    }

    fn verify_signature(&self, params: &BTreeMap<String, String>) -> bool {
        let Some(provided) = params.get(SECURE_HASH_FIELD) else {
            return false;
        };
        let Ok(provided) = hex::decode(provided.trim()) else {
            return false;
        };

        match keyed_mac(self.config.integrity_key(), params) {
            Ok(mac) => mac.verify_slice(&provided).is_ok(),
            Err(_) => false,
        }
    }
}
