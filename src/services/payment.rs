use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{PaymentMode, PaymentSettings};
use crate::error::ApiError;
use crate::models::PaymentRequirement;

/// Header carrying a payment signature in challenge mode
pub const PAYMENT_HEADER: &str = "X-PAYMENT";

/// Errors that can occur when talking to the payment verifier
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Verifier returned error: {0}")]
    ApiError(String),

    #[error("Charge rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Success,
    NotFound,
    Failed,
    Error,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Success => "SUCCESS",
            VerificationStatus::NotFound => "NOT_FOUND",
            VerificationStatus::Failed => "FAILED",
            VerificationStatus::Error => "ERROR",
        }
    }
}

/// Outcome of checking a transaction signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub valid: bool,
    pub status: VerificationStatus,
}

/// Proof of a successful escrow charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub signature: String,
}

/// External service that settles payments for gated requests
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Check that a submitted transaction landed and pays the right amount
    async fn verify(&self, signature: &str) -> Result<Verification, PaymentError>;

    /// Debit the wallet's escrow balance for one request
    async fn charge(&self, wallet: &str) -> Result<Receipt, PaymentError>;
}

/// Payment verifier reached over HTTP
pub struct HttpPaymentVerifier {
    base_url: String,
    client: Client,
}

impl HttpPaymentVerifier {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PaymentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PaymentVerifier for HttpPaymentVerifier {
    async fn verify(&self, signature: &str) -> Result<Verification, PaymentError> {
        let url = self.url(&format!("transactions/{}", urlencoding::encode(signature)));

        tracing::debug!("Verifying payment at: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Verification {
                valid: false,
                status: VerificationStatus::NotFound,
            });
        }

        if !response.status().is_success() {
            return Err(PaymentError::ApiError(format!(
                "Failed to verify transaction: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn charge(&self, wallet: &str) -> Result<Receipt, PaymentError> {
        let url = self.url("charges");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "walletPubKey": wallet }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED || status.is_client_error() {
            return Err(PaymentError::Rejected(format!("escrow charge refused: {}", status)));
        }
        if !status.is_success() {
            return Err(PaymentError::ApiError(format!("Failed to charge escrow: {}", status)));
        }

        Ok(response.json().await?)
    }
}

/// Guards paid routes.
///
/// In challenge mode every signature is redeemable once; redeemed
/// signatures are remembered for the configured TTL.
pub struct PaymentGate {
    verifier: Arc<dyn PaymentVerifier>,
    mode: PaymentMode,
    requirement: PaymentRequirement,
    redeemed: moka::future::Cache<String, ()>,
}

impl PaymentGate {
    pub fn new(
        verifier: Arc<dyn PaymentVerifier>,
        mode: PaymentMode,
        requirement: PaymentRequirement,
        redeemed_ttl: Duration,
    ) -> Self {
        let redeemed = moka::future::CacheBuilder::new(100_000)
            .time_to_live(redeemed_ttl)
            .build();

        Self {
            verifier,
            mode,
            requirement,
            redeemed,
        }
    }

    pub fn from_settings(
        verifier: Arc<dyn PaymentVerifier>,
        settings: &PaymentSettings,
        redeemed_ttl: Duration,
    ) -> Self {
        let requirement = PaymentRequirement {
            scheme: settings.scheme.clone(),
            network: settings.network.clone(),
            asset: settings.asset.clone(),
            pay_to: settings.pay_to.clone(),
            amount: settings.amount.clone(),
        };

        Self::new(verifier, settings.mode, requirement, redeemed_ttl)
    }

    pub fn mode(&self) -> PaymentMode {
        self.mode
    }

    /// Admit or refuse one paid request from `wallet`
    pub async fn authorize(&self, wallet: &str, payment: Option<&str>) -> Result<(), ApiError> {
        match self.mode {
            PaymentMode::Challenge => self.redeem(payment).await,
            PaymentMode::Escrow => match self.verifier.charge(wallet).await {
                Ok(receipt) => {
                    tracing::debug!("Charged escrow for {}: {}", wallet, receipt.signature);
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!("Escrow charge failed for {}: {}", wallet, e);
                    Err(self.refusal("Payment required", None))
                }
            },
        }
    }

    async fn redeem(&self, payment: Option<&str>) -> Result<(), ApiError> {
        let signature = match payment.map(str::trim) {
            Some(sig) if !sig.is_empty() => sig,
            _ => return Err(self.refusal("Payment required", None)),
        };

        if self.redeemed.contains_key(signature) {
            return Err(self.refusal("Payment already redeemed", None));
        }

        let verification = match self.verifier.verify(signature).await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Payment verification failed: {}", e);
                Verification {
                    valid: false,
                    status: VerificationStatus::Error,
                }
            }
        };

        if !verification.valid {
            return Err(self.refusal("Payment verification failed", Some(verification.status)));
        }

        // Two requests racing on one signature: only the first insert is fresh
        let entry = self
            .redeemed
            .entry(signature.to_string())
            .or_insert(())
            .await;
        if !entry.is_fresh() {
            return Err(self.refusal("Payment already redeemed", None));
        }

        Ok(())
    }

    fn refusal(&self, message: &str, status: Option<VerificationStatus>) -> ApiError {
        ApiError::PaymentRequired {
            message: message.to_string(),
            status: status.map(|s| s.as_str().to_string()),
            accepts: vec![self.requirement.clone()],
        }
    }
}
