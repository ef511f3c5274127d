//! Hosted-checkout payment flow: initialize, redirect, verify on return.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend initializes the transaction with the gateway and returns an
//! authorization URL plus a reference. The reference is persisted before the
//! full-page redirect so the callback page can verify it after the gateway
//! sends the browser back.

#[cfg(test)]
#[path = "payments_test.rs"]
mod payments_test;

use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiError;
use super::http::ApiClient;

/// Storage key holding the reference of the payment awaiting verification.
pub const PAYMENT_REFERENCE_KEY: &str = "campus_payment_reference";

const INITIALIZE_PATH: &str = "/payments/initialize";

/// Gateway checkout handle returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PaymentInit {
    #[serde(alias = "authorizationUrl")]
    pub authorization_url: String,
    pub reference: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VerifyOutcome {
    /// No stored or query reference.
    NothingPending,
    Verified { reference: String, payment: Value },
    Failed { reference: String, message: String },
}

fn verify_path(reference: &str) -> String {
    format!("/payments/verify/{}", urlencoding::encode(reference))
}

/// Start checkout for a program and persist the returned reference.
///
/// # Errors
///
/// Returns the request error, or `ApiError::Decode` when the response lacks
/// an authorization URL or reference.
pub async fn initialize(api: &ApiClient, program_id: &str) -> Result<PaymentInit, ApiError> {
    let body = api.post(INITIALIZE_PATH, json!({ "programId": program_id })).await?;
    let init: PaymentInit = serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if init.authorization_url.trim().is_empty() || init.reference.trim().is_empty() {
        return Err(ApiError::Decode("missing authorization url or reference".to_owned()));
    }
    api.session().storage().set(PAYMENT_REFERENCE_KEY, &init.reference);
    Ok(init)
}

/// Reference currently awaiting verification.
pub fn pending_reference(api: &ApiClient) -> Option<String> {
    api.session()
        .storage()
        .get(PAYMENT_REFERENCE_KEY)
        .filter(|r| !r.trim().is_empty())
}

/// Whether a verify response reports a completed payment.
pub fn payment_succeeded(payment: &Value) -> bool {
    if payment.get("verified").and_then(Value::as_bool) == Some(true) {
        return true;
    }
    payment
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| matches!(s.to_ascii_lowercase().as_str(), "success" | "successful" | "paid" | "completed"))
}

/// Verify the pending payment after the gateway redirect.
///
/// The reference from the callback query (`reference`/`trxref`) wins over the
/// stored one. The stored reference is cleared once a verdict is reached.
pub async fn verify_pending(api: &ApiClient, query_reference: Option<&str>) -> VerifyOutcome {
    let reference = query_reference
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
        .or_else(|| pending_reference(api));
    let Some(reference) = reference else {
        return VerifyOutcome::NothingPending;
    };

    let outcome = match api.get(&verify_path(&reference)).await {
        Ok(payment) if payment_succeeded(&payment) => VerifyOutcome::Verified { reference, payment },
        Ok(_) => VerifyOutcome::Failed { reference, message: "Payment was not completed".to_owned() },
        Err(err) => VerifyOutcome::Failed {
            reference,
            message: super::error::format_api_error(Some(&err), "Payment verification failed"),
        },
    };
    api.session().storage().remove(PAYMENT_REFERENCE_KEY);
    outcome
}
