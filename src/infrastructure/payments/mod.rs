use std::collections::HashMap;

use anyhow::Result;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signed notification envelope delivered by the payment provider.
#[derive(Debug, Deserialize)]
pub struct PaymentEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub created: Option<i64>,
    pub data: PaymentEventData,
}

#[derive(Debug, Deserialize)]
pub struct PaymentEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: Option<String>,
    pub mode: Option<String>,
    pub amount_total: Option<i64>,
    pub metadata: Option<HashMap<String, String>>,
}

/// Verifies provider notifications signed in the `t=<ts>,v1=<hex-hmac>`
/// header format, with the HMAC-SHA256 taken over `"{t}.{payload}"`.
pub struct PaymentWebhookVerifier {
    webhook_secret: String,
}

impl PaymentWebhookVerifier {
    pub fn new(webhook_secret: String) -> Self {
        Self { webhook_secret }
    }

    pub fn verify_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in signature header"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in signature header"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();
        let provided = hex::decode(signature)?;

        if expected[..] != provided[..] {
            anyhow::bail!("invalid webhook signature");
        }

        let event: PaymentEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }

    pub fn extract_checkout_session(event: &PaymentEvent) -> Option<CheckoutSession> {
        serde_json::from_value(event.data.object.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, timestamp: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    const SECRET: &str = "whsec_test123secret456";
    const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"metadata":{"user_id":"9f2c8d3e-1111-2222-3333-444455556666","plan_id":"1"}}}}"#;

    #[test]
    fn test_valid_signature_is_accepted() {
        let verifier = PaymentWebhookVerifier::new(SECRET.to_string());
        let timestamp = "1700000000";
        let header = format!("t={},v1={}", timestamp, sign(PAYLOAD, SECRET, timestamp));

        let event = verifier
            .verify_signature(PAYLOAD, &header)
            .expect("valid signature should verify");
        assert_eq!(event.type_, "checkout.session.completed");
        assert_eq!(event.id.as_deref(), Some("evt_1"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = PaymentWebhookVerifier::new(SECRET.to_string());
        let timestamp = "1700000000";
        let header = format!(
            "t={},v1={}",
            timestamp,
            sign(PAYLOAD, "whsec_other", timestamp)
        );

        assert!(verifier.verify_signature(PAYLOAD, &header).is_err());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let verifier = PaymentWebhookVerifier::new(SECRET.to_string());
        let timestamp = "1700000000";
        let header = format!("t={},v1={}", timestamp, sign(PAYLOAD, SECRET, timestamp));

        let tampered = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"metadata":{"user_id":"9f2c8d3e-1111-2222-3333-444455556666","plan_id":"2"}}}}"#;
        assert!(verifier.verify_signature(tampered, &header).is_err());
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let verifier = PaymentWebhookVerifier::new(SECRET.to_string());

        assert!(verifier.verify_signature(PAYLOAD, "garbage").is_err());
        assert!(verifier.verify_signature(PAYLOAD, "t=123").is_err());
        assert!(verifier.verify_signature(PAYLOAD, "v1=abcd").is_err());
    }

    #[test]
    fn test_checkout_session_extraction() {
        let verifier = PaymentWebhookVerifier::new(SECRET.to_string());
        let timestamp = "1700000000";
        let header = format!("t={},v1={}", timestamp, sign(PAYLOAD, SECRET, timestamp));

        let event = verifier.verify_signature(PAYLOAD, &header).unwrap();
        let session = PaymentWebhookVerifier::extract_checkout_session(&event)
            .expect("checkout session should parse");
        let metadata = session.metadata.expect("metadata should be present");
        assert_eq!(metadata.get("plan_id").map(String::as_str), Some("1"));
    }
}
