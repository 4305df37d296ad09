//! Outbound notification gateways.
//!
//! ARCHITECTURAL RULE: gateways never return errors to their callers. Each
//! implementation logs its own failure and reports `false`, so one channel
//! can never interrupt another during dispatch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

pub mod email;
#[cfg(test)]
pub mod fake;
pub mod sms;

pub use email::ResendEmailGateway;
pub use sms::RingCentralSmsGateway;

/// Client-level request lifetime for provider calls. Nothing is retried.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single outbound email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Tag used in logs in place of the subject, which carries applicant names.
    pub channel: &'static str,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Returns `true` when the provider accepted the message.
    async fn send(&self, message: EmailMessage) -> bool;
}

#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Returns `true` when the provider accepted the message.
    async fn send(&self, to: &str, text: &str) -> bool;
}

fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// Reads a provider's error body, falling back to the raw text.
async fn provider_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error_description"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body)
}
