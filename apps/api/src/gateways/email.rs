use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use super::{http_client, provider_message, EmailGateway, EmailMessage};
use crate::config::EmailConfig;
use crate::intake::templates::FIRM_NAME;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email gateway is not configured: {0} is missing")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Sends transactional email through the Resend REST API.
pub struct ResendEmailGateway {
    client: Client,
    config: EmailConfig,
}

impl ResendEmailGateway {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    /// `Trembach Law Firm <careers@example.com>`
    fn sender(&self) -> Result<String, EmailError> {
        let domain = self
            .config
            .from_domain
            .as_deref()
            .ok_or(EmailError::NotConfigured("EMAIL_FROM_DOMAIN"))?;
        Ok(format!("{FIRM_NAME} <careers@{domain}>"))
    }

    async fn try_send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(EmailError::NotConfigured("RESEND_API_KEY"))?;
        let from = self.sender()?;

        let body = SendEmailRequest {
            from: &from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
            reply_to: message.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_base.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmailError::Api {
                status: status.as_u16(),
                message: provider_message(response).await,
            });
        }

        debug!(channel = message.channel, "email accepted by provider");
        Ok(())
    }
}

#[async_trait]
impl EmailGateway for ResendEmailGateway {
    async fn send(&self, message: EmailMessage) -> bool {
        match self.try_send(&message).await {
            Ok(()) => true,
            Err(e) => {
                error!(channel = message.channel, "email send failed: {e}");
                false
            }
        }
    }
}
