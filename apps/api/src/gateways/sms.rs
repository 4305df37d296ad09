use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use super::{http_client, provider_message, SmsGateway};
use crate::config::SmsConfig;

const TOKEN_PATH: &str = "/restapi/oauth/token";
const SMS_PATH: &str = "/restapi/v1.0/account/~/extension/~/sms";
const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Country code assumed for bare 10-digit numbers.
const DEFAULT_COUNTRY_CODE: &str = "1";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS gateway is not configured: {0} is missing")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token request rejected (status {status}): {message}")]
    Token { status: u16, message: String },

    #[error("send rejected (status {status}): {message}")]
    Send { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct PhoneNumber<'a> {
    #[serde(rename = "phoneNumber")]
    phone_number: &'a str,
}

#[derive(Debug, Serialize)]
struct SendSmsRequest<'a> {
    from: PhoneNumber<'a>,
    to: [PhoneNumber<'a>; 1],
    text: &'a str,
}

/// Credentials required by the token exchange, borrowed from config once
/// every one of them is known to be present.
struct Credentials<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    jwt: &'a str,
    from_number: &'a str,
}

/// Sends SMS through the RingCentral REST API.
///
/// Every send runs a two-step pipeline: exchange the JWT assertion for an
/// access token, then post the message. A failed token exchange stops the
/// pipeline before anything is sent.
pub struct RingCentralSmsGateway {
    client: Client,
    config: SmsConfig,
}

impl RingCentralSmsGateway {
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    fn credentials(&self) -> Result<Credentials<'_>, SmsError> {
        let c = &self.config;
        Ok(Credentials {
            client_id: c
                .client_id
                .as_deref()
                .ok_or(SmsError::NotConfigured("RINGCENTRAL_CLIENT_ID"))?,
            client_secret: c
                .client_secret
                .as_deref()
                .ok_or(SmsError::NotConfigured("RINGCENTRAL_CLIENT_SECRET"))?,
            jwt: c
                .jwt
                .as_deref()
                .ok_or(SmsError::NotConfigured("RINGCENTRAL_JWT"))?,
            from_number: c
                .from_number
                .as_deref()
                .ok_or(SmsError::NotConfigured("RINGCENTRAL_FROM_NUMBER"))?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.server_url.trim_end_matches('/'))
    }

    async fn fetch_token(&self, credentials: &Credentials<'_>) -> Result<String, SmsError> {
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .basic_auth(credentials.client_id, Some(credentials.client_secret))
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", credentials.jwt)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SmsError::Token {
                status: status.as_u16(),
                message: provider_message(response).await,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn try_send(&self, to: &str, text: &str) -> Result<(), SmsError> {
        let credentials = self.credentials()?;
        let token = self.fetch_token(&credentials).await?;

        let to = normalize_phone(to);
        let from = normalize_phone(credentials.from_number);
        let body = SendSmsRequest {
            from: PhoneNumber { phone_number: &from },
            to: [PhoneNumber { phone_number: &to }],
            text,
        };

        let response = self
            .client
            .post(self.url(SMS_PATH))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SmsError::Send {
                status: status.as_u16(),
                message: provider_message(response).await,
            });
        }

        debug!("SMS accepted by provider");
        Ok(())
    }
}

#[async_trait]
impl SmsGateway for RingCentralSmsGateway {
    async fn send(&self, to: &str, text: &str) -> bool {
        match self.try_send(to, text).await {
            Ok(()) => true,
            Err(e) => {
                error!("SMS send failed: {e}");
                false
            }
        }
    }
}

/// Normalizes a phone number to E.164-style `+<digits>`.
///
/// - input starting with `+` keeps the `+` and its digits
/// - exactly 10 digits get the default country code
/// - anything else gets a bare `+`
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if raw.trim_start().starts_with('+') {
        format!("+{digits}")
    } else if digits.len() == 10 {
        format!("+{DEFAULT_COUNTRY_CODE}{digits}")
    } else {
        format!("+{digits}")
    }
}
