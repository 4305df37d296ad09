use anyhow::{Context, Result};
use axum::http::HeaderValue;

const DEFAULT_ALLOWED_ORIGIN: &str = "https://www.trembachlawfirm.com";
const DEFAULT_FIRM_RECIPIENT: &str = "careers@trembachlawfirm.com";
const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
const DEFAULT_RINGCENTRAL_SERVER_URL: &str = "https://platform.ringcentral.com";

/// Application configuration loaded from environment variables.
///
/// Gateway credentials are optional here. A missing credential disables that
/// channel at send time instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// The single origin trusted by the intake endpoint's CORS headers.
    pub allowed_origin: HeaderValue,
    pub email: EmailConfig,
    pub sms: SmsConfig,
}

/// Credentials and routing for the transactional email provider.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub from_domain: Option<String>,
    pub api_base: String,
    /// Where firm notifications are delivered.
    pub firm_recipient: String,
}

/// Credentials for the SMS provider's JWT-bearer token flow.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub jwt: Option<String>,
    pub from_number: Option<String>,
    pub server_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let origin = env_or("ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);
        let allowed_origin = HeaderValue::from_str(&origin)
            .with_context(|| format!("ALLOWED_ORIGIN '{origin}' is not a valid header value"))?;

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            allowed_origin,
            email: EmailConfig {
                api_key: optional_env("RESEND_API_KEY"),
                from_domain: optional_env("EMAIL_FROM_DOMAIN"),
                api_base: env_or("RESEND_API_URL", DEFAULT_RESEND_API_URL),
                firm_recipient: env_or("FIRM_APPLICATIONS_EMAIL", DEFAULT_FIRM_RECIPIENT),
            },
            sms: SmsConfig {
                client_id: optional_env("RINGCENTRAL_CLIENT_ID"),
                client_secret: optional_env("RINGCENTRAL_CLIENT_SECRET"),
                jwt: optional_env("RINGCENTRAL_JWT"),
                from_number: optional_env("RINGCENTRAL_FROM_NUMBER"),
                server_url: env_or("RINGCENTRAL_SERVER_URL", DEFAULT_RINGCENTRAL_SERVER_URL),
            },
        })
    }
}

#[cfg(test)]
impl EmailConfig {
    /// A config with no credentials. Every send through it fails.
    pub fn unconfigured() -> Self {
        Self {
            api_key: None,
            from_domain: None,
            api_base: DEFAULT_RESEND_API_URL.to_string(),
            firm_recipient: DEFAULT_FIRM_RECIPIENT.to_string(),
        }
    }
}

#[cfg(test)]
impl SmsConfig {
    /// A config with no credentials. Every send through it fails.
    pub fn unconfigured() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            jwt: None,
            from_number: None,
            server_url: DEFAULT_RINGCENTRAL_SERVER_URL.to_string(),
        }
    }
}

/// Empty values are treated the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
