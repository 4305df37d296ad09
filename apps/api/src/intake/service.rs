//! Application intake: validates a submission and fans out its notifications.
//!
//! Flow: parse body → validate → render → dispatch (three concurrent channels) → respond.
//!
//! Once validation passes the submission is accepted. Channel failures are
//! reported per channel in the response and never turn into an HTTP error.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::gateways::{EmailGateway, EmailMessage, SmsGateway};
use crate::intake::templates::{render_all, RenderedNotifications};
use crate::intake::validation::validate_application;
use crate::models::application::{ApplicationPayload, NotificationOutcome};

pub const SUCCESS_MESSAGE: &str = "Application submitted successfully";

/// Body of a 200 response.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub notifications: NotificationOutcome,
}

/// Owns the gateways used to notify the firm and the applicant.
#[derive(Clone)]
pub struct IntakeService {
    email: Arc<dyn EmailGateway>,
    sms: Arc<dyn SmsGateway>,
    firm_recipient: String,
}

impl IntakeService {
    pub fn new(
        email: Arc<dyn EmailGateway>,
        sms: Arc<dyn SmsGateway>,
        firm_recipient: String,
    ) -> Self {
        Self {
            email,
            sms,
            firm_recipient,
        }
    }

    /// Runs one submission end to end. Every call dispatches again; nothing
    /// is deduplicated.
    pub async fn submit(&self, body: &[u8]) -> Result<SubmitResponse, AppError> {
        let raw = parse_body(body)?;

        if let Err(e) = validate_application(&raw) {
            warn!("application rejected: {e}");
            return Err(e);
        }

        let payload: ApplicationPayload =
            serde_json::from_value(raw).context("application payload has an unexpected shape")?;

        info!(
            position = %payload.position,
            office = %payload.office,
            "application received"
        );

        let notifications = self.dispatch(&payload, Utc::now()).await;

        info!(
            firm_email = notifications.firm_email,
            applicant_email = notifications.applicant_email,
            sms = notifications.sms,
            "application notifications settled"
        );

        Ok(SubmitResponse {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            notifications,
        })
    }

    /// Renders and sends all three notifications concurrently.
    ///
    /// Each channel runs in its own task and the call returns only after all
    /// three have settled. A channel that fails or panics is reported as
    /// `false` without affecting the others.
    pub async fn dispatch(
        &self,
        payload: &ApplicationPayload,
        submitted_at: DateTime<Utc>,
    ) -> NotificationOutcome {
        let RenderedNotifications {
            firm_subject,
            firm_html,
            applicant_subject,
            applicant_html,
            sms_text,
        } = render_all(payload, submitted_at);

        let firm = EmailMessage {
            channel: "firm_email",
            to: self.firm_recipient.clone(),
            subject: firm_subject,
            html: firm_html,
            reply_to: Some(payload.email.clone()),
        };
        let applicant = EmailMessage {
            channel: "applicant_email",
            to: payload.email.clone(),
            subject: applicant_subject,
            html: applicant_html,
            reply_to: Some(self.firm_recipient.clone()),
        };

        let email = Arc::clone(&self.email);
        let firm_task = tokio::spawn(async move { email.send(firm).await });

        let email = Arc::clone(&self.email);
        let applicant_task = tokio::spawn(async move { email.send(applicant).await });

        let sms = Arc::clone(&self.sms);
        let phone = payload.phone.clone();
        let sms_task = tokio::spawn(async move { sms.send(&phone, &sms_text).await });

        let (firm, applicant, sms) = tokio::join!(firm_task, applicant_task, sms_task);

        NotificationOutcome {
            firm_email: settle("firm_email", firm),
            applicant_email: settle("applicant_email", applicant),
            sms: settle("sms", sms),
        }
    }
}

/// Empty bodies are treated as `{}`.
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    let value = serde_json::from_slice(body).context("request body is not valid JSON")?;
    Ok(value)
}

fn settle(channel: &'static str, result: Result<bool, JoinError>) -> bool {
    match result {
        Ok(true) => true,
        Ok(false) => {
            warn!(channel, "notification channel failed");
            false
        }
        Err(e) => {
            error!(channel, "notification task did not complete: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::fake::{Behavior, FakeEmailGateway, FakeSmsGateway};
    use chrono::TimeZone;
    use serde_json::json;
    use std::time::Duration;

    const FIRM: &str = "careers@trembachlawfirm.com";

    fn service(email: Arc<FakeEmailGateway>, sms: Arc<FakeSmsGateway>) -> IntakeService {
        IntakeService::new(email, sms, FIRM.to_string())
    }

    fn valid_body() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "category": "attorney",
            "office": "Los Angeles",
            "position": "Trial Attorney",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "phone": "3105551234",
            "whyTrembach": "I want to try cases."
        }))
        .unwrap()
    }

    fn outcome(firm_email: bool, applicant_email: bool, sms: bool) -> NotificationOutcome {
        NotificationOutcome {
            firm_email,
            applicant_email,
            sms,
        }
    }

    #[tokio::test]
    async fn test_all_channels_succeed() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let response = service(email.clone(), sms.clone())
            .submit(&valid_body())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.message, SUCCESS_MESSAGE);
        assert_eq!(response.notifications, outcome(true, true, true));

        let sent = email.sent();
        assert_eq!(sent.len(), 2);
        let firm = sent.iter().find(|m| m.to == FIRM).expect("firm email sent");
        assert_eq!(firm.reply_to.as_deref(), Some("ada@example.com"));
        assert!(firm.subject.contains("Ada Lovelace"));
        assert_eq!(firm.channel, "firm_email");
        let applicant = sent
            .iter()
            .find(|m| m.to == "ada@example.com")
            .expect("applicant email sent");
        assert_eq!(applicant.reply_to.as_deref(), Some(FIRM));
        assert_eq!(applicant.channel, "applicant_email");

        let texts = sms.sent();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].0, "3105551234");
        assert!(texts[0].1.starts_with("Hi Ada,"));
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_channel() {
        let email = Arc::new(FakeEmailGateway::with(|m| {
            if m.to == FIRM {
                Behavior::Succeed
            } else {
                Behavior::Fail
            }
        }));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let response = service(email, sms).submit(&valid_body()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.notifications, outcome(true, false, true));
    }

    #[tokio::test]
    async fn test_all_channels_failing_still_succeeds() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Fail));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Fail));
        let response = service(email, sms).submit(&valid_body()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.notifications, outcome(false, false, false));
    }

    #[tokio::test]
    async fn test_panicking_channel_does_not_cancel_others() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Panic));
        let response = service(email.clone(), sms).submit(&valid_body()).await.unwrap();

        assert_eq!(response.notifications, outcome(true, true, false));
        assert_eq!(email.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channels_run_concurrently() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Delay(Duration::from_secs(5))));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Delay(Duration::from_secs(5))));
        let svc = service(email, sms);

        let started = tokio::time::Instant::now();
        let response = svc.submit(&valid_body()).await.unwrap();

        assert_eq!(response.notifications, outcome(true, true, true));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let err = service(email.clone(), sms.clone())
            .submit(br#"{"category":"attorney"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == "Missing required field: office"));
        assert!(email.sent().is_empty());
        assert!(sms.sent().is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_is_treated_as_empty_object() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let svc = service(email, sms);

        for body in [&b""[..], &b"  \n"[..]] {
            let err = svc.submit(body).await.unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ref m) if m == "Missing required field: category")
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let err = service(email, sms).submit(b"{not json").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_scalar_focus_areas_are_accepted() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let svc = service(email.clone(), sms);

        for areas in [json!([2019, "Employment"]), json!(["PI", null]), json!("Personal Injury")] {
            let mut body: Value = serde_json::from_slice(&valid_body()).unwrap();
            body["areasFocus"] = areas.clone();
            let response = svc
                .submit(&serde_json::to_vec(&body).unwrap())
                .await
                .unwrap_or_else(|e| panic!("areasFocus = {areas}: {e}"));
            assert_eq!(response.notifications, outcome(true, true, true));
        }

        let firm_html: Vec<String> = email
            .sent()
            .into_iter()
            .filter(|m| m.to == FIRM)
            .map(|m| m.html)
            .collect();
        assert!(firm_html[0].contains("2019, Employment"));
        assert!(firm_html[1].contains("PI"));
        assert!(firm_html[2].contains("Personal Injury"));
    }

    #[tokio::test]
    async fn test_resubmission_dispatches_again() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let svc = service(email.clone(), sms.clone());

        svc.submit(&valid_body()).await.unwrap();
        svc.submit(&valid_body()).await.unwrap();

        assert_eq!(email.sent().len(), 4);
        assert_eq!(sms.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_renders_attorney_trial_table() {
        let email = Arc::new(FakeEmailGateway::new(Behavior::Succeed));
        let sms = Arc::new(FakeSmsGateway::new(Behavior::Succeed));
        let payload: ApplicationPayload = serde_json::from_value(json!({
            "category": "attorney",
            "office": "Los Angeles",
            "position": "Trial Attorney",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "phone": "3105551234",
            "whyTrembach": "Trials",
            "trialCases": [
                { "name": "Doe v. Roe", "court": "LASC" },
                { "name": "Smith v. Jones" }
            ]
        }))
        .unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 22, 4, 0).unwrap();

        service(email.clone(), sms).dispatch(&payload, at).await;

        let firm = email
            .sent()
            .into_iter()
            .find(|m| m.to == FIRM)
            .expect("firm email sent");
        assert!(firm.html.contains("Doe v. Roe"));
        assert!(!firm.html.contains("Smith v. Jones"));
        assert!(firm.html.contains("Trial Experience (2 cases)"));
    }
}
