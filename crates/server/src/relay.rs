//! Relay endpoints for the site's forms.
//!
//! JSON API Endpoints:
//! - `POST /api/contact`: contact form
//! - `POST /api/form-submission`: pricing wizard, MVP form, or anything else
//! - `POST /api/send-email`: raw outbound email
//!
//! Each request follows the same sequence: require the mail settings, build
//! and verify a fresh transport, compose bilingual content, send the
//! business notification, then the best-effort requester confirmation.
//! Handlers never retry; the client owns retry decisions.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use sitequote_core::{
    ContactForm, FormSubmission, Language, MailConfig, MvpFormData, PricingFormData,
};
use sitequote_mail::{
    compose, deliver, Delivery, EmailEnvelope, MailTransport, OutboundEmail, TransportFactory,
};

pub const CONFIG_INCOMPLETE: &str = "Server email configuration is incomplete";
pub const VERIFY_FAILED: &str = "Failed to verify SMTP connection";

#[derive(Clone)]
pub struct RelayState {
    pub mail: MailConfig,
    pub factory: Arc<dyn TransportFactory>,
}

#[derive(Debug, Serialize)]
pub struct RelayAccepted {
    pub success: bool,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailAccepted {
    pub success: bool,
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub response: String,
    pub envelope: EmailEnvelope,
}

#[derive(Debug, Serialize)]
pub struct RelayFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error half of every handler: a status code plus the `{ error, details }`
/// envelope the site's forms already understand.
#[derive(Debug)]
pub struct RelayRejection {
    pub status: StatusCode,
    pub failure: RelayFailure,
}

impl RelayRejection {
    fn internal(message: &str, details: Option<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            failure: RelayFailure { error: message.to_string(), details },
        }
    }

    fn bad_request(message: &str, details: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            failure: RelayFailure { error: message.to_string(), details: Some(details) },
        }
    }
}

impl IntoResponse for RelayRejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.failure)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub text: String,
    #[serde(default)]
    pub html: Option<String>,
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/api/contact", post(contact))
        .route("/api/form-submission", post(form_submission))
        .route("/api/send-email", post(send_email))
        .with_state(state)
}

/// Resolve the mail settings and hand back a verified transport. No
/// transport is ever constructed while the settings are incomplete.
async fn prepare_transport(
    state: &RelayState,
    correlation_id: Uuid,
) -> Result<Arc<dyn MailTransport>, RelayRejection> {
    let settings = state.mail.require().map_err(|err| {
        error!(
            event_name = "relay.config_incomplete",
            correlation_id = %correlation_id,
            error = %err,
            "rejecting request, mail settings are incomplete"
        );
        RelayRejection::internal(CONFIG_INCOMPLETE, None)
    })?;

    let transport = state.factory.create(&settings).map_err(|err| {
        error!(
            event_name = "relay.transport_failed",
            correlation_id = %correlation_id,
            error = %err,
            "could not create the SMTP transport"
        );
        RelayRejection::internal(VERIFY_FAILED, Some(err.to_string()))
    })?;

    transport.verify().await.map_err(|err| {
        error!(
            event_name = "relay.verify_failed",
            correlation_id = %correlation_id,
            error = %err,
            "SMTP connection verification failed"
        );
        RelayRejection::internal(VERIFY_FAILED, Some(err.to_string()))
    })?;

    Ok(transport)
}

pub async fn contact(
    State(state): State<RelayState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<RelayAccepted>, RelayRejection> {
    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "relay.contact_received",
        correlation_id = %correlation_id,
        language = form.language.code(),
        "contact form received"
    );

    let transport = prepare_transport(&state, correlation_id).await?;
    let delivery = Delivery {
        requester_email: Some(form.email.clone()),
        notification: compose::contact_notification(&form),
        confirmation: Some(compose::contact_confirmation(&form)),
    };

    let receipt = deliver(transport.as_ref(), &delivery).await.map_err(|err| {
        error!(
            event_name = "relay.contact_failed",
            correlation_id = %correlation_id,
            error = %err,
            "contact notification could not be sent"
        );
        RelayRejection::internal("Failed to send message", Some(err.to_string()))
    })?;

    info!(
        event_name = "relay.contact_accepted",
        correlation_id = %correlation_id,
        message_id = %receipt.message_id,
        "contact form relayed"
    );
    Ok(Json(RelayAccepted { success: true, message_id: receipt.message_id }))
}

pub async fn form_submission(
    State(state): State<RelayState>,
    Json(submission): Json<FormSubmission>,
) -> Result<Json<RelayAccepted>, RelayRejection> {
    let correlation_id = Uuid::new_v4();
    let language = submission.language();
    info!(
        event_name = "relay.form_received",
        correlation_id = %correlation_id,
        form_type = %submission.form_type,
        language = language.code(),
        "form submission received"
    );

    let transport = prepare_transport(&state, correlation_id).await?;
    let delivery = compose_submission(&submission, language)
        .map_err(|err| RelayRejection::bad_request("Invalid form submission payload", err.to_string()))?;

    let receipt = deliver(transport.as_ref(), &delivery).await.map_err(|err| {
        error!(
            event_name = "relay.form_failed",
            correlation_id = %correlation_id,
            form_type = %submission.form_type,
            error = %err,
            "form submission notification could not be sent"
        );
        RelayRejection::internal("Failed to send form submission", Some(err.to_string()))
    })?;

    info!(
        event_name = "relay.form_accepted",
        correlation_id = %correlation_id,
        form_type = %submission.form_type,
        message_id = %receipt.message_id,
        "form submission relayed"
    );
    Ok(Json(RelayAccepted { success: true, message_id: receipt.message_id }))
}

/// Known form types are parsed into their typed payloads; anything else is
/// relayed as-is with the raw JSON pretty-printed into the email.
fn compose_submission(
    submission: &FormSubmission,
    language: Language,
) -> Result<Delivery, serde_json::Error> {
    match submission.form_type.as_str() {
        "pricing" => {
            let data: PricingFormData = serde_json::from_value(submission.form_data.clone())?;
            Ok(Delivery {
                requester_email: Some(data.contact.email.clone()),
                notification: compose::pricing_notification(&data),
                confirmation: Some(compose::submission_confirmation(
                    "pricing",
                    &data.contact.first_name,
                    data.language,
                )),
            })
        }
        "mvp" => {
            let data: MvpFormData = serde_json::from_value(submission.form_data.clone())?;
            Ok(Delivery {
                requester_email: Some(data.contact.email.clone()),
                notification: compose::mvp_notification(&data),
                confirmation: Some(compose::submission_confirmation(
                    "mvp",
                    &data.contact.first_name,
                    data.language,
                )),
            })
        }
        other => {
            let requester = submission
                .form_data
                .get("email")
                .and_then(Value::as_str)
                .map(str::to_owned);
            let first_name = submission
                .form_data
                .get("firstName")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let confirmation = requester
                .is_some()
                .then(|| compose::submission_confirmation(other, first_name, language));
            Ok(Delivery {
                requester_email: requester,
                notification: compose::generic_notification(other, &submission.form_data, language),
                confirmation,
            })
        }
    }
}

pub async fn send_email(
    State(state): State<RelayState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailAccepted>, RelayRejection> {
    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "relay.send_email_received",
        correlation_id = %correlation_id,
        to = %request.to,
        "direct email request received"
    );

    let transport = prepare_transport(&state, correlation_id).await?;
    let email = OutboundEmail {
        to: request.to.clone(),
        reply_to: None,
        subject: request.subject.clone(),
        text: request.text.clone(),
        // The HTML part falls back to the text body, as the site always did.
        html: Some(request.html.clone().unwrap_or_else(|| request.text.clone())),
    };

    let receipt = transport.send(&email).await.map_err(|err| {
        error!(
            event_name = "relay.send_email_failed",
            correlation_id = %correlation_id,
            error = %err,
            "direct email could not be sent"
        );
        RelayRejection::internal("Failed to send email", Some(err.to_string()))
    })?;

    info!(
        event_name = "relay.send_email_accepted",
        correlation_id = %correlation_id,
        message_id = %receipt.message_id,
        "direct email relayed"
    );
    Ok(Json(SendEmailAccepted {
        success: true,
        message_id: receipt.message_id,
        response: receipt.response,
        envelope: receipt.envelope,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use serde_json::json;

    use sitequote_core::{
        ContactFields, ContactForm, FormSubmission, Language, MailConfig, PackageDetails,
        PricingFormData, SmtpSettings,
    };
    use sitequote_mail::{
        EmailEnvelope, MailError, MailTransport, OutboundEmail, SendReceipt, TransportFactory,
        NOTIFICATIONS_INBOX,
    };

    use super::{
        contact, form_submission, send_email, RelayState, SendEmailRequest, CONFIG_INCOMPLETE,
        VERIFY_FAILED,
    };

    struct FakeTransport {
        verify_error: Option<String>,
        fail_on_send: Option<usize>,
        sent: Arc<Mutex<Vec<OutboundEmail>>>,
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn verify(&self) -> Result<(), MailError> {
            match &self.verify_error {
                Some(message) => Err(MailError::Verify(message.clone())),
                None => Ok(()),
            }
        }

        async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
            let mut sent = self.sent.lock().expect("lock");
            let index = sent.len();
            sent.push(email.clone());
            if self.fail_on_send == Some(index) {
                return Err(MailError::Send("mailbox unavailable".to_string()));
            }
            Ok(SendReceipt {
                message_id: format!("<message-{index}@test>"),
                response: "250 Ok".to_string(),
                envelope: EmailEnvelope {
                    from: "noreply@example.com".to_string(),
                    to: vec![email.to.clone()],
                },
            })
        }
    }

    struct FakeFactory {
        created: AtomicUsize,
        verify_error: Option<String>,
        fail_on_send: Option<usize>,
        sent: Arc<Mutex<Vec<OutboundEmail>>>,
    }

    impl FakeFactory {
        fn new(verify_error: Option<&str>, fail_on_send: Option<usize>) -> Self {
            Self {
                created: AtomicUsize::new(0),
                verify_error: verify_error.map(str::to_owned),
                fail_on_send,
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn created(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }

        fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
        }
    }

    impl TransportFactory for FakeFactory {
        fn create(&self, _settings: &SmtpSettings) -> Result<Arc<dyn MailTransport>, MailError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FakeTransport {
                verify_error: self.verify_error.clone(),
                fail_on_send: self.fail_on_send,
                sent: Arc::clone(&self.sent),
            }))
        }
    }

    fn complete_mail_config() -> MailConfig {
        MailConfig {
            host: Some("smtp.example.com".to_string()),
            port: Some(587),
            secure: false,
            username: Some("mailer".to_string()),
            password: Some("password".to_string().into()),
            from_address: Some("noreply@example.com".to_string()),
        }
    }

    fn state_with(factory: Arc<FakeFactory>, mail: MailConfig) -> RelayState {
        RelayState { mail, factory }
    }

    fn contact_form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Availability".to_string(),
            message: "When can you start?".to_string(),
            language: Language::En,
        }
    }

    fn pricing_submission() -> FormSubmission {
        let data = PricingFormData {
            contact: ContactFields {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
            },
            message: None,
            package_details: PackageDetails {
                client_type: "Company".to_string(),
                ..PackageDetails::default()
            },
            language: Language::En,
        };
        FormSubmission::pricing(&data).expect("serializable")
    }

    #[tokio::test]
    async fn incomplete_config_rejects_without_touching_the_transport() {
        let factory = Arc::new(FakeFactory::new(None, None));
        let state = state_with(Arc::clone(&factory), MailConfig::default());

        let rejection = contact(State(state), Json(contact_form()))
            .await
            .expect_err("must reject");

        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rejection.failure.error, CONFIG_INCOMPLETE);
        assert_eq!(rejection.failure.details, None);
        assert_eq!(factory.created(), 0, "no transport may be constructed");
    }

    #[tokio::test]
    async fn verify_failure_maps_to_the_verify_envelope() {
        let factory = Arc::new(FakeFactory::new(Some("connection refused"), None));
        let state = state_with(Arc::clone(&factory), complete_mail_config());

        let rejection = form_submission(State(state), Json(pricing_submission()))
            .await
            .expect_err("must reject");

        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rejection.failure.error, VERIFY_FAILED);
        let details = rejection.failure.details.expect("details are included");
        assert!(details.contains("connection refused"));
        assert!(factory.sent().is_empty(), "nothing may be sent after a failed verify");
    }

    #[tokio::test]
    async fn pricing_submission_addresses_both_emails() {
        let factory = Arc::new(FakeFactory::new(None, None));
        let state = state_with(Arc::clone(&factory), complete_mail_config());

        let Json(accepted) = form_submission(State(state), Json(pricing_submission()))
            .await
            .expect("accepted");
        assert!(accepted.success);
        assert_eq!(accepted.message_id, "<message-0@test>");

        let sent = factory.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, NOTIFICATIONS_INBOX);
        assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(sent[1].to, "ada@example.com");
        assert!(sent[1].subject.contains("pricing request"));
    }

    #[tokio::test]
    async fn notification_failure_is_a_hard_error() {
        let factory = Arc::new(FakeFactory::new(None, Some(0)));
        let state = state_with(Arc::clone(&factory), complete_mail_config());

        let rejection = form_submission(State(state), Json(pricing_submission()))
            .await
            .expect_err("must reject");

        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rejection.failure.error, "Failed to send form submission");
        assert_eq!(factory.sent().len(), 1, "confirmation is never attempted");
    }

    #[tokio::test]
    async fn confirmation_failure_still_returns_success() {
        let factory = Arc::new(FakeFactory::new(None, Some(1)));
        let state = state_with(Arc::clone(&factory), complete_mail_config());

        let Json(accepted) = form_submission(State(state), Json(pricing_submission()))
            .await
            .expect("accepted despite the confirmation failure");

        assert!(accepted.success);
        assert_eq!(accepted.message_id, "<message-0@test>");
        assert_eq!(factory.sent().len(), 2, "both sends were attempted");
    }

    #[tokio::test]
    async fn unknown_form_type_without_email_sends_only_the_notification() {
        let factory = Arc::new(FakeFactory::new(None, None));
        let state = state_with(Arc::clone(&factory), complete_mail_config());
        let submission = FormSubmission {
            form_type: "careers".to_string(),
            form_data: json!({ "role": "engineer", "language": "nl" }),
        };

        let Json(accepted) =
            form_submission(State(state), Json(submission)).await.expect("accepted");
        assert!(accepted.success);

        let sent = factory.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, NOTIFICATIONS_INBOX);
        assert_eq!(sent[0].reply_to, None);
        assert!(sent[0].subject.contains("careers"));
    }

    #[tokio::test]
    async fn malformed_pricing_payload_is_a_bad_request() {
        let factory = Arc::new(FakeFactory::new(None, None));
        let state = state_with(Arc::clone(&factory), complete_mail_config());
        let submission = FormSubmission {
            form_type: "pricing".to_string(),
            form_data: json!({ "firstName": "Ada" }),
        };

        let rejection =
            form_submission(State(state), Json(submission)).await.expect_err("must reject");
        assert_eq!(rejection.status, StatusCode::BAD_REQUEST);
        assert_eq!(rejection.failure.error, "Invalid form submission payload");
    }

    #[tokio::test]
    async fn send_email_falls_back_to_the_text_body_for_html() {
        let factory = Arc::new(FakeFactory::new(None, None));
        let state = state_with(Arc::clone(&factory), complete_mail_config());
        let request = SendEmailRequest {
            to: "ops@example.com".to_string(),
            subject: "Deploy finished".to_string(),
            text: "All green.".to_string(),
            html: None,
        };

        let Json(accepted) = send_email(State(state), Json(request)).await.expect("accepted");
        assert!(accepted.success);
        assert_eq!(accepted.envelope.to, vec!["ops@example.com".to_string()]);

        let sent = factory.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].html.as_deref(), Some("All green."));
        assert_eq!(sent[0].reply_to, None);
    }
}
