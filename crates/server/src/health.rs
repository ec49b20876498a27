use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use sitequote_core::MailConfig;

#[derive(Clone)]
pub struct HealthState {
    mail: MailConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub mail: HealthCheck,
    pub checked_at: String,
}

pub fn router(mail: MailConfig) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { mail })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let mail = mail_check(&state.mail);
    let ready = mail.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "sitequote relay initialized".to_string(),
        },
        mail,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn mail_check(mail: &MailConfig) -> HealthCheck {
    match mail.require() {
        Ok(settings) => HealthCheck {
            status: "ready",
            detail: format!("mail settings resolved for {}:{}", settings.host, settings.port),
        },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};

    use sitequote_core::MailConfig;

    use crate::health::{health, HealthState};

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

    #[tokio::test]
    async fn health_is_ready_with_complete_mail_settings() {
        let (status, Json(payload)) =
            health(State(HealthState { mail: complete_mail_config() })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.mail.status, "ready");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_degrades_when_mail_settings_are_missing() {
        let (status, Json(payload)) =
            health(State(HealthState { mail: MailConfig::default() })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.mail.status, "degraded");
        assert!(payload.mail.detail.contains("EMAIL_SERVER_HOST"));
        assert_eq!(payload.service.status, "ready");
    }
}
