//! HTTP client for the relay endpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sitequote_core::{ContactForm, FormSubmission};

#[derive(Debug, Error)]
pub enum RelayError {
    /// The endpoint answered with its `{ error, details }` envelope.
    #[error("relay rejected the request ({status}): {message}")]
    Endpoint { status: u16, message: String, details: Option<String> },
    #[error("could not reach the relay: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Acknowledgement for an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayAck {
    pub success: bool,
    pub message_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into() }
    }

    pub async fn submit_form(&self, submission: &FormSubmission) -> Result<RelayAck, RelayError> {
        self.post("/api/form-submission", submission).await
    }

    pub async fn submit_contact(&self, form: &ContactForm) -> Result<RelayAck, RelayError> {
        self.post("/api/contact", form).await
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<RelayAck, RelayError> {
        let response =
            self.http.post(format!("{}{}", self.base_url, path)).json(body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<RelayAck>().await?);
        }

        // Error bodies are best effort; a missing or non-JSON body still
        // surfaces the status code.
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        tracing::warn!(
            event_name = "relay_rejected",
            status = status.as_u16(),
            error = %body.error,
            "relay rejected the request"
        );
        Err(RelayError::Endpoint {
            status: status.as_u16(),
            message: body.error,
            details: body.details,
        })
    }
}
