// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Email delivery collaborator.
//!
//! The pipeline hands a sanitized payload to a [`DeliveryClient`]. The
//! production client talks to the EmailJS REST API.

use crate::config::DeliveryConfig;
use crate::sanitizer::SanitizedPayload;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Delivery error types.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Delivery rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Everything the delivery service needs for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub payload: SanitizedPayload,
}

impl DeliveryRequest {
    pub fn new(config: &DeliveryConfig, payload: SanitizedPayload) -> Self {
        Self {
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
            payload,
        }
    }
}

/// Sends accepted submissions onward.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn send(&self, request: &DeliveryRequest) -> Result<(), DeliveryError>;
}

/// Request body of the EmailJS send endpoint.
#[derive(Debug, Serialize)]
struct EmailJsBody<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a SanitizedPayload,
}

impl<'a> From<&'a DeliveryRequest> for EmailJsBody<'a> {
    fn from(request: &'a DeliveryRequest) -> Self {
        Self {
            service_id: &request.service_id,
            template_id: &request.template_id,
            user_id: &request.public_key,
            template_params: &request.payload,
        }
    }
}

/// EmailJS REST client.
pub struct EmailJsClient {
    endpoint: String,
    client: reqwest::Client,
}

impl EmailJsClient {
    /// Create a new client posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DeliveryClient for EmailJsClient {
    async fn send(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        debug!(endpoint = %self.endpoint, service_id = %request.service_id, "Sending message");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmailJsBody::from(request))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> DeliveryRequest {
        let config = DeliveryConfig {
            service_id: "service_abc".to_string(),
            template_id: "template_xyz".to_string(),
            public_key: "pk_123".to_string(),
            ..Default::default()
        };
        DeliveryRequest::new(
            &config,
            SanitizedPayload {
                name: "Jo".to_string(),
                email: "jo@x.co".to_string(),
                message: "Hello there, this works.".to_string(),
            },
        )
    }

    #[test]
    fn test_emailjs_body_shape() {
        let request = request();
        let body = serde_json::to_value(EmailJsBody::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "service_id": "service_abc",
                "template_id": "template_xyz",
                "user_id": "pk_123",
                "template_params": {
                    "name": "Jo",
                    "email": "jo@x.co",
                    "message": "Hello there, this works.",
                },
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let client = EmailJsClient::new("http://127.0.0.1:9/api/v1.0/email/send");
        let result = client.send(&request()).await;
        tokio_test::assert_err!(&result);
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }

    #[test]
    fn test_rejected_error_message() {
        let err = DeliveryError::Rejected {
            status: 400,
            body: "The public key is required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Delivery rejected with status 400: The public key is required"
        );
    }
}
