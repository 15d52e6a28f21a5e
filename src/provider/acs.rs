//! Azure Communication Services Email REST client

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmailMessage, EmailSender, ProviderError, SendReceipt};

/// Connection settings for [`AcsEmailClient`]
#[derive(Debug, Clone)]
pub struct AcsClientConfig {
    /// Resource endpoint, e.g. `https://my-acs.communication.azure.com`
    pub endpoint: String,
    /// Bearer token supplied by the deployment
    pub access_token: Option<String>,
    pub api_version: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub request_timeout: Duration,
}

/// HTTP client for the ACS `emails:send` long-running operation
#[derive(Clone)]
pub struct AcsEmailClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    api_version: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl AcsEmailClient {
    pub fn new(config: AcsClientConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProviderError::new("ClientBuildFailed", e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.filter(|t| !t.is_empty()),
            api_version: config.api_version,
            poll_interval: config.poll_interval,
            max_poll_attempts: config.max_poll_attempts,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn submit(&self, message: &EmailMessage) -> Result<OperationStatus, ProviderError> {
        let url = format!("{}/emails:send", self.endpoint);
        let mut request = self
            .http
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("repeatability-request-id", Uuid::new_v4().to_string())
            .header(
                "repeatability-first-sent",
                Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            )
            .json(&SendEmailBody::from(message));

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(transport_error)?;
        handle_response(response).await
    }

    async fn poll(&self, operation_id: &str) -> Result<OperationStatus, ProviderError> {
        let url = format!("{}/emails/operations/{}", self.endpoint, operation_id);
        let mut request = self
            .http
            .get(&url)
            .query(&[("api-version", self.api_version.as_str())]);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(transport_error)?;
        handle_response(response).await
    }
}

#[async_trait]
impl EmailSender for AcsEmailClient {
    #[tracing::instrument(
        name = "acs.send",
        skip(self, message),
        fields(recipients = message.recipients.len(), attachments = message.attachments.len())
    )]
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, ProviderError> {
        let mut operation = self.submit(message).await?;
        tracing::debug!(operation_id = %operation.id, status = %operation.status, "Email send accepted");

        let mut attempts = 0;
        while !operation.is_terminal() && attempts < self.max_poll_attempts {
            tokio::time::sleep(self.poll_interval).await;
            operation = self.poll(&operation.id).await?;
            attempts += 1;
        }

        operation.into_receipt()
    }

    fn provider_name(&self) -> &'static str {
        "azure-communication-services"
    }
}

async fn handle_response(response: reqwest::Response) -> Result<OperationStatus, ProviderError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if status.is_success() {
        return serde_json::from_str::<OperationStatus>(&body).map_err(|e| {
            ProviderError::new("InvalidResponse", format!("Unreadable provider response: {e}"))
        });
    }

    Err(parse_error(status, &body))
}

fn parse_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error: Some(detail) }) => detail.into(),
        _ => {
            let code = status
                .canonical_reason()
                .map(|reason| reason.replace(' ', ""))
                .unwrap_or_else(|| status.as_u16().to_string());
            let message = if body.trim().is_empty() {
                format!("Provider returned HTTP {}", status.as_u16())
            } else {
                body.trim().to_string()
            };
            ProviderError::new(code, message)
        }
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    ProviderError::new("RequestFailed", err.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender_address: &'a str,
    content: ContentBody<'a>,
    recipients: RecipientsBody<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentBody<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentBody<'a> {
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plain_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RecipientsBody<'a> {
    to: Vec<AddressBody<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddressBody<'a> {
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentBody<'a> {
    name: &'a str,
    content_type: &'a str,
    content_in_base64: String,
}

impl<'a> From<&'a EmailMessage> for SendEmailBody<'a> {
    fn from(message: &'a EmailMessage) -> Self {
        Self {
            sender_address: &message.sender,
            content: ContentBody {
                subject: &message.content.subject,
                plain_text: message.content.plain_text.as_deref(),
                html: message.content.html.as_deref(),
            },
            recipients: RecipientsBody {
                to: message
                    .recipients
                    .iter()
                    .map(|r| AddressBody {
                        address: &r.address,
                        display_name: r.display_name.as_deref(),
                    })
                    .collect(),
            },
            attachments: message
                .attachments
                .iter()
                .map(|a| AttachmentBody {
                    name: &a.file_name,
                    content_type: &a.mime_type,
                    content_in_base64: BASE64.encode(&a.bytes),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    id: String,
    status: String,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

impl OperationStatus {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "Succeeded" | "Failed" | "Canceled")
    }

    fn into_receipt(self) -> Result<SendReceipt, ProviderError> {
        match self.status.as_str() {
            "Failed" | "Canceled" => Err(self.error.map(ProviderError::from).unwrap_or_else(|| {
                ProviderError::new(
                    self.status.clone(),
                    format!("Email send operation {} ended with status {}", self.id, self.status),
                )
            })),
            _ => Ok(SendReceipt {
                completed: self.is_terminal(),
                operation_id: self.id,
                status: self.status,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl From<ErrorDetail> for ProviderError {
    fn from(detail: ErrorDetail) -> Self {
        ProviderError::new(detail.code, detail.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::ResolvedAttachment;
    use crate::provider::{EmailAddress, EmailContent};
    use serde_json::json;

    fn message() -> EmailMessage {
        EmailMessage {
            sender: "donotreply@guid.azurecomm.net".to_string(),
            recipients: vec![EmailAddress::new("ops@contoso.com", Some("Ops".to_string()))],
            content: EmailContent::new("Subject", "<p>Body</p>", true),
            attachments: vec![ResolvedAttachment {
                file_name: "hello.txt".to_string(),
                mime_type: "text/plain".to_string(),
                bytes: b"hello".to_vec(),
            }],
        }
    }

    #[test]
    fn test_send_body_shape() {
        let message = message();
        let body = serde_json::to_value(SendEmailBody::from(&message)).unwrap();

        assert_eq!(
            body,
            json!({
                "senderAddress": "donotreply@guid.azurecomm.net",
                "content": {"subject": "Subject", "html": "<p>Body</p>"},
                "recipients": {"to": [{"address": "ops@contoso.com", "displayName": "Ops"}]},
                "attachments": [{
                    "name": "hello.txt",
                    "contentType": "text/plain",
                    "contentInBase64": "aGVsbG8="
                }]
            })
        );
    }

    #[test]
    fn test_send_body_omits_empty_attachments() {
        let mut message = message();
        message.attachments.clear();
        let body = serde_json::to_value(SendEmailBody::from(&message)).unwrap();
        assert!(body.get("attachments").is_none());
    }

    #[test]
    fn test_parse_structured_error() {
        let err = parse_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error": {"code": "DomainNotLinked", "message": "The domain is not linked."}}"#,
        );
        assert_eq!(err, ProviderError::new("DomainNotLinked", "The domain is not linked."));
    }

    #[test]
    fn test_parse_unstructured_error() {
        let err = parse_error(reqwest::StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.code, "Unauthorized");
        assert_eq!(err.message, "Provider returned HTTP 401");
    }

    #[test]
    fn test_operation_receipts() {
        let running: OperationStatus =
            serde_json::from_str(r#"{"id": "op-1", "status": "Running"}"#).unwrap();
        assert!(!running.is_terminal());
        let receipt = running.into_receipt().unwrap();
        assert!(!receipt.completed);

        let done: OperationStatus =
            serde_json::from_str(r#"{"id": "op-1", "status": "Succeeded"}"#).unwrap();
        let receipt = done.into_receipt().unwrap();
        assert!(receipt.completed);
        assert_eq!(receipt.status, "Succeeded");
        assert_eq!(receipt.operation_id, "op-1");
    }

    #[test]
    fn test_failed_operation_is_error() {
        let failed: OperationStatus = serde_json::from_str(
            r#"{"id": "op-2", "status": "Failed", "error": {"code": "InvalidSender", "message": "bad sender"}}"#,
        )
        .unwrap();
        let err = failed.into_receipt().unwrap_err();
        assert_eq!(err.code, "InvalidSender");

        let canceled: OperationStatus =
            serde_json::from_str(r#"{"id": "op-3", "status": "Canceled"}"#).unwrap();
        assert_eq!(canceled.into_receipt().unwrap_err().code, "Canceled");
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = AcsEmailClient::new(AcsClientConfig {
            endpoint: "https://acs.example/".to_string(),
            access_token: Some(String::new()),
            api_version: "2023-03-31".to_string(),
            poll_interval: Duration::from_millis(10),
            max_poll_attempts: 1,
            request_timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(client.endpoint(), "https://acs.example");
        assert!(client.access_token.is_none());
    }
}
