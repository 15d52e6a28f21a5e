//! Outbound email capability.
//!
//! The dispatcher only depends on the [`EmailSender`] trait. The production
//! implementation talks to the Azure Communication Services Email REST API;
//! [`UnconfiguredSender`] stands in when no endpoint is configured.

mod acs;

pub use acs::{AcsClientConfig, AcsEmailClient};

use async_trait::async_trait;
use thiserror::Error;

use crate::attachment::ResolvedAttachment;

/// A recipient or sender mailbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    pub address: String,
    pub display_name: Option<String>,
}

impl EmailAddress {
    pub fn new(address: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            address: address.into(),
            display_name: display_name.filter(|n| !n.is_empty()),
        }
    }
}

/// Subject plus at least one body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: Option<String>,
    pub plain_text: Option<String>,
}

impl EmailContent {
    /// Put `body` in the HTML or plain-text slot
    pub fn new(subject: impl Into<String>, body: impl Into<String>, is_html: bool) -> Self {
        let body = body.into();
        let (html, plain_text) = if is_html {
            (Some(body), None)
        } else {
            (None, Some(body))
        };
        Self {
            subject: subject.into(),
            html,
            plain_text,
        }
    }
}

/// Fully assembled message handed to the provider
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub sender: String,
    pub recipients: Vec<EmailAddress>,
    pub content: EmailContent,
    pub attachments: Vec<ResolvedAttachment>,
}

/// Provider answer to a send request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Whether the provider reached a terminal state before we stopped waiting
    pub completed: bool,
    pub operation_id: String,
    pub status: String,
}

/// The provider refused or failed the request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Submit a message and wait for the provider's verdict.
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, ProviderError>;

    /// Whether the sender can reach a real provider
    fn is_configured(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "unknown"
    }
}

/// Fails every send; used when no provider endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSender;

#[async_trait]
impl EmailSender for UnconfiguredSender {
    async fn send(&self, _message: &EmailMessage) -> Result<SendReceipt, ProviderError> {
        Err(ProviderError::new(
            "NotConfigured",
            "Email provider endpoint is not configured. Set ACS_ENDPOINT to enable sending.",
        ))
    }

    fn is_configured(&self) -> bool {
        false
    }

    fn provider_name(&self) -> &'static str {
        "unconfigured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_slots() {
        let html = EmailContent::new("s", "<p>b</p>", true);
        assert_eq!(html.html.as_deref(), Some("<p>b</p>"));
        assert!(html.plain_text.is_none());

        let text = EmailContent::new("s", "b", false);
        assert_eq!(text.plain_text.as_deref(), Some("b"));
        assert!(text.html.is_none());
    }

    #[test]
    fn test_blank_display_name_dropped() {
        assert_eq!(EmailAddress::new("a@b.com", Some(String::new())).display_name, None);
    }

    #[tokio::test]
    async fn test_unconfigured_sender_fails() {
        let message = EmailMessage {
            sender: "donotreply@x.azurecomm.net".to_string(),
            recipients: vec![EmailAddress::new("a@b.com", None)],
            content: EmailContent::new("s", "b", false),
            attachments: vec![],
        };

        let err = UnconfiguredSender.send(&message).await.unwrap_err();
        assert_eq!(err.code, "NotConfigured");
        assert!(!UnconfiguredSender.is_configured());
    }
}
