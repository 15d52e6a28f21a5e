//! Caller-facing result schema and provider error guidance

use serde::Serialize;

use crate::provider::{ProviderError, SendReceipt};
use crate::template::{TemplateError, TemplateSummary};

use super::error::EmailError;

pub const TROUBLESHOOTING_URL: &str = "https://learn.microsoft.com/en-us/azure/communication-services/concepts/email/email-domain-configuration-troubleshooting";

const IN_PROGRESS: &str = "InProgress";

/// Outcome of a send operation, serialized as-is to callers
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SendResult {
    Sent(SendSuccess),
    Failed(SendFailure),
}

impl SendResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SendResult::Sent(s) if s.success)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendSuccess {
    pub success: bool,
    pub operation_id: String,
    pub status: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_attachment: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_subject: Option<String>,
}

impl SendSuccess {
    /// `noun` is "Email" or "Incident email"
    pub fn from_receipt(receipt: SendReceipt, noun: &str) -> Self {
        let (status, message) = if receipt.completed {
            (receipt.status, format!("{noun} sent successfully"))
        } else {
            (
                IN_PROGRESS.to_string(),
                format!("{noun} send operation is still in progress"),
            )
        };

        Self {
            success: receipt.completed,
            operation_id: receipt.operation_id,
            status,
            message,
            has_attachment: None,
            attachment_count: None,
            template_name: None,
            processed_subject: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendFailure {
    pub success: bool,
    pub error: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub troubleshooting_url: Option<String>,
}

impl SendFailure {
    fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            error_code: None,
            troubleshooting_url: None,
        }
    }

    /// Map any failure onto the caller-facing schema. `context` names the
    /// operation, e.g. "incident email".
    pub fn from_error(err: &EmailError, context: &str) -> Self {
        match err {
            EmailError::MissingSender => Self::new(err.to_string(), "Sender address is required"),
            EmailError::Validation(e) => Self::new(e.to_string(), "Invalid sender address format"),
            EmailError::Attachment(e) => Self::new(e.to_string(), e.summary()),
            EmailError::Template(e @ TemplateError::NotFound(_)) => {
                Self::new(e.to_string(), "Template missing")
            }
            EmailError::Template(e @ TemplateError::InvalidVariables(_)) => {
                Self::new(e.to_string(), "Variable parsing failed")
            }
            EmailError::Provider(e) => format_provider_error(e, context),
            EmailError::Cancelled => Self::new(
                err.to_string(),
                format!("Failed to send {context}: operation cancelled"),
            ),
            EmailError::Unexpected(msg) => Self::new(
                msg.clone(),
                format!("Failed to send {context} due to unexpected error"),
            ),
        }
    }
}

/// Turn a provider rejection into actionable guidance.
pub fn format_provider_error(err: &ProviderError, context: &str) -> SendFailure {
    let guidance = match err.code.as_str() {
        "DomainNotLinked" => concat!(
            "The sender domain has not been linked to this Azure Communication Service resource. ",
            "For easiest setup, use Azure managed domains (recommended): donotreply@{domain-guid}.azurecomm.net. ",
            "For custom domains, ensure the domain is: 1) Added to an Email Communication Service resource, ",
            "2) Fully verified with proper DNS records, and 3) Linked to this Communication Service resource."
        )
        .to_string(),
        "Unauthorized" => "Authentication failed. Check that the Azure Communication Service resource has proper managed identity permissions.".to_string(),
        "InvalidSender" => "The sender address is invalid or not from a verified domain. Use a verified domain address.".to_string(),
        _ => format!("Failed to send {context} due to Azure Communication Services error"),
    };

    SendFailure {
        success: false,
        error: err.message.clone(),
        message: guidance,
        error_code: Some(err.code.clone()),
        troubleshooting_url: Some(TROUBLESHOOTING_URL.to_string()),
    }
}

/// Response of the template listing operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateListResult {
    pub success: bool,
    pub templates: Vec<TemplateSummary>,
    pub message: String,
}

impl TemplateListResult {
    pub fn new(templates: Vec<TemplateSummary>) -> Self {
        Self {
            success: true,
            templates,
            message: "Available email templates retrieved successfully".to_string(),
        }
    }
}
