//! Input shapes of the send operations

use serde::Deserialize;

use crate::attachment::{non_empty, AttachmentDescriptor};
use crate::provider::EmailAddress;

/// Optional single attachment carried inline on a request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineAttachment {
    #[serde(default)]
    pub attachment_file_path: Option<String>,
    /// Base64 encoded content
    #[serde(default)]
    pub attachment_content: Option<String>,
    #[serde(default)]
    pub attachment_file_name: Option<String>,
    #[serde(default)]
    pub attachment_mime_type: Option<String>,
}

impl InlineAttachment {
    /// A path, content or file name was supplied. Resolution is attempted in
    /// that case, so incomplete input surfaces as an error instead of being
    /// dropped.
    pub fn is_present(&self) -> bool {
        non_empty(&self.attachment_file_path).is_some()
            || non_empty(&self.attachment_content).is_some()
            || non_empty(&self.attachment_file_name).is_some()
    }

    pub fn to_descriptor(&self) -> AttachmentDescriptor {
        AttachmentDescriptor {
            content: self.attachment_content.clone(),
            file_name: self.attachment_file_name.clone(),
            mime_type: self.attachment_mime_type.clone(),
            file_path: self.attachment_file_path.clone(),
        }
    }
}

/// Send an email, optionally with one attachment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub recipient_address: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub recipient_display_name: Option<String>,
    /// Body goes to the HTML slot instead of plain text
    #[serde(default)]
    pub is_html: bool,
    #[serde(flatten)]
    pub attachment: InlineAttachment,
}

/// Send an email with any number of attachments
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailWithAttachmentsRequest {
    pub recipient_address: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub recipient_display_name: Option<String>,
    #[serde(default)]
    pub is_html: bool,
    #[serde(default)]
    pub attachments: Vec<AttachmentDescriptor>,
}

/// Plain-text email, no attachments
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSimpleEmailRequest {
    pub recipient_address: String,
    pub subject: String,
    pub plain_text_body: String,
    #[serde(default)]
    pub sender_address: Option<String>,
}

/// Incident notification rendered from the `incident-outage` template
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendIncidentEmailRequest {
    pub recipient_address: String,
    /// JSON object, or a string holding JSON object text
    pub incident_variables: serde_json::Value,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub recipient_display_name: Option<String>,
    #[serde(default = "default_true")]
    pub use_html: bool,
    #[serde(flatten)]
    pub attachment: InlineAttachment,
}

fn default_true() -> bool {
    true
}

pub(crate) fn recipient(address: &str, display_name: &Option<String>) -> EmailAddress {
    EmailAddress::new(address, display_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_email_request_defaults() {
        let request: SendEmailRequest = serde_json::from_value(json!({
            "recipientAddress": "ops@contoso.com",
            "subject": "Hi",
            "body": "There"
        }))
        .unwrap();

        assert!(!request.is_html);
        assert!(request.sender_address.is_none());
        assert!(!request.attachment.is_present());
    }

    #[test]
    fn test_flattened_attachment_fields() {
        let request: SendEmailRequest = serde_json::from_value(json!({
            "recipientAddress": "ops@contoso.com",
            "subject": "Hi",
            "body": "There",
            "attachmentContent": "aGk=",
            "attachmentFileName": "hi.txt"
        }))
        .unwrap();

        assert!(request.attachment.is_present());
        let descriptor = request.attachment.to_descriptor();
        assert!(descriptor.has_source());
        assert_eq!(descriptor.file_name.as_deref(), Some("hi.txt"));
    }

    #[test]
    fn test_incident_request_defaults_to_html() {
        let request: SendIncidentEmailRequest = serde_json::from_value(json!({
            "recipientAddress": "ops@contoso.com",
            "incidentVariables": "{\"system\": \"Database\"}"
        }))
        .unwrap();

        assert!(request.use_html);
        assert!(request.incident_variables.is_string());
    }

    #[test]
    fn test_attachments_list() {
        let request: SendEmailWithAttachmentsRequest = serde_json::from_value(json!({
            "recipientAddress": "ops@contoso.com",
            "subject": "Files",
            "body": "Attached",
            "attachments": [
                {"content": "aGk=", "fileName": "a.txt"},
                {"FilePath": "/tmp/b.pdf"}
            ]
        }))
        .unwrap();

        assert_eq!(request.attachments.len(), 2);
        assert_eq!(request.attachments[1].file_path.as_deref(), Some("/tmp/b.pdf"));
    }
}
