//! Send orchestration.
//!
//! Every operation walks the same sequence: resolve sender → validate sender
//! → build content → resolve attachments → send → format result. Any step may
//! end the request with a failure result; only a provider receipt produces a
//! success result.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::attachment::{AttachmentDescriptor, AttachmentResolver, ResolvedAttachment};
use crate::provider::{EmailContent, EmailMessage, EmailSender, SendReceipt};
use crate::sender::{resolve_sender, validate_sender_address};
use crate::template::{render, TemplateError, TemplateRegistry, VariableMap, INCIDENT_OUTAGE};
use crate::variables::{normalize_object, normalize_variables, AliasTable};

use super::error::EmailError;
use super::request::{
    recipient, SendEmailRequest, SendEmailWithAttachmentsRequest, SendIncidentEmailRequest,
    SendSimpleEmailRequest,
};
use super::result::{SendFailure, SendResult, SendSuccess, TemplateListResult};

const EMAIL_CONTEXT: &str = "email";
const MULTI_ATTACHMENT_CONTEXT: &str = "email with multiple attachments";
const SIMPLE_CONTEXT: &str = "simple email";
const INCIDENT_CONTEXT: &str = "incident email";

/// Sequences validation, rendering, attachment resolution and delivery.
///
/// Cheap to clone; all shared parts are read-only.
#[derive(Clone)]
pub struct EmailDispatcher {
    sender: Arc<dyn EmailSender>,
    templates: Arc<TemplateRegistry>,
    incident_aliases: Arc<AliasTable>,
    resolver: AttachmentResolver,
    default_sender: Option<String>,
}

impl EmailDispatcher {
    pub fn new(
        sender: Arc<dyn EmailSender>,
        templates: Arc<TemplateRegistry>,
        incident_aliases: Arc<AliasTable>,
        resolver: AttachmentResolver,
        default_sender: Option<String>,
    ) -> Self {
        Self {
            sender,
            templates,
            incident_aliases,
            resolver,
            default_sender: default_sender.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn is_provider_configured(&self) -> bool {
        self.sender.is_configured()
    }

    pub fn provider_name(&self) -> &'static str {
        self.sender.provider_name()
    }

    /// Send an email with an optional single attachment
    #[tracing::instrument(name = "email.send", skip_all, fields(has_attachment = request.attachment.is_present()))]
    pub async fn send_email(&self, request: SendEmailRequest, cancel: &CancellationToken) -> SendResult {
        let outcome = self.try_send_email(request, cancel).await;
        finish(outcome, EMAIL_CONTEXT)
    }

    /// Send an email with a list of attachments
    #[tracing::instrument(name = "email.send_with_attachments", skip_all, fields(attachments = request.attachments.len()))]
    pub async fn send_email_with_attachments(
        &self,
        request: SendEmailWithAttachmentsRequest,
        cancel: &CancellationToken,
    ) -> SendResult {
        let outcome = self.try_send_with_attachments(request, cancel).await;
        finish(outcome, MULTI_ATTACHMENT_CONTEXT)
    }

    /// Send a plain-text email
    #[tracing::instrument(name = "email.send_simple", skip_all)]
    pub async fn send_simple_email(
        &self,
        request: SendSimpleEmailRequest,
        cancel: &CancellationToken,
    ) -> SendResult {
        let outcome = self.try_send_simple(request, cancel).await;
        finish(outcome, SIMPLE_CONTEXT)
    }

    /// Render the incident template from loosely named variables and send it
    #[tracing::instrument(name = "email.send_incident", skip_all, fields(use_html = request.use_html))]
    pub async fn send_incident_email(
        &self,
        request: SendIncidentEmailRequest,
        cancel: &CancellationToken,
    ) -> SendResult {
        let outcome = self.try_send_incident(request, cancel).await;
        finish(outcome, INCIDENT_CONTEXT)
    }

    /// Describe the registered templates
    pub fn list_templates(&self) -> TemplateListResult {
        TemplateListResult::new(self.templates.summaries())
    }

    async fn try_send_email(
        &self,
        request: SendEmailRequest,
        cancel: &CancellationToken,
    ) -> Result<SendSuccess, EmailError> {
        let sender = self.sender_address(request.sender_address.as_deref())?;
        let content = EmailContent::new(request.subject, request.body, request.is_html);

        let attachments = if request.attachment.is_present() {
            vec![self.resolver.resolve(&request.attachment.to_descriptor()).await?]
        } else {
            Vec::new()
        };
        let has_attachment = !attachments.is_empty();

        let message = EmailMessage {
            sender,
            recipients: vec![recipient(&request.recipient_address, &request.recipient_display_name)],
            content,
            attachments,
        };

        let receipt = self.deliver(message, cancel).await?;
        let mut success = SendSuccess::from_receipt(receipt, "Email");
        success.has_attachment = Some(has_attachment);
        Ok(success)
    }

    async fn try_send_with_attachments(
        &self,
        request: SendEmailWithAttachmentsRequest,
        cancel: &CancellationToken,
    ) -> Result<SendSuccess, EmailError> {
        let sender = self.sender_address(request.sender_address.as_deref())?;
        let content = EmailContent::new(request.subject, request.body, request.is_html);
        let attachments = self.resolve_many(&request.attachments).await?;
        let attachment_count = attachments.len();

        let message = EmailMessage {
            sender,
            recipients: vec![recipient(&request.recipient_address, &request.recipient_display_name)],
            content,
            attachments,
        };

        let receipt = self.deliver(message, cancel).await?;
        let mut success = SendSuccess::from_receipt(receipt, "Email");
        success.attachment_count = Some(attachment_count);
        Ok(success)
    }

    async fn try_send_simple(
        &self,
        request: SendSimpleEmailRequest,
        cancel: &CancellationToken,
    ) -> Result<SendSuccess, EmailError> {
        let sender = self.sender_address(request.sender_address.as_deref())?;

        let message = EmailMessage {
            sender,
            recipients: vec![recipient(&request.recipient_address, &None)],
            content: EmailContent::new(request.subject, request.plain_text_body, false),
            attachments: Vec::new(),
        };

        let receipt = self.deliver(message, cancel).await?;
        Ok(SendSuccess::from_receipt(receipt, "Email"))
    }

    async fn try_send_incident(
        &self,
        request: SendIncidentEmailRequest,
        cancel: &CancellationToken,
    ) -> Result<SendSuccess, EmailError> {
        let sender = self.sender_address(request.sender_address.as_deref())?;

        let template = self.templates.get(INCIDENT_OUTAGE)?;
        let variables = self.incident_variables(request.incident_variables, &template.default_values)?;

        let subject = render(&template.subject, &variables);
        let body = if request.use_html {
            render(&template.html_body, &variables)
        } else {
            render(&template.plain_text_body, &variables)
        };

        let attachments = if request.attachment.is_present() {
            vec![self.resolver.resolve(&request.attachment.to_descriptor()).await?]
        } else {
            Vec::new()
        };

        let message = EmailMessage {
            sender,
            recipients: vec![recipient(&request.recipient_address, &request.recipient_display_name)],
            content: EmailContent::new(subject.clone(), body, request.use_html),
            attachments,
        };

        let receipt = self.deliver(message, cancel).await?;
        let mut success = SendSuccess::from_receipt(receipt, "Incident email");
        success.template_name = Some(INCIDENT_OUTAGE.to_string());
        success.processed_subject = Some(subject);
        Ok(success)
    }

    /// Explicit sender, else the configured default; then the rule chain.
    fn sender_address(&self, explicit: Option<&str>) -> Result<String, EmailError> {
        let address = resolve_sender(explicit, self.default_sender.as_deref())
            .ok_or(EmailError::MissingSender)?;
        validate_sender_address(address)?;
        Ok(address.to_string())
    }

    fn incident_variables(
        &self,
        raw: Value,
        defaults: &std::collections::BTreeMap<String, String>,
    ) -> Result<VariableMap, TemplateError> {
        match raw {
            Value::String(text) => normalize_variables(&text, &self.incident_aliases, defaults),
            Value::Object(object) => Ok(normalize_object(object, &self.incident_aliases, defaults)),
            other => Err(TemplateError::InvalidVariables(format!(
                "incident variables must be a JSON object, got {other}"
            ))),
        }
    }

    async fn resolve_many(
        &self,
        descriptors: &[AttachmentDescriptor],
    ) -> Result<Vec<ResolvedAttachment>, EmailError> {
        if descriptors.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.resolver.resolve_all(descriptors).await?)
    }

    /// Hand the message to the provider unless the request is cancelled first.
    async fn deliver(
        &self,
        message: EmailMessage,
        cancel: &CancellationToken,
    ) -> Result<SendReceipt, EmailError> {
        tracing::debug!(
            provider = self.sender.provider_name(),
            attachments = message.attachments.len(),
            "Submitting email to provider"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(EmailError::Cancelled),
            result = self.sender.send(&message) => Ok(result?),
        }
    }
}

fn finish(outcome: Result<SendSuccess, EmailError>, context: &str) -> SendResult {
    match outcome {
        Ok(success) => {
            tracing::info!(
                operation_id = %success.operation_id,
                status = %success.status,
                "Submitted {}",
                context
            );
            SendResult::Sent(success)
        }
        Err(err) => {
            match &err {
                EmailError::Provider(e) => {
                    tracing::error!(code = %e.code, error = %e, "Provider rejected {}", context)
                }
                EmailError::Unexpected(_) => {
                    tracing::error!(error = %err, "Unexpected failure sending {}", context)
                }
                _ => tracing::warn!(kind = err.kind(), error = %err, "Rejected {}", context),
            }
            SendResult::Failed(SendFailure::from_error(&err, context))
        }
    }
}
