use thiserror::Error;

use crate::attachment::AttachmentError;
use crate::provider::ProviderError;
use crate::sender::ValidationError;
use crate::template::TemplateError;

/// Everything that can stop a send request
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("No sender address provided and DEFAULT_SENDER_ADDRESS is not configured")]
    MissingSender,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Email send operation was cancelled")]
    Cancelled,

    #[error("{0}")]
    Unexpected(String),
}

impl EmailError {
    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            EmailError::MissingSender | EmailError::Validation(_) => "validation",
            EmailError::Attachment(_) => "attachment",
            EmailError::Template(_) => "template",
            EmailError::Provider(_) => "provider",
            EmailError::Cancelled => "cancelled",
            EmailError::Unexpected(_) => "unexpected",
        }
    }
}
