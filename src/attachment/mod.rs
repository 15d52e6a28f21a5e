//! Attachment resolution.
//!
//! Descriptors point either at a file on disk or at inline base64 content.
//! The [`AttachmentResolver`] turns them into owned byte payloads while
//! enforcing per-attachment and cumulative size ceilings.

mod mime;
mod resolver;

pub use mime::{mime_type_for, OCTET_STREAM};
pub use resolver::{AttachmentLimits, AttachmentResolver, DEFAULT_MAX_ATTACHMENT_BYTES};

use serde::Deserialize;
use thiserror::Error;

/// Caller description of one attachment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDescriptor {
    /// Base64 encoded content
    #[serde(default, alias = "Content")]
    pub content: Option<String>,

    #[serde(default, alias = "FileName")]
    pub file_name: Option<String>,

    #[serde(default, alias = "MimeType")]
    pub mime_type: Option<String>,

    /// Path to a readable file; takes precedence over `content`
    #[serde(default, alias = "FilePath")]
    pub file_path: Option<String>,
}

impl AttachmentDescriptor {
    pub fn from_file(path: impl Into<String>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn inline(content: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            file_name: Some(file_name.into()),
            ..Default::default()
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// True when a file path, or both content and a file name, are present.
    pub fn has_source(&self) -> bool {
        non_empty(&self.file_path).is_some()
            || (non_empty(&self.content).is_some() && non_empty(&self.file_name).is_some())
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Decoded attachment ready to hand to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ResolvedAttachment {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Attachment resolution errors
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Attachment file not found: {0}")]
    FileNotFound(String),

    #[error("No valid attachment source provided")]
    NoSource,

    #[error("Invalid base64 format for attachment content")]
    InvalidBase64,

    #[error(
        "Attachment size ({} bytes) exceeds maximum allowed size ({} bytes)",
        group_thousands(.size),
        group_thousands(.max)
    )]
    SizeExceeded { size: u64, max: u64 },

    #[error(
        "Total attachments size ({} bytes) exceeds maximum allowed size ({} bytes)",
        group_thousands(.total),
        group_thousands(.max)
    )]
    TotalSizeExceeded { total: u64, max: u64 },

    #[error("Error reading attachment file: {0}")]
    Io(#[from] std::io::Error),
}

impl AttachmentError {
    /// Short caller-facing summary that accompanies the detailed error.
    pub fn summary(&self) -> &'static str {
        match self {
            AttachmentError::FileNotFound(_) => "Failed to send email due to missing attachment file",
            AttachmentError::NoSource => {
                "Failed to process attachment: no file path or content provided"
            }
            AttachmentError::InvalidBase64 => {
                "Failed to process attachment due to invalid base64 format"
            }
            AttachmentError::SizeExceeded { .. } => {
                "Failed to process attachment due to size limit exceeded"
            }
            AttachmentError::TotalSizeExceeded { .. } => {
                "Failed to process attachments due to total size limit exceeded"
            }
            AttachmentError::Io(_) => "Failed to process attachment due to file access error",
        }
    }
}

/// `26214400` → `26,214,400`
fn group_thousands(n: &u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
