//! Email send operations.
//!
//! [`EmailDispatcher`] implements the four public operations on top of the
//! template, variable, sender, attachment and provider modules. Results are
//! always returned as [`SendResult`] values; no failure escapes as an error.

mod dispatcher;
mod error;
mod request;
mod result;

pub use dispatcher::EmailDispatcher;
pub use error::EmailError;
pub use request::{
    InlineAttachment, SendEmailRequest, SendEmailWithAttachmentsRequest, SendIncidentEmailRequest,
    SendSimpleEmailRequest,
};
pub use result::{
    format_provider_error, SendFailure, SendResult, SendSuccess, TemplateListResult,
    TROUBLESHOOTING_URL,
};
