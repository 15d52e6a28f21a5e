//! Email send endpoints.
//!
//! Every send endpoint answers 200 with a `SendResult` body; the outcome is in
//! its `Success` flag. Malformed JSON is reported the same way.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::email::{
    EmailError, SendEmailRequest, SendEmailWithAttachmentsRequest, SendFailure,
    SendIncidentEmailRequest, SendResult, SendSimpleEmailRequest, TemplateListResult,
};
use crate::server::AppState;

fn rejected(rejection: JsonRejection, context: &str) -> Json<SendResult> {
    tracing::warn!(error = %rejection.body_text(), "Rejected malformed {} request", context);
    let err = EmailError::Unexpected(rejection.body_text());
    Json(SendResult::Failed(SendFailure::from_error(&err, context)))
}

/// POST /api/v1/email/send
#[tracing::instrument(name = "http.send_email", skip_all)]
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Json<SendResult> {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => return rejected(rejection, "email"),
    };

    let cancel = state.request_token();
    Json(state.dispatcher.send_email(request, &cancel).await)
}

/// POST /api/v1/email/send-with-attachments
#[tracing::instrument(name = "http.send_email_with_attachments", skip_all)]
pub async fn send_email_with_attachments(
    State(state): State<AppState>,
    payload: Result<Json<SendEmailWithAttachmentsRequest>, JsonRejection>,
) -> Json<SendResult> {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => return rejected(rejection, "email with multiple attachments"),
    };

    let cancel = state.request_token();
    Json(state.dispatcher.send_email_with_attachments(request, &cancel).await)
}

/// POST /api/v1/email/send-simple
#[tracing::instrument(name = "http.send_simple_email", skip_all)]
pub async fn send_simple_email(
    State(state): State<AppState>,
    payload: Result<Json<SendSimpleEmailRequest>, JsonRejection>,
) -> Json<SendResult> {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => return rejected(rejection, "simple email"),
    };

    let cancel = state.request_token();
    Json(state.dispatcher.send_simple_email(request, &cancel).await)
}

/// POST /api/v1/email/send-incident
#[tracing::instrument(name = "http.send_incident_email", skip_all)]
pub async fn send_incident_email(
    State(state): State<AppState>,
    payload: Result<Json<SendIncidentEmailRequest>, JsonRejection>,
) -> Json<SendResult> {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => return rejected(rejection, "incident email"),
    };

    let cancel = state.request_token();
    Json(state.dispatcher.send_incident_email(request, &cancel).await)
}

/// GET /api/v1/email/templates
#[tracing::instrument(name = "http.list_email_templates", skip(state))]
pub async fn list_email_templates(State(state): State<AppState>) -> Json<TemplateListResult> {
    Json(state.dispatcher.list_templates())
}
