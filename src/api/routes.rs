use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::email::{
    list_email_templates, send_email, send_email_with_attachments, send_incident_email,
    send_simple_email,
};
use super::health::{health, ready};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & readiness
        .route("/api/healthz", get(health))
        .route("/api/ready", get(ready))
        // Email endpoints
        .nest(
            "/api/v1/email",
            Router::new()
                .route("/send", post(send_email))
                .route("/send-with-attachments", post(send_email_with_attachments))
                .route("/send-simple", post(send_simple_email))
                .route("/send-incident", post(send_incident_email))
                .route("/templates", get(list_email_templates)),
        )
}
