//! API layer - HTTP endpoint handlers organized by domain.

mod email;
mod health;
mod routes;

pub use email::{
    list_email_templates, send_email, send_email_with_attachments, send_incident_email,
    send_simple_email,
};
pub use health::{health, ready};
pub use routes::api_routes;
