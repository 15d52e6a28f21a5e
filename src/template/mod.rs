//! Email template system.
//!
//! This module provides:
//! - Template definition with `{{Name}}` placeholders
//! - An immutable registry holding the built-in catalogue
//! - A single-pass substitution engine for rendering template text
//!
//! # Example
//!
//! ```ignore
//! let registry = TemplateRegistry::builtin();
//! let template = registry.get("welcome")?;
//!
//! let mut variables = VariableMap::new();
//! variables.insert("CompanyName".to_string(), "Contoso".to_string());
//!
//! let subject = render(&template.subject, &variables);
//! ```

mod registry;
mod substitution;
mod types;

pub use registry::{TemplateRegistry, INCIDENT_OUTAGE, WELCOME};
pub use substitution::{extract_placeholders, render};
pub use types::{Template, TemplateError, TemplateResult, TemplateSummary, VariableMap};
