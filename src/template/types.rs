//! Template domain types

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;

/// Canonical variable name to rendered string value.
pub type VariableMap = HashMap<String, String>;

/// Template-specific error type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid JSON: {0}")]
    InvalidVariables(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// An email template definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Subject line with placeholders
    pub subject: String,

    /// HTML body with placeholders
    pub html_body: String,

    /// Plain-text body with placeholders
    pub plain_text_body: String,

    /// Values used for variables the caller did not supply
    pub default_values: BTreeMap<String, String>,
}

impl Template {
    pub(crate) fn new(
        subject: &str,
        html_body: &str,
        plain_text_body: &str,
        defaults: &[(&str, &str)],
    ) -> Self {
        Self {
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            plain_text_body: plain_text_body.to_string(),
            default_values: defaults
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Placeholder names referenced anywhere in the template, in order of
    /// first appearance across subject, HTML body and plain-text body.
    pub fn required_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for text in [&self.subject, &self.html_body, &self.plain_text_body] {
            for name in super::extract_placeholders(text) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// Template description returned by the listing operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateSummary {
    pub name: String,
    pub subject: String,
    pub required_variables: Vec<String>,
    pub default_values: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_variables_deduplicated_in_order() {
        let template = Template::new(
            "Hi {{Name}}",
            "<p>{{Name}} from {{Team}}</p>",
            "{{Team}} / {{Footer}}",
            &[],
        );

        assert_eq!(template.required_variables(), vec!["Name", "Team", "Footer"]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TemplateError::NotFound("nope".to_string()).to_string(),
            "Template not found: nope"
        );
        assert_eq!(
            TemplateError::InvalidVariables("EOF while parsing".to_string()).to_string(),
            "Invalid JSON: EOF while parsing"
        );
    }
}
