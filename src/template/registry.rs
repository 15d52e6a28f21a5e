//! Immutable template catalogue

use std::collections::BTreeMap;
use std::sync::Arc;

use super::types::{Template, TemplateError, TemplateResult, TemplateSummary};

/// Name of the built-in incident notification template
pub const INCIDENT_OUTAGE: &str = "incident-outage";

/// Name of the built-in onboarding template
pub const WELCOME: &str = "welcome";

/// Read-only catalogue of named templates.
///
/// Built once at startup and shared behind an `Arc`; there is no mutation API.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Arc<Template>>,
}

impl TemplateRegistry {
    /// Build a registry from an explicit set of templates
    pub fn from_templates<I>(templates: I) -> Self
    where
        I: IntoIterator<Item = (String, Template)>,
    {
        Self {
            templates: templates
                .into_iter()
                .map(|(name, template)| (name, Arc::new(template)))
                .collect(),
        }
    }

    /// The fixed built-in catalogue
    pub fn builtin() -> Self {
        Self::from_templates([
            (INCIDENT_OUTAGE.to_string(), incident_outage()),
            (WELCOME.to_string(), welcome()),
        ])
    }

    /// Look up a template by its case-sensitive name
    pub fn get(&self, name: &str) -> TemplateResult<Arc<Template>> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Registered template names, in name order
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Describe every template: subject, referenced placeholders and defaults
    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.templates
            .iter()
            .map(|(name, template)| TemplateSummary {
                name: name.clone(),
                subject: template.subject.clone(),
                required_variables: template.required_variables(),
                default_values: template.default_values.clone(),
            })
            .collect()
    }
}

fn incident_outage() -> Template {
    Template::new(
        "URGENT: IT Systems Outage - {{SystemName}} Affected",
        concat!(
            "<html><body><h2>URGENT: IT Systems Outage</h2>",
            "<p><strong>System Affected:</strong> {{SystemName}}</p>",
            "<p><strong>Incident ID:</strong> {{IncidentId}}</p>",
            "<p><strong>Severity:</strong> {{Severity}}</p>",
            "<p><strong>Start Time:</strong> {{StartTime}}</p>",
            "<p><strong>Estimated Resolution:</strong> {{EstimatedResolution}}</p>",
            "<h3>Impact Description:</h3><p>{{ImpactDescription}}</p>",
            "<h3>Workaround:</h3><p>{{Workaround}}</p>",
            "<h3>Next Update:</h3><p>{{NextUpdate}}</p>",
            "<hr><p><em>Automated notification</em></p>",
            "<p>{{ContactInfo}}</p></body></html>",
        ),
        concat!(
            "URGENT: IT Systems Outage\n",
            "System Affected: {{SystemName}}\n",
            "Incident ID: {{IncidentId}}\n",
            "Severity: {{Severity}}\n",
            "Start Time: {{StartTime}}\n",
            "Estimated Resolution: {{EstimatedResolution}}\n",
            "Impact Description:\n{{ImpactDescription}}\n",
            "Workaround:\n{{Workaround}}\n",
            "Next Update:\n{{NextUpdate}}\n",
            "Contact: {{ContactInfo}}",
        ),
        &[
            ("Severity", "High"),
            ("Workaround", "No workaround available at this time."),
            ("NextUpdate", "Update in 30 minutes."),
            ("ContactInfo", "support@example.com"),
        ],
    )
}

fn welcome() -> Template {
    Template::new(
        "Welcome to {{CompanyName}}, {{UserName}}!",
        concat!(
            "<html><body><h2>Welcome to {{CompanyName}}!</h2>",
            "<p>Hello {{UserName}}</p>",
            "<p>Start Date: {{StartDate}}</p>",
            "<p>Department: {{Department}}</p>",
            "<p>{{NextSteps}}</p></body></html>",
        ),
        "Welcome to {{CompanyName}}! Hello {{UserName}}. Start Date: {{StartDate}} Department: {{Department}} Next Steps: {{NextSteps}}",
        &[("NextSteps", "Please review the onboarding guide.")],
    )
}
