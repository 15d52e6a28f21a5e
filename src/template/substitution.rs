//! Placeholder substitution engine for templates

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::types::VariableMap;

lazy_static! {
    /// `{{Name}}` where Name is ASCII letters, digits or underscore.
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid");
}

/// Substitute `{{key}}` placeholders in `template` with values from `variables`.
///
/// The scan is a single pass over the template text, so a substituted value is
/// never rescanned even when it contains `{{...}}` itself. Placeholders with no
/// entry in `variables` are kept verbatim.
pub fn render(template: &str, variables: &VariableMap) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of the placeholders referenced in `text`, in order of appearance.
/// Repeated names are reported once.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
