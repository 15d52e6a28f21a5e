use std::collections::HashMap;

/// Case-insensitive mapping from input field spellings to canonical
/// template variable names.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    // keyed by lowercased alias
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: aliases
                .into_iter()
                .map(|(alias, canonical)| (alias.as_ref().to_lowercase(), canonical.into()))
                .collect(),
        }
    }

    /// Aliases understood by the `incident-outage` template
    pub fn incident() -> Self {
        Self::new([
            ("system", "SystemName"),
            ("systemName", "SystemName"),
            ("status", "Severity"),
            ("severity", "Severity"),
            ("impactLevel", "Severity"),
            ("description", "ImpactDescription"),
            ("impactDescription", "ImpactDescription"),
            ("impact", "ImpactDescription"),
            ("rootCause", "ImpactDescription"),
            ("expectedResolution", "EstimatedResolution"),
            ("estimatedResolution", "EstimatedResolution"),
            ("resolution", "EstimatedResolution"),
            ("outageDuration", "EstimatedResolution"),
            ("resolutionStatus", "NextUpdate"),
            ("contact", "ContactInfo"),
            ("contactInfo", "ContactInfo"),
            ("contactEmail", "ContactInfo"),
            ("incidentId", "IncidentId"),
            ("incident", "IncidentId"),
            ("startTime", "StartTime"),
            ("start", "StartTime"),
            ("workaround", "Workaround"),
            ("nextUpdate", "NextUpdate"),
            ("update", "NextUpdate"),
        ])
    }

    /// Canonical name registered for `name`, if any
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Canonical name for `name`, or `name` itself when no alias matches
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.resolve(name).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("impactLevel")]
    #[case("ImpactLevel")]
    #[case("IMPACTLEVEL")]
    #[case("status")]
    fn test_severity_aliases_case_insensitive(#[case] name: &str) {
        assert_eq!(AliasTable::incident().resolve(name), Some("Severity"));
    }

    #[rstest]
    #[case("system", "SystemName")]
    #[case("rootCause", "ImpactDescription")]
    #[case("outageDuration", "EstimatedResolution")]
    #[case("resolutionStatus", "NextUpdate")]
    #[case("contactEmail", "ContactInfo")]
    #[case("start", "StartTime")]
    #[case("update", "NextUpdate")]
    #[case("incident", "IncidentId")]
    #[case("SystemName", "SystemName")]
    fn test_incident_aliases(#[case] input: &str, #[case] canonical: &str) {
        assert_eq!(AliasTable::incident().canonical(input), canonical);
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let table = AliasTable::incident();
        assert_eq!(table.resolve("ticketUrl"), None);
        assert_eq!(table.canonical("ticketUrl"), "ticketUrl");
    }

    #[test]
    fn test_empty_table() {
        let table = AliasTable::default();
        assert!(table.is_empty());
        assert_eq!(table.canonical("system"), "system");
    }
}
