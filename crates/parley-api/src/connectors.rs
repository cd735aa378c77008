use anyhow::Result;
use serde::Serialize;

/// External-capability identifier passed opaquely to the model service,
/// plus display metadata for catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorDefinition {
    pub id: String,
    pub label: String,
    pub description: String,
}

/// Parse a `id|Label|Description;...` catalog specification.
pub fn parse_connectors(spec: &str) -> Result<Vec<ConnectorDefinition>> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }

    spec.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut segments = entry.split('|').map(str::trim);
            let id = segments.next().unwrap_or_default();
            if id.is_empty() {
                anyhow::bail!(
                    "Invalid connector entry \"{}\". Expected format id|Label|Description",
                    entry
                );
            }
            let label = segments.next().filter(|s| !s.is_empty()).unwrap_or(id);
            let description = segments
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("Custom connector");
            Ok(ConnectorDefinition {
                id: id.to_string(),
                label: label.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}
