//! JSON object → canonical variable map

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::template::{TemplateError, TemplateResult, VariableMap};

use super::alias::AliasTable;
use super::value::VariableValue;

/// Parse caller-supplied variables; anything other than a JSON object is rejected.
pub fn parse_variables(raw: &str) -> TemplateResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(TemplateError::InvalidVariables(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(TemplateError::InvalidVariables(e.to_string())),
    }
}

/// Parse `raw` and normalize it; a parse failure yields no partial map.
pub fn normalize_variables(
    raw: &str,
    aliases: &AliasTable,
    defaults: &BTreeMap<String, String>,
) -> TemplateResult<VariableMap> {
    let object = parse_variables(raw)?;
    Ok(normalize_object(object, aliases, defaults))
}

/// Coerce, alias and default-fill an already parsed object.
///
/// Properties are applied in input order, so when two spellings alias to the
/// same canonical name the later one wins. Defaults only fill names that are
/// still absent; an explicit `""` counts as present.
pub fn normalize_object(
    object: Map<String, Value>,
    aliases: &AliasTable,
    defaults: &BTreeMap<String, String>,
) -> VariableMap {
    let mut variables = VariableMap::with_capacity(object.len() + defaults.len());

    for (name, value) in object {
        let key = aliases.canonical(&name).to_string();
        let value = VariableValue::from(value).into_string();
        if variables.insert(key.clone(), value).is_some() {
            tracing::debug!(input = %name, variable = %key, "Variable supplied more than once, keeping the later value");
        }
    }

    for (key, default) in defaults {
        variables
            .entry(key.clone())
            .or_insert_with(|| default.clone());
    }

    variables
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
