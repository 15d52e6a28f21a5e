use serde_json::{Number, Value};

/// A parsed JSON property value, classified by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Text(String),
    Number(Number),
    Bool(bool),
    Null,
    /// Arrays and objects, kept as their JSON text
    Raw(String),
}

impl From<Value> for VariableValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => VariableValue::Text(s),
            Value::Number(n) => VariableValue::Number(n),
            Value::Bool(b) => VariableValue::Bool(b),
            Value::Null => VariableValue::Null,
            other @ (Value::Array(_) | Value::Object(_)) => VariableValue::Raw(other.to_string()),
        }
    }
}

impl VariableValue {
    /// Canonical string form used for substitution.
    pub fn into_string(self) -> String {
        match self {
            VariableValue::Text(s) | VariableValue::Raw(s) => s,
            // arbitrary_precision keeps the digits as written, no f64 rounding
            VariableValue::Number(n) => n.to_string(),
            VariableValue::Bool(true) => "true".to_string(),
            VariableValue::Bool(false) => "false".to_string(),
            VariableValue::Null => String::new(),
        }
    }
}
