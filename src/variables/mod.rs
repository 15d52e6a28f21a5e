//! Caller-supplied template variables.
//!
//! Turns a loosely-shaped JSON object into a [`VariableMap`] keyed by the
//! template's canonical variable names:
//! 1. every JSON value is coerced to a string ([`VariableValue`])
//! 2. property names are resolved through a case-insensitive [`AliasTable`]
//! 3. template defaults fill whatever is still missing
//!
//! [`VariableMap`]: crate::template::VariableMap

mod alias;
mod normalize;
mod value;

pub use alias::AliasTable;
pub use normalize::{normalize_object, normalize_variables, parse_variables};
pub use value::VariableValue;
