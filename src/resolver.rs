//! Input reference resolution
//!
//! Walks a parsed document body and substitutes `get_input` placeholders
//! with concrete values supplied by a lookup callback. The walk is a pure
//! transformation pass: it builds a new body and never mutates the input,
//! so no two consumers can end up sharing a rewritten sub-structure.

use serde_yaml::{Mapping, Value};
use tracing::trace;

/// Value lookup callback: input name to concrete value, if any
pub type Lookup<'a> = dyn Fn(&str) -> Option<Value> + 'a;

/// Satisfaction predicate: decides whether a resolved value counts
pub type Satisfied<'a> = dyn Fn(&Value) -> bool + 'a;

/// The key marking an input reference site
const GET_INPUT: &str = "get_input";

/// Substitute every reachable `get_input` site in `body`
///
/// Each site is visited exactly once, in document order, so the result is
/// deterministic for a fixed body and lookup. A site whose lookup returns
/// no value (or a value the predicate rejects) is logged at trace level
/// and carried over unresolved; resolution never aborts the pass.
pub fn resolve_get_inputs(body: &Value, lookup: &Lookup, satisfied: &Satisfied) -> Value {
    match body {
        Value::Mapping(mapping) => {
            if let Some(name) = input_reference(mapping) {
                match lookup(name) {
                    Some(value) if satisfied(&value) => return value,
                    _ => {
                        trace!("input reference '{}' left unresolved", name);
                        return body.clone();
                    }
                }
            }

            let mut resolved = Mapping::new();
            for (key, value) in mapping {
                resolved.insert(key.clone(), resolve_get_inputs(value, lookup, satisfied));
            }
            Value::Mapping(resolved)
        }
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| resolve_get_inputs(item, lookup, satisfied))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Extract the referenced input name if this mapping is a reference site
///
/// A site is a single-entry mapping `{get_input: name}`. The list form
/// `{get_input: [name, ...]}` names the input in its first element.
fn input_reference(mapping: &Mapping) -> Option<&str> {
    if mapping.len() != 1 {
        return None;
    }
    let value = mapping.get(GET_INPUT)?;
    match value {
        Value::String(name) => Some(name.as_str()),
        Value::Sequence(args) => args.first().and_then(Value::as_str),
        _ => None,
    }
}
