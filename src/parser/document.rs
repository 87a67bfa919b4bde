//! Typed views over the raw document body
//!
//! The raw body stays an immutable `serde_yaml::Value`; these helpers
//! extract the sections the rest of the pipeline works with and perform
//! node type resolution against the built-in TOSCA namespace and any
//! document-local type definitions.

use serde_yaml::{Mapping, Value};
use tracing::error;

use crate::template::{InputDeclaration, NodeTemplate, Requirement};

use super::ParseError;

/// Node type namespaces shipped with the TOSCA simple profile
const BUILTIN_TYPE_PREFIXES: &[&str] = &[
    "tosca.nodes.",
    "tosca.relationships.",
    "tosca.capabilities.",
    "tosca.datatypes.",
    "tosca.artifacts.",
    "tosca.interfaces.",
    "tosca.policies.",
    "tosca.groups.",
];

/// Collect declared inputs from `topology_template.inputs`
pub(crate) fn collect_inputs(topology: Option<&Value>) -> Vec<InputDeclaration> {
    let inputs = match topology
        .and_then(|t| t.get("inputs"))
        .and_then(Value::as_mapping)
    {
        Some(mapping) => mapping,
        None => return Vec::new(),
    };

    inputs
        .iter()
        .filter_map(|(name, decl)| {
            let name = name.as_str()?.to_string();
            Some(InputDeclaration {
                name,
                type_name: decl.get("type").and_then(Value::as_str).map(str::to_string),
                default: decl.get("default").cloned(),
                description: decl
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect()
}

/// Collect node templates in document order, resolving their types
///
/// A node whose type is neither built-in, declared in the document's
/// `node_types` section, nor covered by an import is a type resolution
/// failure: the detail is logged here and a generic error is returned.
/// Nodes with a missing or non-string `type` are tolerated; the validator
/// reports those with a proper diagnostic.
pub(crate) fn collect_node_templates(raw: &Value) -> Result<Vec<NodeTemplate>, ParseError> {
    let nodes = match raw
        .get("topology_template")
        .and_then(|t| t.get("node_templates"))
        .and_then(Value::as_mapping)
    {
        Some(mapping) => mapping,
        None => return Ok(Vec::new()),
    };

    let mut collected = Vec::with_capacity(nodes.len());
    for (name, node) in nodes {
        let name = match name.as_str() {
            Some(n) => n.to_string(),
            None => continue,
        };
        let type_name = node
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if !type_name.is_empty() && !type_is_known(&type_name, raw) {
            error!(
                "cannot resolve type '{}' for node template '{}'; \
                 not a built-in type and not declared in the document",
                type_name, name
            );
            return Err(ParseError::TypeResolution);
        }

        collected.push(NodeTemplate {
            name,
            type_name,
            properties: node
                .get("properties")
                .and_then(Value::as_mapping)
                .cloned()
                .unwrap_or_default(),
            requirements: collect_requirements(node),
        });
    }

    Ok(collected)
}

/// Collect the `topology_template.outputs` mapping
pub(crate) fn collect_outputs(topology: Option<&Value>) -> Mapping {
    topology
        .and_then(|t| t.get("outputs"))
        .and_then(Value::as_mapping)
        .cloned()
        .unwrap_or_default()
}

/// Requirements are a sequence of single-entry mappings; the target is
/// either a bare node name or a mapping with a `node` key.
fn collect_requirements(node: &Value) -> Vec<Requirement> {
    let entries = match node.get("requirements").and_then(Value::as_sequence) {
        Some(seq) => seq,
        None => return Vec::new(),
    };

    let mut requirements = Vec::new();
    for entry in entries {
        let mapping = match entry.as_mapping() {
            Some(m) => m,
            None => continue,
        };
        for (req_name, req_value) in mapping {
            let req_name = match req_name.as_str() {
                Some(n) => n.to_string(),
                None => continue,
            };
            let target = match req_value {
                Value::String(target) => Some(target.clone()),
                other => other
                    .get("node")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            };
            requirements.push(Requirement {
                name: req_name,
                target,
            });
        }
    }
    requirements
}

fn type_is_known(type_name: &str, raw: &Value) -> bool {
    if BUILTIN_TYPE_PREFIXES
        .iter()
        .any(|prefix| type_name.starts_with(prefix))
    {
        return true;
    }

    if raw
        .get("node_types")
        .and_then(Value::as_mapping)
        .map_or(false, |types| types.contains_key(type_name))
    {
        return true;
    }

    // Imported definitions are not fetched at parse time; a document that
    // declares imports gets the benefit of the doubt for its type names.
    raw.get("imports")
        .and_then(Value::as_sequence)
        .map_or(false, |imports| !imports.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).expect("Should parse")
    }

    #[test]
    fn test_collect_requirements_bare_and_mapping_targets() {
        let node = yaml(
            r#"
type: tosca.nodes.SoftwareComponent
requirements:
  - host: db_server
  - dependency:
      node: cache
      relationship: tosca.relationships.DependsOn
"#,
        );
        let reqs = collect_requirements(&node);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].name, "host");
        assert_eq!(reqs[0].target.as_deref(), Some("db_server"));
        assert_eq!(reqs[1].name, "dependency");
        assert_eq!(reqs[1].target.as_deref(), Some("cache"));
    }

    #[test]
    fn test_collect_requirements_absent() {
        let node = yaml("type: tosca.nodes.Compute");
        assert!(collect_requirements(&node).is_empty());
    }

    #[test]
    fn test_builtin_type_is_known() {
        let raw = yaml("{}");
        assert!(type_is_known("tosca.nodes.Compute", &raw));
        assert!(!type_is_known("vendor.nodes.Runtime", &raw));
    }

    #[test]
    fn test_document_local_type_is_known() {
        let raw = yaml(
            r#"
node_types:
  vendor.nodes.Runtime:
    derived_from: tosca.nodes.SoftwareComponent
"#,
        );
        assert!(type_is_known("vendor.nodes.Runtime", &raw));
    }

    #[test]
    fn test_outputs_collected() {
        let topology = yaml(
            r#"
outputs:
  ip:
    value: { get_attribute: [server, ip_address] }
"#,
        );
        let outputs = collect_outputs(Some(&topology));
        assert_eq!(outputs.len(), 1);
        assert!(outputs.contains_key("ip"));
    }
}
