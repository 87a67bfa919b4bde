//! Parsed topology template model
//!
//! A `Template` owns the raw document body plus typed views over it:
//! declared inputs, ordered node templates and outputs. Caller-supplied
//! parameter overrides are carried alongside and consulted during input
//! resolution (override beats declared default, absent values stay
//! unresolved).

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

use crate::resolver;

/// Caller-supplied input overrides, keyed by input name
pub type ParsedParams = HashMap<String, Value>;

/// A declared topology input: name, optional type, optional default
///
/// Built at parse time from the document's `topology_template.inputs`
/// section; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDeclaration {
    pub name: String,
    pub type_name: Option<String>,
    pub default: Option<Value>,
    pub description: Option<String>,
}

/// A named requirement of a node template
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub name: String,
    /// Target node template name, when the requirement names one
    pub target: Option<String>,
}

/// One declared component instance within the topology graph
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    pub name: String,
    pub type_name: String,
    /// Effective properties, re-materialized after input resolution
    pub properties: Mapping,
    pub requirements: Vec<Requirement>,
}

impl NodeTemplate {
    /// Look up an effective property by name
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// The root entity: raw document body plus typed views
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub version: Option<String>,
    pub description: Option<String>,
    pub inputs: Vec<InputDeclaration>,
    pub node_templates: Vec<NodeTemplate>,
    pub outputs: Mapping,
    raw: Value,
    parsed_params: ParsedParams,
}

impl Template {
    /// Assemble a template from its parsed parts
    ///
    /// Only the parser constructs templates; everything downstream works
    /// with the assembled views.
    pub(crate) fn new(
        version: Option<String>,
        description: Option<String>,
        inputs: Vec<InputDeclaration>,
        node_templates: Vec<NodeTemplate>,
        outputs: Mapping,
        raw: Value,
        parsed_params: ParsedParams,
    ) -> Self {
        Self {
            version,
            description,
            inputs,
            node_templates,
            outputs,
            raw,
            parsed_params,
        }
    }

    /// The document body (resolved once `resolve_inputs` has run)
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The caller-supplied overrides this template was parsed with
    pub fn parsed_params(&self) -> &ParsedParams {
        &self.parsed_params
    }

    /// Find a node template by name
    pub fn node_template(&self, name: &str) -> Option<&NodeTemplate> {
        self.node_templates.iter().find(|n| n.name == name)
    }

    /// Find a declared input by name
    pub fn input(&self, name: &str) -> Option<&InputDeclaration> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Resolve the value for an input reference
    ///
    /// Precedence: parsed parameter override, then the declared default.
    /// Returns `None` when neither exists; the resolver logs and leaves
    /// the reference site unresolved in that case.
    pub fn lookup_input(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.parsed_params.get(name) {
            debug!("input '{}' resolved from parsed parameters", name);
            return Some(value.clone());
        }

        match self.input(name).and_then(|decl| decl.default.clone()) {
            Some(value) => {
                debug!("input '{}' not given, using declared default", name);
                Some(value)
            }
            None => {
                trace!("input '{}' has no override and no default", name);
                None
            }
        }
    }

    /// Substitute every `get_input` reference in the document body
    ///
    /// Produces a new resolved body via a transformation pass; the
    /// previously parsed body is replaced wholesale, never mutated in
    /// place. Unresolvable references survive unchanged.
    pub fn resolve_inputs(&mut self) {
        let resolved = resolver::resolve_get_inputs(
            &self.raw,
            &|name| self.lookup_input(name),
            &|value| !value.is_null(),
        );
        self.raw = resolved;
    }

    /// Re-materialize every node's effective properties from the body
    ///
    /// Property views are built before input resolution, so resolved
    /// values only become visible to consumers after this pass. Calling
    /// it twice without an intervening change yields identical
    /// properties.
    pub fn refresh_node_properties(&mut self) {
        let nodes = self
            .raw
            .get("topology_template")
            .and_then(|t| t.get("node_templates"))
            .cloned()
            .unwrap_or(Value::Null);

        for node in &mut self.node_templates {
            node.properties = nodes
                .get(node.name.as_str())
                .and_then(|n| n.get("properties"))
                .and_then(|p| p.as_mapping())
                .cloned()
                .unwrap_or_default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template(params: ParsedParams) -> Template {
        let raw: Value = serde_yaml::from_str(
            r#"
tosca_definitions_version: tosca_simple_yaml_1_2
topology_template:
  inputs:
    disk_size:
      type: integer
      default: 10
  node_templates:
    db_server:
      type: tosca.nodes.Compute
      properties:
        size: { get_input: disk_size }
"#,
        )
        .expect("Should parse");

        Template::new(
            Some("tosca_simple_yaml_1_2".to_string()),
            None,
            vec![InputDeclaration {
                name: "disk_size".to_string(),
                type_name: Some("integer".to_string()),
                default: Some(Value::from(10)),
                description: None,
            }],
            vec![NodeTemplate {
                name: "db_server".to_string(),
                type_name: "tosca.nodes.Compute".to_string(),
                properties: Mapping::new(),
                requirements: vec![],
            }],
            Mapping::new(),
            raw,
            params,
        )
    }

    #[test]
    fn test_lookup_prefers_override() {
        let mut params = ParsedParams::new();
        params.insert("disk_size".to_string(), Value::from(50));
        let template = sample_template(params);

        assert_eq!(template.lookup_input("disk_size"), Some(Value::from(50)));
    }

    #[test]
    fn test_lookup_falls_back_to_default() {
        let template = sample_template(ParsedParams::new());
        assert_eq!(template.lookup_input("disk_size"), Some(Value::from(10)));
    }

    #[test]
    fn test_lookup_missing_input_is_none() {
        let template = sample_template(ParsedParams::new());
        assert_eq!(template.lookup_input("no_such_input"), None);
    }

    #[test]
    fn test_resolve_then_refresh_materializes_default() {
        let mut template = sample_template(ParsedParams::new());
        template.resolve_inputs();
        template.refresh_node_properties();

        let node = template.node_template("db_server").expect("Should exist");
        assert_eq!(node.property("size"), Some(&Value::from(10)));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut template = sample_template(ParsedParams::new());
        template.resolve_inputs();
        template.refresh_node_properties();
        let first = template.node_templates.clone();

        template.refresh_node_properties();
        assert_eq!(first, template.node_templates);
    }
}
