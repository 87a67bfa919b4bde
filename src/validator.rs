//! Semantic validation of parsed templates
//!
//! Runs once per parse, after the typed views are built and before input
//! resolution. All failing checks are collected into a single multi-line
//! diagnostic rather than stopping at the first. Checks append indented
//! context lines prefixed with a double tab; those are internal detail
//! and the pipeline strips them before the error reaches the caller.

use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::template::Template;

/// Marker prefix for internal diagnostic lines
const NOISE_PREFIX: &str = "\t\t";

/// A failed validation: human-readable, possibly multi-line
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    /// A copy of this error with internal noise lines stripped
    ///
    /// Drops every line carrying the double-tab marker, keeping the
    /// user-facing diagnostic lines intact.
    pub fn cleaned(&self) -> Self {
        let message = self
            .message
            .lines()
            .filter(|line| !line.starts_with(NOISE_PREFIX))
            .collect::<Vec<_>>()
            .join("\n");
        Self { message }
    }
}

/// Validate a parsed template
///
/// Absence of failure is success; the first class of failure detected is
/// raised with every offending site listed.
pub fn validate(template: &Template) -> Result<(), ValidationError> {
    let mut failures: Vec<String> = Vec::new();

    check_version(template, &mut failures);
    check_topology(template, &mut failures);
    check_node_types(template, &mut failures);
    check_requirements(template, &mut failures);
    check_outputs(template, &mut failures);

    if failures.is_empty() {
        debug!("template passed validation");
        Ok(())
    } else {
        Err(ValidationError {
            message: failures.join("\n"),
        })
    }
}

fn check_version(template: &Template, failures: &mut Vec<String>) {
    match template.version.as_deref() {
        None => failures.push("missing tosca_definitions_version".to_string()),
        Some(version)
            if !version.starts_with("tosca_simple_yaml")
                && !version.starts_with("tosca_simple_profile") =>
        {
            failures.push(format!(
                "unsupported tosca_definitions_version\n{}found: {}",
                NOISE_PREFIX, version
            ));
        }
        Some(_) => {}
    }
}

fn check_topology(template: &Template, failures: &mut Vec<String>) {
    if template.raw().get("topology_template").is_none() {
        failures.push("missing topology_template section".to_string());
        return;
    }
    if template.node_templates.is_empty() {
        failures.push("topology_template contains no node templates".to_string());
    }
}

fn check_node_types(template: &Template, failures: &mut Vec<String>) {
    for node in &template.node_templates {
        if node.type_name.is_empty() {
            failures.push(format!(
                "node template '{}' does not declare a type",
                node.name
            ));
        }
    }
}

fn check_requirements(template: &Template, failures: &mut Vec<String>) {
    for node in &template.node_templates {
        for requirement in &node.requirements {
            let target = match &requirement.target {
                Some(target) => target,
                None => continue,
            };
            if template.node_template(target).is_none() {
                failures.push(format!(
                    "requirement '{}' of node template '{}' targets unknown node '{}'\n\
                     {}declared targets must name a node template in this topology",
                    requirement.name, node.name, target, NOISE_PREFIX
                ));
            }
        }
    }
}

fn check_outputs(template: &Template, failures: &mut Vec<String>) {
    for (name, output) in &template.outputs {
        let name = name.as_str().unwrap_or("<non-string>");
        let referenced = output
            .get("value")
            .map(collect_node_references)
            .unwrap_or_default();
        for node in referenced {
            if template.node_template(&node).is_none() {
                failures.push(format!(
                    "output '{}' references unknown node template '{}'",
                    name, node
                ));
            }
        }
    }
}

/// Node names referenced by `get_attribute`/`get_property` calls
fn collect_node_references(value: &Value) -> Vec<String> {
    let mut nodes = Vec::new();
    walk_node_references(value, &mut nodes);
    nodes
}

fn walk_node_references(value: &Value, nodes: &mut Vec<String>) {
    match value {
        Value::Mapping(mapping) => {
            for (key, inner) in mapping {
                let is_reference = matches!(
                    key.as_str(),
                    Some("get_attribute") | Some("get_property")
                );
                if is_reference {
                    if let Some(node) = inner
                        .as_sequence()
                        .and_then(|args| args.first())
                        .and_then(Value::as_str)
                    {
                        nodes.push(node.to_string());
                    }
                } else {
                    walk_node_references(inner, nodes);
                }
            }
        }
        Value::Sequence(items) => {
            for item in items {
                walk_node_references(item, nodes);
            }
        }
        _ => {}
    }
}
