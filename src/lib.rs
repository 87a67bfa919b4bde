//! TOSCA topology submitter core
//!
//! This library parses TOSCA-based application topology descriptions,
//! validates them and resolves their declared inputs, producing a fully
//! resolved topology for the surrounding submission service. It also
//! ships two thin adaptor clients for reading live deployment
//! information from the container and VM orchestration backends.
//!
//! # Example
//!
//! ```rust,no_run
//! use tosca_submitter::set_template;
//!
//! let template = set_template("topology.yaml", None).unwrap();
//! for node in &template.node_templates {
//!     println!("{}: {}", node.name, node.type_name);
//! }
//! ```

pub mod adaptors;
pub mod config;
pub mod parser;
pub mod resolver;
pub mod source;
pub mod template;
pub mod validator;

pub use config::SubmitterConfig;
pub use parser::ParseError;
pub use source::{SourceError, TemplateSource};
pub use template::{InputDeclaration, NodeTemplate, ParsedParams, Template};
pub use validator::ValidationError;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur during the parse-validate-resolve pipeline
#[derive(Debug, Error)]
pub enum SubmitterError {
    /// The source is neither an existing file nor a valid URL
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The document could not be loaded or parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The document parsed but failed semantic validation
    #[error("template validation failed:\n{0}")]
    Validation(ValidationError),
}

/// Parse, validate and resolve a topology template
///
/// `source` is a local path or a URL; `parsed_params` are caller-supplied
/// input overrides taking precedence over declared defaults. On success
/// the returned template's node properties reflect every resolvable
/// input; references with neither override nor default stay unresolved
/// and are logged, never raised.
///
/// The pipeline is deterministic: the same source and the same overrides
/// produce the same resolved values every time.
pub fn set_template(
    source: &str,
    parsed_params: Option<ParsedParams>,
) -> Result<Template, SubmitterError> {
    let classified = TemplateSource::classify(source)?;
    debug!("parsing template from {}", classified);

    let mut template = parser::parse(&classified, parsed_params.unwrap_or_default())?;

    validator::validate(&template).map_err(|e| SubmitterError::Validation(e.cleaned()))?;

    template.resolve_inputs();
    template.refresh_node_properties();
    Ok(template)
}

/// Parse, validate and resolve an already-loaded document
///
/// Same pipeline as [`set_template`], minus source classification. Useful
/// when the caller has the document text in hand already.
pub fn set_template_str(
    text: &str,
    parsed_params: Option<ParsedParams>,
) -> Result<Template, SubmitterError> {
    let mut template = parser::parse_str(text, parsed_params.unwrap_or_default())?;

    validator::validate(&template).map_err(|e| SubmitterError::Validation(e.cleaned()))?;

    template.resolve_inputs();
    template.refresh_node_properties();
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    const SINGLE_NODE: &str = r#"
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
"#;

    #[test]
    fn test_pipeline_resolves_default() {
        let template = set_template_str(SINGLE_NODE, None).expect("Should parse");
        let node = template.node_template("db_server").expect("Should exist");
        assert_eq!(node.property("size"), Some(&Value::from(10)));
    }

    #[test]
    fn test_pipeline_override_beats_default() {
        let mut params = ParsedParams::new();
        params.insert("disk_size".to_string(), Value::from(50));

        let template = set_template_str(SINGLE_NODE, Some(params)).expect("Should parse");
        let node = template.node_template("db_server").expect("Should exist");
        assert_eq!(node.property("size"), Some(&Value::from(50)));
    }

    #[test]
    fn test_pipeline_source_not_found() {
        let result = set_template("not a path://??", None);
        match result {
            Err(SubmitterError::Source(e)) => assert_eq!(e.input(), "not a path://??"),
            other => panic!("Expected Source error, got {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_validation_error_is_cleaned() {
        let result = set_template_str(
            r#"
tosca_definitions_version: not_a_tosca_dialect
topology_template:
  node_templates:
    app:
      type: tosca.nodes.SoftwareComponent
"#,
            None,
        );
        match result {
            Err(SubmitterError::Validation(e)) => {
                assert!(e.message.contains("unsupported tosca_definitions_version"));
                // The double-tab detail line is stripped at the boundary
                assert!(!e.message.contains('\t'));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }
}
