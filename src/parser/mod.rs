//! Template parsing - raw YAML document to a typed `Template`

pub mod document;

use std::fs;
use std::path::PathBuf;

use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::source::TemplateSource;
use crate::template::{ParsedParams, Template};

/// Errors that can occur while loading and parsing a template document
#[derive(Debug, Error)]
pub enum ParseError {
    /// Error reading a local template file
    #[error("failed to read template file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error fetching a remote template
    #[error("failed to fetch remote template: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The document is not syntactically valid YAML
    #[error("invalid YAML in template: {0}")]
    Syntax(#[from] serde_yaml::Error),

    /// The document parses but has the wrong overall shape
    #[error("malformed template document: {reason}")]
    Structure { reason: String },

    /// A referenced type could not be resolved
    ///
    /// The underlying detail is logged, not surfaced; the caller gets a
    /// generic corrective message instead.
    #[error(
        "an error occurred while parsing the template; this might be due to a wrong type: \
         check that all the types exist and that the import section is correct"
    )]
    TypeResolution,
}

impl ParseError {
    /// Create a structure error
    pub fn structure(reason: impl Into<String>) -> Self {
        Self::Structure {
            reason: reason.into(),
        }
    }
}

/// Parse a classified source into a `Template`
///
/// Local sources are read from disk; remote sources are fetched with a
/// blocking GET. On success the template's typed views are populated but
/// node properties may still contain unresolved input references.
pub fn parse(source: &TemplateSource, params: ParsedParams) -> Result<Template, ParseError> {
    let text = load(source)?;
    parse_str(&text, params)
}

/// Parse an already-loaded document
pub fn parse_str(text: &str, params: ParsedParams) -> Result<Template, ParseError> {
    let raw: Value = serde_yaml::from_str(text)?;
    if !raw.is_mapping() {
        return Err(ParseError::structure("document root is not a mapping"));
    }

    let version = raw
        .get("tosca_definitions_version")
        .and_then(Value::as_str)
        .map(str::to_string);
    let description = raw
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let topology = raw.get("topology_template");
    let inputs = document::collect_inputs(topology);
    let node_templates = document::collect_node_templates(&raw)?;
    let outputs = document::collect_outputs(topology);

    debug!(
        "parsed template: {} node template(s), {} declared input(s)",
        node_templates.len(),
        inputs.len()
    );

    Ok(Template::new(
        version,
        description,
        inputs,
        node_templates,
        outputs,
        raw,
        params,
    ))
}

fn load(source: &TemplateSource) -> Result<String, ParseError> {
    match source {
        TemplateSource::File(path) => fs::read_to_string(path).map_err(|e| ParseError::Read {
            path: path.clone(),
            source: e,
        }),
        TemplateSource::Url(url) => {
            debug!("fetching remote template from {}", url);
            let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
            Ok(response.text()?)
        }
    }
}
