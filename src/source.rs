//! Template source classification - local file or remote URL

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};
use url::Url;

/// Errors that can occur while classifying a template source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input is neither an existing local file nor a well-formed URL
    #[error("cannot find template source '{input}': {reason}")]
    NotFound { input: String, reason: String },
}

impl SourceError {
    /// Create a not-found error for the given input
    pub fn not_found(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// The original input string the caller supplied
    pub fn input(&self) -> &str {
        match self {
            Self::NotFound { input, .. } => input,
        }
    }
}

/// A classified template source
///
/// Classification is purely syntactic: an existing local file wins, a
/// well-formed absolute URL comes second, anything else fails. No network
/// access happens here; fetching a remote source is the parser's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// An existing local file
    File(PathBuf),
    /// A syntactically valid remote URL
    Url(Url),
}

impl TemplateSource {
    /// Classify a path-or-URL string
    pub fn classify(input: &str) -> Result<Self, SourceError> {
        if Path::new(input).is_file() {
            debug!("template source '{}' is a local file", input);
            return Ok(Self::File(PathBuf::from(input)));
        }

        debug!("checking whether '{}' is a valid url", input);
        match Url::parse(input) {
            Ok(url) if url.has_host() => Ok(Self::Url(url)),
            Ok(url) => {
                error!("template source '{}' is not reachable", input);
                Err(SourceError::not_found(
                    input,
                    format!("url '{}' has no host", url),
                ))
            }
            Err(e) => {
                error!("template source '{}' does not exist and is not a url", input);
                Err(SourceError::not_found(input, e.to_string()))
            }
        }
    }

    /// True if this source designates a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}
