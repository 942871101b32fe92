use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by custom decoders.
pub type DecodeError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Missing configuration file path")]
    #[diagnostic(
        code(conf::missing_path_argument),
        help("Pass the path of a JSON configuration file to load.")
    )]
    MissingPathArgument,

    #[error("Configuration file `{}` not found", .path.display())]
    #[diagnostic(code(conf::not_found))]
    NotFound { path: PathBuf },

    #[error("Configuration path `{}` is a directory", .path.display())]
    #[diagnostic(
        code(conf::is_directory),
        help("Point the loader at a regular file, not a directory.")
    )]
    IsDirectory { path: PathBuf },

    #[error("Failed to read configuration file `{}`", .path.display())]
    #[diagnostic(code(conf::read_error))]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration document: {message}")]
    #[diagnostic(
        code(conf::parse_error),
        help("The document must be a JSON object; `//` and `/* */` comments are allowed.")
    )]
    ParseError {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("Configuration node not found")]
    #[diagnostic(
        code(conf::node_not_found),
        help("The path does not exist in the document, or its value is null.")
    )]
    NodeNotFound,

    #[error("Configuration node `{segment}` is not reachable: its parent is not an object")]
    #[diagnostic(code(conf::not_an_object))]
    NotAnObject { segment: String },

    #[error("Value receiver is not a writable destination")]
    #[diagnostic(code(conf::invalid_destination))]
    InvalidDestination,

    #[error("Type mismatch: expected {expected}, found {found}")]
    #[diagnostic(
        code(conf::type_mismatch),
        help("The destination type must match the kind of the configuration value.")
    )]
    TypeMismatch { expected: String, found: String },

    #[error("Array element {index} is not an object")]
    #[diagnostic(code(conf::array_element_not_object))]
    ArrayElementNotObject { index: usize, found: String },

    #[error("Configuration node of kind {found} cannot be bound")]
    #[diagnostic(code(conf::unsupported_node_type))]
    UnsupportedNodeType { found: String },

    #[error("Custom decoder failed")]
    #[diagnostic(code(conf::custom_deserialize_failed))]
    CustomDeserializeFailed {
        #[source]
        source: DecodeError,
    },
}

impl ConfigError {
    pub(crate) fn type_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        ConfigError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
