//! Error types for xsdbind
//!
//! Two families of failures exist: errors raised while reading and parsing a
//! schema source (fatal, nothing is registered) and [`BindError`]s raised
//! while binding parsed declarations to the type model (recovered as close to
//! their origin as possible).

use std::fmt;
use thiserror::Error;

/// Result type alias using xsdbind Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdbind operations
#[derive(Error, Debug)]
pub enum Error {
    /// XML Schema parsing error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Type binding error that escaped recovery
    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure to bind a parsed schema component to the type model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// An anonymous type without any containing declaration to name it after
    #[error("unable to load type: no name found")]
    UnnamedType,

    /// A type in the XML Schema namespace with no primitive mapping
    #[error("cannot use unknown XSD type: {0}")]
    UnknownPrimitive(String),

    /// A list item type that has not been registered yet
    #[error("item type '{item}' of list '{list}' is not defined; define the item type first")]
    MissingItemType {
        /// List type name
        list: String,
        /// Item type name
        item: String,
    },

    /// An attribute of a complex type whose type could not be loaded
    #[error("cannot add type for attribute '{attribute}' of '{type_name}'")]
    AttributeTypeUnresolved {
        /// Complex type being built
        type_name: String,
        /// Attribute name
        attribute: String,
        /// Underlying failure
        #[source]
        source: Box<BindError>,
    },

    /// A content model the compiler cannot express
    #[error("unsupported content model for complex type '{0}'")]
    UnsupportedContent(String),

    /// A facet whose value cannot be interpreted
    #[error("invalid value '{value}' for facet '{facet}'")]
    InvalidFacet {
        /// Facet name
        facet: String,
        /// Raw facet value
        value: String,
    },

    /// A different type is already registered under the name
    #[error("type '{0}' is already registered")]
    TypeCollision(String),
}

impl BindError {
    /// Whether the enclosing complex type survives the failure
    ///
    /// Unrecoverable errors abort the construction of the complex type
    /// being built; the declaration using that type is skipped instead.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            BindError::AttributeTypeUnresolved { .. } | BindError::UnsupportedContent(_)
        )
    }
}

/// XML Schema parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Schema source the error was found in
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} (in {})", self.message, location),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Invalid schema syntax").with_location("note.xsd");
        assert_eq!(err.to_string(), "Invalid schema syntax (in note.xsd)");
        assert_eq!(ParseError::new("Empty document").to_string(), "Empty document");
    }

    #[test]
    fn test_bind_error_display() {
        let err = BindError::MissingItemType {
            list: "tagList".to_string(),
            item: "tag".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "item type 'tag' of list 'tagList' is not defined; define the item type first"
        );
    }

    #[test]
    fn test_attribute_error_keeps_source() {
        use std::error::Error as _;

        let err = BindError::AttributeTypeUnresolved {
            type_name: "note".to_string(),
            attribute: "lang".to_string(),
            source: Box::new(BindError::UnknownPrimitive("anyType".to_string())),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("cannot use unknown XSD type: anyType"));
    }

    #[test]
    fn test_recoverable() {
        assert!(BindError::UnnamedType.is_recoverable());
        assert!(BindError::TypeCollision("a".to_string()).is_recoverable());
        assert!(!BindError::UnsupportedContent("a".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = BindError::UnnamedType.into();
        assert!(matches!(err, Error::Bind(BindError::UnnamedType)));

        let err: Error = ParseError::new("test").into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
