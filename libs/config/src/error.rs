//! Errors raised while turning a serialized client document into a
//! [`ClientConfig`](crate::ClientConfig).

use thiserror::Error;

/// The override document could not be turned into a client configuration.
///
/// Never recovered from locally: a document that was supplied but is unusable
/// must not be replaced by the defaults.
#[derive(Debug, Error)]
pub enum ConfigParseError {
    /// The document is not well-formed XML.
    #[error("client config is not well-formed xml: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document root is not the client configuration element.
    #[error("unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        /// root element name found in the document
        found: String,
        /// root element name required
        expected: &'static str,
    },

    /// A typed element holds a value that doesn't parse.
    #[error("invalid value {value:?} for <{element}>: {reason}")]
    InvalidValue {
        /// element name
        element: &'static str,
        /// raw text of the element
        value: String,
        /// parser message
        reason: String,
    },

    /// A `<property>` element has no `name` attribute.
    #[error("<property> #{0} is missing the name attribute")]
    UnnamedProperty(usize),
}
