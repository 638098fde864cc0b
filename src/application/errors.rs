//! Application layer errors
//!
//! The `Display` text of every variant is the error string handed back to the
//! host; it carries no structured code.

use thiserror::Error;

/// Errors surfaced by endpoint operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EndpointError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A required secret could not be resolved at call time
    #[error("{0}")]
    NotConfigured(String),

    /// Network, timeout or non-success status from the remote call
    #[error("{0}")]
    Transport(String),

    /// Trigger payload rejected before any remote call
    #[error("{0}")]
    InvalidPayload(String),

    #[error("{0}")]
    Execution(String),

    /// Structural mutation of the synthetic tree
    #[error("{0} not supported")]
    Unsupported(&'static str),

    #[error("unsupported path: {0}")]
    NoSuchPath(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("read not supported on {0}")]
    NotReadable(String),

    #[error("write not supported on {0}")]
    NotWritable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for endpoint operations
pub type EndpointResult<T> = Result<T, EndpointError>;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Plugin config document is not valid JSON
    #[error("invalid config json: {0}")]
    Malformed(String),

    /// Harness config file could not be read or parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Harness console errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command: {0} (try help)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Endpoint(#[from] EndpointError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message() {
        assert_eq!(EndpointError::Unsupported("mkdir").to_string(), "mkdir not supported");
        assert_eq!(EndpointError::Unsupported("removeall").to_string(), "removeall not supported");
    }

    #[test]
    fn test_config_error_wraps_verbatim() {
        let err: EndpointError = ConfigError::Malformed("EOF while parsing".into()).into();
        assert_eq!(err.to_string(), "invalid config json: EOF while parsing");
    }
}
