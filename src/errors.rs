use strum_macros::{AsRefStr, Display};

/// Coarse classification of an [`Error`].
///
/// Transport errors come from the HTTP layer, authentication errors from a
/// login exchange that produced no usable token, and protocol errors from a
/// response that did not have the expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Authentication,
    Protocol,
    Usage,
}

/// All error types that can occur when talking to the Kasa cloud.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize a request or an inner device command.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize a response body or an inner device response.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The HTTP request could not be completed.
    #[error("{method} request failed: {source}")]
    Request {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The cloud answered with a non-success HTTP status.
    #[error("{method} returned http status {status}")]
    Status { method: String, status: u16 },

    /// The login exchange did not produce a token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The cloud reported an application-level error instead of a result.
    #[error("cloud error {code}: {message}")]
    Cloud { code: i64, message: String },

    /// The device rejected the tunneled command.
    #[error("device error {code}: {message}")]
    Device { code: i64, message: String },

    /// A response was missing a field the protocol requires.
    #[error("missing field `{field}` in {context}")]
    MissingField { context: String, field: String },

    /// A response field was present but had the wrong JSON type.
    #[error("field `{field}` in {context} has an unexpected type")]
    UnexpectedType { context: String, field: String },

    /// The client configuration could not be applied.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a new request error
    pub fn request(method: &str, source: reqwest::Error) -> Self {
        Error::Request {
            method: method.to_string(),
            source,
        }
    }

    /// Create a new http status error
    pub fn status(method: &str, status: u16) -> Self {
        Error::Status {
            method: method.to_string(),
            status,
        }
    }

    /// Create a new missing field error
    pub fn missing_field(context: &str, field: &str) -> Self {
        Error::MissingField {
            context: context.to_string(),
            field: field.to_string(),
        }
    }

    /// Create a new unexpected type error
    pub fn unexpected_type(context: &str, field: &str) -> Self {
        Error::UnexpectedType {
            context: context.to_string(),
            field: field.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Request { .. } | Error::Status { .. } => ErrorKind::Transport,
            Error::Authentication(_) => ErrorKind::Authentication,
            Error::JsonLoad(_)
            | Error::Cloud { .. }
            | Error::Device { .. }
            | Error::MissingField { .. }
            | Error::UnexpectedType { .. } => ErrorKind::Protocol,
            Error::JsonDump(_) | Error::Config(_) => ErrorKind::Usage,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    pub fn is_protocol(&self) -> bool {
        self.kind() == ErrorKind::Protocol
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
