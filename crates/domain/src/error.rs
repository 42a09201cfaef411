/// Shared error type used across all telebridge crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The backend answered, but with an error status or an unusable body.
    #[error("backend {endpoint}: {message}")]
    Backend { endpoint: String, message: String },

    /// The identifier does not decode to anything this bridge serves.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The identifier decoded fine but the backend has no such entity.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// A command argument literal failed local validation.
    #[error("invalid argument `{argument}`: {message}")]
    Validation { argument: String, message: String },

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for the "object not found" family the host renders as a
    /// missing object rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::EntityNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_family() {
        assert!(Error::NotFound("x".into()).is_not_found());
        assert!(Error::EntityNotFound("rover-9".into()).is_not_found());
        assert!(!Error::Http("refused".into()).is_not_found());
    }

    #[test]
    fn validation_message_names_argument() {
        let e = Error::Validation {
            argument: "target".into(),
            message: "expected [x, y, z]".into(),
        };
        assert_eq!(e.to_string(), "invalid argument `target`: expected [x, y, z]");
    }
}
