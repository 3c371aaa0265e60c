use thiserror::Error;

#[derive(Error, Debug)]
pub enum VkMatchError {
    /// The upstream API could not be reached or answered with a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    /// The upstream API answered with an error envelope
    #[error("VK API error {code}: {message}")]
    Protocol { code: i64, message: String },

    /// Locally detected malformed data
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for VkMatchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<config::ConfigError> for VkMatchError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VkMatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let error = VkMatchError::Protocol {
            code: 5,
            message: "User authorization failed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "VK API error 5: User authorization failed"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: VkMatchError = io_err.into();
        assert!(matches!(err, VkMatchError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{invalid json}");
        if let Err(json_err) = parse_result {
            let err: VkMatchError = json_err.into();
            assert!(matches!(err, VkMatchError::Serialization(_)));
        }
    }

    #[test]
    fn test_validation_error_message() {
        let error = VkMatchError::Validation("bad bdate".to_string());
        assert!(error.to_string().contains("bad bdate"));
    }
}
