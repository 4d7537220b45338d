use thiserror::Error;

/// Everything that can go wrong while talking to the PlayStation Store.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Product ids look like `EP1234-ABCD00001_00-0000000000000000`.
    #[error("Invalid product ID")]
    InvalidProductId(String),

    #[error("Invalid region `{0}`")]
    InvalidRegion(String),

    #[error("Invalid URL!")]
    InvalidLink(String),

    /// The store understood the request and refused it.  Carries the store's own message.
    #[error("{0}")]
    Upstream(String),

    #[error("Unexpected storefront response: {0}")]
    UnexpectedResponse(String),

    #[error("Could not reach the storefront: {0}")]
    Transport(#[from] reqwest::Error),
}

impl StorefrontError {
    /// Whether trying the same call again later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorefrontError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_is_shown_verbatim() {
        let err = StorefrontError::Upstream("SKU_NOT_FOUND".to_string());
        assert_eq!(err.to_string(), "SKU_NOT_FOUND");
        assert!(!err.is_retryable());
    }

    #[test]
    fn validation_errors_are_terminal() {
        let err = StorefrontError::InvalidProductId("EP1234".to_string());
        assert_eq!(err.to_string(), "Invalid product ID");
        assert!(!err.is_retryable());
    }
}
