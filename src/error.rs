use thiserror::Error;

/// Outcome taxonomy shared by every catalog operation.
///
/// `Storage` and `ExternalService` wrap the `anyhow` errors produced by the
/// store and metadata collaborators; their context chain is kept in the
/// message.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("External service error: {0:#}")]
    ExternalService(anyhow::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_storage_error_keeps_context_chain() {
        let source: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
        let err = source.context("Failed to list songs").unwrap_err();

        let message = CatalogError::Storage(err).to_string();
        assert_eq!(message, "Storage error: Failed to list songs: connection refused");
    }

    #[test]
    fn test_validation_and_not_found_display_message_only() {
        assert_eq!(
            CatalogError::validation("Invalid page number").to_string(),
            "Invalid page number"
        );
        assert_eq!(
            CatalogError::not_found("Song not found").to_string(),
            "Song not found"
        );
    }
}
