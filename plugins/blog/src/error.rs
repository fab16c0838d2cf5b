//! Blog error types.

use thiserror::Error;
use wx_sdk::HostError;

/// A command was rejected before anything changed.
///
/// The display strings are the alerts shown to the author.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("You must be signed in to create a post.")]
    NotAuthenticated,

    #[error("Please select a category")]
    MissingCategory,

    #[error("Please select an image")]
    MissingImage,

    #[error("Please select an image file")]
    NotAnImage,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("A category with this name already exists.")]
    DuplicateCategory,

    #[error("Please enter a category name")]
    BlankCategoryName,

    #[error("The Uncategorized category cannot be renamed.")]
    UncategorizedRename,

    #[error("Posts per page must be at least 1")]
    InvalidPostsPerPage,

    #[error("Unknown default category '{0}'")]
    UnknownDefaultCategory(String),
}

/// Errors returned by blog commands.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("post not found: {0}")]
    PostNotFound(String),

    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("You cannot delete the default category.")]
    DefaultCategoryProtected,

    #[error("The Uncategorized category cannot be deleted.")]
    UncategorizedProtected,

    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl BlogError {
    /// Whether the error is the author's to fix, as opposed to a host fault.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Host(_))
    }
}

impl From<serde_json::Error> for BlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Host(HostError::Serialization(err))
    }
}

/// Result alias for blog commands.
pub type BlogResult<T> = Result<T, BlogError>;

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_form_alerts() {
        assert_eq!(
            ValidationError::MissingCategory.to_string(),
            "Please select a category"
        );
        assert_eq!(
            ValidationError::DuplicateCategory.to_string(),
            "A category with this name already exists."
        );
    }

    #[test]
    fn validation_passes_through_transparently() {
        let err: BlogError = ValidationError::MissingFields.into();
        assert_eq!(err.to_string(), "Please fill in all fields");
        assert!(err.is_user_facing());
    }

    #[test]
    fn host_errors_are_not_user_facing() {
        let err: BlogError = HostError::Storage("disk full".into()).into();
        assert!(!err.is_user_facing());
    }
}
