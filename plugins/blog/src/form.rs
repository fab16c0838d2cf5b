//! Dashboard form input and validation.
//!
//! Forms arrive as plain strings. Validation runs in a fixed order and stops
//! at the first failure, so the author sees one alert at a time.

use serde::Deserialize;
use wx_sdk::types::User;

use crate::error::ValidationError;
use crate::model::PostStatus;

/// An image picked in the Add-Post form, already read as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type reported for the file.
    pub mime: String,
    pub data_url: String,
}

impl ImageUpload {
    pub fn is_image(&self) -> bool {
        self.mime.trim().to_ascii_lowercase().starts_with("image/")
    }
}

/// Add-Post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    /// Category name.
    pub category: String,
    /// Comma-separated.
    pub tags: String,
    pub status: PostStatus,
}

impl PostForm {
    /// Check the form in the order the dashboard reports problems:
    /// user, category, image, title and content, image type.
    pub fn validate(
        &self,
        user: Option<&User>,
        image: Option<&ImageUpload>,
    ) -> Result<(), ValidationError> {
        if user.is_none() {
            return Err(ValidationError::NotAuthenticated);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let Some(image) = image else {
            return Err(ValidationError::MissingImage);
        };
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !image.is_image() {
            return Err(ValidationError::NotAnImage);
        }
        Ok(())
    }
}

/// Edit-Post form. Content is edited through the inline editor instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditPostForm {
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub tags: String,
    pub status: PostStatus,
    /// URL of the featured image.
    pub featured_image: String,
}

impl EditPostForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

/// Add/Edit-Category form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankCategoryName);
        }
        Ok(())
    }
}

/// Split a comma-separated tag field, trimming each tag and dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn png() -> ImageUpload {
        ImageUpload {
            file_name: "cover.png".into(),
            mime: "image/png".into(),
            data_url: "data:image/png;base64,AAAA".into(),
        }
    }

    fn filled() -> PostForm {
        PostForm {
            title: "Hello".into(),
            content: "<p>Body</p>".into(),
            category: "Tech".into(),
            ..Default::default()
        }
    }

    #[test]
    fn complete_form_is_valid() {
        let user = User::new("a@b.c");
        assert_eq!(filled().validate(Some(&user), Some(&png())), Ok(()));
    }

    #[test]
    fn user_is_checked_first() {
        let form = PostForm::default();
        assert_eq!(
            form.validate(None, None),
            Err(ValidationError::NotAuthenticated)
        );
    }

    #[test]
    fn category_is_checked_before_image_and_fields() {
        let user = User::new("a@b.c");
        let form = PostForm::default();
        assert_eq!(
            form.validate(Some(&user), None),
            Err(ValidationError::MissingCategory)
        );

        let form = PostForm {
            category: "Tech".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(Some(&user), None),
            Err(ValidationError::MissingImage)
        );
        assert_eq!(
            form.validate(Some(&user), Some(&png())),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn whitespace_title_counts_as_missing() {
        let user = User::new("a@b.c");
        let form = PostForm {
            title: "   ".into(),
            ..filled()
        };
        assert_eq!(
            form.validate(Some(&user), Some(&png())),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn non_image_upload_is_rejected() {
        let user = User::new("a@b.c");
        let pdf = ImageUpload {
            mime: "application/pdf".into(),
            ..png()
        };
        assert_eq!(
            filled().validate(Some(&user), Some(&pdf)),
            Err(ValidationError::NotAnImage)
        );
    }

    #[test]
    fn tags_are_trimmed_and_blank_ones_dropped() {
        assert_eq!(
            parse_tags(" rust , web,, ,tools "),
            vec!["rust", "web", "tools"]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn blank_category_name_is_rejected() {
        let form = CategoryForm {
            name: "  ".into(),
            description: "x".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError::BlankCategoryName));
    }

    #[test]
    fn post_form_deserializes_with_missing_fields() {
        let form: PostForm =
            serde_json::from_value(serde_json::json!({"title": "T", "status": "published"}))
                .unwrap();
        assert_eq!(form.status, PostStatus::Published);
        assert!(form.tags.is_empty());
    }
}
