//! Blog data model.
//!
//! Everything here is stored in the host's key-value store under a single
//! namespace, so field names follow the builder's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults;

/// Slug of the category posts fall back to when theirs is deleted.
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

/// Name used when no category with [`UNCATEGORIZED_SLUG`] exists.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Publication status of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] = [Self::Draft, Self::Published, Self::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// `post_<title>_<unix millis>` at creation time.
    pub id: String,
    pub title: String,
    /// Raw HTML.
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    pub author: String,
    /// Category *name* (not id).
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub featured_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Derived from the title; not unique across posts.
    pub slug: String,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Whether the post was edited after it was created.
    pub fn was_updated(&self) -> bool {
        self.updated_at > self.created_at
    }

    /// Site-relative path of the page registered for this post.
    pub fn page_path(&self) -> String {
        format!("blog/{}", self.slug)
    }
}

/// A blog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogCategory {
    pub id: String,
    /// Unique, compared case-insensitively.
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Plugin-wide settings, edited through the Settings tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSettings {
    pub enable_comments: bool,
    pub moderate_comments: bool,
    pub posts_per_page: u32,
    pub show_author: bool,
    pub show_date: bool,
    pub allow_ratings: bool,
    /// Slug of the category that cannot be deleted.
    pub default_category: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            enable_comments: true,
            moderate_comments: true,
            posts_per_page: 10,
            show_author: true,
            show_date: true,
            allow_ratings: false,
            default_category: UNCATEGORIZED_SLUG.to_string(),
        }
    }
}

/// Counts derived from the current posts and categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub archived_posts: usize,
    pub categories: usize,
}

/// The namespace blob as it is persisted.
///
/// Each key falls back to its default independently, so a blob written by an
/// older version (for example one without `blogSettings`) still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogState {
    #[serde(default = "defaults::posts")]
    pub posts: Vec<BlogPost>,
    #[serde(default = "defaults::categories")]
    pub categories: Vec<BlogCategory>,
    #[serde(default)]
    pub blog_settings: BlogSettings,
}

impl Default for BlogState {
    fn default() -> Self {
        Self {
            posts: defaults::posts(),
            categories: defaults::categories(),
            blog_settings: BlogSettings::default(),
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_lowercase() {
        let json = serde_json::to_value(PostStatus::Published).unwrap();
        assert_eq!(json, "published");
        assert_eq!("Archived".parse::<PostStatus>().unwrap(), PostStatus::Archived);
        assert!("scheduled".parse::<PostStatus>().is_err());
    }

    #[test]
    fn settings_use_camel_case_keys() {
        let json = serde_json::to_value(BlogSettings::default()).unwrap();
        assert_eq!(json["defaultCategory"], "uncategorized");
        assert_eq!(json["postsPerPage"], 10);
        assert_eq!(json["enableComments"], true);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let state: BlogState = serde_json::from_value(serde_json::json!({
            "categories": []
        }))
        .unwrap();
        assert!(state.categories.is_empty());
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.blog_settings, BlogSettings::default());
    }

    #[test]
    fn post_parses_stored_json() {
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Is WX Eclipse powerful?",
            "content": "<p>Hi</p>",
            "excerpt": "",
            "author": "WX Eclipse",
            "category": "uncategorized",
            "tags": ["tools"],
            "status": "published",
            "featuredImage": "https://example.com/image.jpg",
            "createdAt": "2025-04-20T12:00:00Z",
            "updatedAt": "2025-04-20T12:00:00Z",
            "slug": "is-wx-eclipse-powerful"
        }))
        .unwrap();
        assert!(post.is_published());
        assert!(!post.was_updated());
        assert_eq!(post.page_path(), "blog/is-wx-eclipse-powerful");
    }
}
