//! WX test utilities.
//!
//! Helpers for integration testing: fixture builders that produce the JSON
//! the blog plugin stores, a bundled in-memory host, and assertion helpers.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value as JsonValue, json};
use wx_sdk::HostContext;
use wx_sdk::memory::{MemoryHost, MemoryMedia, MemoryPages, MemoryPlugins, MemoryStore, StaticAuth};
use wx_sdk::types::User;

/// Store namespace the blog plugin writes to.
pub const BLOG_NAMESPACE: &str = "Blog";

/// Smallest valid PNG as a `data:` URL.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// Fixed timestamp fixtures are created at.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 20, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Create a published test post in the Uncategorized category.
pub fn test_post(title: &str) -> TestPost {
    TestPost {
        id: format!("post_{}", uuid::Uuid::now_v7()),
        title: title.to_string(),
        slug: title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-"),
        content: format!("<p class=\"wx-blog-element\">{title}</p>"),
        excerpt: String::new(),
        author: "Test Author".to_string(),
        category: "Uncategorized".to_string(),
        tags: Vec::new(),
        status: "published".to_string(),
        featured_image: "https://example.com/image.jpg".to_string(),
        created_at: fixture_time(),
        updated_at: fixture_time(),
    }
}

/// A test post builder for creating stored-state fixtures.
#[derive(Debug, Clone)]
pub struct TestPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub status: String,
    pub featured_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestPost {
    /// Set a custom ID.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Set a custom slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set as draft.
    pub fn draft(mut self) -> Self {
        self.status = "draft".to_string();
        self
    }

    /// Set as archived.
    pub fn archived(mut self) -> Self {
        self.status = "archived".to_string();
        self
    }

    /// Mark as edited `hours` after creation.
    pub fn updated_after(mut self, hours: i64) -> Self {
        self.updated_at = self.created_at + chrono::Duration::hours(hours);
        self
    }

    /// The post as the blog stores it.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "title": self.title,
            "content": self.content,
            "excerpt": self.excerpt,
            "author": self.author,
            "category": self.category,
            "tags": self.tags,
            "status": self.status,
            "featuredImage": self.featured_image,
            "createdAt": self.created_at.to_rfc3339(),
            "updatedAt": self.updated_at.to_rfc3339(),
            "slug": self.slug,
        })
    }
}

/// A stored category.
pub fn test_category(id: &str, name: &str) -> JsonValue {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "description": format!("{name} posts"),
    })
}

/// The Uncategorized category as seeded on a fresh install.
pub fn uncategorized() -> JsonValue {
    json!({
        "id": "1",
        "name": "Uncategorized",
        "slug": "uncategorized",
        "description": "Default category",
    })
}

/// A namespace blob holding the given posts and categories. Settings are
/// left out so the plugin falls back to its defaults.
pub fn blog_state(posts: &[TestPost], categories: Vec<JsonValue>) -> JsonValue {
    json!({
        "posts": posts.iter().map(TestPost::to_json).collect::<Vec<_>>(),
        "categories": categories,
    })
}

/// A signed-in test user.
pub fn test_user() -> User {
    User::new("ada@example.com").with_name("Ada", "Lovelace")
}

/// In-memory host with typed access to each capability.
#[derive(Debug, Clone)]
pub struct TestHost {
    inner: MemoryHost,
}

impl TestHost {
    /// Host with [`test_user`] signed in.
    pub fn new() -> Self {
        Self {
            inner: MemoryHost::new("https://site.test", Some(test_user())),
        }
    }

    /// Host with nobody signed in.
    pub fn anonymous() -> Self {
        Self {
            inner: MemoryHost::new("https://site.test", None),
        }
    }

    /// Seed the blog namespace.
    pub fn with_blog_state(self, state: JsonValue) -> Self {
        use wx_sdk::StateStore;
        // MemoryStore never fails.
        let _ = self.inner.store.put_item_in_store(BLOG_NAMESPACE, state);
        self
    }

    pub fn context(&self) -> HostContext {
        self.inner.context()
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.inner.store
    }

    pub fn pages(&self) -> &Arc<MemoryPages> {
        &self.inner.pages
    }

    pub fn media(&self) -> &Arc<MemoryMedia> {
        &self.inner.media
    }

    pub fn auth(&self) -> &Arc<StaticAuth> {
        &self.inner.auth
    }

    pub fn plugins(&self) -> &Arc<MemoryPlugins> {
        &self.inner.plugins
    }

    /// Raw blob currently stored for the blog.
    pub fn stored_blog(&self) -> Option<JsonValue> {
        use wx_sdk::StateStore;
        self.inner.store.get_state(BLOG_NAMESPACE).ok().flatten()
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Assertion helpers for JSON and rendered HTML.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual,
            expected,
            "JSON mismatch:\nactual: {}\nexpected: {}",
            serde_json::to_string_pretty(actual).unwrap_or_default(),
            serde_json::to_string_pretty(expected).unwrap_or_default()
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_post_builder() {
        let post = test_post("Hello World")
            .draft()
            .in_category("Tech")
            .with_tags(&["rust", "web"]);
        let json = post.to_json();

        assert_eq!(json["slug"], "hello-world");
        assert_eq!(json["status"], "draft");
        assert_eq!(json["category"], "Tech");
        assert_eq!(json["tags"][1], "web");
        assert_eq!(json["createdAt"], json["updatedAt"]);
    }

    #[test]
    fn updated_after_moves_updated_at() {
        let post = test_post("A").updated_after(2);
        assert!(post.updated_at > post.created_at);
    }

    #[test]
    fn blog_state_omits_settings() {
        let state = blog_state(&[test_post("A")], vec![uncategorized()]);
        assert::has_key(&state, "posts");
        assert!(state.get("blogSettings").is_none());
    }

    #[test]
    fn test_host_seeds_the_blog_namespace() {
        let host = TestHost::new().with_blog_state(json!({"posts": []}));
        assert_eq!(host.stored_blog().unwrap(), json!({"posts": []}));
        assert!(TestHost::anonymous().stored_blog().is_none());
    }

    #[test]
    fn category_slug_is_hyphenated() {
        assert_eq!(test_category("2", "Web Dev")["slug"], "web-dev");
    }
}
