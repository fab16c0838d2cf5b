//! The blog aggregate.
//!
//! [`Blog`] owns the persisted [`BlogState`]. Commands never mutate in place:
//! each returns the next aggregate value, leaving `self` untouched when the
//! command is rejected.

use chrono::{DateTime, Utc};

use crate::error::{BlogError, BlogResult, ValidationError};
use crate::form::{CategoryForm, EditPostForm, parse_tags};
use crate::model::{
    BlogCategory, BlogPost, BlogSettings, BlogState, BlogStats, PostStatus, UNCATEGORIZED_NAME,
    UNCATEGORIZED_SLUG,
};
use crate::slug::create_slug;

/// Answer to a destructive action's confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// A validated post ready to be added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    /// Durable URL returned by the media library.
    pub featured_image: String,
}

/// Posts, categories and settings of one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blog {
    state: BlogState,
}

impl Blog {
    pub fn new(state: BlogState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BlogState {
        &self.state
    }

    pub fn into_state(self) -> BlogState {
        self.state
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.state.posts
    }

    pub fn categories(&self) -> &[BlogCategory] {
        &self.state.categories
    }

    pub fn settings(&self) -> &BlogSettings {
        &self.state.blog_settings
    }

    pub fn post(&self, id: &str) -> Option<&BlogPost> {
        self.state.posts.iter().find(|p| p.id == id)
    }

    /// First post with the given slug. Slugs are not unique.
    pub fn post_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.state.posts.iter().find(|p| p.slug == slug)
    }

    pub fn category(&self, id: &str) -> Option<&BlogCategory> {
        self.state.categories.iter().find(|c| c.id == id)
    }

    /// Name posts are moved to when their category goes away.
    pub fn uncategorized_name(&self) -> &str {
        self.state
            .categories
            .iter()
            .find(|c| c.slug == UNCATEGORIZED_SLUG)
            .map_or(UNCATEGORIZED_NAME, |c| c.name.as_str())
    }

    pub fn stats(&self) -> BlogStats {
        let count = |status: PostStatus| {
            self.state
                .posts
                .iter()
                .filter(|p| p.status == status)
                .count()
        };
        BlogStats {
            total_posts: self.state.posts.len(),
            published_posts: count(PostStatus::Published),
            draft_posts: count(PostStatus::Draft),
            archived_posts: count(PostStatus::Archived),
            categories: self.state.categories.len(),
        }
    }

    /// The first `limit` posts in stored order.
    pub fn recent_posts(&self, limit: usize) -> &[BlogPost] {
        let end = limit.min(self.state.posts.len());
        &self.state.posts[..end]
    }

    /// Posts whose title, content, author, category or any tag contains
    /// `term`, ignoring case. An empty term matches everything.
    pub fn search_posts(&self, term: &str) -> Vec<&BlogPost> {
        let needle = term.to_lowercase();
        self.state
            .posts
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || p.author.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Categories whose name or description contains `term`, ignoring case.
    pub fn search_categories(&self, term: &str) -> Vec<&BlogCategory> {
        let needle = term.to_lowercase();
        self.state
            .categories
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Append a post built from `input`, stamped with `now`.
    pub fn create_post(&self, input: NewPost, now: DateTime<Utc>) -> (Self, BlogPost) {
        let post = BlogPost {
            id: format!("post_{}_{}", input.title, now.timestamp_millis()),
            slug: create_slug(&input.title),
            title: input.title,
            content: input.content,
            excerpt: input.excerpt,
            author: input.author,
            category: input.category,
            tags: input.tags,
            status: input.status,
            featured_image: input.featured_image,
            created_at: now,
            updated_at: now,
        };
        let mut next = self.clone();
        next.state.posts.push(post.clone());
        (next, post)
    }

    /// Apply an Edit-Post form. The slug is regenerated from the new title.
    pub fn update_post(
        &self,
        id: &str,
        form: &EditPostForm,
        now: DateTime<Utc>,
    ) -> BlogResult<(Self, BlogPost)> {
        form.validate()?;
        let mut next = self.clone();
        let post = next
            .state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BlogError::PostNotFound(id.to_string()))?;

        post.title = form.title.trim().to_string();
        post.slug = create_slug(&post.title);
        post.excerpt = form.excerpt.clone();
        post.tags = parse_tags(&form.tags);
        post.status = form.status;
        post.category = form.category.clone();
        post.featured_image = form.featured_image.clone();
        post.updated_at = now.max(post.created_at);

        let updated = post.clone();
        Ok((next, updated))
    }

    /// Replace a post's HTML content.
    pub fn edit_content(&self, id: &str, content: &str) -> BlogResult<Self> {
        let mut next = self.clone();
        let post = next
            .state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BlogError::PostNotFound(id.to_string()))?;
        post.content = content.to_string();
        Ok(next)
    }

    /// Remove a post. Returns `None` when the confirmation was declined.
    pub fn delete_post(
        &self,
        id: &str,
        confirmation: Confirmation,
    ) -> BlogResult<Option<(Self, BlogPost)>> {
        let Some(index) = self.state.posts.iter().position(|p| p.id == id) else {
            return Err(BlogError::PostNotFound(id.to_string()));
        };
        if confirmation == Confirmation::Declined {
            return Ok(None);
        }
        let mut next = self.clone();
        let removed = next.state.posts.remove(index);
        Ok(Some((next, removed)))
    }

    pub fn create_category(
        &self,
        form: &CategoryForm,
        id: String,
    ) -> BlogResult<(Self, BlogCategory)> {
        form.validate()?;
        let name = form.name.trim();
        if self.name_taken(name, None) {
            return Err(ValidationError::DuplicateCategory.into());
        }
        let category = BlogCategory {
            id,
            name: name.to_string(),
            slug: create_slug(name),
            description: form.description.trim().to_string(),
        };
        let mut next = self.clone();
        next.state.categories.push(category.clone());
        Ok((next, category))
    }

    /// Rename or re-describe a category. The slug is kept. Posts filed
    /// under the old name follow the rename.
    pub fn update_category(&self, id: &str, form: &CategoryForm) -> BlogResult<Self> {
        form.validate()?;
        let existing = self
            .category(id)
            .ok_or_else(|| BlogError::CategoryNotFound(id.to_string()))?;
        let name = form.name.trim();
        let renamed = existing.name != name;

        if renamed && existing.slug == UNCATEGORIZED_SLUG {
            return Err(ValidationError::UncategorizedRename.into());
        }
        if renamed && self.name_taken(name, Some(id)) {
            return Err(ValidationError::DuplicateCategory.into());
        }

        let old_name = existing.name.clone();
        let mut next = self.clone();
        if let Some(category) = next.state.categories.iter_mut().find(|c| c.id == id) {
            category.name = name.to_string();
            category.description = form.description.trim().to_string();
        }
        if renamed {
            for post in next.state.posts.iter_mut().filter(|p| p.category == old_name) {
                post.category = name.to_string();
            }
        }
        Ok(next)
    }

    /// Delete a category and move its posts to Uncategorized.
    ///
    /// Protected categories are refused whatever the confirmation says.
    /// Returns `None` when the confirmation was declined.
    pub fn delete_category(
        &self,
        id: &str,
        confirmation: Confirmation,
    ) -> BlogResult<Option<(Self, BlogCategory)>> {
        let category = self
            .category(id)
            .ok_or_else(|| BlogError::CategoryNotFound(id.to_string()))?;
        if category.slug == self.state.blog_settings.default_category {
            return Err(BlogError::DefaultCategoryProtected);
        }
        if category.slug == UNCATEGORIZED_SLUG {
            return Err(BlogError::UncategorizedProtected);
        }
        if confirmation == Confirmation::Declined {
            return Ok(None);
        }

        let removed = category.clone();
        let fallback = self.uncategorized_name().to_string();
        let mut next = self.clone();
        for post in next
            .state
            .posts
            .iter_mut()
            .filter(|p| p.category == removed.name)
        {
            post.category = fallback.clone();
        }
        next.state.categories.retain(|c| c.id != id);
        Ok(Some((next, removed)))
    }

    pub fn save_settings(&self, settings: BlogSettings) -> BlogResult<Self> {
        if settings.posts_per_page == 0 {
            return Err(ValidationError::InvalidPostsPerPage.into());
        }
        if !self
            .state
            .categories
            .iter()
            .any(|c| c.slug == settings.default_category)
        {
            return Err(ValidationError::UnknownDefaultCategory(settings.default_category).into());
        }
        let mut next = self.clone();
        next.state.blog_settings = settings;
        Ok(next)
    }

    fn name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        let name = name.to_lowercase();
        self.state
            .categories
            .iter()
            .any(|c| Some(c.id.as_str()) != except_id && c.name.to_lowercase() == name)
    }
}

impl From<BlogState> for Blog {
    fn from(state: BlogState) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, hour, 0, 0).unwrap()
    }

    fn new_post(title: &str, category: &str, status: PostStatus) -> NewPost {
        NewPost {
            title: title.into(),
            content: format!("<p>{title}</p>"),
            excerpt: String::new(),
            author: "Ada Lovelace".into(),
            category: category.into(),
            tags: vec!["rust".into()],
            status,
            featured_image: "memory://media/x".into(),
        }
    }

    fn category(id: &str, name: &str) -> BlogCategory {
        BlogCategory {
            id: id.into(),
            name: name.into(),
            slug: create_slug(name),
            description: String::new(),
        }
    }

    fn empty() -> Blog {
        Blog::new(BlogState {
            posts: Vec::new(),
            categories: vec![category("1", "Uncategorized")],
            blog_settings: BlogSettings::default(),
        })
    }

    #[test]
    fn default_blog_has_welcome_post() {
        let blog = Blog::default();
        assert_eq!(blog.posts().len(), 1);
        assert_eq!(blog.posts()[0].slug, "is-wx-eclipse-powerful");
        assert_eq!(blog.stats().categories, 1);
    }

    #[test]
    fn create_post_generates_id_and_slug() {
        let now = at(9);
        let (blog, post) = empty().create_post(
            new_post("Hello, World!", "Uncategorized", PostStatus::Draft),
            now,
        );
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.id, format!("post_Hello, World!_{}", now.timestamp_millis()));
        assert_eq!(post.created_at, post.updated_at);
        assert_eq!(blog.posts().len(), 1);
    }

    #[test]
    fn commands_leave_original_untouched() {
        let blog = empty();
        let _ = blog.create_post(new_post("A", "Uncategorized", PostStatus::Draft), at(9));
        assert!(blog.posts().is_empty());
    }

    #[test]
    fn stats_count_by_status() {
        let blog = empty();
        let (blog, _) = blog.create_post(
            new_post("A", "Uncategorized", PostStatus::Published),
            at(1),
        );
        let (blog, _) = blog.create_post(new_post("B", "Uncategorized", PostStatus::Draft), at(2));
        let (blog, _) = blog.create_post(
            new_post("C", "Uncategorized", PostStatus::Archived),
            at(3),
        );
        let stats = blog.stats();
        assert_eq!(stats.total_posts, 3);
        assert_eq!(stats.published_posts, 1);
        assert_eq!(stats.draft_posts, 1);
        assert_eq!(stats.archived_posts, 1);
        assert!(stats.published_posts + stats.draft_posts <= stats.total_posts);
    }

    #[test]
    fn update_post_reslugs_and_never_moves_updated_before_created() {
        let (blog, post) = empty().create_post(
            new_post("First", "Uncategorized", PostStatus::Draft),
            at(10),
        );
        let form = EditPostForm {
            title: "Second Title".into(),
            excerpt: "short".into(),
            category: "Uncategorized".into(),
            tags: "a, b".into(),
            status: PostStatus::Published,
            featured_image: "https://img.test/x.png".into(),
        };

        let (_, updated) = blog.update_post(&post.id, &form, at(12)).unwrap();
        assert_eq!(updated.slug, "second-title");
        assert_eq!(updated.tags, vec!["a", "b"]);
        assert!(updated.was_updated());

        let (_, clamped) = blog.update_post(&post.id, &form, at(8)).unwrap();
        assert_eq!(clamped.updated_at, clamped.created_at);
    }

    #[test]
    fn update_unknown_post_is_not_found() {
        let form = EditPostForm {
            title: "T".into(),
            category: "Uncategorized".into(),
            ..Default::default()
        };
        let err = empty().update_post("missing", &form, at(1)).unwrap_err();
        assert!(matches!(err, BlogError::PostNotFound(_)));
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let (blog, post) = empty().create_post(
            new_post("A", "Uncategorized", PostStatus::Draft),
            at(1),
        );
        assert!(blog.delete_post(&post.id, Confirmation::Declined).unwrap().is_none());

        let (after, removed) = blog
            .delete_post(&post.id, Confirmation::Confirmed)
            .unwrap()
            .unwrap();
        assert_eq!(removed.id, post.id);
        assert!(after.posts().is_empty());
    }

    #[test]
    fn edit_content_overwrites_html() {
        let (blog, post) = empty().create_post(
            new_post("A", "Uncategorized", PostStatus::Draft),
            at(1),
        );
        let blog = blog.edit_content(&post.id, "<p>new</p>").unwrap();
        assert_eq!(blog.post(&post.id).unwrap().content, "<p>new</p>");
    }

    #[test]
    fn duplicate_category_names_are_rejected_ignoring_case() {
        let form = CategoryForm {
            name: "uncategorized".into(),
            description: String::new(),
        };
        let err = empty().create_category(&form, "2".into()).unwrap_err();
        assert!(matches!(
            err,
            BlogError::Validation(ValidationError::DuplicateCategory)
        ));
    }

    #[test]
    fn created_category_gets_slug() {
        let form = CategoryForm {
            name: "Web Dev".into(),
            description: "All things web".into(),
        };
        let (blog, created) = empty().create_category(&form, "2".into()).unwrap();
        assert_eq!(created.slug, "web-dev");
        assert_eq!(blog.categories().len(), 2);
    }

    #[test]
    fn deleting_category_moves_posts_to_uncategorized() {
        let blog = empty();
        let (blog, tech) = blog
            .create_category(
                &CategoryForm {
                    name: "Tech".into(),
                    description: String::new(),
                },
                "2".into(),
            )
            .unwrap();
        let (blog, _) = blog.create_post(new_post("A", "Tech", PostStatus::Published), at(1));
        let (blog, _) = blog.create_post(new_post("B", "Tech", PostStatus::Draft), at(2));

        let (blog, removed) = blog
            .delete_category(&tech.id, Confirmation::Confirmed)
            .unwrap()
            .unwrap();
        assert_eq!(removed.name, "Tech");
        assert!(blog.posts().iter().all(|p| p.category == "Uncategorized"));
        assert_eq!(blog.categories().len(), 1);
        assert_eq!(blog.categories()[0].slug, "uncategorized");
    }

    #[test]
    fn default_category_cannot_be_deleted() {
        let blog = empty();
        let (blog, tech) = blog
            .create_category(
                &CategoryForm {
                    name: "Tech".into(),
                    description: String::new(),
                },
                "2".into(),
            )
            .unwrap();
        let settings = BlogSettings {
            default_category: "tech".into(),
            ..BlogSettings::default()
        };
        let blog = blog.save_settings(settings).unwrap();

        let err = blog
            .delete_category(&tech.id, Confirmation::Confirmed)
            .unwrap_err();
        assert!(matches!(err, BlogError::DefaultCategoryProtected));
        assert_eq!(blog.categories().len(), 2);

        let err = blog.delete_category("1", Confirmation::Confirmed).unwrap_err();
        assert!(matches!(err, BlogError::UncategorizedProtected));
    }

    #[test]
    fn rename_cascades_to_posts() {
        let blog = empty();
        let (blog, tech) = blog
            .create_category(
                &CategoryForm {
                    name: "Tech".into(),
                    description: String::new(),
                },
                "2".into(),
            )
            .unwrap();
        let (blog, post) = blog.create_post(new_post("A", "Tech", PostStatus::Published), at(1));

        let blog = blog
            .update_category(
                &tech.id,
                &CategoryForm {
                    name: "Technology".into(),
                    description: "renamed".into(),
                },
            )
            .unwrap();
        assert_eq!(blog.post(&post.id).unwrap().category, "Technology");
        assert_eq!(blog.category(&tech.id).unwrap().slug, "tech");
    }

    #[test]
    fn uncategorized_keeps_its_name() {
        let form = CategoryForm {
            name: "Misc".into(),
            description: String::new(),
        };
        let err = empty().update_category("1", &form).unwrap_err();
        assert!(matches!(
            err,
            BlogError::Validation(ValidationError::UncategorizedRename)
        ));

        let form = CategoryForm {
            name: "Uncategorized".into(),
            description: "Posts without a home".into(),
        };
        let blog = empty().update_category("1", &form).unwrap();
        assert_eq!(blog.categories()[0].description, "Posts without a home");
    }

    #[test]
    fn search_matches_tags_and_ignores_case() {
        let (blog, _) = empty().create_post(
            new_post("Alpha", "Uncategorized", PostStatus::Draft),
            at(1),
        );
        assert_eq!(blog.search_posts("RUST").len(), 1);
        assert_eq!(blog.search_posts("").len(), 1);
        assert!(blog.search_posts("nothing here").is_empty());
        assert_eq!(blog.search_categories("uncat").len(), 1);
    }

    #[test]
    fn settings_require_known_default_category() {
        let settings = BlogSettings {
            default_category: "nope".into(),
            ..BlogSettings::default()
        };
        assert!(empty().save_settings(settings).is_err());

        let settings = BlogSettings {
            posts_per_page: 0,
            ..BlogSettings::default()
        };
        assert!(empty().save_settings(settings).is_err());
    }

    #[test]
    fn recent_posts_is_bounded() {
        let mut blog = empty();
        for i in 0..7 {
            blog = blog
                .create_post(
                    new_post(&format!("P{i}"), "Uncategorized", PostStatus::Draft),
                    at(1) + Duration::minutes(i),
                )
                .0;
        }
        assert_eq!(blog.recent_posts(5).len(), 5);
        assert_eq!(empty().recent_posts(5).len(), 0);
    }
}
