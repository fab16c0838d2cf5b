//! Public single-post view.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use wx_sdk::PageRegistry;

use crate::blog::Blog;
use crate::listing::PostCard;
use crate::model::{BlogPost, BlogSettings};

/// Shown instead of content that carries a script element.
pub const BLOCKED_PLACEHOLDER: &str = "Content blocked";

/// Maximum number of related posts shown under a post.
pub const RELATED_LIMIT: usize = 3;

#[allow(clippy::expect_used)]
static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex literal"));

/// Whether `html` holds a `<script>...</script>` pair, in any case.
pub fn contains_script(html: &str) -> bool {
    SCRIPT_TAG.is_match(html)
}

/// Last non-empty segment of a URL path (`/blog/my-post/` -> `my-post`).
pub fn slug_from_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or_default()
}

/// Component settings that shape the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostViewOptions {
    pub show_related: bool,
    /// When set, the post with this id is shown whatever the path says.
    pub post_id: Option<String>,
}

impl Default for PostViewOptions {
    fn default() -> Self {
        Self {
            show_related: true,
            post_id: None,
        }
    }
}

/// Post body ready for the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "html", rename_all = "snake_case")]
pub enum PostBody {
    /// Raw HTML; the host still passes it through its sanitizer.
    Html(String),
    Blocked,
}

impl PostBody {
    pub fn from_content(content: &str) -> Self {
        if contains_script(content) {
            Self::Blocked
        } else {
            Self::Html(content.to_string())
        }
    }
}

/// A published post with everything the template shows around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub post: BlogPost,
    pub body: PostBody,
    pub show_author: bool,
    pub show_date: bool,
    /// True when `show_date` is on and the post was edited after creation.
    pub show_updated: bool,
    pub show_comments: bool,
    /// Tags rendered as `#tag`.
    pub hashtags: Vec<String>,
    pub related: Vec<PostCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PostView {
    NotFound,
    Found(Box<PostPage>),
}

impl PostView {
    /// Resolve the post for `path` and build its view.
    ///
    /// Drafts and archived posts render as not found.
    pub fn resolve(
        blog: &Blog,
        path: &str,
        options: &PostViewOptions,
        pages: &dyn PageRegistry,
    ) -> Self {
        let found = match options.post_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => blog.post(id),
            None => blog.post_by_slug(slug_from_path(path)),
        };
        let Some(post) = found.filter(|p| p.is_published()) else {
            tracing::debug!(path, "blog post not found");
            return Self::NotFound;
        };

        let settings: &BlogSettings = blog.settings();
        let related = if options.show_related {
            related_posts(blog, post)
                .into_iter()
                .map(|p| PostCard::from_post(p, pages))
                .collect()
        } else {
            Vec::new()
        };

        Self::Found(Box::new(PostPage {
            body: PostBody::from_content(&post.content),
            show_author: settings.show_author,
            show_date: settings.show_date,
            show_updated: settings.show_date && post.was_updated(),
            show_comments: settings.enable_comments,
            hashtags: post.tags.iter().map(|t| format!("#{t}")).collect(),
            related,
            post: post.clone(),
        }))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Published posts in the same category, excluding `post` itself.
pub fn related_posts<'a>(blog: &'a Blog, post: &BlogPost) -> Vec<&'a BlogPost> {
    blog.posts()
        .iter()
        .filter(|p| p.category == post.category && p.slug != post.slug && p.is_published())
        .take(RELATED_LIMIT)
        .collect()
}
