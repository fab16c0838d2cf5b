//! Public post listing.
//!
//! The listing shows published posts filtered by a title search and a
//! category picked from a filter bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wx_sdk::PageRegistry;

use crate::blog::Blog;
use crate::model::BlogPost;

/// Category filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Lowercase with spaces turned into hyphens, so "Web Dev" matches "web-dev".
pub fn normalize_category(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Current listing filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
    pub search: String,
    pub category: String,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl ListingFilter {
    /// Initial filter for a listing component with the given `Category`
    /// setting. A blank setting shows every category.
    pub fn for_component(category_setting: Option<&str>) -> Self {
        match category_setting.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => Self {
                search: String::new(),
                category: category.to_string(),
            },
            None => Self::default(),
        }
    }

    /// Reset both the search term and the category.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        if !post.is_published() {
            return false;
        }
        if !post
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase())
        {
            return false;
        }
        self.category == ALL_CATEGORIES
            || normalize_category(&post.category) == normalize_category(&self.category)
    }
}

/// A post as shown on a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub author: String,
    pub category: String,
    pub featured_image: String,
    pub created_at: DateTime<Utc>,
    /// Absolute URL of the post's page.
    pub url: String,
}

impl PostCard {
    pub fn from_post(post: &BlogPost, pages: &dyn PageRegistry) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            category: post.category.clone(),
            featured_image: post.featured_image.clone(),
            created_at: post.created_at,
            url: pages.construct_page_url(&post.page_path()),
        }
    }
}

/// What the listing body shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "posts", rename_all = "snake_case")]
pub enum ListingOutcome {
    /// No posts exist at all.
    Empty,
    /// Posts exist but none pass the filter.
    NoMatches,
    Posts(Vec<PostCard>),
}

/// Everything the listing template needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub filter: ListingFilter,
    /// "All" followed by every stored category name.
    pub categories: Vec<String>,
    pub outcome: ListingOutcome,
}

impl ListingView {
    pub fn build(blog: &Blog, filter: ListingFilter, pages: &dyn PageRegistry) -> Self {
        let categories = std::iter::once(ALL_CATEGORIES.to_string())
            .chain(blog.categories().iter().map(|c| c.name.clone()))
            .collect();

        let outcome = if blog.posts().is_empty() {
            ListingOutcome::Empty
        } else {
            let cards: Vec<PostCard> = blog
                .posts()
                .iter()
                .filter(|p| filter.matches(p))
                .map(|p| PostCard::from_post(p, pages))
                .collect();
            if cards.is_empty() {
                ListingOutcome::NoMatches
            } else {
                ListingOutcome::Posts(cards)
            }
        };

        tracing::debug!(
            search = %filter.search,
            category = %filter.category,
            "blog listing built"
        );

        Self {
            filter,
            categories,
            outcome,
        }
    }

    pub fn match_count(&self) -> usize {
        match &self.outcome {
            ListingOutcome::Posts(cards) => cards.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use wx_sdk::memory::MemoryPages;

    use super::*;
    use crate::defaults;
    use crate::model::{BlogSettings, BlogState, PostStatus};

    fn post(title: &str, category: &str, status: PostStatus) -> BlogPost {
        BlogPost {
            id: title.to_lowercase(),
            slug: crate::slug::create_slug(title),
            title: title.into(),
            category: category.into(),
            status,
            ..defaults::welcome_post()
        }
    }

    fn blog(posts: Vec<BlogPost>) -> Blog {
        Blog::new(BlogState {
            posts,
            categories: defaults::categories(),
            blog_settings: BlogSettings::default(),
        })
    }

    #[test]
    fn normalization_replaces_every_space() {
        assert_eq!(normalize_category("Web Dev Tips"), "web-dev-tips");
    }

    #[test]
    fn empty_blog_reports_empty() {
        let pages = MemoryPages::new("https://site.test");
        let view = ListingView::build(&blog(Vec::new()), ListingFilter::default(), &pages);
        assert_eq!(view.outcome, ListingOutcome::Empty);
        assert_eq!(view.categories, vec!["All", "Uncategorized"]);
    }

    #[test]
    fn only_published_posts_are_listed() {
        let pages = MemoryPages::new("https://site.test");
        let blog = blog(vec![
            post("Shown", "Uncategorized", PostStatus::Published),
            post("Hidden", "Uncategorized", PostStatus::Draft),
        ]);
        let view = ListingView::build(&blog, ListingFilter::default(), &pages);
        let ListingOutcome::Posts(cards) = view.outcome else {
            panic!("expected posts");
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].url, "https://site.test/blog/shown");
    }

    #[test]
    fn category_filter_uses_normalized_names() {
        let filter = ListingFilter {
            search: String::new(),
            category: "web-dev".into(),
        };
        assert!(filter.matches(&post("A", "Web Dev", PostStatus::Published)));
        assert!(!filter.matches(&post("A", "Design", PostStatus::Published)));
    }

    #[test]
    fn no_matches_then_clear_restores_all() {
        let pages = MemoryPages::default();
        let blog = blog(vec![post("Rust Tips", "Uncategorized", PostStatus::Published)]);
        let mut filter = ListingFilter {
            search: "python".into(),
            category: ALL_CATEGORIES.into(),
        };
        let view = ListingView::build(&blog, filter.clone(), &pages);
        assert_eq!(view.outcome, ListingOutcome::NoMatches);

        filter.clear();
        assert_eq!(filter, ListingFilter::default());
        assert_eq!(ListingView::build(&blog, filter, &pages).match_count(), 1);
    }

    #[test]
    fn widening_search_never_shrinks_results() {
        let pages = MemoryPages::default();
        let blog = blog(vec![
            post("Rust Tips", "Uncategorized", PostStatus::Published),
            post("Rust Tricks", "Uncategorized", PostStatus::Published),
            post("Go Tips", "Uncategorized", PostStatus::Published),
        ]);
        let mut previous = 0;
        for term in ["rust tips", "rust t", "rust", "t", ""] {
            let filter = ListingFilter {
                search: term.into(),
                category: ALL_CATEGORIES.into(),
            };
            let count = ListingView::build(&blog, filter, &pages).match_count();
            assert!(count >= previous, "'{term}' matched fewer posts");
            previous = count;
        }
        assert_eq!(previous, 3);
    }

    #[test]
    fn component_setting_seeds_the_category() {
        assert_eq!(ListingFilter::for_component(Some("Tech")).category, "Tech");
        assert_eq!(ListingFilter::for_component(Some(" ")).category, "All");
        assert_eq!(ListingFilter::for_component(None).category, "All");
    }
}
