//! Dashboard view model.
//!
//! The dashboard has four tabs. Each build computes only what its tab shows;
//! stats are always present for the header.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::blog::Blog;
use crate::model::{
    BlogCategory, BlogPost, BlogSettings, BlogStats, PostStatus, UNCATEGORIZED_SLUG,
};

/// Posts shown under "Recent Posts" on the overview.
pub const RECENT_POSTS: usize = 5;

/// `April 20, 2025`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Posts,
    Categories,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Self::Overview, Self::Posts, Self::Categories, Self::Settings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Posts => "posts",
            Self::Categories => "categories",
            Self::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Posts => "Posts",
            Self::Categories => "Categories",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown dashboard tab '{s}'"))
    }
}

/// One row of a post table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub category: String,
    pub status: PostStatus,
    pub status_label: &'static str,
    pub created: String,
}

impl From<&BlogPost> for PostRow {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            author: post.author.clone(),
            category: post.category.clone(),
            status: post.status,
            status_label: post.status.label(),
            created: format_date(&post.created_at),
        }
    }
}

/// One row of the category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub post_count: usize,
    /// Deleting is refused for this category.
    pub protected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub tab: Tab,
    pub search: String,
    pub stats: BlogStats,
    pub posts: Vec<PostRow>,
    pub categories: Vec<CategoryRow>,
    pub settings: BlogSettings,
}

impl Dashboard {
    pub fn build(blog: &Blog, tab: Tab, search: &str) -> Self {
        let posts = match tab {
            Tab::Overview => blog
                .recent_posts(RECENT_POSTS)
                .iter()
                .map(PostRow::from)
                .collect(),
            Tab::Posts => blog
                .search_posts(search)
                .into_iter()
                .map(PostRow::from)
                .collect(),
            Tab::Categories | Tab::Settings => Vec::new(),
        };
        let categories = match tab {
            Tab::Categories => blog
                .search_categories(search)
                .into_iter()
                .map(|c| category_row(blog, c))
                .collect(),
            Tab::Settings => blog.categories().iter().map(|c| category_row(blog, c)).collect(),
            Tab::Overview | Tab::Posts => Vec::new(),
        };

        Self {
            tab,
            search: search.to_string(),
            stats: blog.stats(),
            posts,
            categories,
            settings: blog.settings().clone(),
        }
    }
}

fn category_row(blog: &Blog, category: &BlogCategory) -> CategoryRow {
    CategoryRow {
        id: category.id.clone(),
        name: category.name.clone(),
        slug: category.slug.clone(),
        description: category.description.clone(),
        post_count: blog
            .posts()
            .iter()
            .filter(|p| p.category == category.name)
            .count(),
        protected: category.slug == UNCATEGORIZED_SLUG
            || category.slug == blog.settings().default_category,
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn dates_use_long_month_format() {
        let date = Utc.with_ymd_and_hms(2025, 4, 20, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "April 20, 2025");
        let date = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date), "March 5, 2025");
    }

    #[test]
    fn tabs_parse_case_insensitively() {
        assert_eq!("Posts".parse::<Tab>().unwrap(), Tab::Posts);
        assert!("reports".parse::<Tab>().is_err());
        assert_eq!(Tab::default(), Tab::Overview);
    }

    #[test]
    fn overview_shows_stats_and_recent_posts() {
        let dashboard = Dashboard::build(&Blog::default(), Tab::Overview, "");
        assert_eq!(dashboard.stats.total_posts, 1);
        assert_eq!(dashboard.posts.len(), 1);
        assert_eq!(dashboard.posts[0].created, "April 20, 2025");
        assert!(dashboard.categories.is_empty());
    }

    #[test]
    fn posts_tab_applies_search() {
        let blog = Blog::default();
        assert_eq!(Dashboard::build(&blog, Tab::Posts, "eclipse").posts.len(), 1);
        assert!(Dashboard::build(&blog, Tab::Posts, "kubernetes").posts.is_empty());
    }

    #[test]
    fn categories_tab_marks_protected_rows() {
        let dashboard = Dashboard::build(&Blog::default(), Tab::Categories, "");
        assert_eq!(dashboard.categories.len(), 1);
        assert!(dashboard.categories[0].protected);
        assert_eq!(dashboard.categories[0].post_count, 1);
    }
}
