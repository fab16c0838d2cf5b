//! Components the plugin offers to the website builder.

use wx_sdk::types::{BuilderComponent, Page, PluginSetting, SettingValue};
use wx_sdk::{HostResult, PageRegistry};

use crate::listing::ListingFilter;
use crate::model::BlogPost;
use crate::post_view::PostViewOptions;
use crate::PLUGIN_NAME;

/// Palette group the components are listed under.
pub const COMPONENT_GROUP: &str = "WX Blogs";

/// Renderer key of the single-post component.
pub const POST_RENDERER: &str = "BlogPost";

/// Renderer key of the listing component.
pub const LISTING_RENDERER: &str = "grid__01";

pub const SHOW_RELATED_POSTS: &str = "Show Related Posts";
pub const POST_ID: &str = "Post ID";
pub const CATEGORY: &str = "Category";

/// Id and path of the public listing page.
pub const LISTING_PAGE_ID: &str = "wx-blog-listing";
pub const LISTING_PAGE_PATH: &str = "blogs";

/// Single-post renderer placed on every post page.
pub fn blog_component() -> BuilderComponent {
    BuilderComponent::new("WxBlog__blog__type1", PLUGIN_NAME, POST_RENDERER)
        .content("Blog")
        .icon("newspaper")
        .setting(PluginSetting::boolean(
            SHOW_RELATED_POSTS,
            "Show related posts at the end of the blog post",
            true,
        ))
        .setting(PluginSetting::string(
            POST_ID,
            "The ID of the blog post to display",
            "",
        ))
}

/// Post grid with search and category filter.
pub fn blogs_component() -> BuilderComponent {
    BuilderComponent::new("WxBlogs__blogs__type1", PLUGIN_NAME, LISTING_RENDERER)
        .content("Blogs")
        .icon("blog")
        .setting(PluginSetting::string(CATEGORY, "Filter by category", ""))
}

/// Dashboard palette entry for a post list.
pub fn blog_list_component() -> BuilderComponent {
    BuilderComponent::new("wx-blog-list", PLUGIN_NAME, LISTING_RENDERER)
        .content("Blog List")
        .icon("newspaper")
        .setting(PluginSetting::string(CATEGORY, "Filter by category", ""))
        .setting(PluginSetting::number(
            "PostsPerPage",
            "Number of posts to show",
            5.0,
        ))
        .setting(PluginSetting::boolean("ShowExcerpt", "Show post excerpt", true))
        .setting(PluginSetting::boolean(
            "ShowFeaturedImage",
            "Show featured image",
            true,
        ))
}

/// Dashboard palette entry for a single post.
pub fn blog_post_component() -> BuilderComponent {
    BuilderComponent::new("wx-blog-post", PLUGIN_NAME, POST_RENDERER)
        .content("Blog Post")
        .icon("book")
        .setting(PluginSetting::boolean("ShowAuthor", "Show post author", true))
        .setting(PluginSetting::boolean("ShowDate", "Show post date", true))
        .setting(PluginSetting::boolean(
            "ShowComments",
            "Show post comments",
            true,
        ))
        .setting(PluginSetting::boolean(
            "ShowCategories",
            "Show post categories",
            true,
        ))
}

pub fn all_components() -> Vec<BuilderComponent> {
    vec![
        blogs_component(),
        blog_component(),
        blog_list_component(),
        blog_post_component(),
    ]
}

/// Offer every blog component to the builder palette.
pub fn register_components(pages: &dyn PageRegistry) -> HostResult<()> {
    pages.add_available_components(COMPONENT_GROUP, all_components())?;
    tracing::info!(group = COMPONENT_GROUP, "blog components registered");
    Ok(())
}

/// Hidden page that shows one post.
pub fn post_page(post: &BlogPost) -> Page {
    Page::new(&post.id, &post.title, post.page_path())
        .description(&post.excerpt)
        .hidden()
        .component(blog_component())
}

/// Public listing page.
pub fn listing_page() -> Page {
    Page::new(LISTING_PAGE_ID, "Blog", LISTING_PAGE_PATH)
        .description("Blog list page")
        .component(blogs_component())
}

/// View options taken from a placed single-post component.
pub fn post_view_options(component: &BuilderComponent) -> PostViewOptions {
    PostViewOptions {
        show_related: component
            .get_setting(SHOW_RELATED_POSTS)
            .and_then(SettingValue::as_bool)
            .unwrap_or(true),
        post_id: component
            .get_setting(POST_ID)
            .and_then(SettingValue::as_str)
            .filter(|id| !id.trim().is_empty())
            .map(String::from),
    }
}

/// Initial listing filter taken from a placed listing component.
pub fn listing_filter(component: &BuilderComponent) -> ListingFilter {
    ListingFilter::for_component(component.get_setting(CATEGORY).and_then(SettingValue::as_str))
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use wx_sdk::memory::MemoryPages;

    use super::*;
    use crate::defaults;

    #[test]
    fn blog_component_defaults() {
        let component = blog_component();
        assert_eq!(component.component_type, "plugin");
        assert_eq!(component.plugin_name, "Blog");
        assert_eq!(component.plugin, "BlogPost");
        let options = post_view_options(&component);
        assert!(options.show_related);
        assert!(options.post_id.is_none());
    }

    #[test]
    fn listing_component_has_blank_category() {
        let filter = listing_filter(&blogs_component());
        assert_eq!(filter, ListingFilter::default());
    }

    #[test]
    fn registration_adds_all_four_to_group() {
        let pages = MemoryPages::default();
        register_components(&pages).unwrap();
        let registered = pages.available_components();
        assert_eq!(registered.len(), 4);
        assert!(registered.iter().all(|(group, _)| group == "WX Blogs"));
    }

    #[test]
    fn post_page_is_hidden_under_blog_path() {
        let page = post_page(&defaults::welcome_post());
        assert_eq!(page.id, "1");
        assert_eq!(page.url, "blog/is-wx-eclipse-powerful");
        assert!(page.hidden);
        assert_eq!(page.components[0].id, "WxBlog__blog__type1");
    }

    #[test]
    fn list_component_posts_per_page_is_numeric() {
        let component = blog_list_component();
        assert_eq!(
            component.get_setting("PostsPerPage").and_then(SettingValue::as_f64),
            Some(5.0)
        );
    }
}
