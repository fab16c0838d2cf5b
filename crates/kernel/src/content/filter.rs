//! HTML filtering for post bodies.
//!
//! Post content is author-supplied HTML. Before it reaches a page it runs
//! through an ammonia allowlist that keeps the markup the inline editor
//! produces (headings, quotes, code, lists, images, video) and strips
//! anything executable.

use std::sync::LazyLock;

use ammonia::Builder;

static POST_HTML: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder
        .add_tags(&["video"])
        .add_tag_attributes("video", &["src", "controls", "poster"])
        .add_generic_attributes(&["class"]);
    builder
});

/// Strip dangerous tags and attributes from post HTML.
pub fn sanitize_post_html(input: &str) -> String {
    POST_HTML.clean(input).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn scripts_and_handlers_are_removed() {
        let html = sanitize_post_html(r#"<p onclick="x()">Hi</p><script>alert(1)</script>"#);
        assert_eq!(html, "<p>Hi</p>");
    }

    #[test]
    fn editor_classes_survive() {
        let html = sanitize_post_html(r#"<h1 class="wx-blog-element">Title</h1>"#);
        assert_eq!(html, r#"<h1 class="wx-blog-element">Title</h1>"#);
    }

    #[test]
    fn video_snippet_is_kept() {
        let html = sanitize_post_html(
            r#"<video src="/api/placeholder/400/300" controls class="wx-blog-element"></video>"#,
        );
        assert!(html.starts_with("<video"));
        assert!(html.contains("controls"));
        assert!(html.contains(r#"src="/api/placeholder/400/300""#));
    }

    #[test]
    fn javascript_links_are_dropped() {
        let html = sanitize_post_html(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!html.contains("javascript"));
    }
}
