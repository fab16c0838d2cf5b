//! Seed content used when the store holds nothing for the blog namespace.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    BlogCategory, BlogPost, PostStatus, UNCATEGORIZED_NAME, UNCATEGORIZED_SLUG,
};

const WELCOME_CONTENT: &str = r#"<div class="wx-blog-element">
  <h1 class="wx-blog-element">Is WX Eclipse Powerful? A Deep Dive into Modern Web Development</h1>
</div>

<div class="wx-blog-element">
  <p class="wx-blog-element">Developers keep looking for tools that shorten the path from idea to published site. WX Eclipse bundles a visual builder, a code editor and a plugin system into one workspace. So, <strong>is it actually powerful?</strong></p>
</div>

<div class="wx-blog-element">
  <h2 class="wx-blog-element">What Stands Out</h2>
</div>

<div class="wx-blog-element">
  <ul class="wx-blog-element">
    <li>Visual builder with drag-and-drop components</li>
    <li>Integrated HTML editing for fine control</li>
    <li>Plugins that add whole features, like this blog</li>
    <li>Built-in authentication and user management</li>
    <li>Responsive layouts out of the box</li>
  </ul>
</div>

<div class="wx-blog-element">
  <h2 class="wx-blog-element">Plugins Do the Heavy Lifting</h2>
</div>

<div class="wx-blog-element">
  <blockquote class="wx-blog-element">
    "The blog plugin is a complete content manager: posts, categories, an inline block editor and comments, all living inside pages you already build."
  </blockquote>
</div>

<div class="wx-blog-element">
  <h2 class="wx-blog-element">Verdict</h2>
</div>

<div class="wx-blog-element">
  <p class="wx-blog-element">For teams that want to ship content-driven sites quickly without giving up control over markup, the answer is yes.</p>
</div>

<hr class="wx-blog-element wx-divider">"#;

fn welcome_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 20, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The welcome post shown on a fresh install.
pub fn welcome_post() -> BlogPost {
    BlogPost {
        id: "1".into(),
        title: "Is WX Eclipse powerful?".into(),
        content: WELCOME_CONTENT.into(),
        excerpt: "In the rapidly evolving landscape of web development, developers are constantly seeking tools that can streamline their workflow".into(),
        author: "WX Eclipse".into(),
        category: UNCATEGORIZED_NAME.into(),
        tags: vec![
            "web development".into(),
            "tools".into(),
            "development".into(),
        ],
        status: PostStatus::Published,
        featured_image: "https://example.com/image.jpg".into(),
        created_at: welcome_date(),
        updated_at: welcome_date(),
        slug: "is-wx-eclipse-powerful".into(),
    }
}

/// The always-present fallback category.
pub fn uncategorized() -> BlogCategory {
    BlogCategory {
        id: "1".into(),
        name: UNCATEGORIZED_NAME.into(),
        slug: UNCATEGORIZED_SLUG.into(),
        description: "Default category".into(),
    }
}

pub fn posts() -> Vec<BlogPost> {
    vec![welcome_post()]
}

pub fn categories() -> Vec<BlogCategory> {
    vec![uncategorized()]
}
