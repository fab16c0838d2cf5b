//! Blog service.
//!
//! Connects the [`Blog`] aggregate to the host. Every command loads the
//! namespace blob, applies the aggregate command, writes the result back and
//! then keeps the host's pages in step. Nothing is cached between calls, so
//! whatever the store holds is the truth.

use chrono::Utc;
use serde_json::{Map, Value};
use wx_sdk::types::{Media, MediaKind};
use wx_sdk::{HostContext, HostResult};

use crate::blog::{Blog, Confirmation, NewPost};
use crate::components::{listing_page, post_page, register_components};
use crate::dashboard::{Dashboard, Tab};
use crate::error::{BlogError, BlogResult, ValidationError};
use crate::form::{CategoryForm, EditPostForm, ImageUpload, PostForm, parse_tags};
use crate::listing::{ListingFilter, ListingView};
use crate::model::{BlogCategory, BlogPost, BlogSettings, BlogState};
use crate::post_view::{PostView, PostViewOptions};
use crate::{AUTH_PLUGIN, NAMESPACE};

/// Alt text given to uploaded featured images.
const FEATURED_IMAGE_ALT: &str = "Post Image";

#[derive(Debug, Clone)]
pub struct BlogService {
    host: HostContext,
}

impl BlogService {
    pub fn new(host: HostContext) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Register the plugin's components with the builder.
    pub fn mount(&self) -> HostResult<()> {
        register_components(self.host.pages.as_ref())
    }

    /// Wait for the auth plugin and ask it to log the user in.
    ///
    /// Failures are logged and returned; nothing is retried.
    pub async fn connect_auth(&self) -> HostResult<()> {
        let handle = match self.host.plugins.await_registration(AUTH_PLUGIN).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(plugin = AUTH_PLUGIN, error = %e, "plugin registration failed");
                return Err(e);
            }
        };
        tracing::info!(plugin = %handle.name, namespace = %handle.namespace, "plugin registered");

        if let Err(e) = self.host.plugins.call_plugin(&handle.namespace, "login").await {
            tracing::warn!(namespace = %handle.namespace, error = %e, "auth login call failed");
            return Err(e);
        }
        Ok(())
    }

    /// Current blog. Missing keys fall back to their defaults.
    pub fn load(&self) -> BlogResult<Blog> {
        let state = match self.host.store.get_state(NAMESPACE)? {
            Some(value) => serde_json::from_value::<BlogState>(value)?,
            None => BlogState::default(),
        };
        tracing::debug!(posts = state.posts.len(), "blog state loaded");
        Ok(Blog::new(state))
    }

    /// Write posts, categories and settings over whatever object the
    /// namespace holds, keeping any other keys.
    fn persist(&self, blog: &Blog) -> BlogResult<()> {
        let mut object = match self.host.store.get_state(NAMESPACE)? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if let Value::Object(fields) = serde_json::to_value(blog.state())? {
            object.extend(fields);
        }
        self.host
            .store
            .put_item_in_store(NAMESPACE, Value::Object(object))?;
        Ok(())
    }

    pub async fn create_post(
        &self,
        form: PostForm,
        image: Option<ImageUpload>,
    ) -> BlogResult<BlogPost> {
        let user = self.host.auth.current_user();
        form.validate(user.as_ref(), image.as_ref())
            .inspect_err(|e| tracing::warn!(error = %e, "post rejected"))?;
        let (Some(user), Some(image)) = (user, image) else {
            return Err(ValidationError::MissingFields.into());
        };

        let now = Utc::now();
        let title = form.title.trim().to_string();
        let media = Media {
            id: format!("post_{title}_{}", now.timestamp_millis()),
            title: title.clone(),
            date: now,
            url: image.data_url,
            kind: MediaKind::Image,
            alt: FEATURED_IMAGE_ALT.to_string(),
        };
        let featured_image = self
            .host
            .media
            .add_media(media)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "featured image upload failed"))?;

        let blog = self.load()?;
        let (blog, post) = blog.create_post(
            NewPost {
                title,
                content: form.content,
                excerpt: form.excerpt,
                author: user.display_name(),
                category: form.category.trim().to_string(),
                tags: parse_tags(&form.tags),
                status: form.status,
                featured_image,
            },
            now,
        );
        self.persist(&blog)?;
        self.host.pages.add_page(post_page(&post))?;

        tracing::info!(
            post_id = %post.id,
            slug = %post.slug,
            category = %post.category,
            "post created"
        );
        Ok(post)
    }

    pub fn update_post(&self, id: &str, form: &EditPostForm) -> BlogResult<BlogPost> {
        let blog = self.load()?;
        let (blog, post) = blog
            .update_post(id, form, Utc::now())
            .inspect_err(|e| tracing::warn!(post_id = id, error = %e, "post update rejected"))?;
        self.persist(&blog)?;
        // Same page id, so this replaces the page at the old path.
        self.host.pages.add_page(post_page(&post))?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "post updated");
        Ok(post)
    }

    /// Overwrite a post's HTML, as saved from the inline editor.
    pub fn save_post_content(&self, id: &str, content: &str) -> BlogResult<()> {
        let blog = self.load()?.edit_content(id, content)?;
        self.persist(&blog)?;
        tracing::info!(post_id = id, "post content saved");
        Ok(())
    }

    /// Delete a post and the page registered for it.
    ///
    /// Returns `None` when the confirmation was declined.
    pub fn delete_post(
        &self,
        id: &str,
        confirmation: Confirmation,
    ) -> BlogResult<Option<BlogPost>> {
        let Some((blog, removed)) = self.load()?.delete_post(id, confirmation)? else {
            tracing::debug!(post_id = id, "post delete declined");
            return Ok(None);
        };
        self.persist(&blog)?;

        let path = removed.page_path();
        // Another post with the same slug still owns a page at that path.
        let path_shared = blog.post_by_slug(&removed.slug).is_some();
        for page in self.host.pages.get_pages()? {
            if page.id == removed.id || (!path_shared && page.url == path) {
                self.host.pages.remove_page(&page)?;
            }
        }

        tracing::info!(post_id = %removed.id, slug = %removed.slug, "post deleted");
        Ok(Some(removed))
    }

    /// Register every post page and the listing page again.
    pub fn regenerate_pages(&self) -> BlogResult<usize> {
        let blog = self.load()?;
        for post in blog.posts() {
            self.host.pages.add_page(post_page(post))?;
        }
        self.host.pages.add_page(listing_page())?;

        let count = blog.posts().len();
        tracing::info!(posts = count, "blog pages regenerated");
        Ok(count)
    }

    pub fn create_category(&self, form: &CategoryForm) -> BlogResult<BlogCategory> {
        let id = uuid::Uuid::now_v7().to_string();
        let (blog, category) = self
            .load()?
            .create_category(form, id)
            .inspect_err(|e| tracing::warn!(error = %e, "category rejected"))?;
        self.persist(&blog)?;
        tracing::info!(id = %category.id, category = %category.name, "category created");
        Ok(category)
    }

    pub fn update_category(&self, id: &str, form: &CategoryForm) -> BlogResult<BlogCategory> {
        let blog = self
            .load()?
            .update_category(id, form)
            .inspect_err(|e| tracing::warn!(id, error = %e, "category update rejected"))?;
        self.persist(&blog)?;
        let category = blog
            .category(id)
            .cloned()
            .ok_or_else(|| BlogError::CategoryNotFound(id.to_string()))?;
        tracing::info!(id, category = %category.name, "category updated");
        Ok(category)
    }

    /// Delete a category, moving its posts to Uncategorized.
    ///
    /// Returns `None` when the confirmation was declined.
    pub fn delete_category(
        &self,
        id: &str,
        confirmation: Confirmation,
    ) -> BlogResult<Option<BlogCategory>> {
        let outcome = self
            .load()?
            .delete_category(id, confirmation)
            .inspect_err(|e| tracing::warn!(id, error = %e, "category delete rejected"))?;
        let Some((blog, removed)) = outcome else {
            return Ok(None);
        };
        self.persist(&blog)?;
        tracing::info!(id, category = %removed.name, "category deleted");
        Ok(Some(removed))
    }

    pub fn save_settings(&self, settings: BlogSettings) -> BlogResult<BlogSettings> {
        let blog = self
            .load()?
            .save_settings(settings)
            .inspect_err(|e| tracing::warn!(error = %e, "settings rejected"))?;
        self.persist(&blog)?;
        tracing::info!("blog settings saved");
        Ok(blog.settings().clone())
    }

    pub fn dashboard(&self, tab: Tab, search: &str) -> BlogResult<Dashboard> {
        Ok(Dashboard::build(&self.load()?, tab, search))
    }

    pub fn listing(&self, filter: ListingFilter) -> BlogResult<ListingView> {
        Ok(ListingView::build(
            &self.load()?,
            filter,
            self.host.pages.as_ref(),
        ))
    }

    pub fn post_view(&self, path: &str, options: &PostViewOptions) -> BlogResult<PostView> {
        Ok(PostView::resolve(
            &self.load()?,
            path,
            options,
            self.host.pages.as_ref(),
        ))
    }
}
