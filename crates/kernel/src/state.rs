//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use dashmap::DashMap;
use tracing::info;
use wx_blog::BlogService;
use wx_blog::comments::{Comment, CommentThread};
use wx_blog::editor::EditorSession;

use crate::config::Config;
use crate::host::DevHost;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,

    host: DevHost,

    /// Blog plugin bound to `host`.
    blog: BlogService,

    /// Theme engine for rendering templates.
    theme: Arc<ThemeEngine>,

    /// Comment threads keyed by post id. Not persisted.
    comments: DashMap<String, CommentThread>,

    /// Open inline editor buffers keyed by post id.
    editors: DashMap<String, EditorSession>,
}

impl AppState {
    /// Create the host, mount the blog plugin and register its pages.
    pub async fn new(config: &Config) -> Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
        tokio::fs::create_dir_all(&config.uploads_dir)
            .await
            .with_context(|| format!("failed to create {}", config.uploads_dir.display()))?;

        let theme = ThemeEngine::new(&config.templates_dir).with_context(|| {
            format!(
                "failed to load templates from {}",
                config.templates_dir.display()
            )
        })?;

        let host = DevHost::new(config);
        let blog = BlogService::new(host.context());
        blog.mount().context("failed to register blog components")?;

        // Pages live in memory, so every start registers them again.
        let pages = blog
            .regenerate_pages()
            .context("failed to register blog pages")?;
        info!(pages, "blog plugin mounted");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config: config.clone(),
                host,
                blog,
                theme: Arc::new(theme),
                comments: DashMap::new(),
                editors: DashMap::new(),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn host(&self) -> &DevHost {
        &self.inner.host
    }

    pub fn blog(&self) -> &BlogService {
        &self.inner.blog
    }

    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    /// Comments shown under a post, starting from the sample thread.
    pub fn comments(&self, post_id: &str) -> Vec<Comment> {
        self.inner
            .comments
            .entry(post_id.to_string())
            .or_default()
            .comments()
            .to_vec()
    }

    /// Add a comment to a post's thread. Blank text is ignored.
    pub fn submit_comment(&self, post_id: &str, text: &str) -> Option<Comment> {
        self.inner
            .comments
            .entry(post_id.to_string())
            .or_default()
            .submit(text)
            .cloned()
    }

    /// The open editor buffer for a post, if any.
    pub fn editor(&self, post_id: &str) -> Option<EditorSession> {
        self.inner.editors.get(post_id).map(|s| s.clone())
    }

    /// Apply `f` to the post's editor buffer, opening it from `content`
    /// when none is open.
    pub fn with_editor<R>(
        &self,
        post_id: &str,
        content: &str,
        f: impl FnOnce(&mut EditorSession) -> R,
    ) -> R {
        let mut session = self
            .inner
            .editors
            .entry(post_id.to_string())
            .or_insert_with(|| EditorSession::open(post_id, content));
        f(session.value_mut())
    }

    /// Discard a post's editor buffer.
    pub fn close_editor(&self, post_id: &str) -> Option<EditorSession> {
        self.inner.editors.remove(post_id).map(|(_, s)| s)
    }
}
