//! In-memory host capabilities.
//!
//! Used by plugin tests and by hosts that do not need durable storage. Each
//! type also records what was asked of it so tests can assert on host
//! interactions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::Notify;

use crate::host::{AuthProvider, HostContext, MediaLibrary, PageRegistry, PluginApi, StateStore};
use crate::host_errors::{HostError, HostResult};
use crate::types::{BuilderComponent, Media, Page, PluginHandle, User};

/// Key-value store held in a hash map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get_state(&self, namespace: &str) -> HostResult<Option<Value>> {
        Ok(self.values.read().get(namespace).cloned())
    }

    fn put_item_in_store(&self, namespace: &str, value: Value) -> HostResult<()> {
        self.values.write().insert(namespace.to_string(), value);
        Ok(())
    }
}

/// Page registry held in memory.
#[derive(Debug)]
pub struct MemoryPages {
    base_url: String,
    pages: RwLock<Vec<Page>>,
    components: RwLock<Vec<(String, BuilderComponent)>>,
}

impl MemoryPages {
    /// Create a registry whose page URLs are rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            pages: RwLock::new(Vec::new()),
            components: RwLock::new(Vec::new()),
        }
    }

    /// Components offered to the palette, with their group label.
    pub fn available_components(&self) -> Vec<(String, BuilderComponent)> {
        self.components.read().clone()
    }

    /// Find a page by its site-relative URL.
    pub fn find_by_url(&self, url: &str) -> Option<Page> {
        self.pages.read().iter().find(|p| p.url == url).cloned()
    }
}

impl Default for MemoryPages {
    fn default() -> Self {
        Self::new("")
    }
}

impl PageRegistry for MemoryPages {
    fn add_page(&self, page: Page) -> HostResult<()> {
        let mut pages = self.pages.write();
        match pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page,
            None => pages.push(page),
        }
        Ok(())
    }

    fn remove_page(&self, page: &Page) -> HostResult<()> {
        let mut pages = self.pages.write();
        let before = pages.len();
        pages.retain(|p| p.id != page.id);
        if pages.len() == before {
            return Err(HostError::NotFound(format!("page '{}'", page.id)));
        }
        Ok(())
    }

    fn get_pages(&self) -> HostResult<Vec<Page>> {
        Ok(self.pages.read().clone())
    }

    fn construct_page_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn add_available_components(
        &self,
        group: &str,
        components: Vec<BuilderComponent>,
    ) -> HostResult<()> {
        let mut registered = self.components.write();
        for component in components {
            registered.retain(|(_, c)| c.id != component.id);
            registered.push((group.to_string(), component));
        }
        Ok(())
    }
}

/// Media library that keeps uploads in memory.
///
/// Uploaded media is answered with `memory://media/<id>`. Call
/// [`MemoryMedia::fail_uploads`] to make every upload fail.
#[derive(Debug, Default)]
pub struct MemoryMedia {
    uploads: RwLock<Vec<Media>>,
    failing: RwLock<Option<String>>,
}

impl MemoryMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent uploads fail with the given reason.
    pub fn fail_uploads(&self, reason: impl Into<String>) {
        *self.failing.write() = Some(reason.into());
    }

    /// Media received so far.
    pub fn uploads(&self) -> Vec<Media> {
        self.uploads.read().clone()
    }
}

#[async_trait]
impl MediaLibrary for MemoryMedia {
    async fn add_media(&self, media: Media) -> HostResult<String> {
        if let Some(reason) = self.failing.read().clone() {
            return Err(HostError::Upload(reason));
        }
        let url = format!("memory://media/{}", media.id);
        self.uploads.write().push(media);
        Ok(url)
    }
}

/// Auth provider with a settable current user.
#[derive(Debug, Default)]
pub struct StaticAuth {
    user: RwLock<Option<User>>,
}

impl StaticAuth {
    pub fn new(user: Option<User>) -> Self {
        Self {
            user: RwLock::new(user),
        }
    }

    pub fn sign_in(&self, user: User) {
        *self.user.write() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }
}

/// Plugin registry that resolves `await_registration` once a plugin registers.
#[derive(Debug, Default)]
pub struct MemoryPlugins {
    registrations: RwLock<HashMap<String, Result<PluginHandle, String>>>,
    calls: RwLock<Vec<(String, String)>>,
    changed: Notify,
}

impl MemoryPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `name`, addressed by `namespace`.
    pub fn register(&self, name: &str, namespace: &str) {
        self.registrations.write().insert(
            name.to_string(),
            Ok(PluginHandle {
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
        );
        self.changed.notify_waiters();
    }

    /// Make registration of `name` fail for every waiter.
    pub fn reject(&self, name: &str, reason: &str) {
        self.registrations
            .write()
            .insert(name.to_string(), Err(reason.to_string()));
        self.changed.notify_waiters();
    }

    /// `(namespace, action)` pairs passed to `call_plugin`.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().clone()
    }
}

#[async_trait]
impl PluginApi for MemoryPlugins {
    async fn await_registration(&self, name: &str) -> HostResult<PluginHandle> {
        loop {
            // Created before the lookup so a registration racing the check
            // still wakes this waiter.
            let notified = self.changed.notified();
            let entry = self.registrations.read().get(name).cloned();
            if let Some(entry) = entry {
                return entry.map_err(HostError::Registration);
            }
            notified.await;
        }
    }

    async fn call_plugin(&self, namespace: &str, action: &str) -> HostResult<Value> {
        let known = self
            .registrations
            .read()
            .values()
            .any(|r| matches!(r, Ok(h) if h.namespace == namespace));
        if !known {
            return Err(HostError::NotFound(format!("plugin namespace '{namespace}'")));
        }
        self.calls
            .write()
            .push((namespace.to_string(), action.to_string()));
        tracing::debug!(namespace, action, "plugin call");
        Ok(Value::Null)
    }
}

/// A complete in-memory host.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    pub store: Arc<MemoryStore>,
    pub pages: Arc<MemoryPages>,
    pub media: Arc<MemoryMedia>,
    pub auth: Arc<StaticAuth>,
    pub plugins: Arc<MemoryPlugins>,
}

impl MemoryHost {
    /// Create a host with page URLs rooted at `base_url` and the given user
    /// signed in.
    pub fn new(base_url: &str, user: Option<User>) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            pages: Arc::new(MemoryPages::new(base_url)),
            media: Arc::new(MemoryMedia::new()),
            auth: Arc::new(StaticAuth::new(user)),
            plugins: Arc::new(MemoryPlugins::new()),
        }
    }

    /// Capabilities as trait objects for handing to a plugin.
    pub fn context(&self) -> HostContext {
        HostContext {
            store: self.store.clone(),
            pages: self.pages.clone(),
            media: self.media.clone(),
            auth: self.auth.clone(),
            plugins: self.plugins.clone(),
        }
    }
}
