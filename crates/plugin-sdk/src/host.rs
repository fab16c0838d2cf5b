//! Host capability traits.
//!
//! The website builder exposes its services to plugins through these traits.
//! Plugins receive them bundled in a [`HostContext`] and never reach for a
//! concrete host type, which keeps plugin logic testable against
//! [`crate::memory`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::host_errors::HostResult;
use crate::types::{BuilderComponent, Media, Page, PluginHandle, User};

/// Namespaced key-value persistence.
///
/// Each namespace holds one JSON value. A write replaces the whole value;
/// callers that want to keep foreign keys must merge before writing.
pub trait StateStore: Send + Sync {
    /// Read the value stored under `namespace`, or `None` if nothing was
    /// ever written there.
    fn get_state(&self, namespace: &str) -> HostResult<Option<Value>>;

    /// Replace the value stored under `namespace`.
    fn put_item_in_store(&self, namespace: &str, value: Value) -> HostResult<()>;
}

/// Page registration and routing.
pub trait PageRegistry: Send + Sync {
    /// Register a page. A page with the same id is replaced.
    fn add_page(&self, page: Page) -> HostResult<()>;

    /// Remove a previously registered page (matched by id).
    fn remove_page(&self, page: &Page) -> HostResult<()>;

    /// All registered pages, in registration order.
    fn get_pages(&self) -> HostResult<Vec<Page>>;

    /// Build the absolute URL for a site-relative path.
    fn construct_page_url(&self, path: &str) -> String;

    /// Offer components to the builder's palette under a group label.
    fn add_available_components(
        &self,
        group: &str,
        components: Vec<BuilderComponent>,
    ) -> HostResult<()>;
}

/// Media library uploads.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Store the media and return the durable URL it is served from.
    async fn add_media(&self, media: Media) -> HostResult<String>;
}

/// Read-only access to the signed-in user.
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Access to other plugins loaded by the host.
#[async_trait]
pub trait PluginApi: Send + Sync {
    /// Wait until the named plugin has registered. No timeout is applied.
    async fn await_registration(&self, name: &str) -> HostResult<PluginHandle>;

    /// Invoke an action exposed by a registered plugin.
    async fn call_plugin(&self, namespace: &str, action: &str) -> HostResult<Value>;
}

/// The set of host capabilities handed to a plugin.
///
/// Cloning is cheap; every capability is behind an `Arc`.
#[derive(Clone)]
pub struct HostContext {
    pub store: Arc<dyn StateStore>,
    pub pages: Arc<dyn PageRegistry>,
    pub media: Arc<dyn MediaLibrary>,
    pub auth: Arc<dyn AuthProvider>,
    pub plugins: Arc<dyn PluginApi>,
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext").finish_non_exhaustive()
    }
}
