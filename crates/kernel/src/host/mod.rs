//! Development host.
//!
//! Implements the builder's host capabilities for a single-process server:
//! namespaces are JSON files, media lands in the uploads directory, pages and
//! the plugin registry live in memory, and the signed-in user comes from
//! configuration.

pub mod media;
pub mod store;

use std::sync::Arc;

use wx_sdk::HostContext;
use wx_sdk::memory::{MemoryPages, MemoryPlugins, StaticAuth};

use crate::config::Config;

pub use media::LocalMediaLibrary;
pub use store::FileStateStore;

/// Name and namespace the built-in auth plugin registers under.
pub const AUTH_PLUGIN_NAMESPACE: &str = "auth";

#[derive(Debug, Clone)]
pub struct DevHost {
    pub store: Arc<FileStateStore>,
    pub pages: Arc<MemoryPages>,
    pub media: Arc<LocalMediaLibrary>,
    pub auth: Arc<StaticAuth>,
    pub plugins: Arc<MemoryPlugins>,
}

impl DevHost {
    pub fn new(config: &Config) -> Self {
        let plugins = MemoryPlugins::new();
        plugins.register(wx_blog::AUTH_PLUGIN, AUTH_PLUGIN_NAMESPACE);

        Self {
            store: Arc::new(FileStateStore::new(&config.data_dir)),
            pages: Arc::new(MemoryPages::new(&config.site_url)),
            media: Arc::new(LocalMediaLibrary::new(
                &config.uploads_dir,
                &config.files_url,
            )),
            auth: Arc::new(StaticAuth::new(config.user())),
            plugins: Arc::new(plugins),
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
