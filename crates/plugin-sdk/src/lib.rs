//! WX Plugin SDK
//!
//! Types and capability traits shared between the website builder host and
//! its plugins. Every host service a plugin touches (persistence, pages,
//! media, the signed-in user, other plugins) is an injected trait object so
//! plugin logic can run against the in-memory host in tests.

pub mod host;
pub mod host_errors;
pub mod memory;
pub mod types;

pub use host::{AuthProvider, HostContext, MediaLibrary, PageRegistry, PluginApi, StateStore};
pub use host_errors::{HostError, HostResult};

// Re-export serde_json so plugins share the host's JSON value type.
#[doc(hidden)]
pub use serde_json;

pub mod prelude {
    pub use crate::host::*;
    pub use crate::host_errors::{HostError, HostResult};
    pub use crate::types::*;
}
