//! Core types exchanged between the website builder host and plugins.
//!
//! These mirror the JSON shapes the builder stores for pages, media and
//! components, so every type serializes with camelCase keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page registered with the website builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Unique page identifier. Adding a page with an existing id replaces it.
    pub id: String,

    /// Page name shown in the builder's page list.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Site-relative path without a leading slash (e.g. `blog/my-post`).
    pub url: String,

    /// Hidden pages are routable but not listed in site navigation.
    #[serde(default)]
    pub hidden: bool,

    /// Components placed on the page, in order.
    #[serde(default)]
    pub components: Vec<BuilderComponent>,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            url: url.into(),
            hidden: false,
            components: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn component(mut self, component: BuilderComponent) -> Self {
        self.components.push(component);
        self
    }
}

/// Kind of a media library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    File,
}

/// A media library entry submitted for upload.
///
/// `url` carries the source (usually a `data:` URL from a form upload); the
/// host answers with the durable URL it stored the media under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub alt: String,
}

/// The signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            first_name: None,
            last_name: None,
            email: email.into(),
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Name used when attributing content to this user.
    ///
    /// `"First Last"` when a first name is known, otherwise the email.
    pub fn display_name(&self) -> String {
        match self.first_name.as_deref().filter(|f| !f.trim().is_empty()) {
            Some(first) => match self.last_name.as_deref().filter(|l| !l.trim().is_empty()) {
                Some(last) => format!("{first} {last}"),
                None => first.to_string(),
            },
            None => self.email.clone(),
        }
    }
}

/// A component a plugin offers to the builder's component palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderComponent {
    pub id: String,

    /// Always `"plugin"` for plugin-provided components.
    #[serde(rename = "type")]
    pub component_type: String,

    /// Label shown in the palette.
    pub content: String,

    /// Icon name for the palette entry.
    pub icon: String,

    /// Renderer key inside the plugin (e.g. `"BlogPost"`, `"grid__01"`).
    pub plugin: String,

    /// Name of the plugin that owns the component.
    pub plugin_name: String,

    /// Typed settings the host surfaces as component configuration.
    #[serde(default)]
    pub plugin_settings: Vec<PluginSetting>,
}

impl BuilderComponent {
    pub fn new(id: &str, plugin_name: &str, plugin: &str) -> Self {
        Self {
            id: id.into(),
            component_type: "plugin".into(),
            content: String::new(),
            icon: String::new(),
            plugin: plugin.into(),
            plugin_name: plugin_name.into(),
            plugin_settings: Vec::new(),
        }
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.into();
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn setting(mut self, setting: PluginSetting) -> Self {
        self.plugin_settings.push(setting);
        self
    }

    /// Look up a setting by name.
    pub fn get_setting(&self, name: &str) -> Option<&SettingValue> {
        self.plugin_settings
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.value)
    }
}

/// A single typed component setting with its default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSetting {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub value: SettingValue,
}

impl PluginSetting {
    pub fn string(name: &str, description: &str, default: &str) -> Self {
        Self::new(name, description, SettingValue::String(default.into()))
    }

    pub fn boolean(name: &str, description: &str, default: bool) -> Self {
        Self::new(name, description, SettingValue::Boolean(default))
    }

    pub fn number(name: &str, description: &str, default: f64) -> Self {
        Self::new(name, description, SettingValue::Number(default))
    }

    fn new(name: &str, description: &str, value: SettingValue) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value,
        }
    }
}

/// A setting value tagged with its schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SettingValue {
    String(String),
    Boolean(bool),
    Number(f64),
}

impl SettingValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Handle returned once another plugin has registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginHandle {
    /// Plugin name it registered under (e.g. `"wx-auth"`).
    pub name: String,
    /// Namespace used to address calls to the plugin.
    pub namespace: String,
}
