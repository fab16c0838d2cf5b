//! Theme engine with Tera templates and suggestion resolution.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tera::Tera;
use tracing::debug;

use crate::content::sanitize_post_html;

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping suggestion lists to resolved template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a new theme engine loading templates from the given directory.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        Self::register_filters(&mut tera);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine from in-memory templates (for testing).
    pub fn from_templates(templates: &[(&str, &str)]) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())
            .context("failed to parse templates")?;
        Self::register_filters(&mut tera);
        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Register custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        // Dates arrive either as RFC 3339 strings (serialized chrono values)
        // or as Unix timestamps.
        tera.register_filter(
            "format_date",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let date = match value {
                    tera::Value::String(s) => DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|d| d.with_timezone(&Utc)),
                    tera::Value::Number(n) => n
                        .as_i64()
                        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
                    _ => return Ok(tera::Value::String(String::new())),
                };

                let formatted = date
                    .map(|dt| wx_blog::dashboard::format_date(&dt))
                    .unwrap_or_else(|| "Unknown date".to_string());
                Ok(tera::Value::String(formatted))
            },
        );

        // Post HTML through the allowlist; templates still need `| safe` after it.
        tera.register_filter(
            "filtered_html",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let html = tera::try_get_value!("filtered_html", "value", String, value);
                Ok(tera::Value::String(sanitize_post_html(&html)))
            },
        );
    }

    /// Render a template by name.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render {template}"))
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    /// Results are cached.
    ///
    /// Example suggestions: `["blog/post--hello-world", "blog/post"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let cache_key = suggestions.join("|");
        if let Some(cached) = self.suggestion_cache.get(&cache_key) {
            return Some(cached.clone());
        }

        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                self.suggestion_cache
                    .insert(cache_key, template_name.clone());
                return Some(template_name);
            }

            if self.tera.get_template(suggestion).is_ok() {
                let name = (*suggestion).to_string();
                self.suggestion_cache.insert(cache_key, name.clone());
                return Some(name);
            }
        }

        None
    }

    /// Template suggestions for a single post, most specific first.
    pub fn post_suggestions(slug: &str) -> Vec<String> {
        vec![format!("blog/post--{slug}"), "blog/post".to_string()]
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("templates", &self.tera.get_template_names().count())
            .field("cached_suggestions", &self.suggestion_cache.len())
            .finish()
    }
}
