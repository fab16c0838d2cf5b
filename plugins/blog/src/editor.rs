//! Inline HTML block editor.
//!
//! The editor keeps the post's HTML in a buffer. Dropping a snippet from the
//! sidebar appends its fragment; saving writes the buffer back to the post.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Class every inserted element carries.
pub const ELEMENT_CLASS: &str = "wx-blog-element";

/// Snippets offered in the editor sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    Title,
    Paragraph,
    Image,
    Quote,
    Code,
    #[serde(alias = "ul")]
    List,
    Video,
    Divider,
}

impl SnippetKind {
    pub const ALL: [SnippetKind; 8] = [
        Self::Title,
        Self::Paragraph,
        Self::Image,
        Self::Quote,
        Self::Code,
        Self::List,
        Self::Video,
        Self::Divider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Paragraph => "paragraph",
            Self::Image => "image",
            Self::Quote => "quote",
            Self::Code => "code",
            Self::List => "list",
            Self::Video => "video",
            Self::Divider => "divider",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Paragraph => "Paragraph",
            Self::Image => "Image",
            Self::Quote => "Quote",
            Self::Code => "Code",
            Self::List => "List",
            Self::Video => "Video",
            Self::Divider => "Divider",
        }
    }

    /// HTML inserted for this snippet.
    pub fn fragment(&self) -> &'static str {
        match self {
            Self::Title => r#"<h1 class="wx-blog-element">Title</h1>"#,
            Self::Paragraph => r#"<p class="wx-blog-element">Paragraph</p>"#,
            Self::Image => {
                r#"<img src="/api/placeholder/400/300" alt="Image" class="wx-blog-element">"#
            }
            Self::Quote => r#"<blockquote class="wx-blog-element">Quote</blockquote>"#,
            Self::Code => r#"<pre><code class="wx-blog-element">Code</code></pre>"#,
            Self::List => {
                r#"<ul class="wx-blog-element"><li>Item 1</li><li>Item 2</li><li>Item 3</li></ul>"#
            }
            Self::Video => {
                r#"<video src="/api/placeholder/400/300" controls class="wx-blog-element"></video>"#
            }
            Self::Divider => r#"<hr class="wx-blog-element wx-divider">"#,
        }
    }
}

impl fmt::Display for SnippetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "paragraph" => Ok(Self::Paragraph),
            "image" => Ok(Self::Image),
            "quote" => Ok(Self::Quote),
            "code" => Ok(Self::Code),
            "list" | "ul" => Ok(Self::List),
            "video" => Ok(Self::Video),
            "divider" => Ok(Self::Divider),
            other => Err(format!("unknown snippet kind '{other}'")),
        }
    }
}

/// Edit buffer for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    post_id: String,
    buffer: String,
}

impl EditorSession {
    /// Start editing from the post's current content.
    pub fn open(post_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            buffer: content.into(),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn content(&self) -> &str {
        &self.buffer
    }

    /// Append a snippet on a new line.
    pub fn drop_snippet(&mut self, kind: SnippetKind) {
        self.buffer.push('\n');
        self.buffer.push_str(kind.fragment());
    }

    /// Replace the whole buffer, as when the author types in the source view.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.buffer = content.into();
    }

    pub fn into_content(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn every_fragment_carries_the_element_class() {
        for kind in SnippetKind::ALL {
            assert!(kind.fragment().contains(ELEMENT_CLASS), "{kind}");
        }
    }

    #[test]
    fn ul_is_an_alias_for_list() {
        assert_eq!("ul".parse::<SnippetKind>().unwrap(), SnippetKind::List);
        assert_eq!("List".parse::<SnippetKind>().unwrap(), SnippetKind::List);
        let kind: SnippetKind = serde_json::from_value(serde_json::json!("ul")).unwrap();
        assert_eq!(kind, SnippetKind::List);
        assert!("table".parse::<SnippetKind>().is_err());
    }

    #[test]
    fn dropping_appends_on_new_line() {
        let mut session = EditorSession::open("1", "<p>Intro</p>");
        session.drop_snippet(SnippetKind::Title);
        session.drop_snippet(SnippetKind::Divider);
        assert_eq!(
            session.content(),
            "<p>Intro</p>\n<h1 class=\"wx-blog-element\">Title</h1>\n<hr class=\"wx-blog-element wx-divider\">"
        );
        assert_eq!(session.post_id(), "1");
    }

    #[test]
    fn empty_buffer_still_gets_leading_newline() {
        let mut session = EditorSession::open("1", "");
        session.drop_snippet(SnippetKind::Paragraph);
        assert_eq!(session.into_content(), "\n<p class=\"wx-blog-element\">Paragraph</p>");
    }
}
