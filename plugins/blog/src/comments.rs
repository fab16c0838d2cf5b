//! Comment widget shown under a post.
//!
//! Comments are not persisted; a thread starts from three sample comments
//! and lives as long as whoever holds it.

use serde::Serialize;

/// Author name given to comments submitted from the widget.
pub const LOCAL_AUTHOR: &str = "You";

const LOCAL_AVATAR: &str = "https://ui-avatars.com/api/?name=You&background=6366f1&color=fff&size=150";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub avatar: String,
    /// Relative, human-readable date ("2 hours ago").
    pub date: String,
    pub text: String,
}

impl Comment {
    fn new(id: u64, author: &str, avatar: &str, date: &str, text: &str) -> Self {
        Self {
            id,
            author: author.into(),
            avatar: avatar.into(),
            date: date.into(),
            text: text.into(),
        }
    }
}

/// Comments for one post, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentThread {
    comments: Vec<Comment>,
    next_id: u64,
}

impl Default for CommentThread {
    fn default() -> Self {
        Self {
            comments: vec![
                Comment::new(
                    1,
                    "Sarah Chen",
                    "https://images.unsplash.com/photo-1494790108755-2616b612b586?w=150&h=150&fit=crop&crop=face",
                    "2 hours ago",
                    "Great article! Really helped me understand the concepts better.",
                ),
                Comment::new(
                    2,
                    "Mike Johnson",
                    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
                    "4 hours ago",
                    "Thanks for sharing this. The examples were really clear.",
                ),
                Comment::new(
                    3,
                    "Emily Rodriguez",
                    "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
                    "6 hours ago",
                    "I've bookmarked this for future reference. Very helpful!",
                ),
            ],
            next_id: 4,
        }
    }
}

impl CommentThread {
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Add a comment at the top. Blank text is ignored and returns `None`.
    pub fn submit(&mut self, text: &str) -> Option<&Comment> {
        if text.trim().is_empty() {
            return None;
        }
        let comment = Comment::new(self.next_id, LOCAL_AUTHOR, LOCAL_AVATAR, "Just now", text);
        self.next_id += 1;
        self.comments.insert(0, comment);
        self.comments.first()
    }
}
