//! Row models for the content store.
//!
//! Threads and posts are rows in an append-only, spreadsheet-style
//! store. Identifiers are assigned by the caller (see
//! [`crate::board::IdAllocator`]); the store never invents ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Thread entity representing a discussion thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    /// Unique thread ID.
    pub thread_id: i64,
    /// Thread title.
    pub title: String,
    /// Thread creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

/// Post entity representing a single message inside a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// ID of the thread this post belongs to.
    pub thread_id: i64,
    /// Post ID, sequential within the thread.
    pub post_id: i64,
    /// Username of the author.
    pub author: String,
    /// Post creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Post body text.
    pub body: String,
}

/// Data for appending a new thread row.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// Caller-allocated thread ID.
    pub thread_id: i64,
    /// Thread title.
    pub title: String,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

impl NewThread {
    /// Create a new thread row with the current timestamp.
    pub fn new(thread_id: i64, title: impl Into<String>) -> Self {
        Self {
            thread_id,
            title: title.into(),
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}

/// Data for appending a new post row.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// ID of the thread to post into.
    pub thread_id: i64,
    /// Caller-allocated post ID.
    pub post_id: i64,
    /// Username of the author.
    pub author: String,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Post body text.
    pub body: String,
}

impl NewPost {
    /// Create a new post row with the current timestamp.
    pub fn new(
        thread_id: i64,
        post_id: i64,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            thread_id,
            post_id,
            author: author.into(),
            created_at: Utc::now(),
            body: body.into(),
        }
    }

    /// Override the creation timestamp.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_thread() {
        let row = NewThread::new(3, "Test Thread");
        assert_eq!(row.thread_id, 3);
        assert_eq!(row.title, "Test Thread");
    }

    #[test]
    fn test_new_thread_created_at() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let row = NewThread::new(1, "Old Thread").created_at(at);
        assert_eq!(row.created_at, at);
    }

    #[test]
    fn test_new_post() {
        let row = NewPost::new(3, 2, "alice", "hello");
        assert_eq!(row.thread_id, 3);
        assert_eq!(row.post_id, 2);
        assert_eq!(row.author, "alice");
        assert_eq!(row.body, "hello");
    }

    #[test]
    fn test_thread_serde_round_trip() {
        let thread = Thread {
            thread_id: 7,
            title: "Serde".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        };
        let json = serde_json::to_string(&thread).unwrap();
        let back: Thread = serde_json::from_str(&json).unwrap();
        assert_eq!(back, thread);
    }

    #[test]
    fn test_post_deserialize_from_row_json() {
        let json = r#"{
            "thread_id": 2,
            "post_id": 5,
            "author": "bob",
            "created_at": "2024-01-15T10:30:00Z",
            "body": "first!"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.thread_id, 2);
        assert_eq!(post.post_id, 5);
        assert_eq!(post.author, "bob");
        assert_eq!(post.body, "first!");
    }
}
