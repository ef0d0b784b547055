//! In-process content store backend.
//!
//! Used by tests and local development. Keeps the same contract as the
//! remote backend: append/query only, no transactions, and failure
//! injection so callers' error paths can be exercised.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use async_trait::async_trait;

use super::{ContentStore, NewPost, NewThread, Post, Thread};
use crate::{BoardError, Result};

#[derive(Debug, Clone)]
struct UserRow {
    username: String,
    password: String,
}

/// In-memory row store.
///
/// Rows live in plain vectors behind async locks. The `fail_reads` /
/// `fail_appends` switches make every matching operation return
/// `StoreUnavailable` until cleared.
#[derive(Default)]
pub struct MemoryStore {
    threads: RwLock<Vec<Thread>>,
    posts: RwLock<Vec<Post>>,
    users: RwLock<Vec<UserRow>>,
    fail_reads: AtomicBool,
    fail_appends: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read operation fail until cleared.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every append operation fail until cleared.
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Number of thread rows.
    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }

    /// Number of post rows across all threads.
    pub async fn post_count(&self) -> usize {
        self.posts.read().await.len()
    }

    /// Insert a user row directly, bypassing the uniqueness check.
    pub async fn seed_user(&self, username: &str, password: &str) {
        self.users.write().await.push(UserRow {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BoardError::StoreUnavailable(
                "injected read failure".to_string(),
            ));
        }
        Ok(())
    }

    fn check_append(&self) -> Result<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(BoardError::StoreUnavailable(
                "injected append failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_threads(&self) -> Result<Vec<Thread>> {
        self.check_read()?;
        Ok(self.threads.read().await.clone())
    }

    async fn list_posts(&self, thread_id: i64) -> Result<Vec<Post>> {
        self.check_read()?;
        Ok(self
            .posts
            .read()
            .await
            .iter()
            .filter(|p| p.thread_id == thread_id)
            .cloned()
            .collect())
    }

    async fn append_thread(&self, row: &NewThread) -> Result<Thread> {
        self.check_append()?;
        let thread = Thread {
            thread_id: row.thread_id,
            title: row.title.clone(),
            created_at: row.created_at,
        };
        self.threads.write().await.push(thread.clone());
        Ok(thread)
    }

    async fn append_post(&self, row: &NewPost) -> Result<Post> {
        self.check_append()?;
        let post = Post {
            thread_id: row.thread_id,
            post_id: row.post_id,
            author: row.author.clone(),
            created_at: row.created_at,
            body: row.body.clone(),
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        self.check_read()?;
        Ok(self
            .users
            .read()
            .await
            .iter()
            .any(|u| u.username == username))
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<bool> {
        self.check_append()?;
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Ok(false);
        }
        users.push(UserRow {
            username: username.to_string(),
            password: password.to_string(),
        });
        Ok(true)
    }

    async fn check_credentials(&self, username: &str, password: &str) -> Result<bool> {
        self.check_read()?;
        Ok(self
            .users
            .read()
            .await
            .iter()
            .any(|u| u.username == username && u.password == password))
    }
}
