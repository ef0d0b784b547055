//! Content store module for sheetboard.
//!
//! This module provides the storage boundary of the board:
//! - The `ContentStore` trait, the contract every backend implements
//! - Row models for threads, posts and append payloads
//! - `SheetStore`, the HTTP client for a spreadsheet-style row API
//! - `MemoryStore`, an in-process backend for tests and local runs
//!
//! The store is append/query only and offers no transactions; every
//! call may observe state written by other calls in flight. Callers
//! that need ordering (id allocation in particular) must serialize
//! above this interface.

mod memory;
mod sheet;
mod types;

pub use memory::MemoryStore;
pub use sheet::SheetStore;
pub use types::{NewPost, NewThread, Post, Thread};

use async_trait::async_trait;

use crate::Result;

/// Contract for the external content store.
///
/// Implementations must be safe to share across tasks; all methods
/// take `&self`. Failures surface as
/// [`BoardError::StoreUnavailable`](crate::BoardError::StoreUnavailable)
/// and are never retried at this layer.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// List all thread rows, in storage order.
    async fn list_threads(&self) -> Result<Vec<Thread>>;

    /// List all post rows of one thread, in storage order.
    async fn list_posts(&self, thread_id: i64) -> Result<Vec<Post>>;

    /// Append a thread row. The id comes from the caller.
    async fn append_thread(&self, row: &NewThread) -> Result<Thread>;

    /// Append a post row. Both ids come from the caller.
    async fn append_post(&self, row: &NewPost) -> Result<Post>;

    /// Whether a user row with this username exists.
    async fn username_exists(&self, username: &str) -> Result<bool>;

    /// Append a user row. Returns false if the username was taken.
    async fn create_user(&self, username: &str, password: &str) -> Result<bool>;

    /// Whether the username/password pair matches a stored user row.
    async fn check_credentials(&self, username: &str, password: &str) -> Result<bool>;
}
