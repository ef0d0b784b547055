//! Board service for sheetboard.
//!
//! High-level thread and post operations: input validation, id
//! allocation and the append to the content store, in that order. An
//! append that fails after its id was allocated leaves a permanent,
//! logged gap in the sequence; the id is never reissued.

use std::sync::Arc;

use tracing::{info, warn};

use super::IdAllocator;
use crate::store::{ContentStore, NewPost, NewThread, Post, Thread};
use crate::{BoardError, Result};

/// Maximum length for thread titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 50;

/// Maximum length for post bodies (in characters).
pub const MAX_BODY_LENGTH: usize = 10_000;

/// Validate a thread title.
fn validate_title(title: &str) -> Result<()> {
    let char_count = title.chars().count();
    if char_count > MAX_TITLE_LENGTH {
        return Err(BoardError::Validation(format!(
            "title too long (max {MAX_TITLE_LENGTH} characters)"
        )));
    }
    if title.trim().is_empty() {
        return Err(BoardError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

/// Validate a post body.
fn validate_body(body: &str) -> Result<()> {
    let char_count = body.chars().count();
    if char_count > MAX_BODY_LENGTH {
        return Err(BoardError::Validation(format!(
            "body too long (max {MAX_BODY_LENGTH} characters)"
        )));
    }
    if body.trim().is_empty() {
        return Err(BoardError::Validation("body must not be empty".to_string()));
    }
    Ok(())
}

fn validate_author(author: &str) -> Result<()> {
    if author.trim().is_empty() {
        return Err(BoardError::InvalidUsername);
    }
    Ok(())
}

/// A freshly created thread together with its opening post.
#[derive(Debug, Clone)]
pub struct ThreadCreation {
    /// The thread row that was appended.
    pub thread: Thread,
    /// The opening post carrying the creator's text.
    pub opening_post: Post,
}

/// Service for thread and post operations.
pub struct BoardService {
    store: Arc<dyn ContentStore>,
    allocator: IdAllocator,
}

impl BoardService {
    /// Create a service over a store handle.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        let allocator = IdAllocator::new(Arc::clone(&store));
        Self { store, allocator }
    }

    /// List all threads, newest first.
    pub async fn list_threads(&self) -> Result<Vec<Thread>> {
        let mut threads = self.store.list_threads().await?;
        threads.sort_by(|a, b| b.thread_id.cmp(&a.thread_id));
        Ok(threads)
    }

    /// Get one thread by id.
    pub async fn get_thread(&self, thread_id: i64) -> Result<Thread> {
        self.store
            .list_threads()
            .await?
            .into_iter()
            .find(|t| t.thread_id == thread_id)
            .ok_or_else(|| BoardError::NotFound("thread".to_string()))
    }

    /// List the posts of a thread in reading order.
    pub async fn list_posts(&self, thread_id: i64) -> Result<Vec<Post>> {
        let mut posts = self.store.list_posts(thread_id).await?;
        posts.sort_by_key(|p| p.post_id);
        Ok(posts)
    }

    /// Create a thread and its opening post.
    ///
    /// The creator's text becomes the first post of the new thread;
    /// its post id comes from the thread's own sequence, which starts
    /// at 1.
    pub async fn create_thread(
        &self,
        title: &str,
        author: &str,
        body: &str,
    ) -> Result<ThreadCreation> {
        validate_title(title)?;
        validate_body(body)?;
        validate_author(author)?;

        let thread_id = self.allocator.next_thread_id().await?;
        let thread = match self.store.append_thread(&NewThread::new(thread_id, title)).await {
            Ok(thread) => thread,
            Err(e) => {
                warn!(thread_id, "thread append failed, id becomes a gap");
                return Err(e);
            }
        };

        let post_id = self.allocator.next_post_id(thread_id).await?;
        let row = NewPost::new(thread_id, post_id, author, body);
        let opening_post = match self.store.append_post(&row).await {
            Ok(post) => post,
            Err(e) => {
                warn!(
                    thread_id,
                    post_id, "opening post append failed, id becomes a gap"
                );
                return Err(e);
            }
        };

        info!(thread_id, author = %author, "created thread");
        Ok(ThreadCreation {
            thread,
            opening_post,
        })
    }

    /// Append a post to an existing thread.
    pub async fn create_post(&self, thread_id: i64, author: &str, body: &str) -> Result<Post> {
        validate_body(body)?;
        validate_author(author)?;

        // Resolve the thread before allocating, so a bad thread id
        // cannot burn an id from some thread's sequence.
        self.get_thread(thread_id).await?;

        let post_id = self.allocator.next_post_id(thread_id).await?;
        let row = NewPost::new(thread_id, post_id, author, body);
        let post = match self.store.append_post(&row).await {
            Ok(post) => post,
            Err(e) => {
                warn!(thread_id, post_id, "post append failed, id becomes a gap");
                return Err(e);
            }
        };

        info!(thread_id, post_id, author = %author, "created post");
        Ok(post)
    }
}

/// Path fragment identifying a thread: the id joined with the title,
/// spaces flattened to underscores.
pub fn thread_slug(thread: &Thread) -> String {
    format!("{}={}", thread.thread_id, thread.title.replace(' ', "_"))
}
