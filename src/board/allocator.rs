//! Sequential id allocation against the content store.
//!
//! The store assigns no ids and has no transactions, so uniqueness
//! comes entirely from serializing allocations in this process: one
//! gate per id sequence, held across the store read. Ids handed out
//! for appends that later fail are never reissued; the sequence keeps
//! its own high-water mark and simply moves past the hole.
//!
//! This is only sound while this process is the sole writer of the
//! store, which is the deployment the board assumes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::store::ContentStore;
use crate::{BoardError, Result};

/// Serialization scope for one id sequence.
struct Scope {
    /// Gate held for the whole allocation, including the store read.
    gate: Mutex<()>,
    /// Highest id this process ever issued for the sequence. Survives
    /// failed appends, so their ids become permanent gaps.
    last_issued: AtomicI64,
    /// Set when a duplicate became possible; the scope is dead then.
    poisoned: AtomicBool,
}

impl Scope {
    fn new() -> Self {
        Self {
            gate: Mutex::new(()),
            last_issued: AtomicI64::new(0),
            poisoned: AtomicBool::new(false),
        }
    }
}

/// Allocator for thread ids and per-thread post ids.
///
/// Thread ids form one global sequence; post ids form one sequence per
/// thread. Sequences are independent: allocations in different scopes
/// run concurrently, allocations in the same scope serialize.
pub struct IdAllocator {
    store: Arc<dyn ContentStore>,
    thread_scope: Arc<Scope>,
    post_scopes: Mutex<HashMap<i64, Arc<Scope>>>,
}

impl IdAllocator {
    /// Create an allocator over a store handle.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            thread_scope: Arc::new(Scope::new()),
            post_scopes: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate the next thread id.
    ///
    /// Returns `max(store, already issued) + 1`. A store read failure
    /// propagates as `StoreUnavailable` and leaves the sequence where
    /// it was.
    pub async fn next_thread_id(&self) -> Result<i64> {
        let scope = Arc::clone(&self.thread_scope);
        let _gate = scope.gate.lock().await;
        check_poison(&scope, "threads")?;

        let entry_mark = scope.last_issued.load(Ordering::SeqCst);
        let threads = self.store.list_threads().await?;
        let store_max = threads.iter().map(|t| t.thread_id).max().unwrap_or(0);

        commit(&scope, "threads", entry_mark, store_max)
    }

    /// Allocate the next post id within a thread.
    ///
    /// Same discipline as [`next_thread_id`](Self::next_thread_id),
    /// scoped to the thread: two posts in the same thread serialize,
    /// posts in different threads do not contend.
    pub async fn next_post_id(&self, thread_id: i64) -> Result<i64> {
        let scope = self.post_scope(thread_id).await;
        let label = format!("posts/{thread_id}");

        let _gate = scope.gate.lock().await;
        check_poison(&scope, &label)?;

        let entry_mark = scope.last_issued.load(Ordering::SeqCst);
        let posts = self.store.list_posts(thread_id).await?;
        let store_max = posts.iter().map(|p| p.post_id).max().unwrap_or(0);

        commit(&scope, &label, entry_mark, store_max)
    }

    async fn post_scope(&self, thread_id: i64) -> Arc<Scope> {
        // The map lock is only held to fetch the scope handle, never
        // across the store read.
        let mut scopes = self.post_scopes.lock().await;
        Arc::clone(
            scopes
                .entry(thread_id)
                .or_insert_with(|| Arc::new(Scope::new())),
        )
    }
}

fn check_poison(scope: &Scope, label: &str) -> Result<()> {
    if scope.poisoned.load(Ordering::SeqCst) {
        return Err(BoardError::DuplicateAllocation {
            scope: label.to_string(),
        });
    }
    Ok(())
}

/// Commit one allocation: compute the candidate and advance the
/// high-water mark, verifying the sequence did not move behind the
/// gate's back.
fn commit(scope: &Scope, label: &str, entry_mark: i64, store_max: i64) -> Result<i64> {
    let base = store_max.max(entry_mark);
    let candidate = match base.checked_add(1) {
        Some(id) => id,
        None => {
            // The id space is spent; any id this scope could issue
            // from here would repeat an existing one.
            scope.poisoned.store(true, Ordering::SeqCst);
            error!(scope = %label, last = base, "id space exhausted, poisoning scope");
            return Err(BoardError::DuplicateAllocation {
                scope: label.to_string(),
            });
        }
    };

    // last_issued only moves while the gate is held. A mismatch means
    // an allocation ran unserialized, and the id it returned may equal
    // ours; neither can be trusted from here on.
    match scope.last_issued.compare_exchange(
        entry_mark,
        candidate,
        Ordering::SeqCst,
        Ordering::SeqCst,
    ) {
        Ok(_) => {
            debug!(scope = %label, id = candidate, "allocated id");
            Ok(candidate)
        }
        Err(found) => {
            scope.poisoned.store(true, Ordering::SeqCst);
            error!(
                scope = %label,
                expected = entry_mark,
                found,
                "id issued outside the allocation gate, poisoning scope"
            );
            Err(BoardError::DuplicateAllocation {
                scope: label.to_string(),
            })
        }
    }
}
