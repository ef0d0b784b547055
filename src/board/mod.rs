//! Board module for sheetboard.
//!
//! This module provides the write path of the board:
//! - Sequential id allocation for threads and per-thread posts
//! - Thread and post creation with validation
//! - Read pass-throughs for listings

mod allocator;
mod service;

pub use allocator::IdAllocator;
pub use service::{thread_slug, BoardService, ThreadCreation, MAX_BODY_LENGTH, MAX_TITLE_LENGTH};
