//! sheetboard - a small discussion-board core backed by a
//! spreadsheet-style row store.
//!
//! The store assigns no identifiers and offers no transactions; the
//! allocator and the session registry in this crate supply the
//! ordering and uniqueness the board needs on top of it.

pub mod auth;
pub mod board;
pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;
pub mod view;

pub use auth::{login, logout, register_user, LoginError, RegistrationError, RegistrationOutcome};
pub use board::{thread_slug, BoardService, IdAllocator, ThreadCreation};
pub use config::Config;
pub use error::{BoardError, Result};
pub use session::{Session, SessionRegistry};
pub use store::{ContentStore, MemoryStore, NewPost, NewThread, Post, SheetStore, Thread};
pub use view::{Banner, ViewContext};
