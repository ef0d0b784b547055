//! Session module for sheetboard.
//!
//! This module tracks which users are currently logged in:
//! - `Session`, the per-user login record
//! - `SessionRegistry`, the shared username-keyed registry
//!
//! Sessions have no expiry; they enter the registry on login and leave
//! it only through an explicit unregister.

mod registry;

pub use registry::{Session, SessionRegistry};
