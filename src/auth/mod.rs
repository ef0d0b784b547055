//! Authentication flows for sheetboard.
//!
//! This module wires the content store's user operations to the
//! session registry: login, logout and account registration.
//! Credential verification itself belongs to the store; this layer
//! only sequences the calls and keeps the registry consistent.

mod flows;

pub use flows::{
    login, logout, register_user, LoginError, RegistrationError, RegistrationOutcome,
};
