//! Per-response view state.
//!
//! Everything a renderer needs to know about the viewer lives in one
//! owned value, built fresh for each response from a registry
//! snapshot. Overlapping requests each get their own context, so no
//! request can repaint another's page.

use chrono::{DateTime, Utc};

use crate::datetime::format_utc_datetime_default;
use crate::session::{Session, SessionRegistry};
use crate::Result;

/// Which banner a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Banner {
    /// Front-page banner for anonymous viewers.
    #[default]
    Top,
    /// Member banner with the logged-in navigation.
    Logged,
}

/// Display state for one response.
#[derive(Debug, Clone)]
pub struct ViewContext {
    /// Username of the viewer, if logged in.
    pub current_user: Option<String>,
    /// Whether the viewer has an active session.
    pub logged_in: bool,
    /// Banner variant for this page.
    pub banner: Banner,
    /// Set on the response that completed a registration.
    pub just_registered: bool,
    /// One-shot message for this response (e.g. a duplicate-username
    /// rejection).
    pub notice: Option<String>,
    timezone: String,
}

impl ViewContext {
    /// Context for an anonymous viewer.
    pub fn anonymous(timezone: impl Into<String>) -> Self {
        Self {
            current_user: None,
            logged_in: false,
            banner: Banner::Top,
            just_registered: false,
            notice: None,
            timezone: timezone.into(),
        }
    }

    /// Context from an optional session snapshot.
    pub fn from_session(session: Option<&Session>, timezone: impl Into<String>) -> Self {
        match session {
            Some(session) => Self {
                current_user: Some(session.username.clone()),
                logged_in: session.login_flag,
                banner: Banner::Logged,
                just_registered: false,
                notice: None,
                timezone: timezone.into(),
            },
            None => Self::anonymous(timezone),
        }
    }

    /// Context for a named viewer, looked up in the registry.
    ///
    /// A username without a session yields the anonymous context; the
    /// page simply renders logged out.
    pub async fn for_user(
        registry: &SessionRegistry,
        username: &str,
        timezone: impl Into<String>,
    ) -> Result<Self> {
        let session = registry.find(username).await?;
        Ok(Self::from_session(session.as_ref(), timezone))
    }

    /// Attach a one-shot notice.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Mark this response as the one completing a registration.
    pub fn with_just_registered(mut self) -> Self {
        self.just_registered = true;
        self
    }

    /// Format a row timestamp in the viewer's timezone.
    pub fn format_timestamp(&self, at: &DateTime<Utc>) -> String {
        format_utc_datetime_default(at, &self.timezone)
    }
}
