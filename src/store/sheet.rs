//! Sheet-backed content store.
//!
//! HTTP client for a spreadsheet-style row API: `GET {base}/{tab}`
//! returns a JSON array of rows, `POST {base}/{tab}` appends one row.
//! The API is append/query only; there are no transactions and no
//! server-assigned ids. Credentials live in the users tab and are
//! compared cell-for-cell, the way the backing sheet defines them.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ContentStore, NewPost, NewThread, Post, Thread};
use crate::config::StoreConfig;
use crate::datetime::parse_row_datetime;
use crate::{BoardError, Result};

/// User agent string for store requests.
const USER_AGENT: &str = "sheetboard/0.1 (row store client)";

/// Thread row as it travels on the wire. Sheet cells are strings, so
/// the timestamp is a string here and parsed on the way in.
#[derive(Debug, Serialize, Deserialize)]
struct ThreadRow {
    thread_id: i64,
    title: String,
    created_at: String,
}

/// Post row as it travels on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct PostRow {
    thread_id: i64,
    post_id: i64,
    author: String,
    created_at: String,
    body: String,
}

/// User row as it travels on the wire.
#[derive(Debug, Deserialize)]
struct UserRow {
    username: String,
    password: String,
}

/// Payload for appending a user row.
#[derive(Debug, Serialize)]
struct NewUserRow<'a> {
    username: &'a str,
    password: &'a str,
}

/// Content store backed by a remote sheet row API.
pub struct SheetStore {
    client: Client,
    base_url: String,
    api_token: String,
    threads_tab: String,
    posts_tab: String,
    users_tab: String,
}

impl SheetStore {
    /// Create a store client from configuration.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BoardError::StoreUnavailable(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            threads_tab: config.threads_tab.clone(),
            posts_tab: config.posts_tab.clone(),
            users_tab: config.users_tab.clone(),
        })
    }

    fn tab_url(&self, tab: &str) -> String {
        format!("{}/{}", self.base_url, tab)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, tab: &str) -> Result<Vec<T>> {
        let mut request = self.client.get(self.tab_url(tab));
        if !self.api_token.is_empty() {
            request = request.bearer_auth(&self.api_token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(BoardError::StoreUnavailable(format!(
                "HTTP error {} reading tab {}",
                response.status(),
                tab
            )));
        }

        let rows = response.json::<Vec<T>>().await?;
        debug!(tab = %tab, rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    async fn append_row<T: Serialize + Sync>(&self, tab: &str, row: &T) -> Result<()> {
        let mut request = self.client.post(self.tab_url(tab)).json(row);
        if !self.api_token.is_empty() {
            request = request.bearer_auth(&self.api_token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(BoardError::StoreUnavailable(format!(
                "HTTP error {} appending to tab {}",
                response.status(),
                tab
            )));
        }

        debug!(tab = %tab, "appended row");
        Ok(())
    }
}

fn decode_timestamp(cell: &str, tab: &str) -> Result<DateTime<Utc>> {
    parse_row_datetime(cell).ok_or_else(|| {
        BoardError::StoreUnavailable(format!("unparseable timestamp {cell:?} in tab {tab}"))
    })
}

fn thread_from_row(row: ThreadRow, tab: &str) -> Result<Thread> {
    Ok(Thread {
        thread_id: row.thread_id,
        title: row.title,
        created_at: decode_timestamp(&row.created_at, tab)?,
    })
}

fn post_from_row(row: PostRow, tab: &str) -> Result<Post> {
    Ok(Post {
        thread_id: row.thread_id,
        post_id: row.post_id,
        author: row.author,
        created_at: decode_timestamp(&row.created_at, tab)?,
        body: row.body,
    })
}

#[async_trait]
impl ContentStore for SheetStore {
    async fn list_threads(&self) -> Result<Vec<Thread>> {
        let rows: Vec<ThreadRow> = self.fetch_rows(&self.threads_tab).await?;
        rows.into_iter()
            .map(|row| thread_from_row(row, &self.threads_tab))
            .collect()
    }

    async fn list_posts(&self, thread_id: i64) -> Result<Vec<Post>> {
        // The row API has no filter parameter; posts of one thread are
        // selected client-side.
        let rows: Vec<PostRow> = self.fetch_rows(&self.posts_tab).await?;
        rows.into_iter()
            .filter(|row| row.thread_id == thread_id)
            .map(|row| post_from_row(row, &self.posts_tab))
            .collect()
    }

    async fn append_thread(&self, row: &NewThread) -> Result<Thread> {
        let wire = ThreadRow {
            thread_id: row.thread_id,
            title: row.title.clone(),
            created_at: row.created_at.to_rfc3339(),
        };
        self.append_row(&self.threads_tab, &wire).await?;
        Ok(Thread {
            thread_id: row.thread_id,
            title: row.title.clone(),
            created_at: row.created_at,
        })
    }

    async fn append_post(&self, row: &NewPost) -> Result<Post> {
        let wire = PostRow {
            thread_id: row.thread_id,
            post_id: row.post_id,
            author: row.author.clone(),
            created_at: row.created_at.to_rfc3339(),
            body: row.body.clone(),
        };
        self.append_row(&self.posts_tab, &wire).await?;
        Ok(Post {
            thread_id: row.thread_id,
            post_id: row.post_id,
            author: row.author.clone(),
            created_at: row.created_at,
            body: row.body.clone(),
        })
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        let rows: Vec<UserRow> = self.fetch_rows(&self.users_tab).await?;
        Ok(rows.iter().any(|u| u.username == username))
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<bool> {
        // Check-then-append, same as the sheet itself would do it; a
        // concurrent writer can still win the race, which is the
        // store's documented (lack of) guarantee.
        if self.username_exists(username).await? {
            return Ok(false);
        }
        let row = NewUserRow { username, password };
        self.append_row(&self.users_tab, &row).await?;
        Ok(true)
    }

    async fn check_credentials(&self, username: &str, password: &str) -> Result<bool> {
        let rows: Vec<UserRow> = self.fetch_rows(&self.users_tab).await?;
        Ok(rows
            .iter()
            .any(|u| u.username == username && u.password == password))
    }
}
