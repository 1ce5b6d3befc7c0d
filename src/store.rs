use std::future::Future;
use std::path::{Path, PathBuf};

use reqwest::Client;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// One row of the `songs` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub date: String,
    pub name: String,
    pub artist: String,
    pub lyrics: Vec<String>,
    pub spotify_id: String,
    pub image_url: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("malformed row: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("table 'songs' not found")]
    MissingTable,

    #[error("lookup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Read-only access to songs keyed by their `YYYY/MM/DD` date.
pub trait SongStore: Send + Sync + 'static {
    /// Fetch at most one song whose `date` column equals `date`.
    fn find_by_date(
        &self,
        date: &str,
    ) -> impl Future<Output = Result<Option<Song>, StoreError>> + Send;

    /// Cheap round trip used by the health check.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Songs served by a hosted Supabase project through its PostgREST API.
pub struct SupabaseStore {
    http_client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    fn songs_url(&self) -> String {
        format!("{}/rest/v1/songs", self.base_url)
    }

    fn request(&self, query: &[(&str, &str)]) -> reqwest::RequestBuilder {
        self.http_client
            .get(self.songs_url())
            .query(query)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    fn lookup_request(&self, date: &str) -> reqwest::RequestBuilder {
        let filter = format!("eq.{date}");
        self.request(&[("select", "*"), ("date", filter.as_str()), ("limit", "1")])
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Status { status, body });
    }
    Ok(response)
}

/// PostgREST always answers with an array; keep the first row.
fn first_row(body: &str) -> Result<Option<Song>, StoreError> {
    let rows: Vec<Song> = serde_json::from_str(body)?;
    debug!(rows = rows.len(), "supabase lookup");
    Ok(rows.into_iter().next())
}

impl SongStore for SupabaseStore {
    async fn find_by_date(&self, date: &str) -> Result<Option<Song>, StoreError> {
        let response = ensure_success(self.lookup_request(date).send().await?).await?;
        first_row(&response.text().await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let request = self.request(&[("select", "date"), ("limit", "1")]);
        ensure_success(request.send().await?).await?;
        Ok(())
    }
}

/// Songs read from a local SQLite file, with `lyrics` stored as a JSON array.
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open the database read-only and check that the `songs` table exists.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        let conn = open_read_only(&db_path)?;
        conn.query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='songs'",
            [],
            |_| Ok(()),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::MissingTable,
            e => StoreError::Sqlite(e),
        })?;
        Ok(Self { db_path })
    }
}

impl SongStore for SqliteStore {
    async fn find_by_date(&self, date: &str) -> Result<Option<Song>, StoreError> {
        let db_path = self.db_path.clone();
        let date = date.to_owned();
        tokio::task::spawn_blocking(move || query_song(&db_path, &date)).await?
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            open_read_only(&db_path)?.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await?
    }
}

fn open_read_only(path: &Path) -> Result<Connection, StoreError> {
    Ok(Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?)
}

fn query_song(db_path: &Path, date: &str) -> Result<Option<Song>, StoreError> {
    let conn = open_read_only(db_path)?;
    let row: Option<(String, String, String, String, String, String)> = conn
        .query_row(
            "SELECT date, name, artist, lyrics, spotifyId, imageUrl FROM songs WHERE date = ?1 LIMIT 1",
            [date],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )
        .optional()?;

    let Some((date, name, artist, lyrics, spotify_id, image_url)) = row else {
        return Ok(None);
    };
    Ok(Some(Song {
        date,
        name,
        artist,
        lyrics: serde_json::from_str(&lyrics)?,
        spotify_id,
        image_url,
    }))
}
