use std::env;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::FixedOffset;

/// Where song rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseConfig {
    Supabase { url: String, anon_key: String },
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Bare domain used for canonical URLs and `og:site_name`.
    pub site_domain: String,
    pub twitter_id: String,
    /// last.fm account whose top tracks feed the daily pick.
    pub lastfm_user_id: String,
    /// Zone in which "today" is computed for the root redirect.
    pub utc_offset: FixedOffset,
    pub placeholder_image_url: String,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = var("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse::<u16>()
            .context("PORT must be a port number")?;
        let site_domain = var("SITE_DOMAIN").unwrap_or_else(|| "localhost:8080".into());
        let utc_offset = var("TZ_OFFSET")
            .unwrap_or_else(|| "+09:00".into())
            .parse::<FixedOffset>()
            .context("TZ_OFFSET must look like +09:00")?;
        let placeholder_image_url = var("PLACEHOLDER_IMAGE_URL")
            .unwrap_or_else(|| format!("https://{site_domain}/assets/ogp.png"));

        let database = match (var("SUPABASE_URL"), var("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => DatabaseConfig::Supabase { url, anon_key },
            (Some(_), None) => bail!("SUPABASE_URL is set but SUPABASE_ANON_KEY is missing"),
            _ => {
                let path = var("DATABASE_PATH").unwrap_or_else(|| "./data/songs.db".into());
                // Keep the read-only store inside the data volume.
                if !path.starts_with("/data/")
                    && !path.starts_with("/app/data/")
                    && !path.starts_with("./data/")
                {
                    bail!("DATABASE_PATH must be within /data/, /app/data/, or ./data/");
                }
                DatabaseConfig::Sqlite { path: path.into() }
            }
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            site_domain,
            twitter_id: var("TWITTER_ID").unwrap_or_else(|| "@iamtakagi".into()),
            lastfm_user_id: var("LASTFM_USER_ID").unwrap_or_else(|| "iamtakagi".into()),
            utc_offset,
            placeholder_image_url,
            database,
        })
    }
}
