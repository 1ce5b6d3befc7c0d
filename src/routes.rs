use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect},
    routing::get,
};
use chrono::{DateTime, FixedOffset, Utc};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::config::Config;
use crate::date;
use crate::page::{self, ViewState};
use crate::store::SongStore;

/// A date's page never changes once published.
pub const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

const STYLESHEET: &str = include_str!("../assets/index.css");

pub struct AppState<S> {
    pub config: Config,
    pub store: S,
}

pub fn router<S: SongStore>(state: Arc<AppState<S>>) -> Router {
    let date_route = get(date_page::<S>).layer(SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static(IMMUTABLE_CACHE),
    ));

    Router::new()
        .route("/", get(index::<S>))
        .route("/health", get(health::<S>))
        .route("/assets/index.css", get(stylesheet))
        .route("/{yyyy}/{mm}/{dd}", date_route.clone())
        .route("/{yyyy}/{mm}/{dd}/", date_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root - permanent redirect to today's page
async fn index<S: SongStore>(State(state): State<Arc<AppState<S>>>) -> Redirect {
    Redirect::permanent(&today_path(Utc::now(), state.config.utc_offset))
}

fn today_path(now: DateTime<Utc>, offset: FixedOffset) -> String {
    format!("/{}", date::format_page_date(date::today_in(now, offset)))
}

/// Song page for a `yyyy/mm/dd` path
async fn date_page<S: SongStore>(
    Path((yyyy, mm, dd)): Path<(String, String, String)>,
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Html<String>) {
    let requested = date::join_segments(&yyyy, &mm, &dd);
    let view = resolve(&state.store, &requested).await;
    (view.status(), Html(page::render(&view, &state.config)))
}

/// Decide the view for a requested date. Invalid dates never reach the store.
pub async fn resolve<S: SongStore>(store: &S, requested: &str) -> ViewState {
    let Some(date) = date::parse_page_date(requested) else {
        debug!(requested, "rejecting unparsable date");
        return ViewState::InvalidDate {
            date: requested.to_owned(),
        };
    };

    let key = date::format_page_date(date);
    match store.find_by_date(&key).await {
        Ok(Some(song)) => {
            debug!(date = %song.date, name = %song.name, "song found");
            ViewState::Success { date, song }
        }
        Ok(None) => ViewState::NotFound { date },
        Err(e) => {
            // Rendered as a plain 404; the log is the only place the cause shows up.
            warn!(date = %key, error = %e, "song lookup failed");
            ViewState::NotFound { date }
        }
    }
}

/// Health check endpoint - verifies the song store answers
async fn health<S: SongStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<&'static str, (StatusCode, String)> {
    state
        .store
        .ping()
        .await
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, format!("DB error: {e}")))?;
    Ok("ok")
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}
