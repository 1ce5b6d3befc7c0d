use axum::http::StatusCode;
use chrono::NaiveDate;

use crate::config::Config;
use crate::date::{format_page_date, lenient_page_date, next_day, previous_day};
use crate::html::escape;
use crate::seo::{PageMeta, render_head};
use crate::store::Song;

pub const INVALID_DATE_MESSAGE: &str = "日付の形式が正しくありません";

const HOME_NAV: &str = r#"<nav class="pagination"><a href="/" rel="home">今日の歌詞へ</a></nav>"#;

/// Outcome of a date-page request, decided before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Success { date: NaiveDate, song: Song },
    /// The path did not form a calendar date; holds the raw `yyyy/mm/dd` text.
    InvalidDate { date: String },
    NotFound { date: NaiveDate },
}

impl ViewState {
    pub fn status(&self) -> StatusCode {
        match self {
            ViewState::Success { .. } => StatusCode::OK,
            ViewState::InvalidDate { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ViewState::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn date_label(&self) -> String {
        match self {
            ViewState::Success { date, .. } | ViewState::NotFound { date } => {
                format_page_date(*date)
            }
            ViewState::InvalidDate { date } => date.clone(),
        }
    }

    /// Navigation row; an invalid date links to the days around its rolled-over
    /// reading, or back to today when it has none.
    fn nav_row(&self) -> String {
        match self {
            ViewState::Success { date, .. } | ViewState::NotFound { date } => navigation(*date),
            ViewState::InvalidDate { date } => match lenient_page_date(date) {
                Some(date) => navigation(date),
                None => HOME_NAV.to_string(),
            },
        }
    }
}

fn not_found_message(date: &str) -> String {
    format!("{date} の歌詞はありません")
}

/// Render a full HTML document for `view`.
pub fn render(view: &ViewState, config: &Config) -> String {
    let label = view.date_label();
    let path = format!("/{label}");
    let nav = view.nav_row();
    let attribution = attribution(&config.lastfm_user_id);

    let (title, description, image_url, content) = match view {
        ViewState::Success { song, .. } => {
            let lyrics = song.lyrics.join(" ");
            let title = format!("{label} | {} ― {}", song.name, song.artist);
            let content = format!(
                r#"<h1>📅 {date}</h1>
      <div class="lyrics">{lyrics}</div>
      <h2>{name} ― {artist}</h2>
      <iframe class="player" src="https://open.spotify.com/embed/track/{spotify_id}" width="100%" height="352" frameborder="0" allowfullscreen allow="clipboard-write; encrypted-media; picture-in-picture" loading="lazy"></iframe>"#,
                date = escape(&label),
                lyrics = escape(&lyrics),
                name = escape(&song.name),
                artist = escape(&song.artist),
                spotify_id = escape(&song.spotify_id),
            );
            (title, lyrics, song.image_url.as_str(), content)
        }
        ViewState::InvalidDate { .. } | ViewState::NotFound { .. } => {
            let status = view.status();
            let heading = format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            );
            let message = match view {
                ViewState::NotFound { .. } => not_found_message(&label),
                _ => INVALID_DATE_MESSAGE.to_string(),
            };
            let content = format!(
                r#"<h1>{heading}</h1>
      <p class="message">{message}</p>"#,
                heading = escape(&heading),
                message = escape(&message),
            );
            (
                heading,
                message,
                config.placeholder_image_url.as_str(),
                content,
            )
        }
    };

    let head = render_head(
        &PageMeta {
            title: &title,
            description: &description,
            image_url,
            path: &path,
        },
        &config.site_domain,
        &config.twitter_id,
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
  {head}
</head>
<body>
  <div class="main">
    <div class="content">
      {content}
      {nav}
      {attribution}
    </div>
  </div>
</body>
</html>"#
    )
}

/// Links to the neighbouring days.
fn navigation(date: NaiveDate) -> String {
    let prev = previous_day(date).map(|d| {
        let d = format_page_date(d);
        format!(r#"<a href="/{d}" rel="prev">← {d}</a>"#)
    });
    let next = next_day(date).map(|d| {
        let d = format_page_date(d);
        format!(r#"<a href="/{d}" rel="next">{d} →</a>"#)
    });
    format!(
        r#"<nav class="pagination">{}{}</nav>"#,
        prev.unwrap_or_default(),
        next.unwrap_or_default()
    )
}

fn attribution(lastfm_user_id: &str) -> String {
    let user = escape(lastfm_user_id);
    format!(
        r#"<p class="attribution"><a href="https://www.last.fm/user/{user}">🎧 last.fm/@{user}</a> の直近トップトラックから、1日1回ランダムに歌詞をピックアップしています</p>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "SITE_DOMAIN" => Some("lyrics.example.com".into()),
            "LASTFM_USER_ID" => Some("listener".into()),
            _ => None,
        })
        .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn song() -> Song {
        Song {
            date: "2024/02/29".into(),
            name: "Lemon".into(),
            artist: "Kenshi Yonezu".into(),
            lyrics: vec!["夢ならば".into(), "どれほど".into(), "よかったでしょう".into()],
            spotify_id: "04TshWXkhV1qkqHzf31Hn6".into(),
            image_url: "https://i.scdn.co/image/lemon".into(),
        }
    }

    mod success {
        use super::*;

        fn rendered() -> String {
            render(
                &ViewState::Success {
                    date: ymd(2024, 2, 29),
                    song: song(),
                },
                &config(),
            )
        }

        #[test]
        fn shows_song_and_joined_lyrics() {
            let html = rendered();
            assert!(html.contains("<h1>📅 2024/02/29</h1>"));
            assert!(html.contains("夢ならば どれほど よかったでしょう"));
            assert!(html.contains("<h2>Lemon ― Kenshi Yonezu</h2>"));
        }

        #[test]
        fn embeds_spotify_player() {
            assert!(rendered().contains(
                "https://open.spotify.com/embed/track/04TshWXkhV1qkqHzf31Hn6"
            ));
        }

        #[test]
        fn navigates_across_leap_day() {
            let html = rendered();
            assert!(html.contains(r#"<a href="/2024/02/28" rel="prev">"#));
            assert!(html.contains(r#"<a href="/2024/03/01" rel="next">"#));
        }

        #[test]
        fn uses_song_image_for_preview() {
            let html = rendered();
            assert!(html.contains(r#"<meta property="og:image" content="https://i.scdn.co/image/lemon">"#));
            assert!(html.contains(r#"<link rel="canonical" href="https://lyrics.example.com/2024/02/29">"#));
        }

        #[test]
        fn credits_lastfm_user() {
            let html = rendered();
            assert!(html.contains(r#"<a href="https://www.last.fm/user/listener">🎧 last.fm/@listener</a>"#));
            assert!(html.contains("1日1回ランダムに歌詞をピックアップしています"));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn not_found_embeds_date_and_keeps_navigation() {
            let view = ViewState::NotFound {
                date: ymd(2023, 12, 31),
            };
            assert_eq!(view.status(), StatusCode::NOT_FOUND);

            let html = render(&view, &config());
            assert!(html.contains("<h1>404 Not Found</h1>"));
            assert!(html.contains("2023/12/31 の歌詞はありません"));
            assert!(html.contains(r#"href="/2023/12/30""#));
            assert!(html.contains(r#"href="/2024/01/01""#));
            assert!(html.contains("https://lyrics.example.com/assets/ogp.png"));
        }

        #[test]
        fn invalid_date_shows_fixed_message() {
            let view = ViewState::InvalidDate {
                date: "2023/13/40".into(),
            };
            assert_eq!(view.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let html = render(&view, &config());
            assert!(html.contains("<h1>500 Internal Server Error</h1>"));
            assert!(html.contains(INVALID_DATE_MESSAGE));
            assert!(html.contains("noindex,nofollow,noarchive"));
        }

        #[test]
        fn invalid_numeric_date_links_to_rolled_over_neighbours() {
            let view = ViewState::InvalidDate {
                date: "2023/13/40".into(),
            };
            let html = render(&view, &config());
            assert!(html.contains(r#"<nav class="pagination">"#));
            assert!(html.contains(r#"<a href="/2024/02/08" rel="prev">"#));
            assert!(html.contains(r#"<a href="/2024/02/10" rel="next">"#));
        }

        #[test]
        fn invalid_text_date_links_home() {
            let view = ViewState::InvalidDate {
                date: "abcd/ef/gh".into(),
            };
            let html = render(&view, &config());
            assert!(html.contains(r#"<nav class="pagination"><a href="/" rel="home">"#));
            assert!(!html.contains(r#"rel="prev""#));
        }

        #[test]
        fn invalid_date_text_is_escaped() {
            let view = ViewState::InvalidDate {
                date: "<b>/1/1".into(),
            };
            let html = render(&view, &config());
            assert!(!html.contains("<b>"));
        }
    }
}
