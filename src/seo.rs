use crate::html::escape;

const FONTS_CSS: &str = "https://fonts.googleapis.com/css2?family=Noto+Sans+JP:wght@500;700&family=Open+Sans:wght@600;700&display=swap";
const YAKUHAN_CSS: &str = "https://cdn.jsdelivr.net/npm/yakuhanjp@3.4.1/dist/css/yakuhanjp.min.css";
pub const SITE_CSS: &str = "/assets/index.css";

/// Per-page inputs to the document head.
#[derive(Debug, Clone, Copy)]
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: &'a str,
    /// Request path, used for the canonical link and `og:url`.
    pub path: &'a str,
}

/// Render the contents of `<head>`.
///
/// Every page is excluded from indexing; the tags exist for link previews only.
pub fn render_head(meta: &PageMeta<'_>, site_domain: &str, twitter_id: &str) -> String {
    let title = escape(meta.title);
    let description = escape(meta.description);
    let image = escape(meta.image_url);
    let url = escape(&format!("https://{site_domain}{}", meta.path));
    let site = escape(site_domain);
    let twitter = escape(twitter_id);

    format!(
        r#"<meta charset="utf-8">
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <meta name="referrer" content="origin">
  <meta name="robots" content="noindex,nofollow,noarchive">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <link rel="canonical" href="{url}">
  <meta property="og:type" content="website">
  <meta property="og:site_name" content="{site}">
  <meta property="og:url" content="{url}">
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta property="og:image" content="{image}">
  <link rel="preload" as="image" href="{image}">
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:site" content="{twitter}">
  <meta name="twitter:creator" content="{twitter}">
  <link rel="stylesheet" href="{fonts}">
  <link rel="stylesheet" href="{yakuhan}">
  <link rel="stylesheet" type="text/css" href="{SITE_CSS}">"#,
        fonts = escape(FONTS_CSS),
        yakuhan = YAKUHAN_CSS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> PageMeta<'static> {
        PageMeta {
            title: "2024/02/29 | Lemon",
            description: "夢ならば どれほど",
            image_url: "https://i.scdn.co/image/lemon",
            path: "/2024/02/29",
        }
    }

    #[test]
    fn always_blocks_indexing() {
        let head = render_head(&meta(), "lyrics.example.com", "@someone");
        assert!(head.contains(r#"<meta name="robots" content="noindex,nofollow,noarchive">"#));
    }

    #[test]
    fn emits_plain_and_open_graph_text() {
        let head = render_head(&meta(), "lyrics.example.com", "@someone");
        assert!(head.contains("<title>2024/02/29 | Lemon</title>"));
        assert!(head.contains(r#"<meta name="description" content="夢ならば どれほど">"#));
        assert!(head.contains(r#"<meta property="og:title" content="2024/02/29 | Lemon">"#));
        assert!(head.contains(r#"<meta property="og:description" content="夢ならば どれほど">"#));
        assert!(head.contains(r#"<meta property="og:site_name" content="lyrics.example.com">"#));
        assert!(head.contains(r#"<link rel="canonical" href="https://lyrics.example.com/2024/02/29">"#));
    }

    #[test]
    fn image_is_both_og_tag_and_preload() {
        let head = render_head(&meta(), "lyrics.example.com", "@someone");
        assert!(head.contains(r#"<meta property="og:image" content="https://i.scdn.co/image/lemon">"#));
        assert!(head.contains(r#"<link rel="preload" as="image" href="https://i.scdn.co/image/lemon">"#));
    }

    #[test]
    fn twitter_card_uses_handle() {
        let head = render_head(&meta(), "lyrics.example.com", "@someone");
        assert!(head.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(head.contains(r#"<meta name="twitter:site" content="@someone">"#));
    }

    #[test]
    fn links_stylesheets() {
        let head = render_head(&meta(), "lyrics.example.com", "@someone");
        assert!(head.contains(r#"href="/assets/index.css""#));
        assert!(head.contains("yakuhanjp.min.css"));
        assert!(head.contains("fonts.googleapis.com"));
    }

    #[test]
    fn escapes_untrusted_text() {
        let meta = PageMeta {
            title: r#"</title><script>"#,
            ..meta()
        };
        let head = render_head(&meta, "lyrics.example.com", "@someone");
        assert!(!head.contains("<script>"));
        assert!(head.contains("&lt;/title&gt;&lt;script&gt;"));
    }

    #[test]
    fn identical_inputs_render_identically() {
        let first = render_head(&meta(), "lyrics.example.com", "@someone");
        let _other = render_head(&PageMeta { title: "other", ..meta() }, "x", "@y");
        let second = render_head(&meta(), "lyrics.example.com", "@someone");
        assert_eq!(first, second);
    }
}
