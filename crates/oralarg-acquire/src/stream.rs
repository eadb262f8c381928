use crate::http;
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

fn m3u8_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s"'<>]+\.m3u8"#).expect("valid regex"))
}

/// First HLS manifest URL embedded anywhere in a media player page.
pub fn extract_m3u8(html: &str) -> Option<String> {
    m3u8_pattern().find(html).map(|m| m.as_str().to_string())
}

/// Fetch a case's media player page and pull the stream manifest out of it.
///
/// `Ok(None)` means the page loaded but carries no manifest (clip withdrawn
/// or not yet encoded).
pub async fn resolve_stream(client: &reqwest::Client, player_url: &str) -> Result<Option<String>> {
    let html = http::fetch_page(client, player_url).await?;
    let stream = extract_m3u8(&html);
    tracing::debug!(player = %player_url, bytes = html.len(), found = stream.is_some(), "Scanned media player page");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{self, TestServer};

    #[test]
    fn test_extract_from_player_script() {
        let html = r#"
        <script type="text/javascript">
            var player = jwplayer('player').setup({
                file: "https://archive-stream.granicus.com/OnDemand/_definst_/mp4:archive/azcourts/azcourts_1234.mp4/playlist.m3u8",
                image: "https://example.test/thumb.jpg"
            });
        </script>
        "#;
        assert_eq!(
            extract_m3u8(html).as_deref(),
            Some("https://archive-stream.granicus.com/OnDemand/_definst_/mp4:archive/azcourts/azcourts_1234.mp4/playlist.m3u8")
        );
    }

    #[test]
    fn test_extract_first_of_many() {
        let html = "<video src='http://a.test/one.m3u8'></video><source src=\"https://b.test/two.m3u8\">";
        assert_eq!(extract_m3u8(html).as_deref(), Some("http://a.test/one.m3u8"));
    }

    #[tokio::test]
    async fn test_resolve_stream_over_http() {
        let server = TestServer::start(vec![
            ("/MediaPlayer.php?clip_id=1", vec![(200, r#"<script>file: "https://cdn.test/v/1/playlist.m3u8"</script>"#)]),
            ("/MediaPlayer.php?clip_id=2", vec![(200, "<p>This clip is not available.</p>")]),
        ])
        .await;
        let client = test_server::client();

        let found = resolve_stream(&client, &server.url("/MediaPlayer.php?clip_id=1")).await.unwrap();
        assert_eq!(found.as_deref(), Some("https://cdn.test/v/1/playlist.m3u8"));

        let missing = resolve_stream(&client, &server.url("/MediaPlayer.php?clip_id=2")).await.unwrap();
        assert_eq!(missing, None);

        let err = resolve_stream(&client, &server.url("/MediaPlayer.php?clip_id=3")).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_m3u8("<html><body>Video unavailable</body></html>"), None);
        assert_eq!(extract_m3u8("https://a.test/video.mp4"), None);
    }
}
