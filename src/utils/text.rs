use std::sync::OnceLock;

use anyhow::anyhow;
use regex::Regex;
use url::Url;

/// Matches http(s) urls inside unpacked scripts, stopping before quotes and trailing punctuation.
pub const URL_PATTERN: &str =
    r"(https?)://[-a-zA-Z0-9+&@#/%?=~_|!:,.;]*[-a-zA-Z0-9+&@#/%=~_|]";

pub fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(URL_PATTERN).unwrap())
}

pub fn extract_url(text: &str) -> Option<&str> {
    url_regex().find(text).map(|m| m.as_str())
}

pub fn extract_file_property(script: &str) -> Option<&str> {
    static FILE_PROPERTY_RE: OnceLock<Regex> = OnceLock::new();
    FILE_PROPERTY_RE
        .get_or_init(|| Regex::new(r#"file:\s?['"](?<file>[^"']+)['"]"#).unwrap())
        .captures(script)
        .and_then(|m| Some(m.name("file")?.as_str()))
}

pub fn to_full_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.into()
    }
}

/// Resolves a link found in an unpacked script against the page it was embedded in.
pub fn resolve_url(base: &str, link: &str) -> anyhow::Result<String> {
    let base = Url::parse(base).map_err(|err| anyhow!("[text] invalid base url {base}: {err}"))?;
    let resolved = base.join(&to_full_url(link))?;
    Ok(resolved.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_extract_playlist_url() {
        let script = r#"jwplayer("vplayer").setup({playlist: 'https://example.com/video.m3u8',autostart:true})"#;
        assert_eq!(extract_url(script), Some("https://example.com/video.m3u8"));
    }

    #[test]
    fn should_stop_before_trailing_punctuation() {
        assert_eq!(
            extract_url("see http://example.com/a?b=1&c=2."),
            Some("http://example.com/a?b=1&c=2")
        );
        assert_eq!(extract_url("no links here"), None);
        assert_eq!(extract_url("ftp://example.com/file"), None);
    }

    #[test]
    fn should_extract_file_property() {
        assert_eq!(
            extract_file_property(r#"sources:[{file:"/stream/master.m3u8"}]"#),
            Some("/stream/master.m3u8")
        );
        assert_eq!(
            extract_file_property("sources:[{file: 'https://cdn.example.com/v.mp4'}]"),
            Some("https://cdn.example.com/v.mp4")
        );
        assert_eq!(extract_file_property("sources:[]"), None);
    }

    #[test]
    fn should_resolve_links() {
        assert_eq!(to_full_url("//cdn.example.com/v.mp4"), "https://cdn.example.com/v.mp4");
        assert_eq!(
            resolve_url("https://embed.example.com/e/abc", "/stream/master.m3u8").unwrap(),
            "https://embed.example.com/stream/master.m3u8"
        );
        assert_eq!(
            resolve_url("https://embed.example.com/e/abc", "//cdn.example.com/v.mp4").unwrap(),
            "https://cdn.example.com/v.mp4"
        );
        assert!(resolve_url("not a url", "/stream").is_err());
    }
}
