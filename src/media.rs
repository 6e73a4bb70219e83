//! Classification of pasted gallery input.
//!
//! Admins paste either a share URL or a full embed snippet. Both are reduced
//! to a platform plus a content id so the stored `media_url` is always the
//! canonical link.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{MediaItemDraft, MediaType};

static YOUTUBE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/].*)?$",
    )
    .expect("valid regex")
});

static INSTAGRAM_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?instagram\.com/(?:p|reel|tv)/([A-Za-z0-9_-]+)/?(?:[?#].*)?$")
        .expect("valid regex")
});

static YOUTUBE_IFRAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<iframe[^>]*\ssrc=["'](?:https?:)?//(?:www\.)?youtube(?:-nocookie)?\.com/embed/([A-Za-z0-9_-]{11})"#,
    )
    .expect("valid regex")
});

static INSTAGRAM_PERMALINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-instgrm-permalink=["']([^"']+)["']"#).expect("valid regex")
});

static DIRECT_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp|mp4|avi|mov)$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
}

impl Platform {
    pub fn media_type(self) -> MediaType {
        match self {
            Platform::Youtube => MediaType::Youtube,
            Platform::Instagram => MediaType::Instagram,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaSource {
    Url { platform: Platform, id: String },
    EmbedCode { platform: Platform, id: String },
    Invalid,
}

impl MediaSource {
    pub fn platform(&self) -> Option<Platform> {
        match self {
            MediaSource::Url { platform, .. } | MediaSource::EmbedCode { platform, .. } => {
                Some(*platform)
            }
            MediaSource::Invalid => None,
        }
    }

    pub fn canonical_url(&self) -> Option<String> {
        match self {
            MediaSource::Url { platform, id } | MediaSource::EmbedCode { platform, id } => {
                Some(canonical_url(*platform, id))
            }
            MediaSource::Invalid => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("invalid {0} url or embed code")]
    InvalidSource(MediaType),
    #[error("media url must be a full http(s) url")]
    InvalidUrl,
}

pub fn parse_media_input(input: &str) -> MediaSource {
    let input = input.trim();
    if input.is_empty() {
        return MediaSource::Invalid;
    }

    if input.starts_with('<') {
        return parse_embed_code(input);
    }

    if let Some(id) = youtube_id(input) {
        return MediaSource::Url {
            platform: Platform::Youtube,
            id,
        };
    }
    if let Some(id) = instagram_id(input) {
        return MediaSource::Url {
            platform: Platform::Instagram,
            id,
        };
    }
    MediaSource::Invalid
}

fn parse_embed_code(code: &str) -> MediaSource {
    if let Some(captures) = YOUTUBE_IFRAME_RE.captures(code) {
        return MediaSource::EmbedCode {
            platform: Platform::Youtube,
            id: captures[1].to_string(),
        };
    }

    if code.contains("instagram-media") {
        let id = INSTAGRAM_PERMALINK_RE
            .captures(code)
            .and_then(|captures| instagram_id(&captures[1]));
        if let Some(id) = id {
            return MediaSource::EmbedCode {
                platform: Platform::Instagram,
                id,
            };
        }
    }

    MediaSource::Invalid
}

pub fn youtube_id(url: &str) -> Option<String> {
    YOUTUBE_URL_RE
        .captures(url.trim())
        .map(|captures| captures[1].to_string())
}

pub fn instagram_id(url: &str) -> Option<String> {
    INSTAGRAM_URL_RE
        .captures(url.trim())
        .map(|captures| captures[1].to_string())
}

pub fn canonical_url(platform: Platform, id: &str) -> String {
    match platform {
        Platform::Youtube => format!("https://www.youtube.com/watch?v={id}"),
        Platform::Instagram => format!("https://www.instagram.com/p/{id}/"),
    }
}

pub fn youtube_thumbnail(id: &str) -> String {
    format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg")
}

pub fn youtube_embed_url(id: &str) -> String {
    format!("https://www.youtube.com/embed/{id}")
}

pub fn is_direct_file(url: &str) -> bool {
    DIRECT_FILE_RE.is_match(url.trim())
}

/// Checks `url` against `media_type` and returns the value to store.
pub fn normalize_media_url(media_type: MediaType, url: &str) -> Result<String, MediaError> {
    let url = url.trim();
    if media_type.is_embedded() {
        let source = parse_media_input(url);
        return match source.platform() {
            Some(platform) if platform.media_type() == media_type => {
                source.canonical_url().ok_or(MediaError::InvalidSource(media_type))
            }
            _ => Err(MediaError::InvalidSource(media_type)),
        };
    }

    if is_direct_file(url) || url.starts_with("http") || url.starts_with('/') {
        Ok(url.to_string())
    } else {
        Err(MediaError::InvalidUrl)
    }
}

/// Rewrites the draft's url to its canonical form and fills a YouTube
/// thumbnail when none was given.
pub fn normalize_draft(draft: &mut MediaItemDraft) -> Result<(), MediaError> {
    draft.media_url = normalize_media_url(draft.media_type, &draft.media_url)?;
    if draft.media_type == MediaType::Youtube && draft.thumbnail_url.is_none() {
        draft.thumbnail_url = youtube_id(&draft.media_url).map(|id| youtube_thumbnail(&id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn youtube_url_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ?si=abc",
            "youtu.be/dQw4w9WgXcQ",
        ] {
            assert_matches!(
                parse_media_input(url),
                MediaSource::Url { platform: Platform::Youtube, ref id } if id == "dQw4w9WgXcQ",
                "{url}"
            );
        }
    }

    #[test]
    fn youtube_id_must_be_eleven_chars() {
        assert_eq!(parse_media_input("https://youtu.be/short"), MediaSource::Invalid);
    }

    #[test]
    fn instagram_url_shapes() {
        for url in [
            "https://www.instagram.com/p/CxYz123AbC/",
            "https://instagram.com/reel/CxYz123AbC",
            "https://www.instagram.com/tv/CxYz123AbC/?utm_source=ig_web",
        ] {
            assert_matches!(
                parse_media_input(url),
                MediaSource::Url { platform: Platform::Instagram, ref id } if id == "CxYz123AbC",
                "{url}"
            );
        }
    }

    #[test]
    fn youtube_iframe_embed() {
        let code = r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/dQw4w9WgXcQ" frameborder="0" allowfullscreen></iframe>"#;
        let source = parse_media_input(code);
        assert_eq!(
            source,
            MediaSource::EmbedCode {
                platform: Platform::Youtube,
                id: "dQw4w9WgXcQ".to_string()
            }
        );
        assert_eq!(
            source.canonical_url().as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
    }

    #[test]
    fn instagram_blockquote_embed() {
        let code = r#"<blockquote class="instagram-media" data-instgrm-permalink="https://www.instagram.com/p/CxYz123AbC/?utm_source=ig_embed" data-instgrm-version="14"></blockquote>"#;
        assert_eq!(
            parse_media_input(code),
            MediaSource::EmbedCode {
                platform: Platform::Instagram,
                id: "CxYz123AbC".to_string()
            }
        );
    }

    #[test]
    fn unrelated_input_is_invalid() {
        assert_eq!(parse_media_input(""), MediaSource::Invalid);
        assert_eq!(parse_media_input("https://vimeo.com/123456"), MediaSource::Invalid);
        assert_eq!(parse_media_input("<div>hello</div>"), MediaSource::Invalid);
    }

    #[test]
    fn direct_file_extensions() {
        assert!(is_direct_file("https://cdn.example.com/recital.MP4"));
        assert!(is_direct_file("/storage/blog-images/a.webp"));
        assert!(!is_direct_file("https://cdn.example.com/recital.mkv"));
    }

    #[test]
    fn normalize_converts_embed_to_canonical_url() {
        let mut draft = MediaItemDraft {
            title: "Recital".to_string(),
            media_type: MediaType::Youtube,
            media_url: r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>"#
                .to_string(),
            ..MediaItemDraft::default()
        };

        normalize_draft(&mut draft).unwrap();

        assert_eq!(draft.media_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            draft.thumbnail_url.as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
    }

    #[test]
    fn normalize_rejects_platform_mismatch() {
        assert_eq!(
            normalize_media_url(MediaType::Instagram, "https://youtu.be/dQw4w9WgXcQ"),
            Err(MediaError::InvalidSource(MediaType::Instagram))
        );
        assert_eq!(
            normalize_media_url(MediaType::Photo, "not a url"),
            Err(MediaError::InvalidUrl)
        );
    }
}
