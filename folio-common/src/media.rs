//! Media references
//!
//! Media fields are opaque URLs. The only thing the renderer needs to know is
//! whether a reference is a video (decided by trailing extension) so it can
//! emit autoplaying, looped, muted, inline playback instead of a still image.

use serde::Serialize;

const VIDEO_EXTENSIONS: [&str; 2] = [".mp4", ".webm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a reference by extension; query string and fragment are ignored
    pub fn detect(src: &str) -> Self {
        let path = src.split(['?', '#']).next().unwrap_or(src).to_ascii_lowercase();
        if VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// A media element ready for layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Media {
    pub src: String,
    pub kind: MediaKind,
    pub alt: String,
}

impl Media {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        let src = src.into();
        let kind = MediaKind::detect(&src);
        Self {
            src,
            kind,
            alt: alt.into(),
        }
    }

    /// Build from an optional, possibly blank reference
    pub fn from_optional(src: Option<&str>, alt: &str) -> Option<Self> {
        src.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self::new(s, alt))
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_video_extensions() {
        assert_eq!(MediaKind::detect("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::detect("https://cdn/x/CLIP.WEBM"), MediaKind::Video);
        assert_eq!(MediaKind::detect("https://cdn/clip.mp4?v=2#t=3"), MediaKind::Video);
    }

    #[test]
    fn test_detect_images() {
        assert_eq!(MediaKind::detect("shot.png"), MediaKind::Image);
        assert_eq!(MediaKind::detect("imageassets/Carousel1.svg"), MediaKind::Image);
        assert_eq!(
            MediaKind::detect("https://images.unsplash.com/photo-1?auto=format&w=1200"),
            MediaKind::Image
        );
        assert_eq!(MediaKind::detect("mp4-guide.jpg"), MediaKind::Image);
    }

    #[test]
    fn test_from_optional_skips_blank() {
        assert!(Media::from_optional(None, "x").is_none());
        assert!(Media::from_optional(Some("  "), "x").is_none());
        let media = Media::from_optional(Some(" a.webm "), "x").unwrap();
        assert_eq!(media.src, "a.webm");
        assert!(media.is_video());
    }
}
