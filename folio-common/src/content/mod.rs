//! Content model
//!
//! Plain data describing the portfolio: projects, their ordered chapters and
//! the highlight reel. Content is authored in [`catalog`] and never mutated
//! after startup.

pub mod catalog;

pub use catalog::Catalog;

use serde::{Deserialize, Serialize};

/// One case study shown as a card in the work grid and expanded in the modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique across the catalog
    pub id: String,
    pub title: String,
    /// Short label shown next to the card title
    pub category: String,
    pub description: String,
    /// Markup text (paragraphs, bold, strikethrough, line breaks)
    pub long_description: String,
    /// Thumbnail for the card
    pub cover_image_url: String,
    /// Hero image for the modal
    pub image_url: String,
    #[serde(default)]
    pub banner_image_url: Option<String>,
    pub role: String,
    pub timeline: String,
    /// Mobile, Web, Desktop, ...
    pub platform: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Rendered in order
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    /// Background colour for the intro section
    #[serde(default)]
    pub bg_color: Option<String>,
    /// Background media for the banner/intro sections
    #[serde(default)]
    pub bg_image_url: Option<String>,
}

/// One narrative section of a case study
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// May contain a line break, which yields a two-line heading
    pub title: String,
    /// Markup text
    pub content: String,
    /// Layout tag as authored; unset or unknown means the default layout
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub bg_image_url: Option<String>,
    #[serde(default)]
    pub spread_items: Option<Vec<SpreadItem>>,
    #[serde(default)]
    pub carousel_items: Option<Vec<CarouselItem>>,
    /// Markup shown after the scroll strip
    #[serde(default)]
    pub secondary_content: Option<String>,
    #[serde(default)]
    pub media_width: Option<MediaWidth>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn template(mut self, tag: impl Into<String>) -> Self {
        self.template = Some(tag.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn bg_color(mut self, color: impl Into<String>) -> Self {
        self.bg_color = Some(color.into());
        self
    }

    pub fn bg_image(mut self, url: impl Into<String>) -> Self {
        self.bg_image_url = Some(url.into());
        self
    }

    pub fn spread(mut self, items: Vec<SpreadItem>) -> Self {
        self.spread_items = Some(items);
        self
    }

    pub fn carousel(mut self, items: Vec<CarouselItem>) -> Self {
        self.carousel_items = Some(items);
        self
    }

    pub fn secondary(mut self, content: impl Into<String>) -> Self {
        self.secondary_content = Some(content.into());
        self
    }

    pub fn media_width(mut self, narrow: impl Into<String>, wide: impl Into<String>) -> Self {
        self.media_width = Some(MediaWidth {
            narrow: narrow.into(),
            wide: wide.into(),
        });
        self
    }
}

/// One tile in a multi-tile spread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadItem {
    pub image_url: String,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub bg_image_url: Option<String>,
    /// Outbound link wrapping the tile
    #[serde(default)]
    pub link_url: Option<String>,
}

impl SpreadItem {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    pub fn bg_color(mut self, color: impl Into<String>) -> Self {
        self.bg_color = Some(color.into());
        self
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self
    }
}

/// One card of a horizontally scrollable strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselItem {
    pub image_url: String,
    pub title: String,
    pub caption: String,
}

impl CarouselItem {
    pub fn new(
        image_url: impl Into<String>,
        title: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            title: title.into(),
            caption: caption.into(),
        }
    }
}

/// Responsive width override: one CSS width for narrow viewports, one for wide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaWidth {
    pub narrow: String,
    pub wide: String,
}

/// Built-in illustration used when a highlight has no media (or it fails)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Fast,
    Scale,
    Consistency,
}

/// One slide of the top-of-page highlight reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightItem {
    pub title: String,
    pub kind: HighlightKind,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Structured brief produced by the generative text service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBrief {
    pub problem: String,
    pub solution: String,
    pub persona: String,
    pub key_features: Vec<String>,
}
