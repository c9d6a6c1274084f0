//! Chapter renderer
//!
//! A chapter's authored template tag is parsed into [`ChapterTemplate`] and
//! the chapter is turned into exactly one [`ChapterLayout`] variant. Rendering
//! is a pure function; [`html`] turns layouts into markup.

pub mod html;

use crate::content::{Chapter, MediaWidth, SpreadItem};
use crate::markup::{parse_blocks, parse_inline, plain_text, Block, Heading, Inline};
use crate::media::Media;
use serde::Serialize;
use tracing::debug;

/// Closed set of chapter layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterTemplate {
    CaseStudyLeft,
    CaseStudyRight,
    CaseStudySpread,
    CaseStudyQuote,
    CaseStudyScroll,
    Default,
}

impl ChapterTemplate {
    /// Parse an authored tag. `casestudy spread` is the historical spelling of
    /// `casestudyspread`. Missing or unrecognised tags select `Default`.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("casestudyleft") => Self::CaseStudyLeft,
            Some("casestudyright") => Self::CaseStudyRight,
            Some("casestudyspread") | Some("casestudy spread") => Self::CaseStudySpread,
            Some("casestudyquote") => Self::CaseStudyQuote,
            Some("casestudyscroll") => Self::CaseStudyScroll,
            Some(other) if !other.is_empty() => {
                debug!(tag = other, "Unrecognised chapter template, using default layout");
                Self::Default
            }
            _ => Self::Default,
        }
    }

    /// Canonical tag (None for the default layout)
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Self::CaseStudyLeft => Some("casestudyleft"),
            Self::CaseStudyRight => Some("casestudyright"),
            Self::CaseStudySpread => Some("casestudyspread"),
            Self::CaseStudyQuote => Some("casestudyquote"),
            Self::CaseStudyScroll => Some("casestudyscroll"),
            Self::Default => None,
        }
    }
}

/// Which column holds the text in a split layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSide {
    Left,
    Right,
}

/// Text colour scheme for a filled background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Dark text on a light (or absent) fill
    Dark,
    /// Light text on a dark fill
    Light,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Background {
    pub color: Option<String>,
    pub media: Option<Media>,
}

impl Background {
    pub fn new(color: Option<&str>, media: Option<&str>) -> Self {
        Self {
            color: color.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
            media: Media::from_optional(media, ""),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.media.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadTile {
    pub media: Media,
    pub background: Background,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripCard {
    pub media: Media,
    pub title: Vec<Inline>,
    pub caption: Vec<Block>,
}

/// Layout description for one chapter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum ChapterLayout {
    /// Text column beside a media column; media stacks after text when narrow
    Split {
        side: TextSide,
        heading: Heading,
        body: Vec<Block>,
        media: Option<Media>,
        background: Background,
    },
    /// Full-width text above a row of tiles
    Spread {
        heading: Heading,
        body: Vec<Block>,
        tiles: Vec<SpreadTile>,
        background: Background,
    },
    /// Centred large-type quote, optional full-bleed media below
    Quote {
        quote: Vec<Block>,
        tone: Tone,
        background: Background,
        media: Option<Media>,
        media_width: Option<MediaWidth>,
    },
    /// Intro, horizontal strip of cards, optional closing text
    Scroll {
        heading: Heading,
        intro: Vec<Block>,
        strip: Vec<StripCard>,
        outro: Vec<Block>,
    },
    /// Single column, no media
    Single { heading: Heading, body: Vec<Block> },
}

impl ChapterLayout {
    pub fn template(&self) -> ChapterTemplate {
        match self {
            Self::Split {
                side: TextSide::Left,
                ..
            } => ChapterTemplate::CaseStudyLeft,
            Self::Split {
                side: TextSide::Right,
                ..
            } => ChapterTemplate::CaseStudyRight,
            Self::Spread { .. } => ChapterTemplate::CaseStudySpread,
            Self::Quote { .. } => ChapterTemplate::CaseStudyQuote,
            Self::Scroll { .. } => ChapterTemplate::CaseStudyScroll,
            Self::Single { .. } => ChapterTemplate::Default,
        }
    }
}

/// Turns chapters into layout descriptions
#[derive(Debug, Clone, Copy, Default)]
pub struct ChapterRenderer;

impl ChapterRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, chapter: &Chapter) -> ChapterLayout {
        let template = ChapterTemplate::from_tag(chapter.template.as_deref());
        let heading = Heading::parse(&chapter.title);
        let alt = plain_text(&heading.first);
        let background = Background::new(chapter.bg_color.as_deref(), chapter.bg_image_url.as_deref());

        match template {
            ChapterTemplate::CaseStudyLeft | ChapterTemplate::CaseStudyRight => {
                let side = if template == ChapterTemplate::CaseStudyLeft {
                    TextSide::Left
                } else {
                    TextSide::Right
                };
                ChapterLayout::Split {
                    side,
                    heading,
                    body: parse_blocks(&chapter.content),
                    media: Media::from_optional(chapter.image_url.as_deref(), &alt),
                    background,
                }
            }
            ChapterTemplate::CaseStudySpread => ChapterLayout::Spread {
                tiles: spread_tiles(chapter, &alt),
                heading,
                body: parse_blocks(&chapter.content),
                background,
            },
            ChapterTemplate::CaseStudyQuote => ChapterLayout::Quote {
                quote: parse_blocks(&chapter.content),
                tone: tone_for(chapter.bg_color.as_deref()),
                background,
                media: Media::from_optional(chapter.image_url.as_deref(), &alt),
                media_width: chapter.media_width.clone(),
            },
            ChapterTemplate::CaseStudyScroll => ChapterLayout::Scroll {
                heading,
                intro: parse_blocks(&chapter.content),
                strip: strip_cards(chapter),
                outro: chapter
                    .secondary_content
                    .as_deref()
                    .map(parse_blocks)
                    .unwrap_or_default(),
            },
            ChapterTemplate::Default => ChapterLayout::Single {
                heading,
                body: parse_blocks(&chapter.content),
            },
        }
    }

    /// Render a chapter list, preserving order
    pub fn render_all(&self, chapters: &[Chapter]) -> Vec<ChapterLayout> {
        chapters.iter().map(|c| self.render(c)).collect()
    }
}

fn spread_tiles(chapter: &Chapter, alt: &str) -> Vec<SpreadTile> {
    let items: Vec<SpreadItem> = match &chapter.spread_items {
        Some(items) if !items.is_empty() => items.clone(),
        _ => chapter
            .image_url
            .iter()
            .map(|url| SpreadItem::new(url.clone()))
            .collect(),
    };

    items
        .iter()
        .filter_map(|item| {
            let media = Media::from_optional(Some(&item.image_url), alt)?;
            Some(SpreadTile {
                media,
                background: Background::new(item.bg_color.as_deref(), item.bg_image_url.as_deref()),
                link: item
                    .link_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            })
        })
        .collect()
}

fn strip_cards(chapter: &Chapter) -> Vec<StripCard> {
    chapter
        .carousel_items
        .iter()
        .flatten()
        .filter_map(|item| {
            let title = parse_inline(item.title.trim());
            let media = Media::from_optional(Some(&item.image_url), &plain_text(&title))?;
            Some(StripCard {
                media,
                title,
                caption: parse_blocks(&item.caption),
            })
        })
        .collect()
}

fn tone_for(bg_color: Option<&str>) -> Tone {
    match bg_color {
        Some(color) if is_dark_color(color) => Tone::Light,
        _ => Tone::Dark,
    }
}

/// Whether a CSS colour is dark enough to need light text.
///
/// Recognises `black`, `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`; anything else
/// is treated as light.
pub fn is_dark_color(color: &str) -> bool {
    let color = color.trim().to_ascii_lowercase();
    if color == "black" {
        return true;
    }

    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let rgb = match hex.len() {
        3 | 4 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            (expand(0), expand(1), expand(2))
        }
        6 | 8 => (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
        _ => return false,
    };

    match rgb {
        (Some(r), Some(g), Some(b)) => {
            let brightness = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
            brightness < 128.0
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CarouselItem;
    use crate::media::MediaKind;

    fn chapter(tag: Option<&str>) -> Chapter {
        let mut c = Chapter::new("Title", "Body text").image("https://cdn/x.png");
        c.template = tag.map(str::to_string);
        c
    }

    #[test]
    fn test_template_aliases() {
        assert_eq!(
            ChapterTemplate::from_tag(Some("casestudy spread")),
            ChapterTemplate::CaseStudySpread
        );
        assert_eq!(
            ChapterTemplate::from_tag(Some("casestudyspread")),
            ChapterTemplate::CaseStudySpread
        );
    }

    #[test]
    fn test_unknown_and_missing_tags_are_default() {
        let renderer = ChapterRenderer::new();
        for tag in [None, Some(""), Some("casestudymosaic"), Some("CASESTUDYLEFT")] {
            let layout = renderer.render(&chapter(tag));
            assert_eq!(layout.template(), ChapterTemplate::Default, "tag {:?}", tag);
            assert!(matches!(layout, ChapterLayout::Single { .. }));
        }
    }

    #[test]
    fn test_default_layout_is_deterministic() {
        let renderer = ChapterRenderer::new();
        let c = chapter(Some("bogus"));
        assert_eq!(renderer.render(&c), renderer.render(&c));
    }

    #[test]
    fn test_split_sides() {
        let renderer = ChapterRenderer::new();
        match renderer.render(&chapter(Some("casestudyleft"))) {
            ChapterLayout::Split { side, media, .. } => {
                assert_eq!(side, TextSide::Left);
                assert_eq!(media.unwrap().src, "https://cdn/x.png");
            }
            other => panic!("unexpected layout {:?}", other),
        }
        match renderer.render(&chapter(Some("casestudyright"))) {
            ChapterLayout::Split { side, .. } => assert_eq!(side, TextSide::Right),
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_spread_falls_back_to_single_image() {
        let renderer = ChapterRenderer::new();
        match renderer.render(&chapter(Some("casestudyspread"))) {
            ChapterLayout::Spread { tiles, .. } => {
                assert_eq!(tiles.len(), 1);
                assert_eq!(tiles[0].media.src, "https://cdn/x.png");
                assert!(tiles[0].link.is_none());
            }
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_spread_items_take_precedence() {
        let c = chapter(Some("casestudy spread")).spread(vec![
            SpreadItem::new("a.png").bg_color("#fff").link("https://example.com"),
            SpreadItem::new("b.mp4"),
        ]);
        match ChapterRenderer::new().render(&c) {
            ChapterLayout::Spread { tiles, .. } => {
                assert_eq!(tiles.len(), 2);
                assert_eq!(tiles[0].link.as_deref(), Some("https://example.com"));
                assert_eq!(tiles[0].background.color.as_deref(), Some("#fff"));
                assert_eq!(tiles[1].media.kind, MediaKind::Video);
            }
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_quote_tone_follows_background() {
        let dark = chapter(Some("casestudyquote")).bg_color("#111111").media_width("100%", "60%");
        match ChapterRenderer::new().render(&dark) {
            ChapterLayout::Quote { tone, media_width, .. } => {
                assert_eq!(tone, Tone::Light);
                assert_eq!(media_width.unwrap().wide, "60%");
            }
            other => panic!("unexpected layout {:?}", other),
        }

        let light = chapter(Some("casestudyquote")).bg_color("#FAF7F2");
        match ChapterRenderer::new().render(&light) {
            ChapterLayout::Quote { tone, .. } => assert_eq!(tone, Tone::Dark),
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_scroll_layout_collects_cards_and_outro() {
        let c = Chapter::new("Screens", "Intro")
            .template("casestudyscroll")
            .carousel(vec![
                CarouselItem::new("a.png", "One", "first"),
                CarouselItem::new("", "Skipped", "no media"),
                CarouselItem::new("c.webm", "Three", "third"),
            ])
            .secondary("Closing");
        match ChapterRenderer::new().render(&c) {
            ChapterLayout::Scroll { strip, outro, intro, .. } => {
                assert_eq!(strip.len(), 2);
                assert_eq!(strip[1].media.kind, MediaKind::Video);
                assert_eq!(intro.len(), 1);
                assert_eq!(outro.len(), 1);
            }
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn test_render_all_preserves_order() {
        let chapters = vec![
            chapter(Some("casestudyquote")),
            chapter(None),
            chapter(Some("casestudyleft")),
        ];
        let templates: Vec<_> = ChapterRenderer::new()
            .render_all(&chapters)
            .iter()
            .map(ChapterLayout::template)
            .collect();
        assert_eq!(
            templates,
            vec![
                ChapterTemplate::CaseStudyQuote,
                ChapterTemplate::Default,
                ChapterTemplate::CaseStudyLeft
            ]
        );
    }

    #[test]
    fn test_is_dark_color() {
        assert!(is_dark_color("#000"));
        assert!(is_dark_color("black"));
        assert!(is_dark_color("#1a1a1a"));
        assert!(is_dark_color("#111111ff"));
        assert!(!is_dark_color("#fff"));
        assert!(!is_dark_color("#F5F5F0"));
        assert!(!is_dark_color("rebeccapurple"));
        assert!(!is_dark_color("#zzz"));
    }
}
