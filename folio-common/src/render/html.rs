//! HTML writer for chapter layouts
//!
//! Every media element gets an `onerror` hook that hides the element and
//! reports the failure (see `folioMediaFailed` in the site script); the
//! surrounding text is never affected.

use super::{Background, ChapterLayout, SpreadTile, StripCard, TextSide, Tone};
use crate::content::MediaWidth;
use crate::markup::{Block, Heading, Inline};
use crate::media::{Media, MediaKind};
use std::fmt::Write;

const MEDIA_ERROR_HOOK: &str = "folioMediaFailed(this)";

/// Escape text for element content and double-quoted attributes
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Value usable inside CSS `url('...')`
fn css_url(src: &str) -> String {
    src.replace('\'', "%27")
        .replace('"', "%22")
        .replace(['\n', '\r'], "")
}

/// CSS values written into style attributes must not close the declaration
fn css_value(value: &str) -> String {
    value.replace([';', '{', '}', '\n', '\r'], "")
}

pub fn inline_html(runs: &[Inline]) -> String {
    let mut out = String::new();
    for run in runs {
        match run {
            Inline::Text(s) => out.push_str(&escape(s)),
            Inline::Bold(s) => {
                let _ = write!(out, "<strong>{}</strong>", escape(s));
            }
            Inline::Strike(s) => {
                let _ = write!(out, "<s>{}</s>", escape(s));
            }
            Inline::Break => out.push_str("<br>"),
        }
    }
    out
}

pub fn blocks_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Paragraph(runs) => {
                let _ = write!(out, "<p>{}</p>", inline_html(runs));
            }
            Block::List(items) => {
                out.push_str("<ul class=\"chapter-list\">");
                for item in items {
                    let _ = write!(out, "<li>{}</li>", inline_html(item));
                }
                out.push_str("</ul>");
            }
        }
    }
    out
}

pub fn heading_html(heading: &Heading) -> String {
    if heading.is_empty() {
        return String::new();
    }
    match &heading.second {
        None => format!(
            "<h3 class=\"chapter-title\">{}</h3>",
            inline_html(&heading.first)
        ),
        Some(second) => format!(
            "<h3 class=\"chapter-title chapter-title--two-line\">\
             <span class=\"chapter-title__line\">{}</span>\
             <span class=\"chapter-title__line chapter-title__line--gradient\">{}</span></h3>",
            inline_html(&heading.first),
            inline_html(second)
        ),
    }
}

/// `<img>` or autoplaying, looped, muted, inline `<video>`
pub fn media_html(media: &Media, class: &str) -> String {
    match media.kind {
        MediaKind::Video => format!(
            "<video class=\"{}\" src=\"{}\" autoplay loop muted playsinline onerror=\"{}\"></video>",
            escape(class),
            escape(&media.src),
            MEDIA_ERROR_HOOK
        ),
        MediaKind::Image => format!(
            "<img class=\"{}\" src=\"{}\" alt=\"{}\" loading=\"lazy\" onerror=\"{}\">",
            escape(class),
            escape(&media.src),
            escape(&media.alt),
            MEDIA_ERROR_HOOK
        ),
    }
}

/// Phone-shaped bezel around screen recordings
pub fn device_frame_html(media: &Media) -> String {
    format!(
        "<div class=\"device-frame\">\
         <div class=\"device-frame__screen\">{}</div>\
         <svg class=\"device-frame__bezel\" viewBox=\"0 0 430 882\" aria-hidden=\"true\">\
         <path fill-rule=\"evenodd\" fill=\"#2b2b2b\" d=\"M60 0C26.9 0 0 26.9 0 60V822C0 855.1 26.9 882 60 882H370C403.1 882 430 855.1 430 822V60C430 26.9 403.1 0 370 0H60ZM37.6 62.4C37.6 48.7 48.7 37.6 62.4 37.6H367.6C381.3 37.6 392.4 48.7 392.4 62.4V819.6C392.4 833.3 381.3 844.4 367.6 844.4H62.4C48.7 844.4 37.6 833.3 37.6 819.6V62.4Z\"/>\
         <rect x=\"131\" y=\"28\" width=\"168\" height=\"46\" rx=\"23\" fill=\"black\"/>\
         </svg></div>",
        media_html(media, "device-frame__media")
    )
}

/// Inline style for a background fill and/or background media
pub fn background_style(background: &Background) -> String {
    let mut style = String::new();
    if let Some(color) = &background.color {
        let _ = write!(style, "background-color:{};", css_value(color));
    }
    if let Some(media) = &background.media {
        if media.kind == MediaKind::Image {
            let _ = write!(
                style,
                "background-image:url('{}');background-size:cover;background-position:center;",
                css_url(&media.src)
            );
        }
    }
    style
}

pub fn style_attr(style: &str) -> String {
    if style.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", escape(style))
    }
}

/// Background videos cannot be expressed in CSS; they are layered behind the content
pub fn background_video(background: &Background) -> String {
    match &background.media {
        Some(media) if media.is_video() => media_html(media, "chapter-bg-video"),
        _ => String::new(),
    }
}

fn media_width_style(width: Option<&MediaWidth>) -> String {
    match width {
        Some(w) => format!(
            "--media-w-narrow:{};--media-w-wide:{};",
            css_value(&w.narrow),
            css_value(&w.wide)
        ),
        None => String::new(),
    }
}

fn spread_tile_html(tile: &SpreadTile) -> String {
    let inner = format!(
        "<div class=\"spread-tile\"{}>{}{}</div>",
        style_attr(&background_style(&tile.background)),
        background_video(&tile.background),
        media_html(&tile.media, "spread-tile__media")
    );
    match &tile.link {
        Some(link) => format!(
            "<a class=\"spread-tile__link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escape(link),
            inner
        ),
        None => inner,
    }
}

fn strip_card_html(card: &StripCard) -> String {
    format!(
        "<figure class=\"strip-card\">{}<figcaption><h4>{}</h4>{}</figcaption></figure>",
        media_html(&card.media, "strip-card__media"),
        inline_html(&card.title),
        blocks_html(&card.caption)
    )
}

/// Markup for one chapter. `index` is the chapter's position in its project
/// and doubles as the scroll-strip identifier.
pub fn chapter_html(index: usize, layout: &ChapterLayout) -> String {
    let template = layout.template().tag().unwrap_or("default");

    match layout {
        ChapterLayout::Split {
            side,
            heading,
            body,
            media,
            background,
        } => {
            let side = match side {
                TextSide::Left => "text-left",
                TextSide::Right => "text-right",
            };
            let media = match media {
                Some(m) if m.is_video() => device_frame_html(m),
                Some(m) => media_html(m, "chapter-media"),
                None => String::new(),
            };
            format!(
                "<section class=\"chapter chapter--split chapter--{side}\" data-template=\"{template}\"{}>{}\
                 <div class=\"chapter__text\">{}<div class=\"chapter__body\">{}</div></div>\
                 <div class=\"chapter__media\">{}</div></section>",
                style_attr(&background_style(background)),
                background_video(background),
                heading_html(heading),
                blocks_html(body),
                media
            )
        }
        ChapterLayout::Spread {
            heading,
            body,
            tiles,
            background,
        } => {
            let tiles: String = tiles.iter().map(spread_tile_html).collect();
            format!(
                "<section class=\"chapter chapter--spread\" data-template=\"{template}\"{}>{}\
                 <div class=\"chapter__text chapter__text--wide\">{}<div class=\"chapter__body\">{}</div></div>\
                 <div class=\"spread-row\">{}</div></section>",
                style_attr(&background_style(background)),
                background_video(background),
                heading_html(heading),
                blocks_html(body),
                tiles
            )
        }
        ChapterLayout::Quote {
            quote,
            tone,
            background,
            media,
            media_width,
        } => {
            let tone = match tone {
                Tone::Dark => "tone-dark",
                Tone::Light => "tone-light",
            };
            let media = match media {
                Some(m) => format!(
                    "<div class=\"chapter__bleed\"{}>{}</div>",
                    style_attr(&media_width_style(media_width.as_ref())),
                    media_html(m, "chapter-media chapter-media--bleed")
                ),
                None => String::new(),
            };
            format!(
                "<section class=\"chapter chapter--quote chapter--{tone}\" data-template=\"{template}\"{}>{}\
                 <blockquote class=\"chapter__quote\">{}</blockquote>{}</section>",
                style_attr(&background_style(background)),
                background_video(background),
                blocks_html(quote),
                media
            )
        }
        ChapterLayout::Scroll {
            heading,
            intro,
            strip,
            outro,
        } => {
            let cards: String = strip.iter().map(strip_card_html).collect();
            let outro = if outro.is_empty() {
                String::new()
            } else {
                format!("<div class=\"chapter__body chapter__outro\">{}</div>", blocks_html(outro))
            };
            format!(
                "<section class=\"chapter chapter--scroll\" data-template=\"{template}\">\
                 <div class=\"chapter__text\">{}<div class=\"chapter__body\">{}</div></div>\
                 <div class=\"strip\" data-strip=\"{index}\">\
                 <button class=\"strip__nav strip__nav--prev\" data-strip-prev disabled aria-label=\"Scroll left\">&#8249;</button>\
                 <div class=\"strip__track\">{}</div>\
                 <button class=\"strip__nav strip__nav--next\" data-strip-next aria-label=\"Scroll right\">&#8250;</button>\
                 </div>{}</section>",
                heading_html(heading),
                blocks_html(intro),
                cards,
                outro
            )
        }
        ChapterLayout::Single { heading, body } => format!(
            "<section class=\"chapter chapter--single\" data-template=\"{template}\">\
             <div class=\"chapter__text\">{}<div class=\"chapter__body\">{}</div></div></section>",
            heading_html(heading),
            blocks_html(body)
        ),
    }
}

/// Markup for a chapter list, in order
pub fn chapters_html(layouts: &[ChapterLayout]) -> String {
    layouts
        .iter()
        .enumerate()
        .map(|(i, layout)| chapter_html(i, layout))
        .collect()
}
