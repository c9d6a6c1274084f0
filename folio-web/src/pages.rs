//! Page composition
//!
//! The landing page is `ui/index.html` with placeholders filled from the
//! catalog; the project modal is assembled from a [`ModalView`].

use folio_common::content::{Catalog, HighlightItem, HighlightKind, Project};
use folio_common::media::Media;
use folio_common::modal::ModalView;
use folio_common::render::html::{
    background_style, background_video, blocks_html, chapters_html, escape, media_html,
    style_attr,
};
use folio_common::render::Background;
use std::fmt::Write;
use std::time::Duration;

const INDEX_HTML: &str = include_str!("../ui/index.html");

const FALLBACK_FAST: &str = r##"<svg class="highlight__art" viewBox="0 0 200 200" fill="none" xmlns="http://www.w3.org/2000/svg" aria-hidden="true"><g transform="translate(40, 60)"><path d="M60 20C90 20 120 40 120 80C120 120 90 140 60 140C30 140 10 120 10 80C10 40 30 20 60 20Z" stroke="black" stroke-width="3.5" stroke-linecap="round" stroke-linejoin="round"/><circle cx="45" cy="70" r="3" fill="#1a1a1a"/><circle cx="85" cy="80" r="3" fill="#1a1a1a"/><g transform="translate(-15, 30) rotate(-30)"><path d="M10 0V40C10 50 20 60 40 60C60 60 70 50 70 40V0" stroke="black" stroke-width="4" stroke-linecap="round" stroke-linejoin="round"/><line x1="10" y1="12" x2="25" y2="12" stroke="black" stroke-width="3"/><line x1="55" y1="12" x2="70" y2="12" stroke="black" stroke-width="3"/></g></g><g transform="translate(30, 20)"><path d="M40 0C40 15 55 20 55 20C55 20 40 25 40 40C40 25 25 20 25 20C25 20 40 15 40 0Z" stroke="black" stroke-width="3" stroke-linejoin="round"/><path d="M10 35C10 45 20 48 20 48C20 48 10 52 10 62C10 52 0 48 0 48C0 48 10 45 10 35Z" stroke="black" stroke-width="3" stroke-linejoin="round"/></g></svg>"##;

const FALLBACK_SCALE: &str = r##"<svg class="highlight__art" viewBox="0 0 200 200" fill="none" xmlns="http://www.w3.org/2000/svg" aria-hidden="true"><g transform="translate(20, 130) scale(0.35)"><path d="M100 30C138 30 170 61 170 100C170 138 138 170 100 170C61 170 30 138 30 100C30 61 61 30 100 30Z" stroke="black" stroke-width="8" stroke-linecap="round"/><circle cx="85" cy="95" r="8" fill="black"/><circle cx="115" cy="95" r="8" fill="black"/></g><path d="M65 135 Q 90 125 105 85" stroke="#E5E7EB" stroke-width="2" stroke-dasharray="6 4" stroke-linecap="round"/><path d="M100 95 L 105 85 L 115 90" stroke="#E5E7EB" stroke-width="2" stroke-linecap="round"/><g transform="translate(65, 15) scale(0.75)"><path d="M100 30C130 30 160 55 160 95C160 135 130 165 100 165C70 165 40 135 40 95C40 55 70 30 100 30Z" stroke="black" stroke-width="4" stroke-linecap="round"/><path d="M100 30C75 30 55 45 50 75" fill="#D1D5DB" stroke="black" stroke-width="4" stroke-linecap="round"/><circle cx="85" cy="80" r="4" fill="black"/><circle cx="115" cy="80" r="4" fill="black"/><path d="M160 95C175 95 185 105 185 115C185 125 175 135 160 135" stroke="black" stroke-width="4" stroke-linecap="round"/></g></svg>"##;

const FALLBACK_CONSISTENCY: &str = r##"<svg class="highlight__art" viewBox="0 0 200 200" fill="none" xmlns="http://www.w3.org/2000/svg" aria-hidden="true"><g transform="translate(10, 30)"><path d="M50 50C50 35 40 28 30 28C15 28 5 38 5 55C5 72 15 82 30 82C40 82 50 72 50 62" stroke="black" stroke-width="2.5"/><path d="M50 50C60 50 68 58 68 68C68 78 60 85 50 85" stroke="black" stroke-width="2.5"/><circle cx="25" cy="45" r="1.5" fill="black"/><circle cx="38" cy="45" r="1.5" fill="black"/></g><g transform="translate(90, 30)"><path d="M50 50C50 35 40 28 30 28C15 28 5 38 5 55C5 72 15 82 30 82C40 82 50 72 50 62" stroke="black" stroke-width="2.5"/><path d="M50 50C60 50 68 58 68 68C68 78 60 85 50 85" stroke="black" stroke-width="2.5"/><circle cx="25" cy="45" r="1.5" fill="black"/><circle cx="38" cy="45" r="1.5" fill="black"/><path d="M30 28C20 28 10 33 10 45" fill="#D1D5DB" stroke="black" stroke-width="2.5"/></g><g transform="translate(50, 100)"><path d="M50 50C50 35 40 28 30 28C15 28 5 38 5 55C5 72 15 82 30 82C40 82 50 72 50 62" stroke="black" stroke-width="2.5"/><path d="M50 50C60 50 68 58 68 68C68 78 60 85 50 85" stroke="black" stroke-width="2.5"/><circle cx="25" cy="45" r="1.5" fill="black"/><circle cx="38" cy="45" r="1.5" fill="black"/></g></svg>"##;

/// Built-in illustration for a highlight kind
pub fn fallback_art(kind: HighlightKind) -> &'static str {
    match kind {
        HighlightKind::Fast => FALLBACK_FAST,
        HighlightKind::Scale => FALLBACK_SCALE,
        HighlightKind::Consistency => FALLBACK_CONSISTENCY,
    }
}

/// Highlight artwork: the authored image with the illustration held back
/// until the image fails, or the illustration alone
fn highlight_art_html(item: &HighlightItem) -> String {
    match &item.image_url {
        Some(src) => format!(
            "<img class=\"highlight__art\" src=\"{}\" alt=\"{}\" \
             onerror=\"folioHighlightFailed(this)\">\
             <div class=\"highlight__fallback\" hidden>{}</div>",
            escape(src),
            escape(&item.title),
            fallback_art(item.kind)
        ),
        None => fallback_art(item.kind).to_string(),
    }
}

/// Slides and navigation dots of the highlight reel
pub fn highlights_html(highlights: &[HighlightItem], active: usize) -> (String, String) {
    let mut slides = String::new();
    let mut dots = String::new();
    for (i, item) in highlights.iter().enumerate() {
        let state = if i == active { " is-active" } else { "" };
        let _ = write!(
            slides,
            "<div class=\"highlight{state}\" data-slide=\"{i}\">\
             <div class=\"highlight__graphic\">{}</div>\
             <h3 class=\"highlight__title\">{}</h3></div>",
            highlight_art_html(item),
            escape(&item.title)
        );
        let _ = write!(
            dots,
            "<button class=\"reel__dot{state}\" data-goto=\"{i}\" aria-label=\"Go to slide {}\"></button>",
            i + 1
        );
    }
    (slides, dots)
}

/// Work grid cards
pub fn project_grid_html(projects: &[Project]) -> String {
    let mut out = String::new();
    for project in projects {
        let cover = Media::new(project.cover_image_url.as_str(), project.title.as_str());
        let _ = write!(
            out,
            "<article class=\"card\" data-open-project=\"{}\" tabindex=\"0\">\
             <div class=\"card__cover\">{}</div>\
             <div class=\"card__meta\"><h3 class=\"card__title\">{}</h3>\
             <span class=\"card__category\">{}</span></div>\
             <p class=\"card__description\">{}</p></article>",
            escape(&project.id),
            media_html(&cover, "card__image"),
            escape(&project.title),
            escape(&project.category),
            escape(&project.description)
        );
    }
    out
}

/// Full landing page
pub fn index_html(catalog: &Catalog, carousel_interval: Duration, brief_enabled: bool) -> String {
    let (slides, dots) = highlights_html(catalog.highlights(), 0);
    INDEX_HTML
        .replace("{{VERSION}}", env!("CARGO_PKG_VERSION"))
        .replace("{{HIGHLIGHT_SLIDES}}", &slides)
        .replace("{{HIGHLIGHT_DOTS}}", &dots)
        .replace("{{PROJECT_GRID}}", &project_grid_html(catalog.projects()))
        .replace(
            "{{CAROUSEL_INTERVAL_MS}}",
            &carousel_interval.as_millis().to_string(),
        )
        .replace(
            "{{BRIEF_ENABLED}}",
            if brief_enabled { "true" } else { "false" },
        )
}

fn sidebar_html(project: &Project) -> String {
    let mut out = String::from("<aside class=\"modal__facts\">");
    for (label, value) in [
        ("Role", &project.role),
        ("Timeline", &project.timeline),
        ("Platform", &project.platform),
    ] {
        if !value.trim().is_empty() {
            let _ = write!(
                out,
                "<div class=\"fact\"><h4>{}</h4><p>{}</p></div>",
                label,
                escape(value)
            );
        }
    }
    if !project.tags.is_empty() {
        out.push_str("<div class=\"fact\"><h4>Tags</h4><ul class=\"tags\">");
        for tag in &project.tags {
            let _ = write!(out, "<li>{}</li>", escape(tag));
        }
        out.push_str("</ul></div>");
    }
    out.push_str("</aside>");
    out
}

/// Detail view for an open project
pub fn modal_html(view: &ModalView<'_>, next: Option<&Project>) -> String {
    let project = view.project;
    let hero = Media::new(project.image_url.as_str(), project.title.as_str());
    let intro_background = Background::new(
        project.bg_color.as_deref(),
        project.bg_image_url.as_deref(),
    );

    let banner = Media::from_optional(project.banner_image_url.as_deref(), &project.title)
        .map(|m| {
            format!(
                "<div class=\"modal__banner\">{}</div>",
                media_html(&m, "modal__banner-media")
            )
        })
        .unwrap_or_default();

    let next = next
        .filter(|n| n.id != project.id)
        .map(|n| {
            format!(
                "<footer class=\"modal__next\"><button class=\"next-project\" data-open-project=\"{}\">\
                 <span class=\"next-project__label\">Next Project</span>\
                 <span class=\"next-project__title\">{}</span></button></footer>",
                escape(&n.id),
                escape(&n.title)
            )
        })
        .unwrap_or_default();

    format!(
        "<div class=\"modal__backdrop\" data-close-modal></div>\
         <div class=\"modal__panel\" role=\"dialog\" aria-modal=\"true\" aria-label=\"{}\">\
         <button class=\"modal__close\" data-close-modal aria-label=\"Close\">&times;</button>\
         <div class=\"modal__hero\">{}</div>\
         <section class=\"modal__intro\"{}>{}\
         <div class=\"modal__intro-grid\"><div class=\"modal__summary\"><h2 class=\"modal__title\">{}</h2>\
         <p class=\"modal__description\">{}</p>\
         <div class=\"modal__long\">{}</div></div>{}</div></section>\
         {}<div class=\"modal__chapters\">{}</div>{}</div>",
        escape(&project.title),
        media_html(&hero, "modal__hero-media"),
        style_attr(&background_style(&intro_background)),
        background_video(&intro_background),
        escape(&project.title),
        escape(&project.description),
        blocks_html(&view.intro),
        sidebar_html(project),
        banner,
        chapters_html(&view.chapters),
        next
    )
}
