//! Static project catalog
//!
//! To update images, replace `cover_image_url` (grid card) or `image_url`
//! (modal hero) below.

use super::{CarouselItem, Chapter, HighlightItem, HighlightKind, Project, SpreadItem};
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::debug;

/// Immutable collection of projects and highlight slides
#[derive(Debug, Clone)]
pub struct Catalog {
    projects: Vec<Project>,
    highlights: Vec<HighlightItem>,
}

impl Catalog {
    /// Build a catalog, checking that project ids are unique and that the
    /// highlight reel has at least one slide
    pub fn new(projects: Vec<Project>, highlights: Vec<HighlightItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for project in &projects {
            if project.id.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Project '{}' has an empty id",
                    project.title
                )));
            }
            if !seen.insert(project.id.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate project id '{}'",
                    project.id
                )));
            }
        }

        if highlights.is_empty() {
            return Err(Error::Config(
                "Highlight reel needs at least one slide".to_string(),
            ));
        }

        debug!(
            projects = projects.len(),
            highlights = highlights.len(),
            "Catalog built"
        );

        Ok(Self {
            projects,
            highlights,
        })
    }

    /// The portfolio content shipped with the site
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_projects(), builtin_highlights())
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn highlights(&self) -> &[HighlightItem] {
        &self.highlights
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Project following `id` in catalog order, wrapping to the first
    pub fn next_after(&self, id: &str) -> Option<&Project> {
        let position = self.projects.iter().position(|p| p.id == id)?;
        if self.projects.len() < 2 {
            return None;
        }
        self.projects.get((position + 1) % self.projects.len())
    }
}

const UNSPLASH: &str = "https://images.unsplash.com";

fn unsplash(photo: &str, width: u32) -> String {
    format!("{UNSPLASH}/{photo}?auto=format&fit=crop&q=80&w={width}")
}

/// Slides carry no image of their own; the page draws the kind's illustration
fn builtin_highlights() -> Vec<HighlightItem> {
    vec![
        HighlightItem {
            title: "move fast to capture value quickly".to_string(),
            kind: HighlightKind::Fast,
            image_url: None,
        },
        HighlightItem {
            title: "go from viable to scalable".to_string(),
            kind: HighlightKind::Scale,
            image_url: None,
        },
        HighlightItem {
            title: "create design consistency".to_string(),
            kind: HighlightKind::Consistency,
            image_url: None,
        },
    ]
}

fn builtin_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            title: "Direct".to_string(),
            category: "Fintech / Mobile App".to_string(),
            description: "Reimagining the digital wallet experience for Gen-Z users with focus on micro-investments.".to_string(),
            long_description: "Direct was born from the insight that Gen-Z wants to invest but feels overwhelmed by traditional banking UI.\nWe simplified the mental model of money into three flows: **Spend**, **Save**, and **Grow**.".to_string(),
            cover_image_url: unsplash("photo-1563986768609-322da13575f3", 1200),
            image_url: unsplash("photo-1556742049-02e4d509d3ef", 2000),
            banner_image_url: Some(unsplash("photo-1554224155-6726b3ff858f", 2000)),
            role: "Lead Product Designer".to_string(),
            timeline: "4 Months".to_string(),
            platform: "Mobile".to_string(),
            tags: vec![
                "UX Research".to_string(),
                "Mobile Design".to_string(),
                "Visual Identity".to_string(),
            ],
            chapters: vec![
                Chapter::new(
                    "The problem<br>with wallets",
                    "Young savers told us banking apps felt like ~~spreadsheets~~ tax forms.\n- Too many account types\n- Jargon on every screen\n- No sense of progress",
                )
                .template("casestudyleft")
                .image(unsplash("photo-1601597111158-2fceff292cdc", 1200)),
                Chapter::new(
                    "Three flows",
                    "Every screen answers one question: where is my money going?<br>Spend, Save and Grow each get a colour and a gesture.",
                )
                .template("casestudyright")
                .image("https://cdn.brianchia.design/direct/flows.mp4"),
                Chapter::new(
                    "",
                    "\"I finally opened the app **on purpose**.\"",
                )
                .template("casestudyquote")
                .bg_color("#111111")
                .image(unsplash("photo-1512428559087-560fa5ceab42", 2000))
                .media_width("100%", "70%"),
            ],
            bg_color: Some("#F5F5F0".to_string()),
            bg_image_url: None,
        },
        Project {
            id: "2".to_string(),
            title: "Assignor".to_string(),
            category: "Healthcare / Web Dashboard".to_string(),
            description: "A comprehensive telemedicine platform connecting specialists with rural patients.".to_string(),
            long_description: "Assignor bridges the gap in rural healthcare.\nThe challenge was designing a low-bandwidth video conferencing tool that didn't compromise on diagnostic quality for doctors.".to_string(),
            cover_image_url: unsplash("photo-1576091160550-2173dba999ef", 1200),
            image_url: unsplash("photo-1586772002130-b0f3daa6288b", 2000),
            banner_image_url: None,
            role: "Senior UX Designer".to_string(),
            timeline: "6 Months".to_string(),
            platform: "Web".to_string(),
            tags: vec![
                "SaaS".to_string(),
                "Accessibility".to_string(),
                "User Interviews".to_string(),
            ],
            chapters: vec![
                Chapter::new(
                    "Field research",
                    "We shadowed clinicians across **four** regional clinics.\nConnectivity dropped below 1 Mbps for most of the day.",
                ),
                Chapter::new(
                    "Design system\nat a glance",
                    "A compact component library tuned for dense clinical data.",
                )
                .template("casestudy spread")
                .spread(vec![
                    SpreadItem::new(unsplash("photo-1581091226825-a6a2a5aee158", 900))
                        .bg_color("#E8EEF7"),
                    SpreadItem::new(unsplash("photo-1559757148-5c350d0d3c56", 900))
                        .bg_color("#F7EEE8")
                        .link("https://www.figma.com/community"),
                    SpreadItem::new(unsplash("photo-1551288049-bebda4e38f71", 900)),
                ]),
                Chapter::new(
                    "Screens",
                    "Key flows from triage to follow-up.",
                )
                .template("casestudyscroll")
                .carousel(vec![
                    CarouselItem::new(
                        unsplash("photo-1551288049-bebda4e38f71", 800),
                        "Triage",
                        "Priority queue with **vital-sign** flags",
                    ),
                    CarouselItem::new(
                        unsplash("photo-1460925895917-afdab827c52f", 800),
                        "Consult",
                        "Adaptive video that degrades to audio",
                    ),
                    CarouselItem::new(
                        unsplash("photo-1504868584819-f8e8b4b6d7e3", 800),
                        "Follow-up",
                        "Async notes<br>with read receipts",
                    ),
                ])
                .secondary("Average consult setup time dropped from 6 minutes to **90 seconds**."),
            ],
            bg_color: None,
            bg_image_url: Some(unsplash("photo-1519494026892-80bbd2d6fd0d", 2000)),
        },
        Project {
            id: "3".to_string(),
            title: "Floor View".to_string(),
            category: "E-commerce / Web".to_string(),
            description: "A curated marketplace for sustainable and ethically sourced lifestyle products.".to_string(),
            long_description: "Floor View focuses on radical transparency.\nWe designed a \"Trust Score\" system that visualizes the environmental impact of every item in the cart in real-time.".to_string(),
            cover_image_url: unsplash("photo-1441984904996-e0b6ba687e12", 1200),
            image_url: unsplash("photo-1441986300917-64674bd600d8", 2000),
            banner_image_url: None,
            role: "Interaction Designer".to_string(),
            timeline: "3 Months".to_string(),
            platform: "Web".to_string(),
            tags: vec![
                "Marketplace".to_string(),
                "Product Strategy".to_string(),
                "UI Design".to_string(),
            ],
            chapters: vec![
                Chapter::new(
                    "Trust Score",
                    "One number per product, explained in plain language.",
                )
                .template("casestudyspread")
                .image(unsplash("photo-1472851294608-062f824d29cc", 1600)),
                Chapter::new(
                    "Outcome",
                    "- Cart abandonment down 18%\n- Repeat purchases up 31%",
                )
                .template("casestudyquote")
                .bg_color("#FAF7F2"),
            ],
            bg_color: None,
            bg_image_url: None,
        },
        Project {
            id: "4".to_string(),
            title: "FIX.CX".to_string(),
            category: "Productivity / Desktop".to_string(),
            description: "A minimal workspace for writers and researchers that blocks distractions using neuro-feedback.".to_string(),
            long_description: "FIX.CX uses a calm-tech approach.\nThe UI adapts based on the user's cognitive load, stripping away features as focus deepens to prevent over-stimulation.".to_string(),
            cover_image_url: unsplash("photo-1499750310107-5fef28a66643", 1200),
            image_url: unsplash("photo-1497215728101-856f4ea42174", 2000),
            banner_image_url: None,
            role: "Lead UX Researcher".to_string(),
            timeline: "5 Months".to_string(),
            platform: "Desktop".to_string(),
            tags: vec![
                "Calm Tech".to_string(),
                "Desktop UI".to_string(),
                "Prototyping".to_string(),
            ],
            chapters: vec![Chapter::new(
                "Focus modes",
                "Three density levels, switched automatically.<br>Manual override is always one keystroke away.",
            )
            .template("casestudyleft")
            .image("https://cdn.brianchia.design/fixcx/focus.webm")],
            bg_color: None,
            bg_image_url: None,
        },
    ]
}
