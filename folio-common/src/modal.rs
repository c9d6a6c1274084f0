//! Project detail modal and page scroll lock
//!
//! While a project is open the page behind it must not scroll. The lock is a
//! scoped handle: acquiring it records the page's current overflow value and
//! dropping it writes that exact value back, whatever it was.

use crate::content::Project;
use crate::markup::{parse_blocks, Block};
use crate::render::{ChapterLayout, ChapterRenderer};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// CSS `overflow` value of the page body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// No inline value set
    #[default]
    Unset,
    Visible,
    Hidden,
    Auto,
    Scroll,
    Clip,
}

impl Overflow {
    /// Inline style value; empty string removes the property
    pub fn as_css(self) -> &'static str {
        match self {
            Overflow::Unset => "",
            Overflow::Visible => "visible",
            Overflow::Hidden => "hidden",
            Overflow::Auto => "auto",
            Overflow::Scroll => "scroll",
            Overflow::Clip => "clip",
        }
    }
}

/// Shared handle to the page's scroll state
#[derive(Debug, Clone, Default)]
pub struct PageScroll {
    overflow: Arc<Mutex<Overflow>>,
}

impl PageScroll {
    pub fn new(initial: Overflow) -> Self {
        Self {
            overflow: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn overflow(&self) -> Overflow {
        *self.guard()
    }

    /// Direct write (page-level code outside any modal)
    pub fn set(&self, value: Overflow) {
        *self.guard() = value;
    }

    /// Suppress scrolling until the returned lock is dropped
    pub fn lock(&self) -> ScrollLock {
        let mut overflow = self.guard();
        let restore = *overflow;
        *overflow = Overflow::Hidden;
        debug!(?restore, "Page scroll locked");
        ScrollLock {
            page: self.clone(),
            restore,
        }
    }

    fn guard(&self) -> MutexGuard<'_, Overflow> {
        self.overflow.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Restores the pre-lock overflow value on drop
#[derive(Debug)]
pub struct ScrollLock {
    page: PageScroll,
    restore: Overflow,
}

impl ScrollLock {
    /// Value that will be written back
    pub fn restores_to(&self) -> Overflow {
        self.restore
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.page.set(self.restore);
        debug!(restore = ?self.restore, "Page scroll restored");
    }
}

/// Everything needed to draw an open project
#[derive(Debug, Clone, Serialize)]
pub struct ModalView<'a> {
    pub project: &'a Project,
    pub intro: Vec<Block>,
    pub chapters: Vec<ChapterLayout>,
}

/// Tracks which project, if any, is open
#[derive(Debug)]
pub struct ModalController {
    page: PageScroll,
    open_project: Option<Project>,
    lock: Option<ScrollLock>,
}

impl ModalController {
    pub fn new(page: PageScroll) -> Self {
        Self {
            page,
            open_project: None,
            lock: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open_project.is_some()
    }

    pub fn open_project(&self) -> Option<&Project> {
        self.open_project.as_ref()
    }

    pub fn page(&self) -> &PageScroll {
        &self.page
    }

    /// Open a project. Switching projects while open keeps the first lock,
    /// so closing still restores the value from before the first open.
    pub fn open(&mut self, project: Project) {
        debug!(project_id = %project.id, "Modal opened");
        if self.lock.is_none() {
            self.lock = Some(self.page.lock());
        }
        self.open_project = Some(project);
    }

    /// Close the modal and release the scroll lock
    pub fn close(&mut self) {
        if let Some(project) = self.open_project.take() {
            debug!(project_id = %project.id, "Modal closed");
        }
        self.lock = None;
    }

    /// Chapter layouts of the open project, in authored order
    pub fn render(&self, renderer: &ChapterRenderer) -> Option<ModalView<'_>> {
        let project = self.open_project.as_ref()?;
        Some(ModalView {
            project,
            intro: parse_blocks(&project.long_description),
            chapters: renderer.render_all(&project.chapters),
        })
    }
}
