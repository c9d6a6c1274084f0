//! # Folio Common Library
//!
//! Shared code for the portfolio site:
//! - Content model and the static project catalog
//! - Inline markup parsing (bold, strikethrough, line breaks, lists)
//! - Chapter renderer (template dispatch → layout description → HTML)
//! - Carousel, horizontal scroll and modal controllers
//! - Page scroll lock
//! - Site events (SiteEvent enum + EventBus)
//! - Configuration loading and error types

pub mod carousel;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod markup;
pub mod media;
pub mod modal;
pub mod render;
pub mod scroll;

pub use error::{Error, Result};
