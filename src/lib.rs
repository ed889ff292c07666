//! Build color palettes from shorthand text and images, and export them in
//! several color models.
//!
//! The two entry points are [`store::PaletteStore::add_color`] for typed
//! input and [`pipeline::extract::Extractor`] for images. Both normalize
//! through [`pipeline::normalize::normalize`], so "is this color already
//! present" has a single answer.

pub mod cli;
pub mod color;
pub mod error;
pub mod export;
pub mod notify;
pub mod parse;
pub mod pipeline;
pub mod store;
pub mod tui;
