use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PaletteError;
use crate::notify::Notifier;
use crate::pipeline::normalize::{normalize, CanonicalColor};

/// Result of a successful trip through [`PaletteStore::add_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at this index.
    Added(usize),
    /// The canonical string was already present; nothing changed.
    Duplicate,
}

/// The palette plus the small amount of UI state that travels with it.
///
/// All mutation goes through `&mut self`, so manual entry and extraction are
/// serialized by whoever owns the store.
#[derive(Debug, Default)]
pub struct PaletteStore {
    colors: Vec<CanonicalColor>,
    current_color: String,
    uploaded_image: Option<PathBuf>,
    is_extracting: bool,
    show_export: bool,
}

impl PaletteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors(&self) -> &[CanonicalColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: &CanonicalColor) -> bool {
        self.colors.contains(color)
    }

    /// Normalize `input` and append it unless the same canonical string is
    /// already present. Clears the pending input text on append.
    pub fn add_color(
        &mut self,
        input: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<AddOutcome, PaletteError> {
        let color = match normalize(input) {
            Ok(color) => color,
            Err(err) => {
                notifier.error("Invalid color", Some("Please enter a valid color code"));
                return Err(err);
            }
        };
        if self.contains(&color) {
            debug!(color = %color, "duplicate color ignored");
            notifier.info(
                "Color already exists",
                Some("This color is already in your list"),
            );
            return Ok(AddOutcome::Duplicate);
        }
        Ok(self.append(color).map_or(AddOutcome::Duplicate, AddOutcome::Added))
    }

    /// Append an already-normalized color and return its index, or `None`
    /// when the same canonical string is already present.
    pub fn append(&mut self, color: CanonicalColor) -> Option<usize> {
        if self.contains(&color) {
            return None;
        }
        info!(color = %color, index = self.colors.len(), "color added");
        self.colors.push(color);
        self.current_color.clear();
        Some(self.colors.len() - 1)
    }

    /// Remove the color at `index`; out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<CanonicalColor> {
        (index < self.colors.len()).then(|| {
            let removed = self.colors.remove(index);
            debug!(color = %removed, index, "color removed");
            removed
        })
    }

    /// Drop every color and forget the source image.
    pub fn clear(&mut self) {
        debug!(count = self.colors.len(), "palette cleared");
        self.colors.clear();
        self.uploaded_image = None;
    }

    pub fn current_color(&self) -> &str {
        &self.current_color
    }

    pub fn set_current_color(&mut self, text: impl Into<String>) {
        self.current_color = text.into();
    }

    pub fn current_color_mut(&mut self) -> &mut String {
        &mut self.current_color
    }

    pub fn uploaded_image(&self) -> Option<&Path> {
        self.uploaded_image.as_deref()
    }

    pub fn set_uploaded_image(&mut self, path: Option<PathBuf>) {
        self.uploaded_image = path;
    }

    pub fn is_extracting(&self) -> bool {
        self.is_extracting
    }

    pub fn set_extracting(&mut self, busy: bool) {
        self.is_extracting = busy;
    }

    pub fn show_export(&self) -> bool {
        self.show_export
    }

    pub fn set_show_export(&mut self, show: bool) {
        self.show_export = show;
    }
}
