use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{ColorModel, ExportKind};
use crate::pipeline::format::{color_formats, format};
use crate::pipeline::normalize::CanonicalColor;

/// A text rendering of a whole palette.
pub trait Exporter {
    fn name(&self) -> &str;

    /// Render the palette; an empty palette renders as an empty string.
    fn serialize(&self, colors: &[CanonicalColor]) -> String;

    fn write_to(&self, colors: &[CanonicalColor], path: &Path) -> Result<()> {
        let mut content = self.serialize(colors);
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {} export to {}", self.name(), path.display()))?;
        info!(path = %path.display(), exporter = self.name(), "export written");
        Ok(())
    }
}

/// `:root` custom properties, `--color-1` onwards.
pub struct CssVariables {
    pub model: ColorModel,
}

impl Exporter for CssVariables {
    fn name(&self) -> &str {
        "CSS variables"
    }

    fn serialize(&self, colors: &[CanonicalColor]) -> String {
        generate_css_variables(colors, self.model)
    }
}

/// Tailwind `theme.extend.colors`, always in hex.
pub struct TailwindConfig;

impl Exporter for TailwindConfig {
    fn name(&self) -> &str {
        "Tailwind config"
    }

    fn serialize(&self, colors: &[CanonicalColor]) -> String {
        generate_tailwind_config(colors)
    }
}

/// `color-N: value`, one per line.
pub struct ColorList {
    pub model: ColorModel,
}

impl Exporter for ColorList {
    fn name(&self) -> &str {
        "color list"
    }

    fn serialize(&self, colors: &[CanonicalColor]) -> String {
        colors
            .iter()
            .enumerate()
            .map(|(i, color)| format!("color-{}: {}", i + 1, color_formats(color).get(self.model)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn exporter(kind: ExportKind, model: ColorModel) -> Box<dyn Exporter> {
    match kind {
        ExportKind::Css => Box::new(CssVariables { model }),
        ExportKind::Tailwind => Box::new(TailwindConfig),
        ExportKind::List => Box::new(ColorList { model }),
    }
}

pub fn generate_css_variables(colors: &[CanonicalColor], model: ColorModel) -> String {
    if colors.is_empty() {
        return String::new();
    }

    let mut out = String::from(":root {\n");
    for (i, color) in colors.iter().enumerate() {
        out.push_str(&format!("  --color-{}: {};\n", i + 1, format(color, model)));
    }
    out.push('}');
    out
}

pub fn generate_tailwind_config(colors: &[CanonicalColor]) -> String {
    if colors.is_empty() {
        return String::new();
    }

    let entries: Vec<String> = colors
        .iter()
        .enumerate()
        .map(|(i, color)| format!("        color{}: \"{}\"", i + 1, format(color, ColorModel::Hex)))
        .collect();

    let mut out = String::new();
    out.push_str("module.exports = {\n");
    out.push_str("  theme: {\n");
    out.push_str("    extend: {\n");
    out.push_str("      colors: {\n");
    out.push_str(&entries.join(",\n"));
    out.push('\n');
    out.push_str("      },\n");
    out.push_str("    },\n");
    out.push_str("  },\n");
    out.push('}');
    out
}
