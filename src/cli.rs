use std::fmt;
use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::extract::{DEDUP_DISTANCE, MAX_COLORS};

/// Build a color palette from shorthand values and images, then export it.
#[derive(Parser, Debug)]
#[command(name = "swatchbook", version, about)]
pub struct Args {
    /// Images to extract dominant colors from
    pub images: Vec<PathBuf>,

    /// Add a color: hex, rgb/hsl/oklch notation, a bare triple, or a name
    #[arg(short, long = "color", value_name = "COLOR")]
    pub colors: Vec<String>,

    /// Color model used for exported values
    #[arg(short, long, value_enum, default_value_t = ColorModel::Hex)]
    pub format: ColorModel,

    /// Export layout
    #[arg(short, long, value_enum, default_value_t = ExportKind::Css)]
    pub export: ExportKind,

    /// Write the export to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of colors taken from each image
    #[arg(short = 'k', long, default_value_t = MAX_COLORS)]
    pub max_colors: usize,

    /// Extracted colors closer than this RGB distance to an existing color are skipped
    #[arg(long, default_value_t = DEDUP_DISTANCE, value_parser = parse_threshold)]
    pub threshold: f32,

    /// Launch interactive TUI mode
    #[arg(long)]
    pub tui: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Log pipeline internals to stderr
    #[arg(long)]
    pub debug: bool,
}

/// A finite, non-negative RGB distance.
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a finite distance >= 0, got {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorModel {
    #[default]
    Hex,
    Rgb,
    Hsl,
    Hsv,
    Oklch,
}

impl ColorModel {
    pub const ALL: [ColorModel; 5] = [
        ColorModel::Hex,
        ColorModel::Rgb,
        ColorModel::Hsl,
        ColorModel::Hsv,
        ColorModel::Oklch,
    ];

    /// The following model, wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorModel::Hex => "hex",
            ColorModel::Rgb => "rgb",
            ColorModel::Hsl => "hsl",
            ColorModel::Hsv => "hsv",
            ColorModel::Oklch => "oklch",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    /// `:root { --color-N: ... }`
    Css,
    /// Tailwind `theme.extend.colors` config (always hex)
    Tailwind,
    /// One `color-N: value` per line
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_cycle_wraps() {
        let mut model = ColorModel::Hex;
        for _ in 0..ColorModel::ALL.len() {
            model = model.next();
        }
        assert_eq!(model, ColorModel::Hex);
        assert_eq!(ColorModel::Hsv.next(), ColorModel::Oklch);
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from([
            "swatchbook",
            "photo.png",
            "-c",
            "ff0000",
            "--color",
            "0.5 0.1 200",
            "--format",
            "oklch",
            "--export",
            "tailwind",
        ])
        .unwrap();
        assert_eq!(args.images, [PathBuf::from("photo.png")]);
        assert_eq!(args.colors, ["ff0000", "0.5 0.1 200"]);
        assert_eq!(args.format, ColorModel::Oklch);
        assert_eq!(args.export, ExportKind::Tailwind);
        assert_eq!(args.max_colors, 8);
        assert_eq!(args.threshold, 30.0);
    }

    #[test]
    fn threshold_must_be_finite_and_non_negative() {
        for bad in ["NaN", "-1", "inf", "far"] {
            let result = Args::try_parse_from(["swatchbook", "--threshold", bad]);
            assert!(result.is_err(), "accepted {bad}");
        }
        let args = Args::try_parse_from(["swatchbook", "--threshold", "0"]).unwrap();
        assert_eq!(args.threshold, 0.0);
    }
}
