use crate::cli::ColorModel;
use crate::pipeline::normalize::CanonicalColor;

/// Every representation of one palette color, as shown in the palette list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFormats {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub hsv: String,
    pub oklch: String,
}

/// Render a canonical color in the requested model.
pub fn format(color: &CanonicalColor, model: ColorModel) -> String {
    let c = color.color();
    match model {
        ColorModel::Hex => c.to_hex(),
        ColorModel::Rgb => {
            let [r, g, b] = c.to_rgb8();
            if c.is_opaque() {
                format!("rgb({r}, {g}, {b})")
            } else {
                format!("rgba({r}, {g}, {b}, {})", fmt_number(c.alpha, 3))
            }
        }
        ColorModel::Hsl => {
            let hsl = c.to_hsl();
            let h = round_hue(hsl.hue.into_positive_degrees());
            let s = percent(hsl.saturation);
            let l = percent(hsl.lightness);
            if c.is_opaque() {
                format!("hsl({h}, {s}%, {l}%)")
            } else {
                format!("hsla({h}, {s}%, {l}%, {})", fmt_number(c.alpha, 3))
            }
        }
        ColorModel::Hsv => {
            let hsv = c.to_hsv();
            let h = round_hue(hsv.hue.into_positive_degrees());
            let s = percent(hsv.saturation);
            let v = percent(hsv.value);
            format!("HSV({h}°, {s}%, {v}%{})", alpha_suffix(c.alpha))
        }
        ColorModel::Oklch => {
            let oklch = c.to_oklch();
            let l = fmt_number(oklch.l, 4);
            let chroma = fmt_number(oklch.chroma, 4);
            // Achromatic colors have no meaningful hue.
            let hue = if chroma == "0" {
                "0".to_string()
            } else {
                fmt_number(oklch.hue.into_positive_degrees(), 2)
            };
            format!("oklch({l} {chroma} {hue}{})", alpha_suffix(c.alpha))
        }
    }
}

impl ColorFormats {
    pub fn get(&self, model: ColorModel) -> &str {
        match model {
            ColorModel::Hex => &self.hex,
            ColorModel::Rgb => &self.rgb,
            ColorModel::Hsl => &self.hsl,
            ColorModel::Hsv => &self.hsv,
            ColorModel::Oklch => &self.oklch,
        }
    }

    /// All five on one line, hex first.
    pub fn summary(&self) -> String {
        [&self.hex, &self.rgb, &self.hsl, &self.hsv, &self.oklch]
            .map(String::as_str)
            .join(" · ")
    }
}

pub fn color_formats(color: &CanonicalColor) -> ColorFormats {
    ColorFormats {
        hex: format(color, ColorModel::Hex),
        rgb: format(color, ColorModel::Rgb),
        hsl: format(color, ColorModel::Hsl),
        hsv: format(color, ColorModel::Hsv),
        oklch: format(color, ColorModel::Oklch),
    }
}

/// Whole degrees in `[0, 360)`; a hue that rounds up to 360 wraps to 0.
fn round_hue(degrees: f32) -> u32 {
    if degrees.is_finite() {
        (degrees.round() as i64).rem_euclid(360) as u32
    } else {
        0
    }
}

/// A `[0, 1]` fraction as a whole percentage, clamped against conversion overshoot.
fn percent(fraction: f32) -> u32 {
    if fraction.is_finite() {
        (fraction * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

fn alpha_suffix(alpha: f32) -> String {
    if alpha >= 1.0 {
        String::new()
    } else {
        format!(" / {}", fmt_number(alpha, 3))
    }
}

/// Fixed precision with trailing zeros trimmed: `0.5000` becomes `0.5`.
fn fmt_number(value: f32, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::normalize;

    fn fmt(input: &str, model: ColorModel) -> String {
        format(&normalize(input).unwrap(), model)
    }

    #[test]
    fn red_in_every_model() {
        let red = normalize("#ff0000").unwrap();
        let formats = color_formats(&red);
        assert_eq!(formats.hex, "#ff0000");
        assert_eq!(formats.rgb, "rgb(255, 0, 0)");
        assert_eq!(formats.hsl, "hsl(0, 100%, 50%)");
        assert_eq!(formats.hsv, "HSV(0°, 100%, 100%)");
        assert!(formats.oklch.starts_with("oklch(0.628 0.25"), "got {}", formats.oklch);
    }

    #[test]
    fn formats_pick_by_model() {
        let formats = color_formats(&normalize("#00f").unwrap());
        assert_eq!(formats.get(ColorModel::Rgb), "rgb(0, 0, 255)");
        assert_eq!(formats.get(ColorModel::Hsl), "hsl(240, 100%, 50%)");
        for model in ColorModel::ALL {
            assert_eq!(formats.get(model), fmt("#00f", model));
        }
        assert!(formats.summary().starts_with("#0000ff · rgb(0, 0, 255) · "));
    }

    #[test]
    fn hex_expands_shorthand_and_lowercases() {
        assert_eq!(fmt("#FFF", ColorModel::Hex), "#ffffff");
        assert_eq!(fmt("255 128 0", ColorModel::Hex), "#ff8000");
        assert_eq!(fmt("rebeccapurple", ColorModel::Hex), "#663399");
    }

    #[test]
    fn translucent_colors_carry_alpha() {
        let c = "#ff000080";
        assert_eq!(fmt(c, ColorModel::Hex), "#ff000080");
        assert_eq!(fmt(c, ColorModel::Rgb), "rgba(255, 0, 0, 0.502)");
        assert_eq!(fmt(c, ColorModel::Hsl), "hsla(0, 100%, 50%, 0.502)");
        assert_eq!(fmt(c, ColorModel::Hsv), "HSV(0°, 100%, 100% / 0.502)");
        assert!(fmt(c, ColorModel::Oklch).ends_with(" / 0.502)"));
    }

    #[test]
    fn hsl_from_shorthand() {
        assert_eq!(fmt("120 100% 25%", ColorModel::Hsl), "hsl(120, 100%, 25%)");
    }

    #[test]
    fn oklch_of_grays_has_zero_hue() {
        assert_eq!(fmt("#ffffff", ColorModel::Oklch), "oklch(1 0 0)");
        assert_eq!(fmt("#000000", ColorModel::Oklch), "oklch(0 0 0)");
    }

    #[test]
    fn hue_near_360_wraps_to_zero() {
        assert_eq!(round_hue(359.6), 0);
        assert_eq!(round_hue(359.4), 359);
        assert_eq!(round_hue(360.0), 0);
    }

    #[test]
    fn percent_clamps_overshoot() {
        assert_eq!(percent(1.0000004), 100);
        assert_eq!(percent(-0.00001), 0);
        assert_eq!(percent(f32::NAN), 0);
    }

    #[test]
    fn fmt_number_trims() {
        assert_eq!(fmt_number(0.5, 3), "0.5");
        assert_eq!(fmt_number(1.0, 4), "1");
        assert_eq!(fmt_number(-0.00001, 4), "0");
        assert_eq!(fmt_number(29.2339, 2), "29.23");
    }
}
