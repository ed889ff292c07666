use palette::{FromColor, Hsl, Hsv, IntoColor, Lab, Oklch, Srgb};

/// Numeric color shared by the parser, the formatter and the extractor.
/// Channels are sRGB in `[0, 1]`; alpha is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    /// Opaque color from 8-bit channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            red: r as f32 / 255.0,
            green: g as f32 / 255.0,
            blue: b as f32 / 255.0,
            alpha: a as f32 / 255.0,
        }
    }

    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// Rounded 8-bit channels, alpha excluded.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }

    /// Serialize to lowercase hex: `#rrggbb`, or `#rrggbbaa` when translucent.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        if self.is_opaque() {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            let a = channel_to_u8(self.alpha);
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    pub fn to_srgb(self) -> Srgb<f32> {
        Srgb::new(self.red, self.green, self.blue)
    }

    /// Create from an `Srgb<f32>`, clamping each channel into gamut.
    pub fn from_srgb_clamped(srgb: Srgb<f32>, alpha: f32) -> Self {
        Self {
            red: clamp_channel(srgb.red),
            green: clamp_channel(srgb.green),
            blue: clamp_channel(srgb.blue),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Convert to CIELAB (the space the K-means quantizer clusters in).
    pub fn to_lab(self) -> Lab {
        self.to_srgb().into_color()
    }

    /// Create an opaque color from CIELAB.
    pub fn from_lab(lab: Lab) -> Self {
        Self::from_srgb_clamped(Srgb::from_color(lab), 1.0)
    }

    pub fn to_hsl(self) -> Hsl {
        self.to_srgb().into_color()
    }

    pub fn to_hsv(self) -> Hsv {
        self.to_srgb().into_color()
    }

    pub fn to_oklch(self) -> Oklch {
        self.to_srgb().into_color()
    }

    /// Euclidean distance between the rounded 8-bit RGB channels.
    ///
    /// Alpha is ignored, as is whatever notation either color was written in.
    pub fn rgb_distance(self, other: Color) -> f32 {
        let a = self.to_rgb8();
        let b = other.to_rgb8();
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (x as f32 - y as f32).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearize(self.red) + 0.7152 * linearize(self.green) + 0.0722 * linearize(self.blue)
    }
}

fn clamp_channel(c: f32) -> f32 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

fn channel_to_u8(c: f32) -> u8 {
    (clamp_channel(c) * 255.0).round() as u8
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 1.0,
    };
    const WHITE: Color = Color {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
        alpha: 1.0,
    };

    #[test]
    fn hex_is_lowercase() {
        assert_eq!(Color::new(255, 136, 0).to_hex(), "#ff8800");
        assert_eq!(Color::new(171, 205, 239).to_hex(), "#abcdef");
    }

    #[test]
    fn hex_includes_alpha_only_when_translucent() {
        let c = Color::from_rgba8(255, 0, 0, 128);
        assert_eq!(c.to_hex(), "#ff000080");
        assert_eq!(Color::from_rgba8(255, 0, 0, 255).to_hex(), "#ff0000");
    }

    #[test]
    fn out_of_gamut_channels_are_clamped() {
        let c = Color::from_srgb_clamped(Srgb::new(1.4, -0.2, f32::NAN), 1.0);
        assert_eq!(c.to_rgb8(), [255, 0, 0]);
    }

    #[test]
    fn srgb_to_lab_round_trip() {
        let colors = [
            Color::new(200, 100, 50),
            Color::new(0, 255, 0),
            Color::new(128, 128, 128),
            BLACK,
            WHITE,
        ];
        for original in colors {
            let recovered = Color::from_lab(original.to_lab());
            for (a, b) in original.to_rgb8().iter().zip(recovered.to_rgb8().iter()) {
                assert!(
                    (*a as i16 - *b as i16).unsigned_abs() <= 1,
                    "channel mismatch for {original}: {a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn rgb_distance_matches_euclidean_formula() {
        let red = Color::new(255, 0, 0);
        let near = Color::new(254, 1, 1);
        let d = red.rgb_distance(near);
        assert!((d - 3f32.sqrt()).abs() < 1e-4, "got {d}");
        assert_eq!(red.rgb_distance(red), 0.0);
        assert!(red.rgb_distance(Color::new(0, 255, 0)) > 30.0);
    }

    #[test]
    fn rgb_distance_ignores_alpha() {
        let a = Color::new(10, 20, 30);
        let b = Color::from_rgba8(10, 20, 30, 51);
        assert_eq!(a.rgb_distance(b), 0.0);
    }

    #[test]
    fn relative_luminance_extremes() {
        assert!(BLACK.relative_luminance() < 0.001);
        assert!((WHITE.relative_luminance() - 1.0).abs() < 0.001);
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
    }
}
