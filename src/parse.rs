//! General-purpose color parser.
//!
//! Accepts the CSS Color 4 notations a user is likely to paste: hex
//! (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`,
//! `hsl()`/`hsla()`, `hsv()`/`hsva()`, `hwb()`, `lab()`, `lch()`,
//! `oklab()`, `oklch()` and named colors. Both the legacy comma syntax and the
//! modern whitespace syntax with `/ alpha` are understood.
//!
//! Components outside their valid range are rejected rather than clamped.

use palette::{FromColor, Hsl, Hsv, Hwb, Lab, Lch, Oklab, Oklch, Srgb};
use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color: #{0}")]
    InvalidHex(String),
    #[error("unknown color function: {0}()")]
    UnknownFunction(String),
    #[error("{0}() expects three components and an optional alpha")]
    Arity(String),
    #[error("invalid component: {0:?}")]
    InvalidComponent(String),
    #[error("component out of range: {0:?}")]
    OutOfRange(String),
    #[error("unknown color name: {0:?}")]
    UnknownName(String),
}

use ParseColorError::*;

/// Parse any supported notation into a [`Color`].
pub fn parse(input: &str) -> Result<Color, ParseColorError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Empty);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(open) = s.find('(') {
        let inner = s
            .strip_suffix(')')
            .ok_or_else(|| InvalidComponent(s.to_string()))?;
        let name = s[..open].trim().to_ascii_lowercase();
        return parse_function(&name, &inner[open + 1..]);
    }
    parse_named(s)
}

fn parse_hex(hex: &str) -> Result<Color, ParseColorError> {
    let invalid = || InvalidHex(hex.to_string());
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| invalid());
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

    match hex.len() {
        3 | 4 => {
            let mut channels = [255u8; 4];
            for (i, channel) in channels.iter_mut().take(hex.len()).enumerate() {
                *channel = digit(i)? * 17;
            }
            let [r, g, b, a] = channels;
            Ok(Color::from_rgba8(r, g, b, a))
        }
        6 | 8 => {
            let mut channels = [255u8; 4];
            for (i, channel) in channels.iter_mut().take(hex.len() / 2).enumerate() {
                *channel = pair(i * 2)?;
            }
            let [r, g, b, a] = channels;
            Ok(Color::from_rgba8(r, g, b, a))
        }
        _ => Err(invalid()),
    }
}

fn parse_function(name: &str, args: &str) -> Result<Color, ParseColorError> {
    let ([c1, c2, c3], alpha) = split_components(name, args)?;
    let alpha = match alpha {
        Some(token) => in_range(number_or_percent(token, 1.0)?, 0.0, 1.0, token)?,
        None => 1.0,
    };

    let srgb: Srgb<f32> = match name {
        "rgb" | "rgba" => {
            let r = in_range(number_or_percent(c1, 255.0)?, 0.0, 255.0, c1)?;
            let g = in_range(number_or_percent(c2, 255.0)?, 0.0, 255.0, c2)?;
            let b = in_range(number_or_percent(c3, 255.0)?, 0.0, 255.0, c3)?;
            Srgb::new(r / 255.0, g / 255.0, b / 255.0)
        }
        "hsl" | "hsla" => {
            let hsl: Hsl = Hsl::new(hue(c1)?, unit_percent(c2)?, unit_percent(c3)?);
            Srgb::from_color(hsl)
        }
        "hsv" | "hsva" => {
            let hsv: Hsv = Hsv::new(hue(c1)?, unit_percent(c2)?, unit_percent(c3)?);
            Srgb::from_color(hsv)
        }
        "hwb" | "hwba" => {
            let hwb: Hwb = Hwb::new(hue(c1)?, unit_percent(c2)?, unit_percent(c3)?);
            Srgb::from_color(hwb)
        }
        "lab" => {
            let l = in_range(number_or_percent(c1, 100.0)?, 0.0, 100.0, c1)?;
            let lab: Lab = Lab::new(l, number_or_percent(c2, 125.0)?, number_or_percent(c3, 125.0)?);
            Srgb::from_color(lab)
        }
        "lch" => {
            let l = in_range(number_or_percent(c1, 100.0)?, 0.0, 100.0, c1)?;
            let chroma = non_negative(number_or_percent(c2, 150.0)?, c2)?;
            let lch: Lch = Lch::new(l, chroma, hue(c3)?);
            Srgb::from_color(lch)
        }
        "oklab" => {
            let l = in_range(number_or_percent(c1, 1.0)?, 0.0, 1.0, c1)?;
            let oklab = Oklab::new(l, number_or_percent(c2, 0.4)?, number_or_percent(c3, 0.4)?);
            Srgb::from_color(oklab)
        }
        "oklch" => {
            let l = in_range(number_or_percent(c1, 1.0)?, 0.0, 1.0, c1)?;
            let chroma = non_negative(number_or_percent(c2, 0.4)?, c2)?;
            Srgb::from_color(Oklch::new(l, chroma, hue(c3)?))
        }
        _ => return Err(UnknownFunction(name.to_string())),
    };

    Ok(Color::from_srgb_clamped(srgb, alpha))
}

/// Split function arguments into three components plus an optional alpha.
///
/// `a b c / alpha`, `a, b, c` and `a, b, c, alpha` are all accepted.
fn split_components<'a>(
    name: &str,
    args: &'a str,
) -> Result<([&'a str; 3], Option<&'a str>), ParseColorError> {
    let (body, slash_alpha) = match args.split_once('/') {
        Some((body, alpha)) => (body, Some(alpha.trim())),
        None => (args, None),
    };
    let tokens: Vec<&str> = body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    match (tokens.as_slice(), slash_alpha) {
        ([a, b, c], alpha) => Ok(([*a, *b, *c], alpha)),
        ([a, b, c, d], None) => Ok(([*a, *b, *c], Some(*d))),
        _ => Err(Arity(name.to_string())),
    }
}

fn number(token: &str) -> Result<f32, ParseColorError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InvalidComponent(token.to_string()))
}

/// A bare number, or a percentage scaled so that `100%` equals `scale`.
fn number_or_percent(token: &str, scale: f32) -> Result<f32, ParseColorError> {
    match token.strip_suffix('%') {
        Some(pct) => Ok(number(pct)? / 100.0 * scale),
        None => number(token),
    }
}

/// Saturation-like component (`50%` or `50`) mapped to `[0, 1]`.
fn unit_percent(token: &str) -> Result<f32, ParseColorError> {
    let value = in_range(number_or_percent(token, 100.0)?, 0.0, 100.0, token)?;
    Ok(value / 100.0)
}

/// Hue in degrees, honoring the CSS angle units.
fn hue(token: &str) -> Result<f32, ParseColorError> {
    let lower = token.to_ascii_lowercase();
    let degrees = if let Some(v) = lower.strip_suffix("deg") {
        number(v)?
    } else if let Some(v) = lower.strip_suffix("grad") {
        number(v)? * 0.9
    } else if let Some(v) = lower.strip_suffix("rad") {
        number(v)?.to_degrees()
    } else if let Some(v) = lower.strip_suffix("turn") {
        number(v)? * 360.0
    } else {
        number(&lower)?
    };
    Ok(degrees.rem_euclid(360.0))
}

fn in_range(value: f32, lo: f32, hi: f32, token: &str) -> Result<f32, ParseColorError> {
    if (lo..=hi).contains(&value) {
        Ok(value)
    } else {
        Err(OutOfRange(token.to_string()))
    }
}

fn non_negative(value: f32, token: &str) -> Result<f32, ParseColorError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(OutOfRange(token.to_string()))
    }
}

/// CSS named colors and `transparent`.
fn parse_named(name: &str) -> Result<Color, ParseColorError> {
    let unknown = || UnknownName(name.to_string());
    // csscolorparser also takes unprefixed hex, which must not pass as a name.
    if !name.chars().all(|c| c.is_ascii_alphabetic()) || name.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(unknown());
    }
    let [r, g, b, a] = csscolorparser::parse(&name.to_ascii_lowercase())
        .map_err(|_| unknown())?
        .to_rgba8();
    Ok(Color::from_rgba8(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb8(input: &str) -> [u8; 3] {
        parse(input).unwrap().to_rgb8()
    }

    #[test]
    fn hex_lengths() {
        assert_eq!(rgb8("#fff"), [255, 255, 255]);
        assert_eq!(rgb8("#FF8800"), [255, 136, 0]);
        assert_eq!(parse("#f008").unwrap().to_hex(), "#ff000088");
        assert_eq!(parse("#ff000080").unwrap().to_hex(), "#ff000080");
    }

    #[test]
    fn hex_invalid() {
        assert_eq!(parse("#ff00f"), Err(InvalidHex("ff00f".into())));
        assert!(parse("#gggggg").is_err());
        assert!(parse("#").is_err());
    }

    #[test]
    fn rgb_modern_and_legacy() {
        assert_eq!(rgb8("rgb(255 0 0)"), [255, 0, 0]);
        assert_eq!(rgb8("rgb(255, 128, 0)"), [255, 128, 0]);
        assert_eq!(rgb8("rgba(0,0,255,0.5)"), [0, 0, 255]);
        assert_eq!(rgb8("rgb(100% 0% 50%)"), [255, 0, 128]);
        let c = parse("rgb(0 0 0 / 25%)").unwrap();
        assert!((c.alpha - 0.25).abs() < 1e-6);
    }

    #[test]
    fn rgb_out_of_range_is_rejected() {
        assert_eq!(parse("rgb(999 999 999)"), Err(OutOfRange("999".into())));
        assert!(parse("rgb(-1 0 0)").is_err());
        assert!(parse("rgb(0 0 0 / 2)").is_err());
    }

    #[test]
    fn rgb_wrong_arity() {
        assert_eq!(parse("rgb(1 2)"), Err(Arity("rgb".into())));
        assert!(parse("rgb(1 2 3 4 5)").is_err());
        assert!(parse("rgb(1 2 3 4 / 1)").is_err());
    }

    #[test]
    fn hsl_with_units() {
        assert_eq!(rgb8("hsl(120 100% 50%)"), [0, 255, 0]);
        assert_eq!(rgb8("hsl(120deg 100% 50%)"), [0, 255, 0]);
        assert_eq!(rgb8("hsl(0.3333turn 100% 50%)"), [0, 255, 0]);
        assert_eq!(rgb8("hsl(133.333grad 100% 50%)"), [0, 255, 0]);
        assert_eq!(rgb8("hsl(2.0944rad 100% 50%)"), [0, 255, 0]);
        assert_eq!(rgb8("hsl(-240, 100%, 50%)"), [0, 255, 0]);
        assert_eq!(rgb8("hsl(120 100 50)"), [0, 255, 0]);
    }

    #[test]
    fn hsl_saturation_out_of_range() {
        assert!(parse("hsl(120 150% 50%)").is_err());
    }

    #[test]
    fn hsv_and_hwb() {
        assert_eq!(rgb8("hsv(0, 100%, 100%)"), [255, 0, 0]);
        assert_eq!(rgb8("hwb(240 0% 0%)"), [0, 0, 255]);
    }

    #[test]
    fn oklch_and_friends() {
        let red = parse("oklch(0.628 0.2577 29.23)").unwrap().to_rgb8();
        assert!(red[0] > 240 && red[1] < 15 && red[2] < 15, "got {red:?}");
        assert_eq!(rgb8("oklch(1 0 0)"), [255, 255, 255]);
        assert_eq!(rgb8("oklab(0 0 0)"), [0, 0, 0]);
        assert_eq!(rgb8("lab(100 0 0)"), [255, 255, 255]);
        assert_eq!(rgb8("lch(0% 0 0)"), [0, 0, 0]);
    }

    #[test]
    fn oklch_lightness_must_be_a_proportion() {
        assert!(parse("oklch(120.5 50 50)").is_err());
        assert!(parse("oklch(50% 0.1 30)").is_ok());
        assert!(parse("oklch(0.5 -0.1 30)").is_err());
    }

    #[test]
    fn named_colors() {
        assert_eq!(rgb8("rebeccapurple"), [102, 51, 153]);
        assert_eq!(rgb8("Gold"), [255, 215, 0]);
        assert_eq!(parse("transparent").unwrap().alpha, 0.0);
        assert!(matches!(parse("notacolor"), Err(UnknownName(_))));
    }

    #[test]
    fn unprefixed_hex_is_not_a_name() {
        assert!(parse("abc").is_err());
        assert!(parse("ffaa00").is_err());
    }

    #[test]
    fn unknown_function_and_garbage() {
        assert_eq!(parse("cmyk(0 0 0)"), Err(UnknownFunction("cmyk".into())));
        assert!(parse("rgb(1 2 3").is_err());
        assert!(parse("rgb(a b c)").is_err());
        assert_eq!(parse("   "), Err(Empty));
    }
}
