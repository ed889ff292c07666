use std::collections::HashMap;
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::error::PaletteError;
use crate::notify::Notifier;
use crate::pipeline::normalize::CanonicalColor;
use crate::store::{AddOutcome, PaletteStore};

/// Upper bound on colors taken from one image.
pub const MAX_COLORS: usize = 8;
/// Candidates closer than this (Euclidean, 8-bit RGB) to an existing color are dropped.
pub const DEDUP_DISTANCE: f32 = 30.0;

const MAX_DIM: u32 = 256;
const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const SEED: u64 = 42;
/// Pixels more transparent than this are not part of the picture.
const MIN_ALPHA: u8 = 125;

/// Reduces a decoded image to at most `max_colors` representative colors,
/// most dominant first.
pub trait Quantizer {
    fn quantize(&self, image: &DynamicImage, max_colors: usize) -> Result<Vec<Color>, PaletteError>;
}

/// K-means (Hamerly's algorithm, K-means++ seeding) in CIELAB.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMeansQuantizer;

impl Quantizer for KMeansQuantizer {
    fn quantize(&self, image: &DynamicImage, max_colors: usize) -> Result<Vec<Color>, PaletteError> {
        if max_colors == 0 {
            return Err(PaletteError::Quantization("no colors requested".into()));
        }
        let pixels = prepare_pixels(image);
        if pixels.is_empty() {
            return Err(PaletteError::Quantization("image has no opaque pixels".into()));
        }

        // K-means++ seeding needs more distinct points than clusters.
        let histogram = histogram(&pixels);
        if histogram.len() <= max_colors {
            return Ok(histogram
                .into_iter()
                .map(|([r, g, b], _)| Color::new(r, g, b))
                .collect());
        }

        let lab: Vec<Lab> = pixels
            .iter()
            .map(|&[r, g, b]| {
                let srgb: Srgb<f32> = Srgb::new(r, g, b).into_format();
                srgb.into_color()
            })
            .collect();
        Ok(extract_colors(&lab, max_colors)
            .into_iter()
            .map(|c| c.color)
            .collect())
    }
}

/// A color extracted from the image with its cluster weight.
#[derive(Debug, Clone)]
pub struct ExtractedColor {
    pub color: Color,
    pub weight: f32,
}

/// Resize to fit within 256x256 (preserving aspect ratio) and keep the
/// opaque pixels.
pub fn prepare_pixels(img: &DynamicImage) -> Vec<[u8; 3]> {
    let resized;
    let img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        resized = img.resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3);
        &resized
    } else {
        img
    };

    img.to_rgba8()
        .pixels()
        .filter(|p| p[3] >= MIN_ALPHA)
        .map(|p| [p[0], p[1], p[2]])
        .collect()
}

/// Distinct pixel values with their counts, most frequent first.
fn histogram(pixels: &[[u8; 3]]) -> Vec<([u8; 3], u32)> {
    let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
    for &p in pixels {
        *counts.entry(p).or_insert(0) += 1;
    }
    let mut entries: Vec<([u8; 3], u32)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries
}

/// Run K-means on LAB pixels to extract dominant colors.
///
/// Returns non-empty clusters sorted by weight (descending). Near-identical
/// centroids are kept as they are.
pub fn extract_colors(pixels: &[Lab], k: usize) -> Vec<ExtractedColor> {
    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED);

    let total = pixels.len() as f32;

    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut colors: Vec<ExtractedColor> = result
        .centroids
        .iter()
        .enumerate()
        .filter(|(i, _)| counts[*i] > 0)
        .map(|(i, lab)| ExtractedColor {
            color: Color::from_lab(*lab),
            weight: counts[i] as f32 / total,
        })
        .collect();

    colors.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    colors
}

/// Drop candidates within `threshold` of any color already in the palette.
///
/// Candidates are not compared with each other.
pub fn filter_candidates(
    candidates: &[Color],
    existing: &[CanonicalColor],
    threshold: f32,
) -> Vec<Color> {
    candidates
        .iter()
        .copied()
        .filter(|candidate| {
            !existing
                .iter()
                .any(|color| candidate.rgb_distance(color.color()) < threshold)
        })
        .collect()
}

/// Steps of one extraction, for the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Reading,
    Decoded,
    Quantized,
    Filtered,
    Appending,
}

/// Image-to-palette pipeline: decode, quantize, drop near-duplicates of the
/// existing palette, then add the rest through [`PaletteStore::add_color`].
#[derive(Debug, Clone)]
pub struct Extractor<Q = KMeansQuantizer> {
    quantizer: Q,
    max_colors: usize,
    threshold: f32,
}

impl Default for Extractor<KMeansQuantizer> {
    fn default() -> Self {
        Self::with_quantizer(KMeansQuantizer)
    }
}

impl Extractor<KMeansQuantizer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Q: Quantizer> Extractor<Q> {
    pub fn with_quantizer(quantizer: Q) -> Self {
        Self {
            quantizer,
            max_colors: MAX_COLORS,
            threshold: DEDUP_DISTANCE,
        }
    }

    pub fn max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Extract from an image file. The path becomes the store's source image.
    ///
    /// Returns how many colors were actually appended.
    pub fn extract_file(
        &self,
        path: &Path,
        store: &mut PaletteStore,
        notifier: &mut dyn Notifier,
    ) -> Result<usize, PaletteError> {
        self.begin(store, notifier)?;
        let previous = store.uploaded_image().map(Path::to_path_buf);
        store.set_uploaded_image(Some(path.to_path_buf()));

        debug!(stage = ?Stage::Reading, path = %path.display(), "extraction");
        let result = std::fs::read(path)
            .map_err(|source| PaletteError::FileRead {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|bytes| self.run(&bytes, store, notifier));
        if result.is_err() {
            store.set_uploaded_image(previous);
        }

        finish(result, store, notifier)
    }

    /// Extract from encoded image bytes already in memory.
    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        store: &mut PaletteStore,
        notifier: &mut dyn Notifier,
    ) -> Result<usize, PaletteError> {
        self.begin(store, notifier)?;
        debug!(stage = ?Stage::Reading, len = bytes.len(), "extraction");
        let result = self.run(bytes, store, notifier);
        finish(result, store, notifier)
    }

    fn begin(&self, store: &mut PaletteStore, notifier: &mut dyn Notifier) -> Result<(), PaletteError> {
        if store.is_extracting() {
            warn!("extraction requested while another is in progress");
            return Err(PaletteError::Busy);
        }
        store.set_extracting(true);
        notifier.loading("Extracting colors...");
        Ok(())
    }

    fn run(
        &self,
        bytes: &[u8],
        store: &mut PaletteStore,
        notifier: &mut dyn Notifier,
    ) -> Result<usize, PaletteError> {
        let image = image::load_from_memory(bytes).map_err(PaletteError::ImageDecode)?;
        debug!(stage = ?Stage::Decoded, width = image.width(), height = image.height(), "extraction");

        let candidates = self.quantizer.quantize(&image, self.max_colors)?;
        debug!(stage = ?Stage::Quantized, count = candidates.len(), "extraction");

        let survivors = filter_candidates(&candidates, store.colors(), self.threshold);
        debug!(
            stage = ?Stage::Filtered,
            kept = survivors.len(),
            dropped = candidates.len() - survivors.len(),
            "extraction"
        );

        debug!(stage = ?Stage::Appending, "extraction");
        let mut added = 0;
        for color in survivors {
            let hex = color.to_hex();
            match store.add_color(&hex, notifier) {
                Ok(AddOutcome::Added(_)) => added += 1,
                Ok(AddOutcome::Duplicate) => {}
                Err(err) => {
                    return Err(PaletteError::Processing {
                        color: hex,
                        source: Box::new(err),
                    })
                }
            }
        }
        Ok(added)
    }
}

/// Every exit path ends here: dismiss the loading indicator, clear the busy
/// flag, report.
fn finish(
    result: Result<usize, PaletteError>,
    store: &mut PaletteStore,
    notifier: &mut dyn Notifier,
) -> Result<usize, PaletteError> {
    notifier.dismiss();
    store.set_extracting(false);

    match &result {
        Ok(added) => {
            info!(added, "extraction finished");
            notifier.success(&format!("extracted {added} colors from image"), None);
        }
        Err(err) => {
            warn!(error = %err, "extraction failed");
            match err {
                PaletteError::FileRead { .. } => notifier.error("error reading file", None),
                PaletteError::ImageDecode(_) => notifier.error("error loading image", None),
                PaletteError::Quantization(_) => {
                    notifier.error("error extracting colors", Some("please try a different image"))
                }
                _ => notifier.error("error processing image", None),
            }
        }
    }
    result
}
