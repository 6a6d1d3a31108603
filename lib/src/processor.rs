use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GrayImage};

use crate::ascii::{AsciiFrame, classify_grid};
use crate::config::{AsciiConfig, LookupMode};
use crate::curve::ToneCurve;
use crate::error::Result;
use crate::filters::{load_intensity_grid, to_intensity_grid};
use crate::lut::{GlyphLut, ThresholdTable};
use crate::ramp::GlyphRamp;

/// Converts intensity grids to ASCII art with a fixed ramp and tone curve.
///
/// The threshold table and its lookup array are built once at construction
/// and reused for every conversion; only [`Asciifier::set_curve`] rebuilds
/// them. Conversions take `&self` and share no mutable state.
#[derive(Debug, Clone)]
pub struct Asciifier {
    curve: ToneCurve,
    table: ThresholdTable,
    lut: GlyphLut,
    lookup: LookupMode,
}

impl Asciifier {
    /// Build the threshold table for `ramp` and `curve`.
    ///
    /// # Errors
    /// Configuration errors from [`ThresholdTable::build`].
    pub fn new(ramp: GlyphRamp, curve: ToneCurve) -> Result<Self> {
        let table = ThresholdTable::build(&ramp, &curve)?;
        let lut = GlyphLut::new(&table);
        Ok(Self {
            curve,
            table,
            lut,
            lookup: LookupMode::default(),
        })
    }

    /// Ramp, curve and lookup mode taken from a validated config.
    pub fn from_config(config: &AsciiConfig) -> Result<Self> {
        config.validate()?;
        let asciifier = Self::new(config.glyph_ramp()?, config.curve.clone())?;
        Ok(asciifier.with_lookup(config.lookup))
    }

    pub fn with_lookup(mut self, lookup: LookupMode) -> Self {
        self.lookup = lookup;
        self
    }

    /// Replace the tone curve and rebuild the table.
    ///
    /// On error the previous curve and table stay in place.
    pub fn set_curve(&mut self, curve: ToneCurve) -> Result<()> {
        let table = ThresholdTable::build(self.table.ramp(), &curve)?;
        self.lut = GlyphLut::new(&table);
        self.table = table;
        self.curve = curve;
        Ok(())
    }

    pub fn curve(&self) -> &ToneCurve {
        &self.curve
    }

    pub fn ramp(&self) -> &GlyphRamp {
        self.table.ramp()
    }

    pub fn table(&self) -> &ThresholdTable {
        &self.table
    }

    pub fn lookup(&self) -> LookupMode {
        self.lookup
    }

    /// Glyph for a single intensity.
    pub fn classify(&self, value: u8) -> &str {
        let index = match self.lookup {
            LookupMode::Scan => self.table.classify_index(value),
            LookupMode::Table => self.lut.index(value),
        };
        &self.ramp().glyphs()[index]
    }

    /// Convert an intensity grid into an [`AsciiFrame`].
    pub fn convert(&self, grid: &GrayImage) -> AsciiFrame {
        let start = Instant::now();
        let ramp = self.table.ramp();

        let frame = match self.lookup {
            LookupMode::Scan => classify_grid(grid, ramp, |v| self.table.classify_index(v)),
            LookupMode::Table => classify_grid(grid, ramp, |v| self.lut.index(v)),
        };

        log::debug!(
            "converted {}x{} grid in {:.2} ms",
            grid.width(),
            grid.height(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        frame
    }

    /// Resize and grayscale a decoded image, then convert it.
    pub fn convert_image(&self, img: &DynamicImage, resize: Option<f32>) -> Result<AsciiFrame> {
        let grid = to_intensity_grid(img, resize)?;
        Ok(self.convert(&grid))
    }

    /// Load an image file, resize and grayscale it, then convert it.
    pub fn convert_path(&self, path: &Path, resize: Option<f32>) -> Result<AsciiFrame> {
        let grid = load_intensity_grid(path, resize)?;
        Ok(self.convert(&grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AsciiError;
    use image::{Luma, Rgb, RgbImage};

    fn two_glyphs() -> GlyphRamp {
        GlyphRamp::from_chars(" #").unwrap()
    }

    #[test]
    fn test_two_glyph_identity() {
        let asciifier = Asciifier::new(two_glyphs(), ToneCurve::Identity).unwrap();
        assert_eq!(asciifier.classify(0), " ");
        assert_eq!(asciifier.classify(200), "#");
    }

    #[test]
    fn test_empty_ramp_fails() {
        let result = GlyphRamp::from_chars("").and_then(|r| Asciifier::new(r, ToneCurve::Identity));
        assert!(matches!(result, Err(AsciiError::EmptyRamp)));
    }

    #[test]
    fn test_single_white_pixel_default_ramp() {
        let asciifier = Asciifier::new(GlyphRamp::default(), ToneCurve::Identity).unwrap();
        let grid = GrayImage::from_pixel(1, 1, Luma([255]));

        let frame = asciifier.convert(&grid);

        assert_eq!(frame.height(), 1);
        assert_eq!(frame.rows()[0], "##");
    }

    #[test]
    fn test_lookup_modes_agree() {
        let grid = GrayImage::from_fn(32, 8, |x, y| Luma([(x * 8 + y) as u8]));
        for curve in ToneCurve::presets() {
            let scan = Asciifier::new(GlyphRamp::default(), curve.clone())
                .unwrap()
                .with_lookup(LookupMode::Scan);
            let table = Asciifier::new(GlyphRamp::default(), curve)
                .unwrap()
                .with_lookup(LookupMode::Table);
            assert_eq!(scan.convert(&grid), table.convert(&grid));
        }
    }

    #[test]
    fn test_set_curve_rebuilds_table() {
        let mut asciifier = Asciifier::new(two_glyphs(), ToneCurve::Identity).unwrap();
        assert_eq!(asciifier.classify(100), "#");

        asciifier.set_curve(ToneCurve::Shift(200.0)).unwrap();
        assert_eq!(asciifier.curve(), &ToneCurve::Shift(200.0));
        assert_eq!(asciifier.table().entries()[0].threshold, 202.0);
        assert_eq!(asciifier.classify(100), " ");
    }

    #[test]
    fn test_failed_set_curve_keeps_previous_table() {
        let mut asciifier = Asciifier::new(two_glyphs(), ToneCurve::Identity).unwrap();
        let pole = ToneCurve::Homographic {
            a: 1.0,
            b: 0.0,
            c: 1.0,
            d: -129.0,
        };

        assert!(asciifier.set_curve(pole).is_err());
        assert_eq!(asciifier.curve(), &ToneCurve::Identity);
        assert_eq!(asciifier.table().entries()[1].threshold, 129.0);
    }

    #[test]
    fn test_from_config() {
        let config = AsciiConfig {
            ramp: "compact".to_string(),
            curve: ToneCurve::ContrastHigh,
            lookup: LookupMode::Scan,
            ..Default::default()
        };
        let asciifier = Asciifier::from_config(&config).unwrap();
        assert_eq!(asciifier.ramp().len(), 10);
        assert_eq!(asciifier.lookup(), LookupMode::Scan);
        assert_eq!(asciifier.table().len(), 11);
    }

    #[test]
    fn test_convert_image_with_resize() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 40, Rgb([0, 0, 0])));
        let asciifier = Asciifier::new(GlyphRamp::default(), ToneCurve::Identity).unwrap();

        let frame = asciifier.convert_image(&img, Some(0.1)).unwrap();

        assert_eq!(frame.height(), 4);
        assert_eq!(frame.width(), 10);
        assert!(frame.rows().iter().all(|row| row == &" ".repeat(20)));
    }

    #[test]
    fn test_convert_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        RgbImage::from_pixel(8, 4, Rgb([255, 255, 255])).save(&path).unwrap();

        let asciifier = Asciifier::new(GlyphRamp::default(), ToneCurve::Identity).unwrap();
        let frame = asciifier.convert_path(&path, None).unwrap();

        assert_eq!(frame.to_text(), vec!["#".repeat(16); 4].join("\n"));
    }
}
