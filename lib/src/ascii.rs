use std::fmt;

use image::GrayImage;
use rayon::prelude::*;

use crate::ramp::GlyphRamp;

/// Text-art output: one string per row of the source grid.
///
/// Every pixel is written as its glyph twice, since a terminal cell is
/// roughly twice as tall as it is wide.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsciiFrame {
    rows: Vec<String>,
    width: u32,
}

impl AsciiFrame {
    pub fn new(rows: Vec<String>, width: u32) -> Self {
        Self { rows, width }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }

    /// Width of the source grid in pixels (half the glyphs per row).
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Rows joined with `\n`, without a trailing newline.
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

/// Classify one row of intensities, emitting each glyph twice.
///
/// # Arguments
/// * `row` - Pixel intensities, left to right
/// * `ramp` - Glyphs the indices refer to
/// * `index_of` - Maps an intensity to a ramp index
pub fn classify_row<F>(row: &[u8], ramp: &GlyphRamp, index_of: &F) -> String
where
    F: Fn(u8) -> usize,
{
    let glyphs = ramp.glyphs();
    let widest = glyphs.iter().map(String::len).max().unwrap_or(1);
    let mut out = String::with_capacity(row.len() * 2 * widest);

    for &value in row {
        let glyph = &glyphs[index_of(value)];
        out.push_str(glyph);
        out.push_str(glyph);
    }

    out
}

/// Classify a whole intensity grid into an [`AsciiFrame`].
///
/// Rows are independent and classified in parallel; they only share the
/// read-only grid, ramp and lookup.
pub fn classify_grid<F>(grid: &GrayImage, ramp: &GlyphRamp, index_of: F) -> AsciiFrame
where
    F: Fn(u8) -> usize + Sync,
{
    let (width, height) = grid.dimensions();

    if width == 0 {
        return AsciiFrame::new(vec![String::new(); height as usize], 0);
    }

    let rows = grid
        .as_raw()
        .par_chunks(width as usize)
        .map(|row| classify_row(row, ramp, &index_of))
        .collect();

    AsciiFrame::new(rows, width)
}
