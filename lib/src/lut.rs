//! Threshold tables and per-intensity lookup tables
//!
//! A [`ThresholdTable`] pairs every glyph of a ramp with a threshold sampled
//! from a tone curve, then closes with a sentinel that catches every remaining
//! intensity. Classification is a first-match scan in construction order: the
//! first entry whose threshold is `>=` the pixel value wins. Entries are never
//! sorted by threshold, so a non-monotonic curve changes which glyph matches.
//!
//! [`GlyphLut`] caches the scan result for all 256 intensities.

use crate::curve::ToneCurve;
use crate::error::{AsciiError, Result};
use crate::ramp::GlyphRamp;

/// Threshold of the closing entry. Above every valid intensity.
pub const SENTINEL_THRESHOLD: f64 = 256.0;

/// Longest ramp the sampling formula supports (`255 / len` must be non-zero).
pub const MAX_RAMP_LEN: usize = 255;

/// One `(threshold, glyph)` pair. `glyph` indexes into the ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdEntry {
    pub threshold: f64,
    pub glyph: usize,
}

/// Intensities at which the tone curve is sampled for a ramp of `len` glyphs.
///
/// `step = 255 / len` (integer division) and `x_i = len + i * step` for
/// `i in 0..len`, giving exactly `len` points. For long ramps the last points
/// can run past 255; they are kept as-is.
///
/// # Errors
/// [`AsciiError::EmptyRamp`] for `len == 0`, [`AsciiError::RampTooLong`] for
/// `len > 255`.
pub fn sample_points(len: usize) -> Result<Vec<u32>> {
    if len == 0 {
        return Err(AsciiError::EmptyRamp);
    }
    if len > MAX_RAMP_LEN {
        return Err(AsciiError::RampTooLong { len });
    }

    let len = len as u32;
    let step = 255 / len;
    Ok((0..len).map(|i| len + i * step).collect())
}

/// Ordered threshold table built from a ramp and a tone curve.
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    entries: Vec<ThresholdEntry>,
    ramp: GlyphRamp,
}

impl ThresholdTable {
    /// Sample `curve` at [`sample_points`] and pair each value with the glyph
    /// at the same position, then append the sentinel `(256, brightest)`.
    ///
    /// # Errors
    /// Fails without producing a partial table when the ramp length is out of
    /// range or the curve returns a non-finite value at any sample
    /// (e.g. a homographic curve whose denominator vanishes).
    pub fn build(ramp: &GlyphRamp, curve: &ToneCurve) -> Result<Self> {
        let points = sample_points(ramp.len())?;

        let mut entries = Vec::with_capacity(points.len() + 1);
        for (index, &x) in points.iter().enumerate() {
            let x = f64::from(x);
            let value = curve.apply(x);
            if !value.is_finite() {
                return Err(AsciiError::NonFiniteThreshold { index, x, value });
            }
            entries.push(ThresholdEntry {
                threshold: value,
                glyph: index,
            });
        }
        entries.push(ThresholdEntry {
            threshold: SENTINEL_THRESHOLD,
            glyph: ramp.len() - 1,
        });

        log::debug!(
            "built threshold table: {} glyphs, curve {}, first threshold {:.3}",
            ramp.len(),
            curve,
            entries[0].threshold
        );

        Ok(Self {
            entries,
            ramp: ramp.clone(),
        })
    }

    /// Entries in construction order. Always `ramp.len() + 1` long.
    pub fn entries(&self) -> &[ThresholdEntry] {
        &self.entries
    }

    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the sentinel is present in every table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ramp index of the glyph for intensity `value`, by first-match scan.
    ///
    /// Comparing an integer intensity against a float threshold is the same as
    /// comparing against the threshold truncated towards negative infinity.
    #[inline]
    pub fn classify_index(&self, value: u8) -> usize {
        let v = f64::from(value);
        match self.entries.iter().find(|entry| entry.threshold >= v) {
            Some(entry) => entry.glyph,
            None => unreachable!(
                "threshold table has no entry >= {value}; the {SENTINEL_THRESHOLD} sentinel is missing"
            ),
        }
    }

    /// Glyph for intensity `value`, by first-match scan.
    #[inline]
    pub fn classify(&self, value: u8) -> &str {
        &self.ramp.glyphs()[self.classify_index(value)]
    }
}

/// Scan results for every intensity, so classification is one array index.
///
/// Built by running the first-match scan itself, so it matches
/// [`ThresholdTable::classify`] for any curve, monotonic or not.
#[derive(Debug, Clone)]
pub struct GlyphLut {
    lut: [usize; 256],
}

impl GlyphLut {
    pub fn new(table: &ThresholdTable) -> Self {
        let mut lut = [0usize; 256];
        for (value, slot) in lut.iter_mut().enumerate() {
            *slot = table.classify_index(value as u8);
        }
        Self { lut }
    }

    /// Ramp index for intensity `value`.
    #[inline(always)]
    pub fn index(&self, value: u8) -> usize {
        self.lut[value as usize]
    }
}
