//! Glyph ramps
//!
//! A ramp is the output alphabet, ordered from the visually darkest glyph to
//! the brightest. The order carries meaning and is never re-sorted.

use std::str::FromStr;

use crate::error::{AsciiError, Result};

/// 32 symbols from darkest (space) to brightest (#)
pub const DEFAULT_SYMBOLS: &str = " `'.\",-^>=+*curohieaxw?ODNSMXW@#";

/// 10 symbols, a common short ramp
pub const COMPACT_SYMBOLS: &str = " .:-=+*#%@";

/// Unicode shade blocks
pub const BLOCK_SYMBOLS: &str = " ░▒▓█";

/// Ordered glyphs, index 0 = darkest, last = brightest.
///
/// A glyph is usually one character but may be a short string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<String>,
}

impl GlyphRamp {
    /// Build a ramp from glyphs ordered darkest to brightest.
    ///
    /// # Errors
    /// [`AsciiError::EmptyRamp`] if there are no glyphs, [`AsciiError::Config`]
    /// if any glyph is an empty string.
    pub fn new<I, S>(glyphs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let glyphs: Vec<String> = glyphs.into_iter().map(Into::into).collect();
        if glyphs.is_empty() {
            return Err(AsciiError::EmptyRamp);
        }
        if let Some(pos) = glyphs.iter().position(String::is_empty) {
            return Err(AsciiError::Config(format!("glyph {pos} of the ramp is empty")));
        }
        Ok(Self { glyphs })
    }

    /// One glyph per character of `symbols`.
    pub fn from_chars(symbols: &str) -> Result<Self> {
        Self::new(symbols.chars().map(String::from))
    }

    /// The 10-level ramp `" .:-=+*#%@"`.
    pub fn compact() -> Self {
        Self {
            glyphs: COMPACT_SYMBOLS.chars().map(String::from).collect(),
        }
    }

    /// The 5-level shade block ramp.
    pub fn blocks() -> Self {
        Self {
            glyphs: BLOCK_SYMBOLS.chars().map(String::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: a ramp cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.glyphs.get(index).map(String::as_str)
    }

    pub fn darkest(&self) -> &str {
        &self.glyphs[0]
    }

    pub fn brightest(&self) -> &str {
        &self.glyphs[self.glyphs.len() - 1]
    }

    /// Position of `glyph` in the ramp, if present.
    pub fn index_of(&self, glyph: &str) -> Option<usize> {
        self.glyphs.iter().position(|g| g == glyph)
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_SYMBOLS.chars().map(String::from).collect(),
        }
    }
}

/// Accepts a ramp name (`default`, `compact`, `blocks`) or a literal string of
/// single-character glyphs.
impl FromStr for GlyphRamp {
    type Err = AsciiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::default()),
            "compact" => Ok(Self::compact()),
            "blocks" => Ok(Self::blocks()),
            literal => Self::from_chars(literal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ramp() {
        let ramp = GlyphRamp::default();
        assert_eq!(ramp.len(), 32);
        assert_eq!(ramp.darkest(), " ");
        assert_eq!(ramp.brightest(), "#");
        assert_eq!(ramp.get(4), Some("\""));
        assert_eq!(ramp.get(30), Some("@"));
    }

    #[test]
    fn test_empty_ramp_is_rejected() {
        assert!(matches!(GlyphRamp::from_chars(""), Err(AsciiError::EmptyRamp)));
        assert!(matches!(
            GlyphRamp::new(Vec::<String>::new()),
            Err(AsciiError::EmptyRamp)
        ));
    }

    #[test]
    fn test_empty_glyph_is_rejected() {
        let err = GlyphRamp::new(["a", "", "b"]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_order_is_preserved() {
        let ramp = GlyphRamp::from_chars("#. ").unwrap();
        assert_eq!(ramp.glyphs(), &["#", ".", " "]);
        assert_eq!(ramp.darkest(), "#");
        assert_eq!(ramp.index_of(" "), Some(2));
    }

    #[test]
    fn test_multi_char_glyphs() {
        let ramp = GlyphRamp::new(["  ", "░░", "██"]).unwrap();
        assert_eq!(ramp.len(), 3);
        assert_eq!(ramp.brightest(), "██");
    }

    #[test]
    fn test_parse_named_and_literal() {
        assert_eq!("default".parse::<GlyphRamp>().unwrap(), GlyphRamp::default());
        assert_eq!("compact".parse::<GlyphRamp>().unwrap().len(), 10);
        assert_eq!("blocks".parse::<GlyphRamp>().unwrap().brightest(), "█");
        assert_eq!(" .o".parse::<GlyphRamp>().unwrap().len(), 3);
    }
}
