use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the asciify library.
#[derive(Error, Debug)]
pub enum AsciiError {
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A glyph ramp must contain at least one glyph.
    #[error("glyph ramp is empty")]
    EmptyRamp,

    /// Ramps longer than 255 glyphs give a sampling step of zero.
    #[error("glyph ramp has {len} glyphs, at most 255 are supported")]
    RampTooLong {
        /// Number of glyphs in the rejected ramp.
        len: usize,
    },

    /// A tone curve produced NaN or infinity at a sampled point.
    #[error("tone curve is not finite at sample {index} (x = {x}): got {value}")]
    NonFiniteThreshold {
        /// Position of the sample in the table.
        index: usize,
        /// Sampled intensity.
        x: f64,
        /// Value the curve returned.
        value: f64,
    },

    /// A curve description could not be parsed.
    #[error("unknown tone curve '{0}'")]
    UnknownCurve(String),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem or stream failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The camera could not be opened or stopped delivering frames.
    #[error("capture error: {0}")]
    Capture(String),

    /// A config file could not be read or parsed.
    #[error("config file '{path}': {message}")]
    ConfigFile {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying reader or parser message.
        message: String,
    },
}

impl AsciiError {
    /// Whether the error comes from invalid configuration rather than I/O.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            AsciiError::Config(_)
                | AsciiError::EmptyRamp
                | AsciiError::RampTooLong { .. }
                | AsciiError::NonFiniteThreshold { .. }
                | AsciiError::UnknownCurve(_)
                | AsciiError::ConfigFile { .. }
        )
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, AsciiError>;
