//! asciify - tone-curve driven image to ASCII art converter
//!
//! Each pixel's luminance is replaced by a glyph from a darkest-to-brightest
//! ramp. A tone curve decides where the thresholds between glyphs sit: the
//! curve is sampled once per glyph to build a [`lut::ThresholdTable`], and
//! every pixel takes the glyph of the first table entry whose threshold is at
//! least its intensity. Each glyph is written twice to square up the aspect
//! ratio of terminal cells.
//!
//! # Example
//! ```no_run
//! use asciify::{Asciifier, GlyphRamp, ToneCurve};
//! use std::path::Path;
//!
//! let asciifier = Asciifier::new(GlyphRamp::default(), ToneCurve::Shift(-20.0)).unwrap();
//! let frame = asciifier.convert_path(Path::new("rose.jpg"), Some(0.2)).unwrap();
//! println!("{frame}");
//! ```

pub mod ascii;
pub mod capture;
pub mod config;
pub mod curve;
pub mod error;
pub mod filters;
pub mod lut;
pub mod preview;
pub mod processor;
pub mod ramp;
pub mod sink;

// Re-export main types for convenience
pub use ascii::AsciiFrame;
pub use config::{AsciiConfig, CameraConfig, LookupMode};
pub use curve::ToneCurve;
pub use error::{AsciiError, Result};
pub use preview::{PreviewOptions, PreviewStats, StopSignal, run_camera_preview, run_preview};
pub use processor::Asciifier;
pub use ramp::GlyphRamp;
pub use sink::{ConsoleSink, FileSink, RenderSink};
