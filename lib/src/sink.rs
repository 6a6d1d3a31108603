//! Render sinks
//!
//! Where finished frames go: a text file or a console stream.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::ascii::AsciiFrame;
use crate::error::Result;

/// Move the cursor to the top-left corner.
const CURSOR_HOME: &str = "\x1b[H";
/// Clear the whole screen.
const CLEAR_SCREEN: &str = "\x1b[2J";

/// Consumer of rendered frames.
pub trait RenderSink {
    /// Emit one frame. Errors are reported, never retried.
    fn render(&mut self, frame: &AsciiFrame) -> Result<()>;
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn render(&mut self, frame: &AsciiFrame) -> Result<()> {
        (**self).render(frame)
    }
}

/// Writes each frame to a file, rows joined by `\n`. A later frame replaces
/// the earlier file contents.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RenderSink for FileSink {
    fn render(&mut self, frame: &AsciiFrame) -> Result<()> {
        std::fs::write(&self.path, frame.to_text())?;
        log::info!("wrote {} rows to {}", frame.height(), self.path.display());
        Ok(())
    }
}

/// Prints frames to a writer, one line per row.
///
/// In live mode the screen is cleared before the first frame and the cursor
/// is homed before every frame, so successive frames overwrite each other.
pub struct ConsoleSink<W: Write> {
    out: W,
    live: bool,
    frames: u64,
}

impl ConsoleSink<io::Stdout> {
    /// Plain printing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), false)
    }

    /// Redraw-in-place printing to stdout.
    pub fn live() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, live: bool) -> Self {
        Self {
            out,
            live,
            frames: 0,
        }
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for ConsoleSink<W> {
    fn render(&mut self, frame: &AsciiFrame) -> Result<()> {
        let text_len: usize = frame.rows().iter().map(|row| row.len() + 1).sum();
        let mut buf = String::with_capacity(text_len + CLEAR_SCREEN.len() + CURSOR_HOME.len());
        if self.live {
            if self.frames == 0 {
                buf.push_str(CLEAR_SCREEN);
            }
            buf.push_str(CURSOR_HOME);
        }
        for row in frame.rows() {
            buf.push_str(row);
            buf.push('\n');
        }

        // One write per frame keeps partial frames off the screen
        self.out.write_all(buf.as_bytes())?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }
}
