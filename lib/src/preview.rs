//! Live preview loop
//!
//! Capture a frame, convert it, render it, sleep off the rest of the frame
//! budget, repeat until the stop signal is raised or something fails. The
//! frame source is owned by the loop and dropped on every exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::capture::{CameraSettings, FfmpegCamera, FrameSource};
use crate::config::AsciiConfig;
use crate::error::{AsciiError, Result};
use crate::processor::Asciifier;
use crate::sink::RenderSink;

/// Shared cancellation flag, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to finish after the current frame.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Loop parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewOptions {
    /// Target frame rate; the loop sleeps to stay at or below it
    pub fps: u32,
    /// Resize ratio applied to each captured frame
    pub resize: f32,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            resize: 0.25,
            max_frames: None,
        }
    }
}

impl PreviewOptions {
    pub fn from_config(config: &AsciiConfig) -> Self {
        Self {
            fps: config.camera.fps,
            resize: config.camera.resize,
            max_frames: None,
        }
    }

    fn frame_budget(&self) -> Result<Duration> {
        if self.fps == 0 {
            return Err(AsciiError::Config("preview fps must be non-zero".to_string()));
        }
        Ok(Duration::from_secs_f64(1.0 / f64::from(self.fps)))
    }
}

/// What a finished preview did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewStats {
    pub frames: u64,
    pub elapsed: Duration,
}

impl PreviewStats {
    pub fn average_fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

/// Run the capture → convert → render loop.
///
/// Returns when `stop` is raised, `max_frames` is reached, or any step fails.
/// `source` is dropped before returning in all three cases. A failure that
/// arrives after `stop` was raised counts as a clean stop: the interrupt that
/// raised it usually ends the capture process too.
pub fn run_preview<S, R>(
    mut source: S,
    asciifier: &Asciifier,
    sink: &mut R,
    options: PreviewOptions,
    stop: &StopSignal,
) -> Result<PreviewStats>
where
    S: FrameSource,
    R: RenderSink + ?Sized,
{
    let budget = options.frame_budget()?;
    let started = Instant::now();
    let mut frames = 0u64;

    let outcome = loop {
        if stop.is_stopped() {
            log::info!("preview stopped after {frames} frames");
            break Ok(());
        }
        if options.max_frames.is_some_and(|max| frames >= max) {
            break Ok(());
        }

        let frame_start = Instant::now();
        let step = source
            .next_frame()
            .and_then(|image| asciifier.convert_image(&image, Some(options.resize)))
            .and_then(|frame| sink.render(&frame));
        if let Err(e) = step {
            if stop.is_stopped() {
                log::info!("preview stopped after {frames} frames ({e})");
                break Ok(());
            }
            break Err(e);
        }
        frames += 1;

        let spent = frame_start.elapsed();
        match budget.checked_sub(spent) {
            Some(rest) => thread::sleep(rest),
            None => log::debug!(
                "frame {frames} took {:.1} ms, over the {:.1} ms budget",
                spent.as_secs_f64() * 1000.0,
                budget.as_secs_f64() * 1000.0
            ),
        }
    };

    drop(source);

    let stats = PreviewStats {
        frames,
        elapsed: started.elapsed(),
    };
    log::info!(
        "preview finished: {} frames, {:.1} fps average",
        stats.frames,
        stats.average_fps()
    );
    outcome.map(|()| stats)
}

/// Open the configured camera and run the preview on it, stopping after
/// `max_frames` frames if given.
pub fn run_camera_preview<R>(
    config: &AsciiConfig,
    asciifier: &Asciifier,
    sink: &mut R,
    max_frames: Option<u64>,
    stop: &StopSignal,
) -> Result<PreviewStats>
where
    R: RenderSink + ?Sized,
{
    let options = PreviewOptions {
        max_frames,
        ..PreviewOptions::from_config(config)
    };
    options.frame_budget()?;

    let camera = FfmpegCamera::open(CameraSettings::from_config(&config.camera))?;
    run_preview(camera, asciifier, sink, options, stop)
}
