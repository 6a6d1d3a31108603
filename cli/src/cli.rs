use std::path::PathBuf;

use anyhow::{Context, Result};
use asciify::{AsciiConfig, LookupMode, ToneCurve};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

fn parse_log_level(s: &str) -> std::result::Result<LevelFilter, String> {
    s.parse().map_err(|_| {
        format!("unknown log level '{s}', expected off, error, warn, info, debug or trace")
    })
}

/// Turn images and camera feeds into ASCII art
#[derive(Parser, Debug)]
#[command(name = "asciify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file; command line flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn", global = true, value_parser = parse_log_level)]
    pub log_level: LevelFilter,
}

/// Options shared by every command that builds a threshold table.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Tone curve: identity, shift:N, contrast-low, contrast-medium,
    /// contrast-high, linear:A,B, poly:C0,C1,..., homographic:A,B,C,D, binary:T
    #[arg(long)]
    pub curve: Option<ToneCurve>,

    /// Glyph ramp, darkest first: default, compact, blocks, or literal glyphs
    #[arg(long)]
    pub ramp: Option<String>,

    /// Classify with the first-match scan instead of the precomputed table
    #[arg(long)]
    pub scan: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image file
    Image {
        /// Image to convert
        path: PathBuf,

        /// Resize ratio, e.g. 0.2 for 20% of the original size
        #[arg(short, long)]
        resize: Option<f32>,

        /// Also write the result to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not print the result to the console
        #[arg(short, long)]
        quiet: bool,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Live camera preview, Ctrl-C to stop
    Camera {
        /// Camera device (/dev/video0, 0, "video=Integrated Camera")
        #[arg(short, long)]
        device: Option<String>,

        /// ffmpeg input format (v4l2, avfoundation, dshow)
        #[arg(long)]
        input_format: Option<String>,

        /// Capture width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Capture height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Target frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Resize ratio applied to each captured frame
        #[arg(short, long)]
        resize: Option<f32>,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Show the threshold table of every preset curve for the active ramp
    Curves {
        #[command(flatten)]
        render: RenderArgs,
    },
}

impl RenderArgs {
    fn apply(&self, config: &mut AsciiConfig) {
        if let Some(curve) = &self.curve {
            config.curve = curve.clone();
        }
        if let Some(ramp) = &self.ramp {
            config.ramp = ramp.clone();
            config.glyphs = None;
        }
        if self.scan {
            config.lookup = LookupMode::Scan;
        }
    }
}

impl Cli {
    /// Config file (or defaults) with this command's flags applied.
    ///
    /// # Errors
    /// Returns an error if the file cannot be loaded or the result is invalid.
    pub fn resolve_config(&self) -> Result<AsciiConfig> {
        let mut config = match &self.config {
            Some(path) => AsciiConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AsciiConfig::default(),
        };

        match &self.command {
            Command::Image { resize, render, .. } => {
                render.apply(&mut config);
                if resize.is_some() {
                    config.resize = *resize;
                }
            }
            Command::Camera {
                device,
                input_format,
                width,
                height,
                fps,
                resize,
                render,
                ..
            } => {
                render.apply(&mut config);
                let camera = &mut config.camera;
                if device.is_some() {
                    camera.device = device.clone();
                }
                if input_format.is_some() {
                    camera.input_format = input_format.clone();
                }
                if let Some(width) = width {
                    camera.width = *width;
                }
                if let Some(height) = height {
                    camera.height = *height;
                }
                if let Some(fps) = fps {
                    camera.fps = *fps;
                }
                if let Some(resize) = resize {
                    camera.resize = *resize;
                }
            }
            Command::Curves { render } => render.apply(&mut config),
        }

        config.validate().context("invalid settings")?;
        Ok(config)
    }
}
