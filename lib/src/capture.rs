//! Camera frame capture
//!
//! Frames come from an `ffmpeg` child process reading the platform camera
//! input and writing raw `rgb24` frames of a fixed size to stdout. The child
//! is killed and reaped when the [`FfmpegCamera`] is dropped, so the device is
//! released on every exit path of whatever owns it.
//!
//! Prerequisite at runtime: `ffmpeg` on `PATH`.

use std::io::{self, Read};
use std::process::{Child, ChildStdout, Command, Stdio};

use image::{DynamicImage, RgbImage};

use crate::config::CameraConfig;
use crate::error::{AsciiError, Result};

/// Source of still frames, one per call.
pub trait FrameSource {
    /// Block until the next frame is available.
    ///
    /// # Errors
    /// [`AsciiError::Capture`] when the device fails or the stream ends.
    fn next_frame(&mut self) -> Result<DynamicImage>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<DynamicImage> {
        (**self).next_frame()
    }
}

/// Resolved capture parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSettings {
    pub input_format: String,
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// ffmpeg input format for the current platform.
pub fn default_input_format() -> &'static str {
    if cfg!(target_os = "macos") {
        "avfoundation"
    } else if cfg!(target_os = "windows") {
        "dshow"
    } else {
        "v4l2"
    }
}

/// First camera as named by each input format.
pub fn default_device(input_format: &str) -> &'static str {
    match input_format {
        "avfoundation" => "0",
        "dshow" => "video=Integrated Camera",
        _ => "/dev/video0",
    }
}

impl CameraSettings {
    /// Fill unset fields of `config` with platform defaults.
    pub fn from_config(config: &CameraConfig) -> Self {
        let input_format = config
            .input_format
            .clone()
            .unwrap_or_else(|| default_input_format().to_string());
        let device = config
            .device
            .clone()
            .unwrap_or_else(|| default_device(&input_format).to_string());

        Self {
            input_format,
            device,
            width: config.width,
            height: config.height,
            fps: config.fps,
        }
    }

    /// Bytes in one `rgb24` frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Arguments for an ffmpeg process that streams this camera as raw
    /// `rgb24` frames of exactly `width x height`.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let fps = self.fps.to_string();
        let scale = format!("scale={}:{}", self.width, self.height);
        [
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            self.input_format.as_str(),
            "-framerate",
            fps.as_str(),
            "-i",
            self.device.as_str(),
            "-vf",
            scale.as_str(),
            "-pix_fmt",
            "rgb24",
            "-f",
            "rawvideo",
            "-",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

/// Reads fixed-size raw `rgb24` frames from a byte stream.
pub struct RawFrameReader<R: Read> {
    reader: R,
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl<R: Read> RawFrameReader<R> {
    pub fn new(reader: R, width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 3;
        Self {
            reader,
            width,
            height,
            buf: vec![0; len],
        }
    }
}

impl<R: Read> FrameSource for RawFrameReader<R> {
    fn next_frame(&mut self) -> Result<DynamicImage> {
        match self.reader.read_exact(&mut self.buf) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(AsciiError::Capture("camera stream ended".to_string()));
            }
            Err(e) => return Err(AsciiError::Capture(format!("reading frame failed: {e}"))),
        }

        let img = RgbImage::from_raw(self.width, self.height, self.buf.clone()).ok_or_else(|| {
            AsciiError::Capture(format!(
                "frame buffer does not match {}x{}",
                self.width, self.height
            ))
        })?;
        Ok(DynamicImage::ImageRgb8(img))
    }
}

/// Camera captured through an ffmpeg child process.
pub struct FfmpegCamera {
    child: Child,
    frames: RawFrameReader<ChildStdout>,
    settings: CameraSettings,
}

impl FfmpegCamera {
    /// Spawn ffmpeg for the configured device.
    ///
    /// # Errors
    /// [`AsciiError::Capture`] if ffmpeg cannot be started.
    pub fn open(settings: CameraSettings) -> Result<Self> {
        let mut command = Command::new("ffmpeg");
        command
            .args(settings.ffmpeg_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        // Own process group, so a terminal Ctrl-C reaches only this process
        // and the child is stopped through Drop
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| {
                AsciiError::Capture(format!(
                    "could not start ffmpeg ({e}); is it installed and on PATH?"
                ))
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AsciiError::Capture("ffmpeg stdout unavailable".to_string()));
        };

        log::info!(
            "camera {} ({}) opened at {}x{} @ {} fps",
            settings.device,
            settings.input_format,
            settings.width,
            settings.height,
            settings.fps
        );

        Ok(Self {
            child,
            frames: RawFrameReader::new(stdout, settings.width, settings.height),
            settings,
        })
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }
}

impl FrameSource for FfmpegCamera {
    fn next_frame(&mut self) -> Result<DynamicImage> {
        self.frames.next_frame().map_err(|e| match self.child.try_wait() {
            Ok(Some(status)) => AsciiError::Capture(format!(
                "camera {} unavailable (ffmpeg exited with {status})",
                self.settings.device
            )),
            _ => e,
        })
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            log::debug!("ffmpeg already stopped: {e}");
        }
        match self.child.wait() {
            Ok(status) => log::info!("camera {} released ({status})", self.settings.device),
            Err(e) => log::warn!("could not reap ffmpeg: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn settings() -> CameraSettings {
        CameraSettings {
            input_format: "v4l2".to_string(),
            device: "/dev/video0".to_string(),
            width: 4,
            height: 2,
            fps: 30,
        }
    }

    #[test]
    fn test_settings_from_config_defaults() {
        let config = CameraConfig::default();
        let settings = CameraSettings::from_config(&config);
        assert_eq!(settings.input_format, default_input_format());
        assert_eq!(settings.device, default_device(default_input_format()));
        assert_eq!((settings.width, settings.height, settings.fps), (640, 480, 30));
    }

    #[test]
    fn test_settings_from_config_overrides() {
        let config = CameraConfig {
            device: Some("/dev/video3".to_string()),
            input_format: Some("v4l2".to_string()),
            ..Default::default()
        };
        let settings = CameraSettings::from_config(&config);
        assert_eq!(settings.device, "/dev/video3");
        assert_eq!(settings.input_format, "v4l2");
    }

    #[test]
    fn test_ffmpeg_args() {
        let args = settings().ffmpeg_args();
        let joined = args.join(" ");
        assert!(joined.contains("-f v4l2 -framerate 30 -i /dev/video0"));
        assert!(joined.contains("-vf scale=4:2"));
        assert!(joined.ends_with("-pix_fmt rgb24 -f rawvideo -"));
    }

    #[test]
    fn test_frame_len() {
        assert_eq!(settings().frame_len(), 24);
    }

    #[test]
    fn test_raw_reader_reads_frames() {
        let mut bytes = vec![10u8; 24];
        bytes.extend(vec![200u8; 24]);
        let mut reader = RawFrameReader::new(Cursor::new(bytes), 4, 2);

        let first = reader.next_frame().unwrap().to_rgb8();
        assert_eq!(first.dimensions(), (4, 2));
        assert!(first.pixels().all(|p| p.0 == [10, 10, 10]));

        let second = reader.next_frame().unwrap().to_rgb8();
        assert!(second.pixels().all(|p| p.0 == [200, 200, 200]));
    }

    #[test]
    fn test_raw_reader_end_of_stream() {
        // Half a frame, then nothing
        let mut reader = RawFrameReader::new(Cursor::new(vec![0u8; 12]), 4, 2);
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, AsciiError::Capture(_)));
    }
}
