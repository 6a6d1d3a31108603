use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::ToneCurve;
use crate::error::{AsciiError, Result};
use crate::filters::check_ratio;
use crate::lut::MAX_RAMP_LEN;
use crate::ramp::GlyphRamp;

/// How pixels are matched against the threshold table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// First-match scan over the table for every pixel
    Scan,
    /// 256-entry array precomputed from the same scan
    #[default]
    Table,
}

/// Configuration for ASCII art conversion
///
/// Loadable from TOML; every field has a default.
///
/// ```toml
/// ramp = "compact"
/// curve = "shift:-20"
/// resize = 0.2
///
/// [camera]
/// fps = 30
/// resize = 0.25
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    /// Ramp name (`default`, `compact`, `blocks`) or literal glyph string
    pub ramp: String,
    /// Explicit glyph list, overrides `ramp` (allows multi-character glyphs)
    pub glyphs: Option<Vec<String>>,
    /// Tone curve in text form, e.g. `contrast-low` or `shift:-20`
    pub curve: ToneCurve,
    /// Resize ratio for still images, `None` keeps the original size
    pub resize: Option<f32>,
    pub lookup: LookupMode,
    pub camera: CameraConfig,
}

/// Live preview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device name understood by the platform capture input
    /// (`/dev/video0`, `0`, `video=Integrated Camera`); platform default if unset
    pub device: Option<String>,
    /// ffmpeg input format override (`v4l2`, `avfoundation`, `dshow`)
    pub input_format: Option<String>,
    /// Capture width in pixels
    pub width: u32,
    /// Capture height in pixels
    pub height: u32,
    /// Target frames per second
    pub fps: u32,
    /// Resize ratio applied to every captured frame
    pub resize: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: None,
            input_format: None,
            width: 640,
            height: 480,
            fps: 30,
            resize: 0.25,
        }
    }
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            ramp: "default".to_string(),
            glyphs: None,
            curve: ToneCurve::Identity,
            resize: None,
            lookup: LookupMode::Table,
            camera: CameraConfig::default(),
        }
    }
}


impl AsciiConfig {
    /// Load a TOML config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AsciiError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: AsciiConfig = toml::from_str(&content).map_err(|e| AsciiError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the configured glyph ramp.
    pub fn glyph_ramp(&self) -> Result<GlyphRamp> {
        match &self.glyphs {
            Some(glyphs) => GlyphRamp::new(glyphs.iter().cloned()),
            None => self.ramp.parse(),
        }
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        let ramp = self.glyph_ramp()?;
        if ramp.len() > MAX_RAMP_LEN {
            return Err(AsciiError::RampTooLong { len: ramp.len() });
        }
        if let Some(ratio) = self.resize {
            check_ratio("resize", ratio)?;
        }

        let camera = &self.camera;
        check_ratio("camera.resize", camera.resize)?;
        if camera.fps == 0 || camera.fps > 120 {
            return Err(AsciiError::Config(format!(
                "camera.fps must be between 1 and 120, got {}",
                camera.fps
            )));
        }
        if camera.width == 0 || camera.height == 0 {
            return Err(AsciiError::Config(format!(
                "camera size must be non-zero, got {}x{}",
                camera.width, camera.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AsciiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.glyph_ramp().unwrap(), GlyphRamp::default());
    }

    #[test]
    fn test_invalid_resize() {
        let mut config = AsciiConfig::default();
        config.resize = Some(0.0);
        assert!(config.validate().is_err());

        config.resize = Some(5.0);
        assert!(config.validate().is_err());

        config.resize = Some(0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_camera_settings() {
        let mut config = AsciiConfig::default();
        config.camera.fps = 0;
        assert!(config.validate().is_err());

        config.camera.fps = 30;
        config.camera.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_glyph_list() {
        let config = AsciiConfig {
            glyphs: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AsciiError::EmptyRamp)));
    }

    #[test]
    fn test_ramp_too_long() {
        let config = AsciiConfig {
            glyphs: Some((0..300).map(|i| i.to_string()).collect()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AsciiError::RampTooLong { len: 300 })
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config: AsciiConfig = toml::from_str(
            r#"
            ramp = " .#"
            curve = "shift:-20"
            resize = 0.2
            lookup = "scan"

            [camera]
            fps = 15
            device = "/dev/video2"
            "#,
        )
        .unwrap();

        assert_eq!(config.curve, ToneCurve::Shift(-20.0));
        assert_eq!(config.resize, Some(0.2));
        assert_eq!(config.lookup, LookupMode::Scan);
        assert_eq!(config.camera.fps, 15);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.camera.device.as_deref(), Some("/dev/video2"));
        assert_eq!(config.glyph_ramp().unwrap().len(), 3);
    }

    #[test]
    fn test_parse_toml_rejects_unknown_curve() {
        let result: std::result::Result<AsciiConfig, _> = toml::from_str(r#"curve = "sepia""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "curve = \"contrast-low\"").unwrap();
        writeln!(file, "glyphs = [\"  \", \"..\", \"##\"]").unwrap();

        let config = AsciiConfig::load(file.path()).unwrap();
        assert_eq!(config.curve, ToneCurve::ContrastLow);
        assert_eq!(config.glyph_ramp().unwrap().brightest(), "##");
    }

    #[test]
    fn test_load_missing_file() {
        let err = AsciiConfig::load(Path::new("/nonexistent/asciify.toml")).unwrap_err();
        assert!(matches!(err, AsciiError::ConfigFile { .. }));
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = AsciiConfig {
            curve: ToneCurve::Binary(127.0),
            resize: Some(0.5),
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: AsciiConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
