//! Application configuration.
//!
//! Loaded from a TOML file. Every field is optional:
//!
//! ```toml
//! default_filter = "vignette"
//!
//! [output]
//! directory = "out"
//! format = "jpeg"
//! file_stem = "instafilter"
//!
//! [parameters]
//! intensity = 0.5
//! radius = 0.2
//! scale = 0.4
//! ```

use crate::core::error::ConfigError;
use crate::core::types::{ImageFormat, ParameterValues};
use crate::filters::registry::{FilterRegistry, RegistryBuilder};
use crate::io::DirectorySink;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Filter selected when a session starts. Registry default when unset.
    pub default_filter: Option<String>,
    pub output: OutputConfig,
    /// Initial raw slider values, clamped into `[0, 1]` by the session.
    pub parameters: ParameterValues,
}

/// Where and how saved images are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// Format name or extension, e.g. `png` or `jpg`.
    pub format: String,
    pub file_stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            format: "png".to_string(),
            file_stem: "instafilter".to_string(),
        }
    }
}

impl AppConfig {
    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Parse config text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Check the config against a registry.
    pub fn validate(&self, registry: &FilterRegistry) -> Result<(), ConfigError> {
        if let Some(id) = &self.default_filter {
            if !registry.contains(id) {
                return Err(ConfigError::UnknownDefaultFilter(id.clone()));
            }
        }
        self.output_format()?;
        Ok(())
    }

    /// Parsed output format.
    pub fn output_format(&self) -> Result<ImageFormat, ConfigError> {
        match ImageFormat::from_extension(&self.output.format) {
            ImageFormat::Unknown => Err(ConfigError::UnsupportedFormat(self.output.format.clone())),
            format => Ok(format),
        }
    }

    /// Built-in registry with this config's default filter, after validation.
    pub fn registry(&self) -> Result<FilterRegistry, ConfigError> {
        let mut builder = RegistryBuilder::new();
        if let Some(id) = &self.default_filter {
            builder = builder.default_filter(id.clone());
        }
        let registry = builder.build();
        self.validate(&registry)?;
        Ok(registry)
    }

    /// Sink writing into the configured output directory.
    pub fn directory_sink(&self) -> Result<DirectorySink, ConfigError> {
        Ok(DirectorySink::new(
            &self.output.directory,
            self.output_format()?,
            &self.output.file_stem,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::builtin;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.output_format().unwrap(), ImageFormat::Png);

        let registry = config.registry().unwrap();
        assert_eq!(registry.default_filter().unwrap().id, builtin::SEPIA_TONE);
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_toml_str(
            r#"
            default_filter = "vignette"

            [output]
            directory = "renders"
            format = "jpg"

            [parameters]
            intensity = 0.5
            radius = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.output.directory, PathBuf::from("renders"));
        assert_eq!(config.output.file_stem, "instafilter");
        assert_eq!(config.output_format().unwrap(), ImageFormat::Jpeg);
        assert_eq!(config.parameters.intensity, 0.5);
        assert_eq!(config.parameters.radius, 0.2);
        assert_eq!(config.parameters.scale, 0.0);

        let registry = config.registry().unwrap();
        assert_eq!(registry.default_filter().unwrap().id, builtin::VIGNETTE);
        assert_eq!(config.directory_sink().unwrap().directory(), Path::new("renders"));
    }

    #[test]
    fn test_unknown_default_filter_rejected() {
        let config = AppConfig::from_toml_str(r#"default_filter = "CIComicEffect""#).unwrap();
        assert!(matches!(
            config.registry(),
            Err(ConfigError::UnknownDefaultFilter(ref id)) if id == "CIComicEffect"
        ));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let config = AppConfig::from_toml_str("[output]\nformat = \"heic\"").unwrap();
        assert!(matches!(config.output_format(), Err(ConfigError::UnsupportedFormat(_))));
        assert!(config.directory_sink().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::from_toml_str("default_filter = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parameters]\nscale = 0.4").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.parameters.scale, 0.4);

        let missing = AppConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
