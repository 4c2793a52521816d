//! Property converter settings.
//!
//! Loaded once at startup from a YAML file and never mutated afterwards:
//!
//! ```yaml
//! contentApi:
//!   imageMaximumWidth: 1920
//!   imageMaximumHeight: 1080
//!   recursiveReferencePropertyDepth: 2
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::warn;

/// Default maximum thumbnail width in pixels.
pub const DEFAULT_IMAGE_MAXIMUM_WIDTH: u32 = 1920;

/// Default maximum thumbnail height in pixels.
pub const DEFAULT_IMAGE_MAXIMUM_HEIGHT: u32 = 1080;

/// Largest accepted reference recursion depth.
pub const MAX_REFERENCE_DEPTH: u32 = 32;

/// Read-only converter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterSettings {
    /// Maximum thumbnail width for image-like assets.
    pub image_maximum_width: u32,

    /// Maximum thumbnail height for image-like assets.
    pub image_maximum_height: u32,

    /// How many reference hops to follow. `None` disables recursion:
    /// every node reference converts to null. Never above
    /// [`MAX_REFERENCE_DEPTH`].
    recursive_reference_property_depth: Option<u32>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            image_maximum_width: DEFAULT_IMAGE_MAXIMUM_WIDTH,
            image_maximum_height: DEFAULT_IMAGE_MAXIMUM_HEIGHT,
            recursive_reference_property_depth: None,
        }
    }
}

#[derive(Deserialize, Default)]
struct SettingsFile {
    #[serde(rename = "contentApi", default)]
    content_api: RawSettings,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    image_maximum_width: Option<u32>,
    image_maximum_height: Option<u32>,
    /// Kept untyped: anything but a non-negative integer disables recursion.
    recursive_reference_property_depth: Option<serde_json::Value>,
}

impl ConverterSettings {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_yaml(&yaml)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    /// Parse settings from YAML. Missing keys fall back to defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: Option<SettingsFile> =
            serde_yml::from_str(yaml).context("failed to parse settings YAML")?;
        let raw = file.unwrap_or_default().content_api;

        let depth = match raw.recursive_reference_property_depth {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => match value.as_u64() {
                Some(depth) if depth > u64::from(MAX_REFERENCE_DEPTH) => bail!(
                    "recursiveReferencePropertyDepth {depth} is out of range, the maximum is {MAX_REFERENCE_DEPTH}"
                ),
                Some(depth) => u32::try_from(depth).ok(),
                None => {
                    warn!(
                        value = %value,
                        "recursiveReferencePropertyDepth is not a non-negative integer, reference recursion disabled"
                    );
                    None
                }
            },
        };

        Self {
            image_maximum_width: raw
                .image_maximum_width
                .unwrap_or(DEFAULT_IMAGE_MAXIMUM_WIDTH),
            image_maximum_height: raw
                .image_maximum_height
                .unwrap_or(DEFAULT_IMAGE_MAXIMUM_HEIGHT),
            recursive_reference_property_depth: None,
        }
        .with_reference_depth(depth)
    }

    /// Configured reference recursion depth; `None` when recursion is disabled.
    pub fn reference_depth(&self) -> Option<u32> {
        self.recursive_reference_property_depth
    }

    /// Set the reference recursion depth.
    ///
    /// Fails when `depth` exceeds [`MAX_REFERENCE_DEPTH`].
    pub fn with_reference_depth(mut self, depth: Option<u32>) -> Result<Self> {
        if let Some(depth) = depth.filter(|depth| *depth > MAX_REFERENCE_DEPTH) {
            bail!("reference depth {depth} is out of range, the maximum is {MAX_REFERENCE_DEPTH}");
        }
        self.recursive_reference_property_depth = depth;
        Ok(self)
    }

    /// Set the maximum thumbnail box.
    pub fn with_image_maximum(mut self, width: u32, height: u32) -> Self {
        self.image_maximum_width = width;
        self.image_maximum_height = height;
        self
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn full_settings() {
        let settings = ConverterSettings::from_yaml(
            "contentApi:\n  imageMaximumWidth: 800\n  imageMaximumHeight: 600\n  recursiveReferencePropertyDepth: 2\n",
        )
        .unwrap();
        assert_eq!(settings.image_maximum_width, 800);
        assert_eq!(settings.image_maximum_height, 600);
        assert_eq!(settings.reference_depth(), Some(2));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let settings = ConverterSettings::from_yaml("contentApi: {}\n").unwrap();
        assert_eq!(settings, ConverterSettings::default());

        let settings = ConverterSettings::from_yaml("").unwrap();
        assert_eq!(settings, ConverterSettings::default());
    }

    #[test]
    fn zero_depth_is_kept() {
        let settings =
            ConverterSettings::from_yaml("contentApi:\n  recursiveReferencePropertyDepth: 0\n")
                .unwrap();
        assert_eq!(settings.reference_depth(), Some(0));
    }

    #[test]
    fn depth_at_maximum_is_accepted() {
        let yaml = format!("contentApi:\n  recursiveReferencePropertyDepth: {MAX_REFERENCE_DEPTH}\n");
        let settings = ConverterSettings::from_yaml(&yaml).unwrap();
        assert_eq!(settings.reference_depth(), Some(MAX_REFERENCE_DEPTH));
    }

    #[test]
    fn depth_above_maximum_is_rejected() {
        for value in ["33", "40", "5000000000"] {
            let yaml = format!("contentApi:\n  recursiveReferencePropertyDepth: {value}\n");
            let err = ConverterSettings::from_yaml(&yaml).unwrap_err();
            assert!(
                err.to_string().contains("out of range"),
                "value {value} gave: {err}"
            );
        }
        assert!(
            ConverterSettings::default()
                .with_reference_depth(Some(MAX_REFERENCE_DEPTH + 1))
                .is_err()
        );
    }

    #[test]
    fn non_integer_depth_disables_recursion() {
        for value in ["'2'", "1.5", "-1", "true", "~"] {
            let yaml = format!("contentApi:\n  recursiveReferencePropertyDepth: {value}\n");
            let settings = ConverterSettings::from_yaml(&yaml).unwrap();
            assert_eq!(
                settings.reference_depth(),
                None,
                "value {value} should disable recursion"
            );
        }
    }

    #[test]
    fn invalid_image_maximum_is_an_error() {
        assert!(ConverterSettings::from_yaml("contentApi:\n  imageMaximumWidth: wide\n").is_err());
    }

    #[test]
    fn builders() {
        let settings = ConverterSettings::default()
            .with_image_maximum(100, 50)
            .with_reference_depth(Some(3))
            .unwrap();
        assert_eq!(settings.reference_depth(), Some(3));
        assert_eq!(settings.image_maximum_width, 100);
        assert_eq!(settings.image_maximum_height, 50);
    }
}
