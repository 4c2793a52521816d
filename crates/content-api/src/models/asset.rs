//! Media asset model and thumbnail sizing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored file backing an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Storage URI (e.g. `local://2024/01/0190a1b2_report.pdf`).
    pub uri: String,
    pub filename: String,
    pub media_type: String,
}

/// What kind of media an asset is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetKind {
    /// Original image with its intrinsic dimensions.
    Image { width: u32, height: u32 },
    /// Derived image (e.g. a manual crop) of another image asset.
    ImageVariant {
        original: AssetId,
        width: u32,
        height: u32,
    },
    /// Any other file (PDF, archive, audio...).
    Document,
}

/// Managed media asset with descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub kind: AssetKind,
    pub resource: Resource,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub copyright_notice: String,
}

impl Asset {
    /// Images and image variants can be rendered as thumbnails.
    pub fn is_image_like(&self) -> bool {
        self.image_dimensions().is_some()
    }

    /// Intrinsic `(width, height)` for image-like assets.
    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        match self.kind {
            AssetKind::Image { width, height } | AssetKind::ImageVariant { width, height, .. } => {
                Some((width, height))
            }
            AssetKind::Document => None,
        }
    }
}

/// Parameters controlling how an image asset is resized for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThumbnailConfiguration {
    pub width: Option<u32>,
    pub maximum_width: Option<u32>,
    pub height: Option<u32>,
    pub maximum_height: Option<u32>,
    pub allow_cropping: bool,
    pub allow_upscaling: bool,
}

impl ThumbnailConfiguration {
    /// Fit within a maximum box, never cropping or upscaling.
    pub fn bounded(maximum_width: u32, maximum_height: u32) -> Self {
        Self {
            maximum_width: Some(maximum_width),
            maximum_height: Some(maximum_height),
            ..Self::default()
        }
    }

    fn target_box(&self) -> (Option<u32>, Option<u32>) {
        (
            self.width.or(self.maximum_width),
            self.height.or(self.maximum_height),
        )
    }

    /// Compute output dimensions for an original of the given size.
    pub fn fit(&self, original_width: u32, original_height: u32) -> (u32, u32) {
        if original_width == 0 || original_height == 0 {
            return (original_width, original_height);
        }

        let (box_width, box_height) = self.target_box();
        let box_width = box_width.unwrap_or(original_width);
        let box_height = box_height.unwrap_or(original_height);

        if self.allow_cropping {
            if self.allow_upscaling {
                return (box_width, box_height);
            }
            return (
                box_width.min(original_width),
                box_height.min(original_height),
            );
        }

        let mut ratio = f64::min(
            f64::from(box_width) / f64::from(original_width),
            f64::from(box_height) / f64::from(original_height),
        );
        if !self.allow_upscaling {
            ratio = ratio.min(1.0);
        }

        let scale = |v: u32| ((f64::from(v) * ratio).round() as u32).max(1);
        (scale(original_width), scale(original_height))
    }

    /// Name used for the derivative directory of this configuration.
    pub fn style_name(&self) -> String {
        let (width, height) = self.target_box();
        let axis = |v: Option<u32>| v.map_or_else(|| "auto".to_string(), |v| v.to_string());

        let mut name = format!("{}x{}", axis(width), axis(height));
        if self.allow_cropping {
            name.push_str("-crop");
        }
        if self.allow_upscaling {
            name.push_str("-upscale");
        }
        name
    }
}

/// Computed thumbnail for an image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn bounded_fits_landscape_into_box() {
        let config = ThumbnailConfiguration::bounded(1920, 1080);
        assert_eq!(config.fit(4000, 3000), (1440, 1080));
        assert_eq!(config.fit(3840, 1080), (1920, 540));
    }

    #[test]
    fn bounded_never_upscales() {
        let config = ThumbnailConfiguration::bounded(1920, 1080);
        assert_eq!(config.fit(800, 600), (800, 600));
    }

    #[test]
    fn upscaling_when_allowed() {
        let config = ThumbnailConfiguration {
            allow_upscaling: true,
            ..ThumbnailConfiguration::bounded(1600, 1600)
        };
        assert_eq!(config.fit(800, 600), (1600, 1200));
    }

    #[test]
    fn cropping_returns_box_clamped_to_original() {
        let config = ThumbnailConfiguration {
            width: Some(300),
            height: Some(300),
            allow_cropping: true,
            ..ThumbnailConfiguration::default()
        };
        assert_eq!(config.fit(1000, 500), (300, 300));
        assert_eq!(config.fit(200, 500), (200, 300));
    }

    #[test]
    fn zero_sized_original_is_passed_through() {
        let config = ThumbnailConfiguration::bounded(100, 100);
        assert_eq!(config.fit(0, 50), (0, 50));
    }

    #[test]
    fn style_name_reflects_box_and_flags() {
        assert_eq!(
            ThumbnailConfiguration::bounded(1920, 1080).style_name(),
            "1920x1080"
        );
        let config = ThumbnailConfiguration {
            width: Some(300),
            allow_cropping: true,
            ..ThumbnailConfiguration::default()
        };
        assert_eq!(config.style_name(), "300xauto-crop");
    }

    #[test]
    fn asset_kind_deserializes_tagged() {
        let json = serde_json::json!({
            "id": "img-1",
            "kind": {"type": "image", "width": 640, "height": 480},
            "resource": {"uri": "local://2024/01/photo.jpg", "filename": "photo.jpg", "mediaType": "image/jpeg"},
            "title": "Photo",
            "copyrightNotice": "(c) Someone"
        });
        let asset: Asset = serde_json::from_value(json).unwrap();
        assert!(asset.is_image_like());
        assert_eq!(asset.image_dimensions(), Some((640, 480)));
        assert_eq!(asset.caption, "");
        assert_eq!(asset.copyright_notice, "(c) Someone");
    }

    #[test]
    fn document_is_not_image_like() {
        let json = serde_json::json!({
            "id": "doc-1",
            "kind": {"type": "document"},
            "resource": {"uri": "local://2024/01/report.pdf", "filename": "report.pdf", "mediaType": "application/pdf"}
        });
        let asset: Asset = serde_json::from_value(json).unwrap();
        assert!(!asset.is_image_like());
    }
}
