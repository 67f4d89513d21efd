//! JSON shapes returned by the remote imagery API.

use serde::{Deserialize, Serialize};

/// Media type of an APOD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    /// Anything else the archive returns (e.g. interactive "other" entries)
    #[serde(other)]
    Other,
}

/// One Astronomy Picture of the Day record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApodItem {
    /// Publication date as `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub media_type: MediaType,

    /// Image URL, or embed URL for videos
    #[serde(default)]
    pub url: String,

    /// High resolution image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,

    /// Still frame for videos, only sent when thumbnails are requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub explanation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl ApodItem {
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    /// URL to show as a still image.
    ///
    /// Videos with a thumbnail show the thumbnail; everything else shows
    /// the primary URL. Videos without a thumbnail return `None`.
    pub fn display_image_url(&self) -> Option<&str> {
        match self.media_type {
            MediaType::Video => self.thumbnail_url.as_deref().filter(|u| !u.is_empty()),
            _ => Some(self.url.as_str()).filter(|u| !u.is_empty()),
        }
    }
}

/// Camera that took a rover photo.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Short code such as `NAVCAM`
    #[serde(default)]
    pub name: Option<String>,

    /// Descriptive name such as `Navigation Camera`
    #[serde(default)]
    pub full_name: Option<String>,
}

impl CameraInfo {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown camera")
    }
}

/// Rover that took a photo.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoverInfo {
    #[serde(default)]
    pub name: String,
}

/// One Mars rover photo.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoverPhoto {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub img_src: String,

    #[serde(default)]
    pub earth_date: String,

    /// Martian solar day of the mission
    #[serde(default)]
    pub sol: i64,

    #[serde(default)]
    pub camera: CameraInfo,

    #[serde(default)]
    pub rover: RoverInfo,
}
