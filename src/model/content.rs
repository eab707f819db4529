//! Content type and physical metadata for media items.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIME content type of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
    #[serde(rename = "image/png")]
    ImagePng,
    #[serde(rename = "image/gif")]
    Gif,
    #[serde(rename = "video/mp4")]
    VideoMp4,
    #[serde(rename = "video/webm")]
    VideoWebm,
}

impl ContentType {
    /// The MIME string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::ImageJpeg => "image/jpeg",
            ContentType::ImagePng => "image/png",
            ContentType::Gif => "image/gif",
            ContentType::VideoMp4 => "video/mp4",
            ContentType::VideoWebm => "video/webm",
        }
    }

    /// Canonical file extension, or empty when none is defined.
    pub fn file_extension(&self) -> &'static str {
        match self {
            ContentType::ImageJpeg => "jpg",
            ContentType::ImagePng => "png",
            ContentType::Gif => "gif",
            ContentType::VideoMp4 => "mp4",
            ContentType::VideoWebm => "",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel dimensions of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Physical metadata attached to a media item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub content_type: ContentType,
    pub dimensions: Dimensions,
    pub file_size_bytes: u64,
}

impl ContentMetadata {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.dimensions.width) / f64::from(self.dimensions.height)
    }

    pub fn is_portrait(&self) -> bool {
        self.dimensions.height > self.dimensions.width
    }

    pub fn is_landscape(&self) -> bool {
        self.dimensions.width > self.dimensions.height
    }

    pub fn is_square(&self) -> bool {
        self.dimensions.width == self.dimensions.height
    }

    pub fn file_size_kb(&self) -> f64 {
        self.file_size_bytes as f64 / 1024.0
    }

    pub fn file_size_mb(&self) -> f64 {
        self.file_size_bytes as f64 / (1024.0 * 1024.0)
    }
}
