//! Multipart field names and the storage folders they map to.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use klink_core::AppError;
use klink_core::config::FilesConfig;

/// Accepted multipart field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadField {
    /// `image` → `images/`.
    Image,
    /// `resume` → `resumes/`.
    Resume,
    /// `cover-letter` → `cover-letters/`.
    CoverLetter,
}

impl UploadField {
    /// Storage folder, also stored in `files.folder`.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Resume => "resumes",
            Self::CoverLetter => "cover-letters",
        }
    }

    /// Extensions this field accepts.
    pub fn extensions<'a>(&self, config: &'a FilesConfig) -> &'a [String] {
        match self {
            Self::Image => &config.image_extensions,
            Self::Resume => &config.resume_extensions,
            Self::CoverLetter => &config.cover_letter_extensions,
        }
    }

    /// Whether uploads in this field are resized.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image)
    }
}

impl FromStr for UploadField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "resume" => Ok(Self::Resume),
            "cover-letter" => Ok(Self::CoverLetter),
            _ => Err(AppError::validation(
                "Invalid key. Only available image, resume and cover-letter.",
            )),
        }
    }
}
