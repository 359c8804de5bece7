//! Upload rules: which extensions each upload field accepts.

use serde::{Deserialize, Serialize};

/// File upload configuration.
///
/// Extensions include the leading dot (`.jpg`) and are compared
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Global allow-list applied to every upload.
    #[serde(default = "default_allowed")]
    pub allowed_extensions: Vec<String>,
    /// Extensions accepted for the `image` field.
    #[serde(default = "default_image")]
    pub image_extensions: Vec<String>,
    /// Extensions accepted for the `resume` field.
    #[serde(default = "default_documents")]
    pub resume_extensions: Vec<String>,
    /// Extensions accepted for the `cover-letter` field.
    #[serde(default = "default_documents")]
    pub cover_letter_extensions: Vec<String>,
    /// Images are scaled down to fit this width.
    #[serde(default = "default_max_width")]
    pub image_max_width: u32,
    /// Images are scaled down to fit this height.
    #[serde(default = "default_max_height")]
    pub image_max_height: u32,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed(),
            image_extensions: default_image(),
            resume_extensions: default_documents(),
            cover_letter_extensions: default_documents(),
            image_max_width: default_max_width(),
            image_max_height: default_max_height(),
        }
    }
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_allowed() -> Vec<String> {
    list(&[".jpg", ".jpeg", ".png", ".webp", ".pdf", ".doc", ".docx"])
}

fn default_image() -> Vec<String> {
    list(&[".jpg", ".jpeg", ".png", ".webp"])
}

fn default_documents() -> Vec<String> {
    list(&[".pdf", ".doc", ".docx"])
}

fn default_max_width() -> u32 {
    1080
}

fn default_max_height() -> u32 {
    1920
}
