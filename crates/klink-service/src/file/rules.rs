//! Extension rules and stored-name generation for uploads.

use klink_core::config::FilesConfig;
use klink_core::error::AppError;
use klink_core::result::AppResult;
use klink_entity::file::UploadField;

/// Lowercased extension of `file_name`, including the dot.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

/// Check `file_name` against the global allow-list and the field's own list.
/// Returns the normalized extension.
pub fn check_extension(
    field: UploadField,
    file_name: &str,
    config: &FilesConfig,
) -> AppResult<String> {
    let accepted = field.extensions(config);
    let contains = |list: &[String], ext: &str| list.iter().any(|e| e.eq_ignore_ascii_case(ext));

    match extension_of(file_name) {
        Some(ext)
            if contains(config.allowed_extensions.as_slice(), &ext) && contains(accepted, &ext) =>
        {
            Ok(ext)
        }
        _ => Err(AppError::validation(format!(
            "Invalid file. Only available {}.",
            accepted.join(", ")
        ))),
    }
}

/// A fresh stored name: 32 random bytes as hex, then the extension.
pub fn random_name(extension: &str) -> String {
    let mut bytes = [0u8; 32];
    rand::fill(&mut bytes[..]);
    format!("{}{extension}", hex::encode(bytes))
}

/// Content type implied by an extension, for clients that send none.
pub fn mime_for(extension: &str) -> &'static str {
    match extension {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".webp" => "image/webp",
        ".pdf" => "application/pdf",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use klink_core::error::ErrorKind;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Photo.JPG").as_deref(), Some(".jpg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".env"), None);
    }

    #[test]
    fn test_field_rules() {
        let config = FilesConfig::default();
        assert_eq!(
            check_extension(UploadField::Image, "me.PNG", &config).unwrap(),
            ".png"
        );
        assert!(check_extension(UploadField::Resume, "cv.pdf", &config).is_ok());

        let err = check_extension(UploadField::Image, "cv.pdf", &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Invalid file. Only available .jpg, .jpeg, .png, .webp.");
    }

    #[test]
    fn test_global_list_also_applies() {
        let config = FilesConfig {
            allowed_extensions: vec![".pdf".into()],
            ..FilesConfig::default()
        };
        assert!(check_extension(UploadField::Image, "me.png", &config).is_err());
        assert!(check_extension(UploadField::CoverLetter, "letter.pdf", &config).is_ok());
    }

    #[test]
    fn test_random_name() {
        let name = random_name(".png");
        assert_eq!(name.len(), 64 + 4);
        assert!(name.ends_with(".png"));
        assert_ne!(name, random_name(".png"));
    }
}
