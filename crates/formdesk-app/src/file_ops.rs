//! Native file access for page backgrounds.

use std::path::Path;

/// Extensions accepted as page backgrounds.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// An image file read from disk.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Ask the user for a background image.
pub fn pick_background_image() -> Option<ImageFile> {
    let path = rfd::FileDialog::new()
        .set_title("背景画像を選択")
        .add_filter("画像", IMAGE_EXTENSIONS)
        .pick_file()?;
    read_image(&path)
}

/// Read `path` if it holds a PNG or JPEG image.
pub fn read_image(path: &Path) -> Option<ImageFile> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            return None;
        }
    };
    if !is_supported_image(&bytes) {
        log::warn!("Not a PNG or JPEG image: {}", path.display());
        return None;
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "background".to_string());
    Some(ImageFile { name, bytes })
}

/// Sniff the image format from the file contents.
pub fn is_supported_image(bytes: &[u8]) -> bool {
    matches!(
        image::guess_format(bytes),
        Ok(image::ImageFormat::Png | image::ImageFormat::Jpeg)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

    #[test]
    fn test_sniffs_format() {
        assert!(is_supported_image(PNG_MAGIC));
        assert!(is_supported_image(&[0xff, 0xd8, 0xff, 0xe0, 0, 0]));
        assert!(!is_supported_image(b"{\"name\": \"x\"}"));
        assert!(!is_supported_image(&[]));
    }

    #[test]
    fn test_read_image_checks_contents() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("scan.png");
        std::fs::write(&png, PNG_MAGIC).unwrap();
        let file = read_image(&png).unwrap();
        assert_eq!(file.name, "scan.png");
        assert_eq!(file.bytes, PNG_MAGIC);

        let fake = dir.path().join("fake.png");
        std::fs::write(&fake, b"not an image").unwrap();
        assert!(read_image(&fake).is_none());
        assert!(read_image(&dir.path().join("missing.png")).is_none());
    }
}
