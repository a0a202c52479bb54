use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;

use crate::error::AssetError;

/// Tightly packed RGBA8 pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// `width × height` texels of one colour.
    pub fn solid(width: u32, height: u32, texel: [u8; 4]) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            rgba: texel.repeat(count),
        }
    }

    /// The 1×1 white texel used when a mesh has no base-colour texture.
    pub fn white() -> Self {
        Self::solid(1, 1, [255; 4])
    }

    pub fn black(width: u32, height: u32) -> Self {
        Self::solid(width, height, [0, 0, 0, 255])
    }

    /// Decode any format `image` understands into RGBA8.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let img = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from(img.to_rgba8()))
    }

    /// Resample to `width × height`, or return `self` untouched when the
    /// size already matches.
    pub fn resized(self, width: u32, height: u32) -> Self {
        if self.width == width && self.height == height {
            return self;
        }
        match RgbaImage::from_raw(self.width, self.height, self.rgba) {
            Some(img) => Self::from(image::imageops::resize(&img, width, height, FilterType::Triangle)),
            None => Self::black(width, height),
        }
    }

    /// Bytes per row for an upload.
    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }
}

impl From<RgbaImage> for TextureData {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba: img.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_fills_every_texel() {
        let t = TextureData::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(t.rgba.len(), 24);
        assert!(t.rgba.chunks(4).all(|px| px == [1, 2, 3, 4]));
        assert_eq!(t.bytes_per_row(), 12);
    }

    #[test]
    fn resize_changes_dimensions_and_keeps_colour() {
        let t = TextureData::solid(4, 4, [10, 20, 30, 255]).resized(2, 2);
        assert_eq!((t.width, t.height), (2, 2));
        assert_eq!(t.rgba.len(), 16);
        assert!(t.rgba.chunks(4).all(|px| px == [10, 20, 30, 255]));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let err = TextureData::load(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }
}
