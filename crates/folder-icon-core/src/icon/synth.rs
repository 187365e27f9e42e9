use crate::error::Error;
use crate::icon::sizes::{fit_within, variant_sizes, MAX_ICON_EDGE};
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{
    ColorType, DynamicImage, ExtendedColorType, ImageEncoder, ImageError, ImageFormat,
    ImageReader, ImageResult, RgbaImage,
};
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;
use tracing::{debug, warn};

// ICONDIR header plus one ICONDIRENTRY.
const SINGLE_ENTRY_HEADER_LEN: usize = 6 + 16;

/// One resolution inside an icon container.
#[derive(Debug, Clone)]
pub struct IconVariant {
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
    /// PNG-encoded pixels as stored in the container.
    pub data: Vec<u8>,
}

/// A serialized ICO file together with a description of its entries.
#[derive(Debug, Clone)]
pub struct IconContainer {
    variants: Vec<IconVariant>,
    bytes: Vec<u8>,
    degraded: bool,
}

impl IconContainer {
    pub fn variants(&self) -> &[IconVariant] {
        &self.variants
    }

    pub fn sizes(&self) -> Vec<(u32, u32)> {
        self.variants.iter().map(|v| (v.width, v.height)).collect()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when the container came from the single-resolution fallback.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.bytes)
    }
}

/// Decode `source` and build a multi-resolution icon container from it.
///
/// When the multi-resolution encode fails the image is retried as a single
/// entry capped at 256 pixels. Only if that also fails is an error returned.
pub fn synthesize(source: &Path) -> Result<IconContainer, Error> {
    let rgba = decode(source)?.into_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("Decoded {} ({}x{})", source.display(), width, height);

    if width == 0 || height == 0 {
        return Err(Error::Conversion {
            path: source.to_path_buf(),
            message: "image has no pixels".to_string(),
        });
    }

    match multi_resolution(&rgba) {
        Ok(container) => Ok(container),
        Err(err) => {
            warn!(
                "Multi-resolution encode failed for {}: {}; retrying with a single entry",
                source.display(),
                err
            );
            single_resolution(&rgba).map_err(|fallback_err| Error::Conversion {
                path: source.to_path_buf(),
                message: format!("{}; fallback failed: {}", err, fallback_err),
            })
        }
    }
}

fn decode(path: &Path) -> Result<DynamicImage, Error> {
    let decode_error = |source: ImageError| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)
}

fn multi_resolution(rgba: &RgbaImage) -> ImageResult<IconContainer> {
    let (width, height) = rgba.dimensions();
    let mut variants = Vec::new();

    for (target_w, target_h) in variant_sizes(width, height) {
        let resized = resample(rgba, target_w, target_h);
        variants.push(IconVariant {
            width: target_w,
            height: target_h,
            color_type: ColorType::Rgba8,
            data: encode_png(&resized)?,
        });
    }

    let frames = variants
        .iter()
        .map(|v| {
            IcoFrame::with_encoded(v.data.as_slice(), v.width, v.height, ExtendedColorType::Rgba8)
        })
        .collect::<ImageResult<Vec<_>>>()?;

    let mut bytes = Vec::new();
    IcoEncoder::new(&mut bytes).encode_images(&frames)?;

    Ok(IconContainer {
        variants,
        bytes,
        degraded: false,
    })
}

fn single_resolution(rgba: &RgbaImage) -> ImageResult<IconContainer> {
    let (width, height) = rgba.dimensions();
    let (target_w, target_h) = fit_within(width, height, MAX_ICON_EDGE);
    let resized = resample(rgba, target_w, target_h);

    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(resized).write_to(&mut cursor, ImageFormat::Ico)?;
    let bytes = cursor.into_inner();

    let data = bytes
        .get(SINGLE_ENTRY_HEADER_LEN..)
        .map(<[u8]>::to_vec)
        .unwrap_or_default();

    Ok(IconContainer {
        variants: vec![IconVariant {
            width: target_w,
            height: target_h,
            color_type: ColorType::Rgba8,
            data,
        }],
        bytes,
        degraded: true,
    })
}

fn resample(rgba: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if rgba.dimensions() == (width, height) {
        rgba.clone()
    } else {
        imageops::resize(rgba, width, height, FilterType::Lanczos3)
    }
}

fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut data = Vec::new();
    PngEncoder::new(&mut data).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::sizes::CANONICAL_SIZES;
    use image::{Rgb, RgbImage, Rgba};
    use tempfile::tempdir;

    fn read_entries(bytes: &[u8]) -> Vec<(u32, u32, u16)> {
        let dir = ico::IconDir::read(Cursor::new(bytes)).unwrap();
        dir.entries()
            .iter()
            .map(|e| (e.width(), e.height(), e.bits_per_pixel()))
            .collect()
    }

    #[test]
    fn test_small_png_gets_canonical_sizes() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("logo.png");
        RgbaImage::from_pixel(64, 64, Rgba([200, 10, 10, 128]))
            .save(&source)
            .unwrap();

        let container = synthesize(&source).unwrap();
        assert!(!container.is_degraded());

        let mut sizes = container.sizes();
        sizes.sort();
        let mut expected: Vec<(u32, u32)> = CANONICAL_SIZES.iter().map(|&s| (s, s)).collect();
        expected.sort();
        assert_eq!(sizes, expected);

        let entries = read_entries(container.as_bytes());
        assert_eq!(entries.len(), 5);
        assert_eq!((entries[0].0, entries[0].1), (128, 128));
    }

    #[test]
    fn test_rgb_source_becomes_rgba() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("photo.jpg");
        RgbImage::from_pixel(1024, 512, Rgb([10, 120, 240]))
            .save(&source)
            .unwrap();

        let container = synthesize(&source).unwrap();
        assert!(container.sizes().contains(&(256, 128)));
        for variant in container.variants() {
            assert_eq!(variant.color_type, ColorType::Rgba8);
        }

        let dir = ico::IconDir::read(Cursor::new(container.as_bytes())).unwrap();
        assert_eq!(dir.entries().len(), 6);
        for entry in dir.entries() {
            assert_eq!(entry.bits_per_pixel(), 32);
            let decoded = entry.decode().unwrap();
            assert!(decoded.rgba_data().chunks(4).all(|px| px[3] == 255));
        }
        assert!(dir
            .entries()
            .iter()
            .any(|e| e.width() == 256 && e.height() == 128));
    }

    #[test]
    fn test_corrupt_source_is_decode_error() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("broken.png");
        fs::write(&source, b"definitely not a png").unwrap();

        match synthesize(&source) {
            Err(Error::Decode { path, .. }) => assert_eq!(path, source),
            other => panic!("expected decode error, got {:?}", other.map(|c| c.sizes())),
        }
    }

    #[test]
    fn test_missing_source_is_decode_error() {
        let tmp = tempdir().unwrap();
        let result = synthesize(&tmp.path().join("gone.png"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_single_resolution_fallback_caps_size() {
        let rgba = RgbaImage::from_pixel(600, 300, Rgba([0, 0, 0, 255]));
        let container = single_resolution(&rgba).unwrap();

        assert!(container.is_degraded());
        assert_eq!(container.sizes(), vec![(256, 128)]);
        assert!(!container.variants()[0].data.is_empty());

        let entries = read_entries(container.as_bytes());
        assert_eq!(entries, vec![(256, 128, 32)]);
    }

    #[test]
    fn test_single_resolution_keeps_small_images() {
        let rgba = RgbaImage::from_pixel(40, 24, Rgba([1, 2, 3, 4]));
        let container = single_resolution(&rgba).unwrap();
        assert_eq!(container.sizes(), vec![(40, 24)]);
    }

    #[test]
    fn test_write_to_persists_container() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("tiny.bmp");
        RgbImage::from_pixel(16, 16, Rgb([1, 1, 1])).save(&source).unwrap();

        let container = synthesize(&source).unwrap();
        let target = tmp.path().join("tiny.ico");
        container.write_to(&target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), container.as_bytes());
    }
}
