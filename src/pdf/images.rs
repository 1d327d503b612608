use std::io::Cursor;
use std::path::Path;

use image::{ColorType, ImageDecoder, ImageFormat};
use pdf_writer::Filter;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ImageColor {
    Gray,
    Rgb,
}

/// Image data ready to be written as an XObject stream.
pub(super) struct LoadedImage {
    pub(super) data: Vec<u8>,
    pub(super) filter: Filter,
    pub(super) color: ImageColor,
    pub(super) width: u32,
    pub(super) height: u32,
    /// Flate-compressed 8-bit soft mask, when the image has transparency.
    pub(super) alpha: Option<Vec<u8>>,
}

fn image_err(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::Image(format!("{}: {e}", path.display()))
}

/// Read an image file. Baseline grey and RGB JPEGs are passed through as
/// DCT streams; anything else is decoded and re-encoded with Flate.
pub(super) fn load_image(path: &Path) -> Result<LoadedImage, Error> {
    let data = std::fs::read(path).map_err(|e| image_err(path, e))?;
    let format = image::guess_format(&data).map_err(|e| image_err(path, e))?;

    if format == ImageFormat::Jpeg {
        let decoder = image::codecs::jpeg::JpegDecoder::new(Cursor::new(&data))
            .map_err(|e| image_err(path, e))?;
        let (width, height) = decoder.dimensions();
        let color = match decoder.color_type() {
            ColorType::L8 => Some(ImageColor::Gray),
            ColorType::Rgb8 => Some(ImageColor::Rgb),
            _ => None,
        };
        if let Some(color) = color {
            return Ok(LoadedImage {
                data,
                filter: Filter::DctDecode,
                color,
                width,
                height,
                alpha: None,
            });
        }
    }

    let decoded = image::load_from_memory(&data).map_err(|e| image_err(path, e))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let alpha = has_alpha.then(|| {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6)
    });

    Ok(LoadedImage {
        data: miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6),
        filter: Filter::FlateDecode,
        color: ImageColor::Rgb,
        width,
        height,
        alpha,
    })
}
