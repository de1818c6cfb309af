use crate::config::{CompositionOffset, Config};
use crate::error::{ImageRole, Result, StampError};
use crate::formats::ImageKind;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionOptions {
    pub offset: CompositionOffset,
    pub jpeg_quality: u8,
    pub optimize_png: bool,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            offset: CompositionOffset::default(),
            jpeg_quality: crate::constants::DEFAULT_JPEG_QUALITY,
            optimize_png: false,
        }
    }
}

impl From<&Config> for CompositionOptions {
    fn from(config: &Config) -> Self {
        Self {
            offset: config.offset,
            jpeg_quality: config.jpeg_quality,
            optimize_png: config.optimize_png,
        }
    }
}

/// A validated input: its path, sniffed kind and role in the composition.
#[derive(Debug, Clone, Copy)]
pub struct SourceImage<'a> {
    pub path: &'a Path,
    pub kind: ImageKind,
    pub role: ImageRole,
}

struct OpenedSource<'a> {
    source: SourceImage<'a>,
    reader: BufReader<File>,
}

impl<'a> SourceImage<'a> {
    fn open(self) -> Result<OpenedSource<'a>> {
        let file = File::open(self.path).map_err(|e| StampError::io(self.path, e))?;
        Ok(OpenedSource {
            source: self,
            reader: BufReader::new(file),
        })
    }
}

impl OpenedSource<'_> {
    fn decode(self) -> Result<DynamicImage> {
        let SourceImage { path, kind, role } = self.source;
        let format = kind.image_format().ok_or_else(|| StampError::UnsupportedFormat {
            path: path.to_path_buf(),
            role,
            content_type: kind.to_string(),
        })?;

        ImageReader::with_format(self.reader, format)
            .decode()
            .map_err(|source| StampError::Decode {
                path: path.to_path_buf(),
                role,
                source,
            })
    }
}

/// Draw `watermark` over `main` at `offset` on a canvas the size of `main`.
///
/// The main image replaces the canvas outright; the watermark is blended with
/// its own alpha. Whatever falls outside the canvas is clipped.
pub fn composite(
    main: &DynamicImage,
    watermark: &DynamicImage,
    offset: CompositionOffset,
) -> RgbaImage {
    let mut canvas = main.to_rgba8();
    let watermark = watermark.to_rgba8();

    let canvas_width = canvas.width() as i64;
    let canvas_height = canvas.height() as i64;
    let (off_x, off_y) = (offset.x as i64, offset.y as i64);

    // Visible region, clamped to the canvas
    let x_start = off_x.max(0);
    let y_start = off_y.max(0);
    let x_end = (off_x + watermark.width() as i64).min(canvas_width);
    let y_end = (off_y + watermark.height() as i64).min(canvas_height);

    for cy in y_start..y_end {
        for cx in x_start..x_end {
            let mark = watermark.get_pixel((cx - off_x) as u32, (cy - off_y) as u32);
            let pixel = canvas.get_pixel_mut(cx as u32, cy as u32);
            *pixel = blend_over(*pixel, *mark);
        }
    }

    canvas
}

/// Porter-Duff "over" of straight-alpha pixels, rounded to the nearest value.
fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let src_a = foreground[3] as u32;
    let dst_a = background[3] as u32;
    let inv_a = 255 - src_a;

    // output alpha scaled by 255
    let out_a = src_a * 255 + dst_a * inv_a;
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |fg: u8, bg: u8| -> u8 {
        let num = fg as u32 * src_a * 255 + bg as u32 * dst_a * inv_a;
        ((num + out_a / 2) / out_a) as u8
    };

    Rgba([
        channel(foreground[0], background[0]),
        channel(foreground[1], background[1]),
        channel(foreground[2], background[2]),
        ((out_a + 127) / 255) as u8,
    ])
}

/// Encode `canvas` in the codec of `kind`.
///
/// JPEG output drops the alpha channel.
pub fn encode_image(
    canvas: RgbaImage,
    kind: ImageKind,
    output: &Path,
    options: &CompositionOptions,
) -> Result<Vec<u8>> {
    let encode_err = |source: image::ImageError| StampError::Encode {
        path: output.to_path_buf(),
        source,
    };

    let mut encoded = Vec::new();
    match kind {
        ImageKind::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(canvas).into_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut encoded, options.jpeg_quality);
            rgb.write_with_encoder(encoder).map_err(encode_err)?;
        }
        ImageKind::Png => {
            canvas
                .write_with_encoder(PngEncoder::new(&mut encoded))
                .map_err(encode_err)?;

            if options.optimize_png {
                let preset = oxipng::Options::from_preset(crate::constants::OXIPNG_PRESET);
                encoded = oxipng::optimize_from_memory(&encoded, &preset).map_err(|e| {
                    StampError::PngOptimization {
                        path: output.to_path_buf(),
                        message: e.to_string(),
                    }
                })?;
            }
        }
        ImageKind::Unsupported => {
            return Err(StampError::UnsupportedFormat {
                path: output.to_path_buf(),
                role: ImageRole::Main,
                content_type: kind.to_string(),
            });
        }
    }

    Ok(encoded)
}

/// Decode both inputs, composite, and write the result to `output`.
///
/// Both inputs must already be validated. The output uses the main image's
/// codec. Returns the number of bytes written.
pub fn stamp_image(
    main: SourceImage<'_>,
    watermark: SourceImage<'_>,
    output: &Path,
    options: &CompositionOptions,
) -> Result<u64> {
    let main_source = main.open()?;
    let watermark_source = watermark.open()?;

    let main_img = main_source.decode()?;
    let watermark_img = watermark_source.decode()?;

    let canvas = composite(&main_img, &watermark_img, options.offset);
    let encoded = encode_image(canvas, main.kind, output, options)?;

    write_output(output, &encoded)?;
    Ok(encoded.len() as u64)
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(output).map_err(|e| StampError::io(output, e))?;
    file.write_all(bytes).map_err(|e| StampError::io(output, e))
}
