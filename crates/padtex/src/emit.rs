use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::{debug, trace};

use crate::codec::unpack_pixels;
use crate::encoding::PixelEncoding;
use crate::error::Error;
use crate::post::{blacken_transparent_pixels, trim_transparent_edges, DecodedImage};
use crate::scan::Texture;
use crate::{ExportOptions, Result};

/// `tEXt` chunk with a "Software" keyword, spliced into every PNG we write.
pub const SOFTWARE_CHUNK: [u8; 130] = *b"\x00\x00\x00vtEXtSoftware\x00Exported using the Puzzle & Dragons Texture Tool (www.codywatts.com/projects/puzzle-and-dragons-texture-tool)o(\x913";

/// Length, type and CRC of the empty `IEND` chunk.
pub const IEND_CHUNK_SIZE: usize = 12;

fn color_type(encoding: PixelEncoding) -> Option<ExtendedColorType> {
    match encoding.channel_count() {
        1 => Some(ExtendedColorType::L8),
        3 => Some(ExtendedColorType::Rgb8),
        4 => Some(ExtendedColorType::Rgba8),
        _ => None,
    }
}

/// Encodes 8-bit pixels as PNG and inserts [`SOFTWARE_CHUNK`] before `IEND`.
pub fn encode_png(image: &DecodedImage, encoding: PixelEncoding) -> Result<Vec<u8>> {
    let color = color_type(encoding).ok_or(Error::NotEncodable { encoding })?;

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(&image.pixels, image.width, image.height, color)?;

    let tail_start = png
        .len()
        .checked_sub(IEND_CHUNK_SIZE)
        .ok_or(Error::IntegerOverflow)?;
    let tail = png.split_off(tail_start);
    png.reserve(SOFTWARE_CHUNK.len() + tail.len());
    png.extend_from_slice(&SOFTWARE_CHUNK);
    png.extend_from_slice(&tail);
    Ok(png)
}

/// Decodes and post-processes the pixels of a non-raw texture.
pub fn decode_image(texture: &Texture<'_>, options: &ExportOptions) -> Result<DecodedImage> {
    let encoding = texture.encoding();
    let mut image = DecodedImage {
        width: texture.width(),
        height: texture.height(),
        channels: encoding.channel_count(),
        pixels: unpack_pixels(encoding, texture.width(), texture.height(), texture.data)?,
    };

    if encoding.has_alpha() {
        if options.trim {
            image = trim_transparent_edges(&image);
        }
        if options.blacken {
            blacken_transparent_pixels(&mut image);
        }
    }

    Ok(image)
}

/// Bytes of the output file for `texture`, or `None` when there is nothing
/// worth writing.
pub fn render_texture(texture: &Texture<'_>, options: &ExportOptions) -> Result<Option<Vec<u8>>> {
    if texture.encoding().is_raw() {
        if texture.data.iter().all(|&b| b == 0) {
            trace!("skipping empty raw payload \"{}\"", texture.name());
            return Ok(None);
        }
        return Ok(Some(texture.data.to_vec()));
    }

    let image = decode_image(texture, options)?;
    if image.is_empty() || image.is_blank() {
        trace!("skipping blank texture \"{}\"", texture.name());
        return Ok(None);
    }

    debug!(
        "encoding \"{}\" as {}x{} {}",
        texture.name(),
        image.width,
        image.height,
        texture.encoding()
    );
    encode_png(&image, texture.encoding()).map(Some)
}

/// Renders `texture` and writes it to `path`, creating missing directories.
///
/// Returns `false` when nothing was written.
pub fn export_texture(texture: &Texture<'_>, path: &Path, options: &ExportOptions) -> Result<bool> {
    let Some(bytes) = render_texture(texture, options)? else {
        return Ok(false);
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(true)
}
