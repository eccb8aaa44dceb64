use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::encoding::{PixelEncoding, WordLayout};
use crate::error::Error;
use crate::rescale;
use crate::Result;

/// Target depth of every decoded channel.
pub const TARGET_BIT_DEPTH: u8 = 8;

#[derive(Copy, Clone, Debug)]
struct ChannelUnpacker {
    shift: u32,
    mask: u32,
    table: &'static [u8; 256],
}

fn channel_unpackers(channels: &[u8]) -> Vec<ChannelUnpacker> {
    channels
        .iter()
        .enumerate()
        .map(|(index, &bits)| {
            let shift: u32 = channels[index + 1..].iter().map(|&b| u32::from(b)).sum();
            ChannelUnpacker {
                shift,
                mask: ((1u32 << bits) - 1) << shift,
                table: rescale::table(bits, TARGET_BIT_DEPTH),
            }
        })
        .collect()
}

/// Unpacks `width * height` packed words into channel-interleaved 8-bit samples.
///
/// Raw payloads are returned unchanged. Bytes past the last pixel are ignored.
pub fn unpack_pixels(
    encoding: PixelEncoding,
    width: u32,
    height: u32,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let Some(layout) = encoding.word_layout() else {
        return Ok(payload.to_vec());
    };

    let pixel_count = usize::try_from(u64::from(width) * u64::from(height))
        .map_err(|_| Error::IntegerOverflow)?;
    let word_size = match layout {
        WordLayout::U32Be => 4,
        WordLayout::U16Le => 2,
        WordLayout::U8 => 1,
    };
    let expected = pixel_count
        .checked_mul(word_size)
        .ok_or(Error::IntegerOverflow)?;
    let Some(words) = payload.get(..expected) else {
        return Err(Error::PayloadTooShort {
            expected,
            received: payload.len(),
        });
    };

    let unpackers = channel_unpackers(encoding.channels());
    let mut pixels = Vec::with_capacity(pixel_count * unpackers.len());
    for chunk in words.chunks_exact(word_size) {
        let word = match layout {
            WordLayout::U32Be => BigEndian::read_u32(chunk),
            WordLayout::U16Le => u32::from(LittleEndian::read_u16(chunk)),
            WordLayout::U8 => u32::from(chunk[0]),
        };
        for unpacker in &unpackers {
            let value = (word & unpacker.mask) >> unpacker.shift;
            pixels.push(unpacker.table[value as usize]);
        }
    }

    Ok(pixels)
}
