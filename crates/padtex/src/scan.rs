use core::ops::Range;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::encoding::PixelEncoding;
use crate::error::Error;
use crate::Result;

/// Magic of a texture block header ("TEX").
pub const BLOCK_MAGIC: [u8; 3] = *b"TEX";
/// Magic, one padding byte, texture count and 11 reserved bytes.
pub const BLOCK_HEADER_SIZE: usize = 16;
pub const BLOCK_ALIGNMENT: usize = 16;
/// Payload offset, packed width, packed height and a 24-byte name.
pub const MANIFEST_ENTRY_SIZE: usize = 32;
pub const NAME_SIZE: usize = 24;
/// Raw entries keep their byte count in the last four bytes of the name field.
pub const RAW_NAME_SIZE: usize = 20;
pub const DIMENSION_MASK: u16 = 0x0FFF;

/// Splits a packed width field into encoding id and 12-bit width.
pub fn unpack_width(raw: u16) -> (u8, u16) {
    ((raw >> 12) as u8, raw & DIMENSION_MASK)
}

pub fn pack_width(encoding_id: u8, width: u16) -> u16 {
    (u16::from(encoding_id & 0x0F) << 12) | (width & DIMENSION_MASK)
}

/// Metadata of one manifest record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub encoding: PixelEncoding,
    /// Payload bytes within the plain container.
    pub range: Range<usize>,
}

impl TextureDescriptor {
    pub fn byte_len(&self) -> usize {
        self.range.len()
    }
}

/// A texture found in a container, with its payload borrowed from it.
#[derive(Clone, Debug)]
pub struct Texture<'a> {
    pub descriptor: TextureDescriptor,
    pub data: &'a [u8],
}

impl Texture<'_> {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn width(&self) -> u32 {
        u32::from(self.descriptor.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.descriptor.height)
    }

    pub fn encoding(&self) -> PixelEncoding {
        self.descriptor.encoding
    }
}

#[derive(Copy, Clone, Debug)]
struct BlockCursor {
    start: usize,
    count: usize,
    next: usize,
    /// Where scanning resumes once the block is done.
    resume: usize,
}

/// Lazy walk over every texture block of a plain container.
///
/// Yields textures in block order, then manifest order. Iteration ends after
/// the first error.
#[derive(Clone, Debug)]
pub struct Textures<'a> {
    blob: &'a [u8],
    offset: usize,
    block: Option<BlockCursor>,
    finished: bool,
}

pub fn scan_textures(blob: &[u8]) -> Textures<'_> {
    Textures {
        blob,
        offset: 0,
        block: None,
        finished: false,
    }
}

impl<'a> Textures<'a> {
    fn read_entry(&self, block_start: usize, index: usize) -> Result<Texture<'a>> {
        let record_offset = block_start
            .checked_add(BLOCK_HEADER_SIZE)
            .and_then(|v| v.checked_add(index.checked_mul(MANIFEST_ENTRY_SIZE)?))
            .ok_or(Error::IntegerOverflow)?;
        let record = record_offset
            .checked_add(MANIFEST_ENTRY_SIZE)
            .and_then(|end| self.blob.get(record_offset..end))
            .ok_or(Error::ManifestOutOfBounds {
                block_offset: block_start,
                index,
                blob_len: self.blob.len(),
            })?;

        let payload_offset = LittleEndian::read_u32(&record[0..4]);
        let (encoding_id, width) = unpack_width(LittleEndian::read_u16(&record[4..6]));
        let height = LittleEndian::read_u16(&record[6..8]) & DIMENSION_MASK;
        let name_field = &record[8..8 + NAME_SIZE];

        let encoding = PixelEncoding::from_id(encoding_id).ok_or(Error::UnknownEncoding {
            id: encoding_id,
            record_offset,
        })?;

        let (name_raw, byte_len) = match encoding.stride() {
            Some(stride) => (name_field, usize::from(width) * usize::from(height) * stride),
            None => {
                let len = LittleEndian::read_u32(&name_field[RAW_NAME_SIZE..]);
                let len = usize::try_from(len).map_err(|_| Error::IntegerOverflow)?;
                (&name_field[..RAW_NAME_SIZE], len)
            }
        };
        let name = decode_name(name_raw)
            .map_err(|source| Error::InvalidName {
                record_offset,
                source,
            })?
            .to_owned();

        let start = usize::try_from(payload_offset)
            .ok()
            .and_then(|off| block_start.checked_add(off))
            .ok_or(Error::IntegerOverflow)?;
        if byte_len == 0 {
            // Nothing to read, so the offset is irrelevant.
            let at = start.min(self.blob.len());
            return Ok(Texture {
                descriptor: TextureDescriptor {
                    name,
                    width,
                    height,
                    encoding,
                    range: at..at,
                },
                data: &[],
            });
        }

        let end = start.checked_add(byte_len).ok_or(Error::IntegerOverflow)?;
        let Some(data) = self.blob.get(start..end) else {
            return Err(Error::PayloadOutOfBounds {
                name,
                start,
                end,
                blob_len: self.blob.len(),
            });
        };

        Ok(Texture {
            descriptor: TextureDescriptor {
                name,
                width,
                height,
                encoding,
                range: start..end,
            },
            data,
        })
    }
}

impl<'a> Iterator for Textures<'a> {
    type Item = Result<Texture<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(mut block) = self.block {
                if block.next < block.count {
                    let index = block.next;
                    block.next += 1;

                    return match self.read_entry(block.start, index) {
                        Ok(texture) => {
                            // Skip payload bytes instead of rescanning them for headers.
                            let aligned_end = texture.descriptor.range.end & !(BLOCK_ALIGNMENT - 1);
                            block.resume = block.resume.max(aligned_end);
                            self.block = Some(block);
                            Some(Ok(texture))
                        }
                        Err(err) => {
                            self.finished = true;
                            Some(Err(err))
                        }
                    };
                }
                self.block = None;
                self.offset = block.resume;
                continue;
            }

            if self.offset + BLOCK_HEADER_SIZE >= self.blob.len() {
                self.finished = true;
                return None;
            }

            let header = &self.blob[self.offset..self.offset + BLOCK_HEADER_SIZE];
            if header[..BLOCK_MAGIC.len()] == BLOCK_MAGIC {
                let count = usize::from(header[4]);
                debug!("texture block at {:#x} with {count} entries", self.offset);
                self.block = Some(BlockCursor {
                    start: self.offset,
                    count,
                    next: 0,
                    resume: self.offset + BLOCK_ALIGNMENT,
                });
            } else {
                self.offset += BLOCK_ALIGNMENT;
            }
        }
    }
}

impl core::iter::FusedIterator for Textures<'_> {}

/// Name bytes up to the first NUL, as UTF-8.
fn decode_name(raw: &[u8]) -> core::result::Result<&str, core::str::Utf8Error> {
    let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    core::str::from_utf8(&raw[..len])
}
