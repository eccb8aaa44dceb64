use crate::error::Error;
use crate::Result;
use flate2::read::DeflateDecoder;
use std::io::Read;

/// Inflates a raw Deflate (RFC 1951) stream, without zlib header or trailer.
pub fn decode_deflate(packed: &[u8]) -> Result<Vec<u8>> {
    let mut plain = Vec::new();
    DeflateDecoder::new(packed)
        .read_to_end(&mut plain)
        .map_err(|source| Error::DecompressionFailed {
            packed_len: packed.len(),
            inflated: plain.len(),
            source,
        })?;
    Ok(plain)
}
