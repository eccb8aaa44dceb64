extern crate miette;
extern crate thiserror;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("texture file I/O error")]
    #[diagnostic(code(padtex::io_error))]
    Io(#[from] std::io::Error),

    #[error("container is too small for its header (must be at least {expected} bytes, received {received})")]
    #[diagnostic(code(padtex::header_size_error))]
    HeaderTooSmall { expected: usize, received: usize },

    #[error("failed to inflate encrypted container ({packed_len} packed bytes, {inflated} inflated before the error)")]
    #[diagnostic(code(padtex::decompression_error))]
    DecompressionFailed {
        packed_len: usize,
        inflated: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest record {index} of block at {block_offset:#x} is out of bounds (container is {blob_len} bytes)")]
    #[diagnostic(code(padtex::manifest_bounds_error))]
    ManifestOutOfBounds {
        block_offset: usize,
        index: usize,
        blob_len: usize,
    },

    #[error("unknown pixel encoding {id:#x} in manifest record at {record_offset:#x}")]
    #[diagnostic(
        code(padtex::unknown_encoding),
        help("this is probably a texture format variant that is not supported yet")
    )]
    UnknownEncoding { id: u8, record_offset: usize },

    #[error("texture name in manifest record at {record_offset:#x} is not valid UTF-8")]
    #[diagnostic(code(padtex::name_error))]
    InvalidName {
        record_offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("payload of \"{name}\" ({start:#x}..{end:#x}) lies outside the container ({blob_len} bytes)")]
    #[diagnostic(code(padtex::payload_bounds_error))]
    PayloadOutOfBounds {
        name: String,
        start: usize,
        end: usize,
        blob_len: usize,
    },

    #[error("pixel payload too short (expected {expected} bytes, received {received})")]
    #[diagnostic(code(padtex::payload_size_error))]
    PayloadTooShort { expected: usize, received: usize },

    #[error("{encoding} textures cannot be encoded as PNG")]
    #[diagnostic(code(padtex::not_encodable))]
    NotEncodable {
        encoding: crate::encoding::PixelEncoding,
    },

    #[error("failed to encode PNG image")]
    #[diagnostic(code(padtex::image_error))]
    Image(#[from] image::ImageError),

    #[error("integer overflow")]
    #[diagnostic(code(padtex::overflow))]
    IntegerOverflow,
}
