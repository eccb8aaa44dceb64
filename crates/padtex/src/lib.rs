//! Extraction of texture images from Puzzle & Dragons texture containers.
//!
//! A container is an optionally encrypted blob holding "TEX" blocks; each
//! block carries a manifest describing the textures stored after it. The
//! usual flow is [`decrypt_container`], then [`scan_textures`], then
//! [`render_texture`] or [`export_texture`] per texture.

pub mod codec;
pub mod compress;
pub mod container;
pub mod emit;
pub mod encoding;
pub mod error;
pub mod post;
pub mod rescale;
pub mod scan;

use crate::error::Error;

pub use crate::container::{decrypt_container, ContainerData};
pub use crate::emit::{export_texture, render_texture};
pub use crate::encoding::PixelEncoding;
pub use crate::scan::{scan_textures, Texture, TextureDescriptor, Textures};

pub type Result<T> = core::result::Result<T, Error>;

/// Post-processing switches applied to textures with an alpha channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Remove fully transparent border rows and columns.
    pub trim: bool,
    /// Zero the colour of fully transparent pixels.
    pub blacken: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            trim: true,
            blacken: true,
        }
    }
}

/// A texture copied out of its container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedTexture {
    pub descriptor: TextureDescriptor,
    pub data: Vec<u8>,
}

impl OwnedTexture {
    pub fn as_texture(&self) -> Texture<'_> {
        Texture {
            descriptor: self.descriptor.clone(),
            data: &self.data,
        }
    }
}

/// Decrypts `bytes` if needed and collects every texture it contains.
pub fn read_textures(bytes: &[u8]) -> Result<Vec<OwnedTexture>> {
    let container = decrypt_container(bytes)?;
    scan_textures(container.as_slice())
        .map(|texture| {
            texture.map(|texture| OwnedTexture {
                descriptor: texture.descriptor,
                data: texture.data.to_vec(),
            })
        })
        .collect()
}
