use log::debug;

use crate::compress::{decode_deflate, xor_with_key};
use crate::error::Error;
use crate::Result;

/// Magic of an encrypted container ("IOSCh").
pub const ENCRYPTED_MAGIC: [u8; 5] = *b"IOSCh";
/// Magic, key byte and six bytes of padding.
pub const ENCRYPTED_HEADER_SIZE: usize = 12;

/// Container bytes, either borrowed from the input or owned after decryption.
#[derive(Clone, Debug)]
pub enum ContainerData<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl<'a> ContainerData<'a> {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Borrowed(slice) => slice,
            Self::Owned(buf) => buf.as_slice(),
        }
    }

    pub fn into_owned(self) -> Vec<u8> {
        match self {
            Self::Borrowed(slice) => slice.to_vec(),
            Self::Owned(buf) => buf,
        }
    }

    pub fn is_decrypted(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl AsRef<[u8]> for ContainerData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Key byte of an encrypted container, or `None` for a plain one.
pub fn encryption_key(bytes: &[u8]) -> Result<Option<u8>> {
    let Some(header) = bytes.get(..ENCRYPTED_HEADER_SIZE) else {
        return Err(Error::HeaderTooSmall {
            expected: ENCRYPTED_HEADER_SIZE,
            received: bytes.len(),
        });
    };
    if header[..ENCRYPTED_MAGIC.len()] != ENCRYPTED_MAGIC {
        return Ok(None);
    }
    Ok(Some(header[ENCRYPTED_MAGIC.len()]))
}

/// Returns the plain container: encrypted input is XOR-decrypted and
/// inflated, anything else is passed through untouched.
pub fn decrypt_container(bytes: &[u8]) -> Result<ContainerData<'_>> {
    let Some(key) = encryption_key(bytes)? else {
        return Ok(ContainerData::Borrowed(bytes));
    };

    let packed = xor_with_key(&bytes[ENCRYPTED_HEADER_SIZE..], key);
    let plain = decode_deflate(&packed)?;
    debug!(
        "decrypted container with key {key:#04x}: {} -> {} bytes",
        bytes.len(),
        plain.len()
    );
    Ok(ContainerData::Owned(plain))
}
