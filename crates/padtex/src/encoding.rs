/// Packed pixel layouts found in texture manifests.
///
/// Channel widths are listed from the most significant bits of a packed word
/// to the least significant ones, which is also the order the channels are
/// written out in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelEncoding {
    /// Four bytes per pixel, one byte per red, green, blue and alpha channel.
    Rgba8888,
    /// Two bytes per pixel, 5 bits red, 6 bits green, 5 bits blue.
    Rgb565,
    /// Two bytes per pixel, 4 bits per channel.
    Rgba4444,
    /// Two bytes per pixel, 5 bits per colour channel and a 1-bit alpha.
    Rgba5551,
    /// One byte per pixel, greyscale.
    L8,
    /// Opaque file data (usually JPEG) with an explicit byte count.
    Raw,
}

/// Size and byte order of one packed pixel word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WordLayout {
    /// 32-bit big-endian word.
    U32Be,
    /// 16-bit little-endian word.
    U16Le,
    /// Single byte.
    U8,
}

impl PixelEncoding {
    pub const ALL: [PixelEncoding; 6] = [
        Self::Rgba8888,
        Self::Rgb565,
        Self::Rgba4444,
        Self::Rgba5551,
        Self::L8,
        Self::Raw,
    ];

    /// Maps the 4-bit identifier stored in a manifest's packed width field.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x0 => Some(Self::Rgba8888),
            0x2 => Some(Self::Rgb565),
            0x3 => Some(Self::Rgba4444),
            0x4 => Some(Self::Rgba5551),
            // Both 0x8 and 0x9 are plain greyscale.
            0x8 | 0x9 => Some(Self::L8),
            0xD => Some(Self::Raw),
            _ => None,
        }
    }

    /// Canonical identifier, the inverse of [`PixelEncoding::from_id`].
    pub fn id(self) -> u8 {
        match self {
            Self::Rgba8888 => 0x0,
            Self::Rgb565 => 0x2,
            Self::Rgba4444 => 0x3,
            Self::Rgba5551 => 0x4,
            Self::L8 => 0x8,
            Self::Raw => 0xD,
        }
    }

    /// Channel bit widths; empty for [`PixelEncoding::Raw`].
    pub fn channels(self) -> &'static [u8] {
        match self {
            Self::Rgba8888 => &[8, 8, 8, 8],
            Self::Rgb565 => &[5, 6, 5],
            Self::Rgba4444 => &[4, 4, 4, 4],
            Self::Rgba5551 => &[5, 5, 5, 1],
            Self::L8 => &[8],
            Self::Raw => &[],
        }
    }

    pub fn channel_count(self) -> usize {
        self.channels().len()
    }

    /// Bytes per packed pixel, `None` for raw payloads.
    pub fn stride(self) -> Option<usize> {
        if self.is_raw() {
            return None;
        }
        let bits: usize = self.channels().iter().map(|&b| usize::from(b)).sum();
        Some(bits / 8)
    }

    pub fn word_layout(self) -> Option<WordLayout> {
        match self.stride()? {
            4 => Some(WordLayout::U32Be),
            2 => Some(WordLayout::U16Le),
            1 => Some(WordLayout::U8),
            _ => None,
        }
    }

    pub fn has_alpha(self) -> bool {
        self.channel_count() == 4
    }

    pub fn is_greyscale(self) -> bool {
        self.channel_count() == 1
    }

    pub fn is_raw(self) -> bool {
        self == Self::Raw
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rgba8888 => "RGBA8888",
            Self::Rgb565 => "RGB565",
            Self::Rgba4444 => "RGBA4444",
            Self::Rgba5551 => "RGBA5551",
            Self::L8 => "L8",
            Self::Raw => "RAW",
        }
    }
}

impl core::fmt::Display for PixelEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
