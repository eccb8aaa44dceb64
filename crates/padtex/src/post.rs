//! Alpha-driven clean-up passes run before an image is written.

/// Channel-interleaved 8-bit pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// True when no sample is non-zero; such images are never written.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&v| v == 0)
    }

    fn alpha(&self, x: usize, y: usize) -> u8 {
        let width = self.width as usize;
        self.pixels[(y * width + x) * self.channels + self.channels - 1]
    }

    fn row_is_transparent(&self, y: usize) -> bool {
        (0..self.width as usize).all(|x| self.alpha(x, y) == 0)
    }

    fn column_is_transparent(&self, x: usize) -> bool {
        (0..self.height as usize).all(|y| self.alpha(x, y) == 0)
    }
}

/// Removes border rows and columns whose alpha is zero everywhere.
///
/// The last channel is taken as alpha. A fully transparent image collapses
/// to 0x0 with no pixels.
pub fn trim_transparent_edges(image: &DecodedImage) -> DecodedImage {
    let width = image.width as usize;
    let height = image.height as usize;

    let empty = DecodedImage {
        width: 0,
        height: 0,
        channels: image.channels,
        pixels: Vec::new(),
    };
    if image.channels == 0 || image.pixels.len() < width * height * image.channels {
        return empty;
    }

    let Some(top) = (0..height).find(|&y| !image.row_is_transparent(y)) else {
        return empty;
    };
    let bottom = (top..height)
        .rev()
        .find(|&y| !image.row_is_transparent(y))
        .unwrap_or(top);
    let left = (0..width)
        .find(|&x| !image.column_is_transparent(x))
        .unwrap_or(0);
    let right = (left..width)
        .rev()
        .find(|&x| !image.column_is_transparent(x))
        .unwrap_or(left);

    let trimmed_width = right - left + 1;
    let trimmed_height = bottom - top + 1;
    if trimmed_width == width && trimmed_height == height {
        return image.clone();
    }

    let row_len = trimmed_width * image.channels;
    let mut pixels = Vec::with_capacity(row_len * trimmed_height);
    for y in top..=bottom {
        let start = (y * width + left) * image.channels;
        pixels.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    DecodedImage {
        width: trimmed_width as u32,
        height: trimmed_height as u32,
        channels: image.channels,
        pixels,
    }
}

/// Zeroes the colour channels of every pixel whose alpha is zero.
pub fn blacken_transparent_pixels(image: &mut DecodedImage) {
    let channels = image.channels;
    if channels == 0 {
        return;
    }
    for pixel in image.pixels.chunks_exact_mut(channels) {
        if pixel[channels - 1] == 0 {
            pixel[..channels - 1].fill(0);
        }
    }
}
