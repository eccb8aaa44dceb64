//! Integer rescaling between channel bit depths.

pub const MAX_BITS: usize = 8;

/// `TABLE[src][dst][value]` is `value` rescaled from `src` to `dst` bits,
/// rounded to nearest. Rows for depth 0 and values outside the source range
/// stay zero.
pub static TABLE: [[[u8; 256]; MAX_BITS + 1]; MAX_BITS + 1] = build_table();

const fn build_table() -> [[[u8; 256]; MAX_BITS + 1]; MAX_BITS + 1] {
    let mut table = [[[0u8; 256]; MAX_BITS + 1]; MAX_BITS + 1];
    let mut src: u32 = 1;
    while src <= MAX_BITS as u32 {
        let src_max = (1u32 << src) - 1;
        let mut dst: u32 = 1;
        while dst <= MAX_BITS as u32 {
            let dst_max = (1u32 << dst) - 1;
            let mut value: u32 = 0;
            while value <= src_max {
                // round(value * dst_max / src_max); src_max is odd, so no ties.
                let scaled = (2 * value * dst_max + src_max) / (2 * src_max);
                table[src as usize][dst as usize][value as usize] = scaled as u8;
                value += 1;
            }
            dst += 1;
        }
        src += 1;
    }
    table
}

/// Lookup row for one source/target depth pair.
///
/// # Panics
/// If either depth is outside `1..=8`.
pub fn table(src_bits: u8, dst_bits: u8) -> &'static [u8; 256] {
    assert!(
        (1..=MAX_BITS as u8).contains(&src_bits) && (1..=MAX_BITS as u8).contains(&dst_bits),
        "bit depth out of range: {src_bits} -> {dst_bits}"
    );
    &TABLE[usize::from(src_bits)][usize::from(dst_bits)]
}

pub fn rescale(value: u8, src_bits: u8, dst_bits: u8) -> u8 {
    table(src_bits, dst_bits)[usize::from(value)]
}
