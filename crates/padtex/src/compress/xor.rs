/// Applies a single-byte XOR key to every byte of `data`.
pub fn xor_with_key(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|&b| b ^ key).collect()
}
