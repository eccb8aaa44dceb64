pub mod deflate;
pub mod xor;

pub use deflate::decode_deflate;
pub use xor::xor_with_key;
