//! Small shared helpers.

pub mod encoding;
pub mod hashing;

pub use encoding::{is_binary_file, read_file_safe};
pub use hashing::stable_hash;
