pub mod encoding;
pub mod file_ops;

pub use encoding::{from_base64, to_base64, TextEncoding};
