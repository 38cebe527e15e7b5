//! Model and word list file reading.
#![forbid(unsafe_code)]

pub mod bmf;
pub mod dictionary;

pub use bmf::{Bmf, BmfError, BmfVertex, BoxCollider, TextureGroup, encode_bmf, load_bmf, parse_bmf};
pub use dictionary::{Dictionary, DictionaryError, WordType, load_dictionary};
