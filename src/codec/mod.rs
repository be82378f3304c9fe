//! Codecs between typed snapshots and their external forms
//!
//! - `scalar`: a single cell
//! - `delimited`: the clipboard text format
//! - `grid`: spreadsheet sheets

pub mod delimited;
pub mod grid;
pub mod scalar;

pub use delimited::{deserialize, deserialize_payload, parse_structured, serialize, to_payload};
pub use grid::{from_grid, to_grid};
pub use scalar::{coerce, decode, decode_cell, encode, encode_cell, infer_token, Decoded};
