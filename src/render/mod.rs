//! HTML body assembly: plain-text promotion, embedded data-URL image
//! extraction and `cid:` reference resolution.

pub mod body;
pub mod images;
