//! Domain entities - Core business objects with no external dependencies

pub mod sticker;

pub use sticker::{Sticker, StickerSet};
