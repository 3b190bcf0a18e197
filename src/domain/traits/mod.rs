//! Domain traits - Abstractions for infrastructure implementations

pub mod sticker_source;

pub use sticker_source::StickerSetSource;
