//! Domain layer - Core business objects with no external dependencies
//! 
//! This layer contains:
//! - Entities: Sticker packs
//! - Traits: Abstractions for infrastructure (StickerSetSource)

pub mod entities;
pub mod traits;
