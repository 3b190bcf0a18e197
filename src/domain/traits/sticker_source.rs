use async_trait::async_trait;
use crate::domain::entities::StickerSet;
use crate::application::errors::StickerError;

/// Sticker pack source - abstraction over the messaging platform
#[async_trait]
pub trait StickerSetSource: Send + Sync {
    /// Fetch a sticker pack by its identifier
    async fn get_sticker_set(&self, name: &str) -> Result<StickerSet, StickerError>;
}
