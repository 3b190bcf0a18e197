/// A single sticker in a pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sticker {
    pub file_id: String,
    pub file_unique_id: String,
    pub emoji: Option<String>,
}

impl Sticker {
    pub fn new(file_id: impl Into<String>, file_unique_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_unique_id: file_unique_id.into(),
            emoji: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// A named sticker pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerSet {
    pub name: String,
    pub title: String,
    pub stickers: Vec<Sticker>,
}

impl StickerSet {
    pub fn file_ids(&self) -> Vec<String> {
        self.stickers.iter().map(|s| s.file_id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}
