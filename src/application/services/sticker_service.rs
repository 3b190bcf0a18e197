use rand::seq::SliceRandom;
use std::collections::HashMap;

use crate::application::errors::StickerError;
use crate::domain::traits::StickerSetSource;

/// Built-in emotion -> file id mapping, used when no pack is loaded
const DEFAULT_STICKERS: &[(&str, &str)] = &[(
    "happy",
    "CAACAgIAAxkBAAEQUVxpdIeyvxepv5LBpDDNIWszpN8JJQAC85oAAgRqgUshcX0t9I5SSDgE",
)];

/// Emoji sent as text when no sticker is available
const FALLBACK_EMOJI: &[(&str, &str)] = &[
    ("happy", "😄"),
    ("sad", "😢"),
    ("laugh", "😂"),
    ("cool", "😎"),
    ("think", "🤔"),
    ("wtf", "🤨"),
];

/// Emotions the bot knows how to express
pub const EMOTIONS: &[&str] = &["happy", "sad", "laugh", "cool", "think", "wtf"];

/// Holds sticker file ids: a loaded pack and a per-emotion fallback map
pub struct StickerManager {
    stickers: HashMap<String, String>,
    set_name: Option<String>,
    pack: Vec<String>,
}

impl Default for StickerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StickerManager {
    pub fn new() -> Self {
        Self {
            stickers: DEFAULT_STICKERS
                .iter()
                .map(|(emotion, id)| (emotion.to_string(), id.to_string()))
                .collect(),
            set_name: None,
            pack: Vec::new(),
        }
    }

    /// Add or replace emotion mappings
    pub fn with_custom<I, K, V>(mut self, custom: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (emotion, file_id) in custom {
            let emotion: String = emotion.into();
            self.stickers
                .insert(emotion.trim().to_lowercase(), file_id.into());
        }
        self
    }

    /// Load every sticker of a pack. Returns how many were loaded.
    ///
    /// On failure the previously loaded pack, if any, is kept.
    pub async fn load_sticker_set(
        &mut self,
        source: &dyn StickerSetSource,
        name: &str,
    ) -> Result<usize, StickerError> {
        let set = source.get_sticker_set(name).await?;
        if set.is_empty() {
            return Err(StickerError::Empty(name.to_string()));
        }

        self.pack = set.file_ids();
        self.set_name = Some(name.to_string());
        tracing::info!("Loaded {} stickers from set '{}'", self.pack.len(), name);
        Ok(self.pack.len())
    }

    /// Sticker for an emotion.
    ///
    /// A loaded pack wins: any sticker from it is returned at random.
    pub fn file_id(&self, emotion: &str) -> Option<String> {
        if let Some(id) = self.random_sticker() {
            return Some(id);
        }
        self.stickers
            .get(&emotion.trim().to_lowercase())
            .filter(|id| !id.is_empty())
            .cloned()
    }

    pub fn random_sticker(&self) -> Option<String> {
        self.pack.choose(&mut rand::thread_rng()).cloned()
    }

    /// Text to send when no sticker could be sent
    pub fn fallback_text(emotion: &str) -> String {
        let key = emotion.trim().to_lowercase();
        FALLBACK_EMOJI
            .iter()
            .find(|(e, _)| *e == key)
            .map(|(_, emoji)| emoji.to_string())
            .unwrap_or_else(|| format!("*стикер: {}*", emotion))
    }

    pub fn set_name(&self) -> Option<&str> {
        self.set_name.as_deref()
    }

    pub fn pack_len(&self) -> usize {
        self.pack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Sticker, StickerSet};
    use async_trait::async_trait;

    struct FakeSource {
        stickers: Vec<&'static str>,
    }

    #[async_trait]
    impl StickerSetSource for FakeSource {
        async fn get_sticker_set(&self, name: &str) -> Result<StickerSet, StickerError> {
            if name == "broken" {
                return Err(StickerError::Api("Bad Request: STICKERSET_INVALID".to_string()));
            }
            Ok(StickerSet {
                name: name.to_string(),
                title: "Test".to_string(),
                stickers: self
                    .stickers
                    .iter()
                    .map(|id| Sticker::new(*id, format!("u-{}", id)))
                    .collect(),
            })
        }
    }

    #[test]
    fn test_emotion_map_without_pack() {
        let manager = StickerManager::new();
        assert!(manager.file_id("HAPPY ").is_some());
        assert_eq!(manager.file_id("sad"), None);
        assert_eq!(manager.random_sticker(), None);
    }

    #[test]
    fn test_custom_mapping() {
        let manager = StickerManager::new().with_custom([("Sad", "sad-id")]);
        assert_eq!(manager.file_id("sad").as_deref(), Some("sad-id"));
    }

    #[tokio::test]
    async fn test_loaded_pack_wins() {
        let source = FakeSource { stickers: vec!["a", "b", "c"] };
        let mut manager = StickerManager::new();

        let loaded = manager.load_sticker_set(&source, "userpack").await.unwrap();
        assert_eq!(loaded, 3);
        assert_eq!(manager.set_name(), Some("userpack"));

        for _ in 0..20 {
            let id = manager.file_id("whatever").unwrap();
            assert!(["a", "b", "c"].contains(&id.as_str()));
        }
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_pack() {
        let source = FakeSource { stickers: vec!["only"] };
        let mut manager = StickerManager::new();
        manager.load_sticker_set(&source, "first").await.unwrap();

        let err = manager.load_sticker_set(&source, "broken").await.unwrap_err();
        assert!(matches!(err, StickerError::Api(_)));
        assert_eq!(manager.set_name(), Some("first"));
        assert_eq!(manager.random_sticker().as_deref(), Some("only"));
    }

    #[tokio::test]
    async fn test_empty_pack_is_error() {
        let source = FakeSource { stickers: vec![] };
        let mut manager = StickerManager::new();
        let err = manager.load_sticker_set(&source, "empty").await.unwrap_err();
        assert!(matches!(err, StickerError::Empty(_)));
        assert_eq!(manager.pack_len(), 0);
    }

    #[test]
    fn test_fallback_text() {
        assert_eq!(StickerManager::fallback_text("Laugh"), "😂");
        assert_eq!(StickerManager::fallback_text("confused"), "*стикер: confused*");
        for emotion in EMOTIONS {
            assert!(!StickerManager::fallback_text(emotion).starts_with('*'));
        }
    }
}
