//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::StickerError;
use crate::domain::entities::{Sticker, StickerSet};
use crate::domain::traits::StickerSetSource;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSticker {
    file_id: String,
    file_unique_id: String,
    emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiStickerSet {
    name: String,
    title: String,
    stickers: Vec<ApiSticker>,
}

impl From<ApiStickerSet> for StickerSet {
    fn from(set: ApiStickerSet) -> Self {
        Self {
            name: set.name,
            title: set.title,
            stickers: set
                .stickers
                .into_iter()
                .map(|s| {
                    let sticker = Sticker::new(s.file_id, s.file_unique_id);
                    match s.emoji {
                        Some(emoji) => sticker.with_emoji(emoji),
                        None => sticker,
                    }
                })
                .collect(),
        }
    }
}

/// Telegram Bot API client
pub struct TelegramAdapter {
    token: String,
    client: Client,
    api_base: String,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, API_BASE)
    }

    /// Point the adapter at a different Bot API server
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res, StickerError>
    where
        Req: Serialize + ?Sized,
        Res: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| StickerError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let data: ApiResponse<Res> = response.json().await.map_err(|e| {
            StickerError::Parse(format!("{} ({}): {}", method, status, e.without_url()))
        })?;

        if !data.ok {
            return Err(StickerError::Api(
                data.description
                    .unwrap_or_else(|| format!("{} failed with {}", method, status)),
            ));
        }

        data.result
            .ok_or_else(|| StickerError::Parse(format!("{}: missing result", method)))
    }

    /// Fetch bot info from Telegram API
    pub async fn get_me(&self) -> Result<User, StickerError> {
        #[derive(Serialize)]
        struct Empty {}

        self.call("getMe", &Empty {}).await
    }
}

#[async_trait]
impl StickerSetSource for TelegramAdapter {
    async fn get_sticker_set(&self, name: &str) -> Result<StickerSet, StickerError> {
        #[derive(Serialize)]
        struct GetStickerSetRequest<'a> {
            name: &'a str,
        }

        tracing::debug!("Fetching sticker set '{}'", name);
        let set: ApiStickerSet = self
            .call("getStickerSet", &GetStickerSetRequest { name })
            .await?;
        Ok(set.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let adapter = TelegramAdapter::with_api_base("123:abc", "http://localhost:8081/");
        assert_eq!(
            adapter.api_url("getStickerSet"),
            "http://localhost:8081/bot123:abc/getStickerSet"
        );
    }

    #[test]
    fn test_sticker_set_conversion() {
        let raw = r#"{"ok":true,"result":{"name":"pack","title":"Pack","sticker_type":"regular","stickers":[{"file_id":"F1","file_unique_id":"U1","emoji":"😄","width":512,"height":512}]}}"#;
        let response: ApiResponse<ApiStickerSet> = serde_json::from_str(raw).unwrap();
        let set: StickerSet = response.result.unwrap().into();

        assert_eq!(set.name, "pack");
        assert_eq!(set.stickers[0], Sticker::new("F1", "U1").with_emoji("😄"));
    }

    #[test]
    fn test_sticker_without_emoji() {
        let raw = r#"{"ok":true,"result":{"name":"pack","title":"Pack","stickers":[{"file_id":"F2","file_unique_id":"U2"}]}}"#;
        let response: ApiResponse<ApiStickerSet> = serde_json::from_str(raw).unwrap();
        let set: StickerSet = response.result.unwrap().into();

        assert_eq!(set.stickers[0], Sticker::new("F2", "U2"));
        assert_eq!(set.stickers[0].emoji, None);
    }
}
