use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::application::errors::{BotError, CredentialOrigin};
use crate::application::services::StickerManager;
use crate::domain::traits::StickerSetSource;
use crate::infrastructure::config::BotConfig;

/// Outcome of the startup sequence
#[derive(Debug)]
pub struct StartupReport {
    pub bot_name: String,
    pub project_id: String,
    pub client_email: String,
    pub credential_origin: CredentialOrigin,
    pub sticker_pack_id: String,
    /// `None` when the pack was not loaded
    pub stickers_loaded: Option<usize>,
    pub next_nightly_run: Option<DateTime<Tz>>,
}

impl std::fmt::Display for StartupReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "bot:               {}", self.bot_name)?;
        writeln!(f, "firebase project:  {} ({})", self.project_id, self.client_email)?;
        writeln!(f, "credentials from:  {}", self.credential_origin)?;
        match self.stickers_loaded {
            Some(n) => writeln!(f, "sticker pack:      {} ({} stickers)", self.sticker_pack_id, n)?,
            None => writeln!(f, "sticker pack:      {} (not loaded)", self.sticker_pack_id)?,
        }
        match &self.next_nightly_run {
            Some(at) => write!(f, "next nightly run:  {}", at.format("%Y-%m-%d %H:%M %Z")),
            None => write!(f, "next nightly run:  unscheduled"),
        }
    }
}

/// One-shot startup sequence
pub struct Startup<'a> {
    config: &'a BotConfig,
}

impl<'a> Startup<'a> {
    pub fn new(config: &'a BotConfig) -> Self {
        Self { config }
    }

    /// Validate, resolve credentials, load the sticker pack, plan the nightly run.
    ///
    /// Credential failures abort startup. A sticker pack that cannot be loaded
    /// only degrades sticker replies, so that is logged and startup continues.
    pub async fn run(
        &self,
        stickers: &mut StickerManager,
        source: Option<&dyn StickerSetSource>,
        now: DateTime<Utc>,
    ) -> Result<StartupReport, BotError> {
        let config = self.config;
        config.validate()?;

        tracing::info!("Resolving Firebase credentials from {}", config.credentials.origin());
        let key = config.credentials.resolve()?;
        tracing::info!("Firebase project: {}", key.project_id);

        let stickers_loaded = match source {
            Some(source) => match stickers
                .load_sticker_set(source, &config.sticker_pack_id)
                .await
            {
                Ok(n) => Some(n),
                Err(e) => {
                    tracing::error!(
                        "Failed to load sticker set '{}': {}",
                        config.sticker_pack_id,
                        e
                    );
                    None
                }
            },
            None => {
                tracing::debug!("Skipping sticker set load");
                None
            }
        };

        let next_nightly_run = config.schedule.next_run_after(now);
        if let Some(at) = &next_nightly_run {
            tracing::info!("Next nightly analysis at {}", at);
        }

        Ok(StartupReport {
            bot_name: config.bot_name.clone(),
            project_id: key.project_id.clone(),
            client_email: key.client_email.clone(),
            credential_origin: key.origin().clone(),
            sticker_pack_id: config.sticker_pack_id.clone(),
            stickers_loaded,
            next_nightly_run,
        })
    }
}
