//! Configuration management
//!
//! Every setting comes from the environment, seeded from `.env` in local
//! development. Mandatory keys must be non-empty; everything else has a
//! default.

pub mod credentials;
pub mod env;
pub mod schedule;

use std::fmt::Write as _;
use std::str::FromStr;

use crate::application::errors::ConfigError;

pub use credentials::{CredentialSource, ServiceAccountKey};
pub use env::{load_dotenv, EnvSource, MapEnv, ProcessEnv};
pub use schedule::ScheduleConfig;

pub const DEFAULT_BOT_NAME: &str = "Вася";
pub const DEFAULT_STICKER_PACK_ID: &str = "userpack7845974bystickrubot";

/// Bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub deepseek_api_key: String,
    pub giphy_api_key: String,
    pub gemini_api_key: Option<String>,
    pub credentials: CredentialSource,

    pub bot_name: String,
    /// Group chat the bot is limited to, if any
    pub chat_id: Option<i64>,
    pub sticker_pack_id: String,

    pub memory: MemoryConfig,
    pub deepseek: DeepSeekConfig,
    pub random_response_probability: f32,
    pub giphy: GiphyConfig,
    pub schedule: ScheduleConfig,

    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    /// Max messages kept in short-term memory
    pub short_memory_limit: usize,
    /// Messages included in the model context
    pub context_messages_count: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_memory_limit: 30,
            context_messages_count: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeepSeekConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            max_tokens: 150,
            temperature: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GiphyConfig {
    pub api_url: String,
    pub limit: u32,
    pub rating: String,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.giphy.com/v1/gifs/search".to_string(),
            limit: 10,
            rating: "pg-13".to_string(),
        }
    }
}

fn required(env: &impl EnvSource, key: &str) -> Result<String, ConfigError> {
    env.get(key)
        .map(|v| v.trim().to_string())
        .ok_or_else(|| ConfigError::MissingField(key.to_string()))
}

fn parsed<T>(env: &impl EnvSource, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, format!("{:?}: {}", raw, e))),
        None => Ok(default),
    }
}

/// Default tracing directive, from `LOG_LEVEL`
pub fn log_level(env: &impl EnvSource) -> String {
    env.get("LOG_LEVEL")
        .map(|l| l.trim().to_lowercase())
        .unwrap_or_else(|| "info".to_string())
}

/// Mask a secret for display: first four characters and an ellipsis.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}…", prefix)
    }
}

impl BotConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// Load from any key/value source
    pub fn from_source(env: &impl EnvSource) -> Result<Self, ConfigError> {
        let telegram_token = required(env, "TELEGRAM_TOKEN")?;
        let deepseek_api_key = required(env, "DEEPSEEK_API_KEY")?;
        let giphy_api_key = required(env, "GIPHY_API_KEY")?;
        let credentials = CredentialSource::from_source(env)?;

        let chat_id = env.get("CHAT_ID").and_then(|raw| match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Ignoring CHAT_ID={:?}: not an integer", raw);
                None
            }
        });

        let defaults = MemoryConfig::default();
        let memory = MemoryConfig {
            short_memory_limit: parsed(env, "SHORT_MEMORY_LIMIT", defaults.short_memory_limit)?,
            context_messages_count: parsed(
                env,
                "CONTEXT_MESSAGES_COUNT",
                defaults.context_messages_count,
            )?,
        };

        let defaults = DeepSeekConfig::default();
        let deepseek = DeepSeekConfig {
            base_url: env.get("DEEPSEEK_BASE_URL").unwrap_or(defaults.base_url),
            model: env.get("DEEPSEEK_MODEL").unwrap_or(defaults.model),
            max_tokens: parsed(env, "DEEPSEEK_MAX_TOKENS", defaults.max_tokens)?,
            temperature: parsed(env, "DEEPSEEK_TEMPERATURE", defaults.temperature)?,
        };

        let defaults = GiphyConfig::default();
        let giphy = GiphyConfig {
            api_url: env.get("GIPHY_API_URL").unwrap_or(defaults.api_url),
            limit: parsed(env, "GIPHY_LIMIT", defaults.limit)?,
            rating: env.get("GIPHY_RATING").unwrap_or(defaults.rating),
        };

        let defaults = ScheduleConfig::default();
        let schedule = ScheduleConfig {
            hour: parsed(env, "NIGHTLY_ANALYSIS_HOUR", defaults.hour)?,
            minute: parsed(env, "NIGHTLY_ANALYSIS_MINUTE", defaults.minute)?,
            timezone: match env.get("TIMEZONE") {
                Some(name) => ScheduleConfig::parse_timezone(&name)?,
                None => defaults.timezone,
            },
        };

        Ok(Self {
            telegram_token,
            deepseek_api_key,
            giphy_api_key,
            gemini_api_key: env.get("GEMINI_API_KEY"),
            credentials,
            bot_name: env
                .get("BOT_NAME")
                .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string()),
            chat_id,
            sticker_pack_id: env
                .get("STICKER_PACK_ID")
                .unwrap_or_else(|| DEFAULT_STICKER_PACK_ID.to_string()),
            memory,
            deepseek,
            random_response_probability: parsed(env, "RANDOM_RESPONSE_PROBABILITY", 0.1)?,
            giphy,
            schedule,
            log_level: log_level(env),
        })
    }

    /// Validate value ranges and URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.random_response_probability) {
            return Err(ConfigError::invalid(
                "RANDOM_RESPONSE_PROBABILITY",
                format!("{} is outside [0, 1]", self.random_response_probability),
            ));
        }
        if !(0.0..=2.0).contains(&self.deepseek.temperature) {
            return Err(ConfigError::invalid(
                "DEEPSEEK_TEMPERATURE",
                format!("{} is outside [0, 2]", self.deepseek.temperature),
            ));
        }
        if self.memory.short_memory_limit == 0 {
            return Err(ConfigError::invalid("SHORT_MEMORY_LIMIT", "must be positive"));
        }
        if self.memory.context_messages_count == 0
            || self.memory.context_messages_count > self.memory.short_memory_limit
        {
            return Err(ConfigError::invalid(
                "CONTEXT_MESSAGES_COUNT",
                format!(
                    "must be between 1 and SHORT_MEMORY_LIMIT ({})",
                    self.memory.short_memory_limit
                ),
            ));
        }
        if self.deepseek.max_tokens == 0 {
            return Err(ConfigError::invalid("DEEPSEEK_MAX_TOKENS", "must be positive"));
        }
        if self.giphy.limit == 0 {
            return Err(ConfigError::invalid("GIPHY_LIMIT", "must be positive"));
        }
        for (key, url) in [
            ("DEEPSEEK_BASE_URL", &self.deepseek.base_url),
            ("GIPHY_API_URL", &self.giphy.api_url),
        ] {
            if let Err(e) = reqwest::Url::parse(url) {
                return Err(ConfigError::invalid(key, format!("{:?}: {}", url, e)));
            }
        }
        self.schedule.validate()
    }

    /// Human-readable summary with every secret masked
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "bot name:          {}", self.bot_name);
        let _ = writeln!(
            out,
            "chat filter:       {}",
            self.chat_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "all chats".to_string())
        );
        let _ = writeln!(out, "sticker pack:      {}", self.sticker_pack_id);
        let _ = writeln!(out, "telegram token:    {}", mask_secret(&self.telegram_token));
        let _ = writeln!(out, "deepseek api key:  {}", mask_secret(&self.deepseek_api_key));
        let _ = writeln!(out, "giphy api key:     {}", mask_secret(&self.giphy_api_key));
        let _ = writeln!(
            out,
            "gemini api key:    {}",
            self.gemini_api_key
                .as_deref()
                .map(mask_secret)
                .unwrap_or_else(|| "not set".to_string())
        );
        let _ = writeln!(out, "firebase creds:    {}", self.credentials.origin());
        let _ = writeln!(
            out,
            "deepseek model:    {} @ {} (max_tokens={}, temperature={})",
            self.deepseek.model,
            self.deepseek.base_url,
            self.deepseek.max_tokens,
            self.deepseek.temperature
        );
        let _ = writeln!(
            out,
            "memory:            {} short-term, {} in context",
            self.memory.short_memory_limit, self.memory.context_messages_count
        );
        let _ = writeln!(
            out,
            "random replies:    {:.0}%",
            self.random_response_probability * 100.0
        );
        let _ = writeln!(
            out,
            "nightly analysis:  {:02}:{:02} {}",
            self.schedule.hour,
            self.schedule.minute,
            self.schedule.timezone.name()
        );
        let _ = write!(out, "log level:         {}", self.log_level);
        out
    }

    /// `.env` template with every variable and its default
    pub fn env_template() -> String {
        let memory = MemoryConfig::default();
        let deepseek = DeepSeekConfig::default();
        let giphy = GiphyConfig::default();
        let schedule = ScheduleConfig::default();

        format!(
            "# Required\n\
             TELEGRAM_TOKEN=\n\
             DEEPSEEK_API_KEY=\n\
             GIPHY_API_KEY=\n\
             \n\
             # Firebase: inline single-line JSON (deployments) or a file path (local)\n\
             FIREBASE_CRED_JSON=\n\
             FIREBASE_CRED_PATH=firebase-service-account.json\n\
             \n\
             # Optional\n\
             GEMINI_API_KEY=\n\
             BOT_NAME={bot_name}\n\
             CHAT_ID=\n\
             STICKER_PACK_ID={sticker_pack}\n\
             LOG_LEVEL=info\n\
             \n\
             SHORT_MEMORY_LIMIT={short}\n\
             CONTEXT_MESSAGES_COUNT={context}\n\
             DEEPSEEK_BASE_URL={ds_url}\n\
             DEEPSEEK_MODEL={ds_model}\n\
             DEEPSEEK_MAX_TOKENS={ds_tokens}\n\
             DEEPSEEK_TEMPERATURE={ds_temp}\n\
             RANDOM_RESPONSE_PROBABILITY=0.1\n\
             GIPHY_API_URL={giphy_url}\n\
             GIPHY_LIMIT={giphy_limit}\n\
             GIPHY_RATING={giphy_rating}\n\
             NIGHTLY_ANALYSIS_HOUR={hour}\n\
             NIGHTLY_ANALYSIS_MINUTE={minute}\n\
             TIMEZONE={tz}\n",
            bot_name = DEFAULT_BOT_NAME,
            sticker_pack = DEFAULT_STICKER_PACK_ID,
            short = memory.short_memory_limit,
            context = memory.context_messages_count,
            ds_url = deepseek.base_url,
            ds_model = deepseek.model,
            ds_tokens = deepseek.max_tokens,
            ds_temp = deepseek.temperature,
            giphy_url = giphy.api_url,
            giphy_limit = giphy.limit,
            giphy_rating = giphy.rating,
            hour = schedule.hour,
            minute = schedule.minute,
            tz = schedule.timezone.name(),
        )
    }
}
