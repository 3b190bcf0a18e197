//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Environment and credential loading
//! - Adapters: Platform integrations (Telegram)

pub mod config;
pub mod adapters;
