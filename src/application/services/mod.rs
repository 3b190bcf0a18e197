//! Application services

pub mod startup;
pub mod sticker_service;

pub use startup::{Startup, StartupReport};
pub use sticker_service::StickerManager;
