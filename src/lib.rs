//! Startup core of the Вася group-chat bot: configuration, Firebase
//! credentials and the sticker pack.

pub mod domain;
pub mod application;
pub mod infrastructure;
