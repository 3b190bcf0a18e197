//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Startup sequence, sticker selection
//! - Errors: Domain-specific errors

pub mod errors;
pub mod services;
