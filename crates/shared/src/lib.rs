//! Shared types, configuration, and notifications for Aperture.
//!
//! This crate provides common pieces used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Decimal money helpers (rounding, INR formatting)
//! - Configuration management
//! - The WhatsApp notification sender
//!
//! Error types live with the code that produces them: each repository
//! carries its own `thiserror` enum with HTTP mappings.

pub mod config;
pub mod notify;
pub mod types;

pub use config::AppConfig;
pub use notify::WhatsAppService;
